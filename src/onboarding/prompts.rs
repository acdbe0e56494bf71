//! Fixed question and hint text shown during onboarding.

use super::state::WizardStep;

/// Shown once when the wizard reaches `Done`.
pub const COMPLETION_MESSAGE: &str = "Thanks! Launching the assistant...";

/// Surfaced when the established date does not parse.
pub const INVALID_DATE_MESSAGE: &str = "invalid date format";

/// The question asked while waiting in `step`. `None` once complete.
pub fn question(step: WizardStep) -> Option<&'static str> {
    match step {
        WizardStep::AwaitName => Some("Welcome! What's the name of your company?"),
        WizardStep::AwaitSector => Some("Great, and which sector or field are you in?"),
        WizardStep::AwaitStatus => Some("Got it. Is your company new or established?"),
        WizardStep::AwaitDate => Some("When was the company established? (MM/DD/YYYY)"),
        WizardStep::Done => None,
    }
}

/// Input hint for the step's answer field.
pub fn placeholder(step: WizardStep) -> Option<&'static str> {
    match step {
        WizardStep::AwaitName => Some("Enter your company name"),
        WizardStep::AwaitSector => Some("Enter your sector (e.g., IT, Healthcare)"),
        WizardStep::AwaitStatus => Some("New or Established"),
        WizardStep::AwaitDate => Some("MM/DD/YYYY"),
        WizardStep::Done => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_open_step_has_a_question_and_hint() {
        for step in [
            WizardStep::AwaitName,
            WizardStep::AwaitSector,
            WizardStep::AwaitStatus,
            WizardStep::AwaitDate,
        ] {
            assert!(question(step).is_some(), "{step} has no question");
            assert!(placeholder(step).is_some(), "{step} has no placeholder");
        }
        assert!(question(WizardStep::Done).is_none());
        assert!(placeholder(WizardStep::Done).is_none());
    }

    #[test]
    fn date_question_names_the_format() {
        assert!(question(WizardStep::AwaitDate).unwrap().contains("MM/DD/YYYY"));
    }
}
