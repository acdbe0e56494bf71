//! Onboarding state: which step the session is on and what it has collected.

use serde::{Deserialize, Serialize};

use super::model::{CompanyProfile, CompanyStatus};

/// The steps of the onboarding wizard.
///
/// Progresses linearly: AwaitName → AwaitSector → AwaitStatus →
/// (AwaitDate →) Done. AwaitDate is only visited for established companies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    AwaitName,
    AwaitSector,
    AwaitStatus,
    AwaitDate,
    Done,
}

impl WizardStep {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: WizardStep) -> bool {
        use WizardStep::*;
        matches!(
            (self, target),
            (AwaitName, AwaitSector)
                | (AwaitSector, AwaitStatus)
                | (AwaitStatus, AwaitDate)
                | (AwaitStatus, Done)
                | (AwaitDate, Done)
        )
    }

    /// The step that follows `self`, given the status chosen so far.
    pub fn next(&self, status: Option<CompanyStatus>) -> Option<WizardStep> {
        use WizardStep::*;
        match self {
            AwaitName => Some(AwaitSector),
            AwaitSector => Some(AwaitStatus),
            AwaitStatus => match status? {
                CompanyStatus::Established => Some(AwaitDate),
                CompanyStatus::New => Some(Done),
            },
            AwaitDate => Some(Done),
            Done => None,
        }
    }

    /// Whether onboarding is finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// 1-based position for display.
    pub fn index(&self) -> u8 {
        match self {
            Self::AwaitName => 1,
            Self::AwaitSector => 2,
            Self::AwaitStatus => 3,
            Self::AwaitDate => 4,
            Self::Done => 5,
        }
    }
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::AwaitName
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AwaitName => "await_name",
            Self::AwaitSector => "await_sector",
            Self::AwaitStatus => "await_status",
            Self::AwaitDate => "await_date",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// Who said a line of the onboarding conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    System,
}

/// One displayed line of the onboarding conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl HistoryEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::System,
            text: text.into(),
        }
    }
}

/// Per-session onboarding record.
///
/// `history` is display-only; the transition logic never reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    pub current_step: WizardStep,
    pub profile: CompanyProfile,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.current_step.is_terminal()
    }

    /// Discard everything collected so far, history included.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        use WizardStep::*;
        let transitions = [
            (AwaitName, AwaitSector),
            (AwaitSector, AwaitStatus),
            (AwaitStatus, AwaitDate),
            (AwaitStatus, Done),
            (AwaitDate, Done),
        ];
        for (from, to) in transitions {
            assert!(
                from.can_transition_to(to),
                "{from} should transition to {to}"
            );
        }
    }

    #[test]
    fn invalid_transitions() {
        use WizardStep::*;
        // Skip steps
        assert!(!AwaitName.can_transition_to(AwaitStatus));
        assert!(!AwaitSector.can_transition_to(Done));
        // Go backward
        assert!(!AwaitStatus.can_transition_to(AwaitName));
        // Terminal
        assert!(!Done.can_transition_to(AwaitName));
        // Self-transition
        assert!(!AwaitDate.can_transition_to(AwaitDate));
    }

    #[test]
    fn next_depends_on_status_only_at_status_step() {
        use WizardStep::*;
        assert_eq!(AwaitName.next(None), Some(AwaitSector));
        assert_eq!(AwaitSector.next(None), Some(AwaitStatus));
        assert_eq!(AwaitStatus.next(None), None);
        assert_eq!(AwaitStatus.next(Some(CompanyStatus::New)), Some(Done));
        assert_eq!(
            AwaitStatus.next(Some(CompanyStatus::Established)),
            Some(AwaitDate)
        );
        assert_eq!(AwaitDate.next(Some(CompanyStatus::Established)), Some(Done));
        assert_eq!(Done.next(Some(CompanyStatus::New)), None);
    }

    #[test]
    fn index_is_monotonic() {
        use WizardStep::*;
        let steps = [AwaitName, AwaitSector, AwaitStatus, AwaitDate, Done];
        for pair in steps.windows(2) {
            assert!(pair[0].index() < pair[1].index());
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn display_matches_serde() {
        use WizardStep::*;
        for step in [AwaitName, AwaitSector, AwaitStatus, AwaitDate, Done] {
            let display = format!("{step}");
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }

    #[test]
    fn default_state() {
        let state = WizardState::default();
        assert_eq!(state.current_step, WizardStep::AwaitName);
        assert_eq!(state.profile, CompanyProfile::default());
        assert!(state.history.is_empty());
        assert!(!state.is_complete());
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = WizardState {
            current_step: WizardStep::Done,
            profile: CompanyProfile {
                company_name: Some("Acme".into()),
                sector: Some("IT".into()),
                status: Some(CompanyStatus::New),
                established_date: None,
            },
            history: vec![HistoryEntry::user("Acme")],
        };
        state.reset();
        assert_eq!(state, WizardState::default());
    }

    #[test]
    fn state_serde_roundtrip() {
        let state = WizardState {
            current_step: WizardStep::AwaitStatus,
            profile: CompanyProfile {
                company_name: Some("Acme".into()),
                sector: Some("IT".into()),
                ..Default::default()
            },
            history: vec![
                HistoryEntry::user("Acme"),
                HistoryEntry::system("Great, and which sector or field are you in?"),
            ],
        };

        let json = serde_json::to_string(&state).unwrap();
        let parsed: WizardState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
