//! The onboarding transition function.
//!
//! `transition` takes the current state and one user input and returns the
//! next state. It performs no I/O; callers own persistence and decide what
//! to do with the outcome.

use chrono::NaiveDate;
use serde::Serialize;

use super::model::{CompanyProfile, CompanyStatus};
use super::prompts::{self, COMPLETION_MESSAGE, INVALID_DATE_MESSAGE};
use super::state::{HistoryEntry, WizardState, WizardStep};

/// Accepted layout for the established date.
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Why an input was rejected. The state is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("input is empty")]
    EmptyInput,

    #[error("'{0}' is not one of New, Established")]
    InvalidChoice(String),

    #[error("invalid date format")]
    InvalidDate,
}

impl WizardError {
    /// Silent errors just re-prompt; only these are shown to the user.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Self::InvalidDate => Some(INVALID_DATE_MESSAGE),
            Self::EmptyInput | Self::InvalidChoice(_) => None,
        }
    }

    pub fn is_silent(&self) -> bool {
        self.user_message().is_none()
    }
}

/// What a successful call to [`transition`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// Moved to a later, still-open step.
    Advanced { step: WizardStep },
    /// Just reached `Done`. Emitted exactly once per wizard run.
    Completed { profile: CompanyProfile },
    /// Already `Done`; the input belongs to the chat.
    AlreadyComplete,
}

/// Result of a successful transition: the next state and what happened.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: WizardState,
    pub outcome: Outcome,
}

/// Apply one input to `state`.
pub fn transition(state: &WizardState, input: &str) -> Result<Transition, WizardError> {
    let mut profile = state.profile.clone();
    let next = match state.current_step {
        WizardStep::Done => {
            return Ok(Transition {
                state: state.clone(),
                outcome: Outcome::AlreadyComplete,
            });
        }
        WizardStep::AwaitName => {
            profile.company_name = Some(non_empty(input)?.to_string());
            WizardStep::AwaitSector
        }
        WizardStep::AwaitSector => {
            profile.sector = Some(non_empty(input)?.to_string());
            WizardStep::AwaitStatus
        }
        WizardStep::AwaitStatus => {
            let choice = non_empty(input)?;
            let status = CompanyStatus::parse(choice)
                .ok_or_else(|| WizardError::InvalidChoice(choice.to_string()))?;
            profile.status = Some(status);
            match status {
                CompanyStatus::Established => WizardStep::AwaitDate,
                CompanyStatus::New => WizardStep::Done,
            }
        }
        WizardStep::AwaitDate => {
            profile.established_date = Some(parse_date(non_empty(input)?)?);
            WizardStep::Done
        }
    };
    debug_assert_eq!(state.current_step.next(profile.status), Some(next));
    debug_assert!(state.current_step.can_transition_to(next));

    let mut history = state.history.clone();
    history.push(HistoryEntry::user(input));
    let outcome = if next.is_terminal() {
        history.push(HistoryEntry::system(COMPLETION_MESSAGE));
        Outcome::Completed {
            profile: profile.clone(),
        }
    } else {
        if let Some(q) = prompts::question(next) {
            history.push(HistoryEntry::system(q));
        }
        Outcome::Advanced { step: next }
    };

    Ok(Transition {
        state: WizardState {
            current_step: next,
            profile,
            history,
        },
        outcome,
    })
}

fn non_empty(input: &str) -> Result<&str, WizardError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(WizardError::EmptyInput)
    } else {
        Ok(trimmed)
    }
}

/// Parse `MM/DD/YYYY` strictly: two-digit month and day, four-digit year.
pub fn parse_date(input: &str) -> Result<NaiveDate, WizardError> {
    let bytes = input.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'/',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(WizardError::InvalidDate);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| WizardError::InvalidDate)
}

impl WizardState {
    /// Apply `input` in place. On error nothing changes.
    pub fn submit(&mut self, input: &str) -> Result<Outcome, WizardError> {
        let Transition { state, outcome } = transition(self, input)?;
        *self = state;
        Ok(outcome)
    }
}
