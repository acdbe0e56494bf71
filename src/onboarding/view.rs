//! Display projection of a wizard state.
//!
//! Rebuilt on every read from `history` and `current_step`; nothing here is
//! stored.

use serde::Serialize;

use super::model::{CompanyProfile, CompanyStatus};
use super::prompts;
use super::state::{HistoryEntry, Speaker, WizardState, WizardStep};

/// What the user should be asked next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub question: &'static str,
    pub placeholder: &'static str,
    /// Fixed choices when the step is a selection, empty for free text.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<&'static str>,
}

/// Everything a display surface needs to render onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardView {
    pub step: WizardStep,
    pub step_index: u8,
    pub complete: bool,
    pub history: Vec<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Prompt>,
    pub profile: CompanyProfile,
}

impl WizardView {
    pub fn project(state: &WizardState) -> Self {
        Self {
            step: state.current_step,
            step_index: state.current_step.index(),
            complete: state.is_complete(),
            history: state.history.clone(),
            prompt: prompt_for(state.current_step),
            profile: state.profile.clone(),
        }
    }

    /// Plain-text rendering, one line per turn, for terminal use.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .history
            .iter()
            .map(|entry| {
                let who = match entry.speaker {
                    Speaker::User => "you",
                    Speaker::System => "assistant",
                };
                format!("{who}: {}", entry.text)
            })
            .collect();
        if self.history.is_empty() {
            if let Some(ref prompt) = self.prompt {
                lines.push(format!("assistant: {}", prompt.question));
            }
        }
        lines
    }
}

fn prompt_for(step: WizardStep) -> Option<Prompt> {
    let question = prompts::question(step)?;
    let placeholder = prompts::placeholder(step)?;
    let choices = if step == WizardStep::AwaitStatus {
        CompanyStatus::CHOICES.iter().map(|c| c.label()).collect()
    } else {
        Vec::new()
    };
    Some(Prompt {
        question,
        placeholder,
        choices,
    })
}
