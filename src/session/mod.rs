//! Per-user sessions: onboarding progress plus the chat that follows it.

pub mod manager;
pub mod routes;

pub use manager::{ChatReply, OnboardingReply, SessionManager, UploadResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::ChatSession;
use crate::onboarding::WizardState;

/// Everything remembered about one user session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    /// Names the transcript file; stable across resets.
    pub user_id: Uuid,
    pub wizard: WizardState,
    #[serde(default)]
    pub chat: ChatSession,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            wizard: WizardState::new(),
            chat: ChatSession::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Full reset: wizard, profile, history and chat, in one assignment.
    pub fn reset(&mut self) {
        self.wizard = WizardState::new();
        self.chat = ChatSession::default();
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sessions_have_distinct_ids() {
        let a = Session::new();
        let b = Session::new();
        assert_ne!(a.id, b.id);
        assert_ne!(a.id, a.user_id);
    }

    #[test]
    fn reset_keeps_identity() {
        let mut session = Session::new();
        session.wizard.submit("Acme").unwrap();
        let (id, user_id) = (session.id, session.user_id);

        session.reset();

        assert_eq!(session.id, id);
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.wizard, WizardState::new());
        assert!(!session.chat.is_started());
    }

    #[test]
    fn serde_roundtrip() {
        let mut session = Session::new();
        session.wizard.submit("Acme").unwrap();
        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }
}
