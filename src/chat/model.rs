//! Chat conversation state for one session.

use serde::{Deserialize, Serialize};

use super::prompts::chat_preamble;
use crate::documents::{DocumentPreview, UploadedDocument};
use crate::llm::{ChatMessage, Role};
use crate::onboarding::CompanyProfile;

/// The conversation sent to the model, plus the PDFs uploaded into it.
///
/// Once started, `messages[0]` is always the preamble. It is sent with every
/// request but never shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    #[serde(default)]
    messages: Vec<ChatMessage>,
    #[serde(default)]
    documents: Vec<UploadedDocument>,
}

impl ChatSession {
    /// Start a conversation for a freshly onboarded company.
    pub fn for_profile(profile: &CompanyProfile) -> Self {
        Self {
            messages: vec![ChatMessage::system(chat_preamble(profile))],
            documents: Vec::new(),
        }
    }

    /// Whether onboarding has handed over a profile yet.
    pub fn is_started(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Everything sent to the model, preamble first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Displayed turns (preamble excluded).
    pub fn history(&self) -> &[ChatMessage] {
        self.messages.get(1..).unwrap_or(&[])
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_model(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::model(content));
    }

    /// Drop the trailing user message after a failed model call.
    pub fn rollback_user(&mut self) -> Option<ChatMessage> {
        if self.messages.len() > 1 && self.messages.last().map(|m| m.role) == Some(Role::User) {
            self.messages.pop()
        } else {
            None
        }
    }

    pub fn has_document(&self, name: &str) -> bool {
        self.documents.iter().any(|d| d.name == name)
    }

    /// Add a document and announce its excerpt to the model.
    ///
    /// Returns `false` (and changes nothing) if a document with the same
    /// name is already part of this conversation.
    pub fn add_document(&mut self, doc: UploadedDocument, excerpt_chars: usize) -> bool {
        if self.has_document(&doc.name) {
            return false;
        }
        self.messages.push(ChatMessage::user(doc.chat_message(excerpt_chars)));
        self.documents.push(doc);
        true
    }

    pub fn documents(&self) -> &[UploadedDocument] {
        &self.documents
    }

    pub fn previews(&self, limit: usize) -> Vec<DocumentPreview> {
        self.documents.iter().map(|d| d.preview(limit)).collect()
    }

    /// Back to just the preamble; uploaded documents are forgotten.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
        self.documents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::CompanyStatus;

    fn started() -> ChatSession {
        ChatSession::for_profile(&CompanyProfile {
            company_name: Some("Acme".into()),
            sector: Some("IT".into()),
            status: Some(CompanyStatus::New),
            established_date: None,
        })
    }

    fn doc(name: &str) -> UploadedDocument {
        UploadedDocument {
            name: name.into(),
            text: "Section 1. Definitions.".into(),
        }
    }

    #[test]
    fn default_is_not_started() {
        let chat = ChatSession::default();
        assert!(!chat.is_started());
        assert!(chat.history().is_empty());
    }

    #[test]
    fn preamble_is_first_and_hidden() {
        let mut chat = started();
        chat.push_user("What is SOX?");
        assert_eq!(chat.messages()[0].role, Role::System);
        assert!(chat.messages()[0].content.contains("Acme"));
        assert_eq!(chat.history().len(), 1);
        assert_eq!(chat.history()[0].content, "What is SOX?");
    }

    #[test]
    fn rollback_only_removes_trailing_user() {
        let mut chat = started();
        assert!(chat.rollback_user().is_none());
        chat.push_user("q");
        chat.push_model("a");
        assert!(chat.rollback_user().is_none());
        chat.push_user("q2");
        assert_eq!(chat.rollback_user().unwrap().content, "q2");
        assert_eq!(chat.history().len(), 2);
    }

    #[test]
    fn duplicate_document_is_ignored() {
        let mut chat = started();
        assert!(chat.add_document(doc("a.pdf"), 3000));
        assert!(!chat.add_document(doc("a.pdf"), 3000));
        assert_eq!(chat.documents().len(), 1);
        assert_eq!(chat.history().len(), 1);
        assert!(chat.history()[0]
            .content
            .starts_with("Extracted from uploaded PDF 'a.pdf':"));
    }

    #[test]
    fn reset_keeps_preamble_only() {
        let mut chat = started();
        let preamble = chat.messages()[0].clone();
        chat.add_document(doc("a.pdf"), 3000);
        chat.push_user("q");
        chat.push_model("a");

        chat.reset();

        assert_eq!(chat.messages(), &[preamble]);
        assert!(chat.documents().is_empty());
        assert!(chat.previews(10).is_empty());
    }

    #[test]
    fn previews_follow_upload_order() {
        let mut chat = started();
        chat.add_document(doc("b.pdf"), 3000);
        chat.add_document(doc("a.pdf"), 3000);
        let names: Vec<String> = chat.previews(7).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["b.pdf", "a.pdf"]);
    }
}
