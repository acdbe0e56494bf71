//! SessionManager: coordinates onboarding, chat, uploads and transcripts
//! for every session, one request at a time per session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard as StdMutexGuard};

use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::Session;
use crate::chat::ChatSession;
use crate::documents::{DocumentPreview, UploadedDocument};
use crate::error::{ChatError, DocumentError, Error, Result};
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};
use crate::onboarding::{Outcome, WizardError, WizardView};
use crate::store::SessionStore;
use crate::transcript::TranscriptLog;

/// Result of feeding one input to the onboarding wizard.
#[derive(Debug, Clone)]
pub struct OnboardingReply {
    /// `Err` when the input was rejected; the session is unchanged then.
    pub result: std::result::Result<Outcome, WizardError>,
    pub view: WizardView,
}

/// Result of one chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub history: Vec<ChatMessage>,
}

/// Result of a PDF upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    /// False when a document with that name was already uploaded.
    pub added: bool,
    pub document: Option<DocumentPreview>,
}

type LockMap = StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>;

/// Exclusive hold on one session. Dropping it releases the session and
/// forgets the map entry once nobody else is holding or waiting on it.
struct SessionLock<'a> {
    locks: &'a LockMap,
    id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionLock<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = lock_map(self.locks);
        if locks
            .get(&self.id)
            .is_some_and(|m| Arc::strong_count(m) == 1)
        {
            locks.remove(&self.id);
        }
    }
}

// The map is only touched in short synchronous sections, never across an
// await, so a std mutex is enough. A poisoned map is still consistent.
fn lock_map(locks: &LockMap) -> StdMutexGuard<'_, HashMap<Uuid, Arc<Mutex<()>>>> {
    locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Owns the session store and serializes work per session.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    llm: Arc<dyn LlmProvider>,
    transcript: TranscriptLog,
    excerpt_chars: usize,
    locks: LockMap,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        llm: Arc<dyn LlmProvider>,
        transcript: TranscriptLog,
        excerpt_chars: usize,
    ) -> Self {
        Self {
            store,
            llm,
            transcript,
            excerpt_chars,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Wait for exclusive access to session `id`.
    ///
    /// Entries left behind by cancelled waiters are swept on the way in.
    async fn lock(&self, id: Uuid) -> SessionLock<'_> {
        let mutex = {
            let mut locks = lock_map(&self.locks);
            locks.retain(|other, m| *other == id || Arc::strong_count(m) > 1);
            Arc::clone(locks.entry(id).or_default())
        };
        let mut lock = SessionLock {
            locks: &self.locks,
            id,
            guard: None,
        };
        lock.guard = Some(mutex.lock_owned().await);
        lock
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        lock_map(&self.locks).len()
    }

    async fn load(&self, id: Uuid) -> Result<Session> {
        self.store
            .load(id)
            .await?
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    async fn save(&self, session: &mut Session) -> Result<()> {
        session.touch();
        self.store.save(session).await?;
        Ok(())
    }

    /// Start a new session at the first onboarding step.
    pub async fn create(&self) -> Result<Session> {
        let session = Session::new();
        self.store.save(&session).await?;
        info!(session_id = %session.id, "Session created");
        Ok(session)
    }

    pub async fn get(&self, id: Uuid) -> Result<Session> {
        self.load(id).await
    }

    /// End a session and forget its state.
    pub async fn end(&self, id: Uuid) -> Result<bool> {
        let existed = {
            let _lock = self.lock(id).await;
            self.store.delete(id).await?
        };
        if existed {
            info!(session_id = %id, "Session ended");
        }
        Ok(existed)
    }

    /// Feed one answer to the onboarding wizard.
    pub async fn submit_onboarding(&self, id: Uuid, input: &str) -> Result<OnboardingReply> {
        let _lock = self.lock(id).await;
        let mut session = self.load(id).await?;

        let result = session.wizard.submit(input);
        match &result {
            Ok(Outcome::Advanced { step }) => {
                debug!(session_id = %id, step = %step, "Onboarding advanced");
                self.save(&mut session).await?;
            }
            Ok(Outcome::Completed { profile }) => {
                session.chat = ChatSession::for_profile(profile);
                self.save(&mut session).await?;
                info!(session_id = %id, "Onboarding complete");
            }
            Ok(Outcome::AlreadyComplete) => {}
            Err(e) => {
                debug!(session_id = %id, step = %session.wizard.current_step, error = %e, "Onboarding input rejected");
            }
        }

        Ok(OnboardingReply {
            result,
            view: WizardView::project(&session.wizard),
        })
    }

    /// Full reset: back to the first onboarding question with nothing kept.
    pub async fn reset(&self, id: Uuid) -> Result<Session> {
        let _lock = self.lock(id).await;
        let mut session = self.load(id).await?;
        session.reset();
        self.save(&mut session).await?;
        info!(session_id = %id, "Session reset");
        Ok(session)
    }

    /// Send a chat message and wait for the model's reply.
    pub async fn send_chat(&self, id: Uuid, text: &str) -> Result<ChatReply> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage.into());
        }

        let _lock = self.lock(id).await;
        let mut session = self.load(id).await?;
        if !session.wizard.is_complete() || !session.chat.is_started() {
            return Err(ChatError::OnboardingIncomplete.into());
        }

        session.chat.push_user(text);
        let request = CompletionRequest::new(session.chat.messages().to_vec());
        let response = match self.llm.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(session_id = %id, error = %e, "Model call failed");
                session.chat.rollback_user();
                return Err(ChatError::Llm(e).into());
            }
        };
        debug!(
            session_id = %id,
            model = self.llm.model_name(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Model replied"
        );

        session.chat.push_model(&response.content);
        self.save(&mut session).await?;

        if let Err(e) = self
            .transcript
            .append_exchange(session.user_id, text, &response.content)
            .await
        {
            warn!(session_id = %id, error = %e, "Failed to append transcript");
        }

        Ok(ChatReply {
            reply: response.content,
            history: session.chat.history().to_vec(),
        })
    }

    pub async fn chat_history(&self, id: Uuid) -> Result<Vec<ChatMessage>> {
        let session = self.load(id).await?;
        Ok(session.chat.history().to_vec())
    }

    /// Clear the conversation and uploads; the company profile is kept.
    pub async fn reset_chat(&self, id: Uuid) -> Result<()> {
        let _lock = self.lock(id).await;
        let mut session = self.load(id).await?;
        if !session.chat.is_started() {
            return Err(ChatError::OnboardingIncomplete.into());
        }
        session.chat.reset();
        self.save(&mut session).await?;
        info!(session_id = %id, "Chat reset");
        Ok(())
    }

    /// Extract a PDF and add its excerpt to the conversation.
    pub async fn upload_document(&self, id: Uuid, name: &str, bytes: Vec<u8>) -> Result<UploadResult> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DocumentError::MissingName.into());
        }
        {
            let session = self.load(id).await?;
            if !session.chat.is_started() {
                return Err(ChatError::OnboardingIncomplete.into());
            }
            if session.chat.has_document(name) {
                return Ok(UploadResult {
                    added: false,
                    document: None,
                });
            }
        }

        // Extraction is CPU-bound and may be slow; keep it off the lock.
        let owned_name = name.to_string();
        let doc = tokio::task::spawn_blocking(move || UploadedDocument::from_pdf(owned_name, &bytes))
            .await
            .map_err(|e| DocumentError::Extraction {
                name: name.to_string(),
                reason: format!("extraction task failed: {e}"),
            })??;

        let _lock = self.lock(id).await;
        let mut session = self.load(id).await?;
        let preview = doc.preview(self.excerpt_chars);
        let added = session.chat.add_document(doc, self.excerpt_chars);
        if added {
            self.save(&mut session).await?;
            info!(session_id = %id, document = %name, "Document uploaded");
        }
        Ok(UploadResult {
            added,
            document: added.then_some(preview),
        })
    }

    pub async fn documents(&self, id: Uuid) -> Result<Vec<DocumentPreview>> {
        let session = self.load(id).await?;
        Ok(session.chat.previews(self.excerpt_chars))
    }
}
