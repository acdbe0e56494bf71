//! Terminal front end, one session over stdin/stdout.
//!
//! Walks the onboarding questions first, then forwards every line to the
//! chat. Lines starting with `/` are commands.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

use crate::error::{DocumentError, Error, Result};
use crate::onboarding::{Outcome, WizardView};
use crate::session::SessionManager;

const HELP: &str = "Commands: /reset, /reset-chat, /upload <path.pdf>, /docs, /quit";

/// Interactive loop bound to one session.
pub struct Repl {
    sessions: Arc<SessionManager>,
}

impl Repl {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }

    /// Run until EOF or `/quit`. Returns the session id used.
    pub async fn run<R, W>(&self, reader: R, mut out: W) -> Result<Uuid>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let session = self.sessions.create().await?;
        let id = session.id;
        write_lines(&mut out, &[HELP.to_string()]).await;
        write_lines(&mut out, &WizardView::project(&session.wizard).render_lines()).await;

        let mut lines = reader.lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Error reading input: {}", e);
                    break;
                }
            };
            let trimmed = line.trim();

            let output = match trimmed {
                "/quit" => break,
                "/reset" => {
                    let session = self.sessions.reset(id).await?;
                    WizardView::project(&session.wizard).render_lines()
                }
                "/reset-chat" => self.reset_chat(id).await?,
                "/docs" => self.list_documents(id).await?,
                cmd if cmd.starts_with("/upload") => {
                    self.upload(id, cmd.trim_start_matches("/upload").trim())
                        .await?
                }
                _ => self.handle_text(id, &line).await?,
            };
            write_lines(&mut out, &output).await;
        }

        Ok(id)
    }

    async fn handle_text(&self, id: Uuid, line: &str) -> Result<Vec<String>> {
        let reply = self.sessions.submit_onboarding(id, line).await?;
        match reply.result {
            Ok(Outcome::AlreadyComplete) => self.chat(id, line).await,
            Ok(Outcome::Advanced { .. }) | Ok(Outcome::Completed { .. }) => {
                let mut out: Vec<String> = reply
                    .view
                    .history
                    .last()
                    .map(|e| vec![format!("assistant: {}", e.text)])
                    .unwrap_or_default();
                if let Some(prompt) = reply.view.prompt {
                    if !prompt.choices.is_empty() {
                        out.push(format!("({})", prompt.choices.join(" / ")));
                    }
                }
                Ok(out)
            }
            Err(e) => {
                let mut out = Vec::new();
                if let Some(msg) = e.user_message() {
                    out.push(format!("error: {msg}"));
                }
                if let Some(prompt) = reply.view.prompt {
                    out.push(format!("assistant: {} [{}]", prompt.question, prompt.placeholder));
                }
                Ok(out)
            }
        }
    }

    async fn chat(&self, id: Uuid, line: &str) -> Result<Vec<String>> {
        match self.sessions.send_chat(id, line).await {
            Ok(reply) => Ok(vec![format!("assistant: {}", reply.reply)]),
            Err(Error::Chat(e)) => Ok(vec![format!("error: {e}")]),
            Err(e) => Err(e),
        }
    }

    async fn reset_chat(&self, id: Uuid) -> Result<Vec<String>> {
        match self.sessions.reset_chat(id).await {
            Ok(()) => Ok(vec!["Chat cleared.".to_string()]),
            Err(Error::Chat(e)) => Ok(vec![format!("error: {e}")]),
            Err(e) => Err(e),
        }
    }

    async fn list_documents(&self, id: Uuid) -> Result<Vec<String>> {
        let docs = self.sessions.documents(id).await?;
        if docs.is_empty() {
            return Ok(vec!["No documents uploaded.".to_string()]);
        }
        Ok(docs
            .into_iter()
            .map(|d| format!("{} ({} chars shown)", d.name, d.excerpt.chars().count()))
            .collect())
    }

    async fn upload(&self, id: Uuid, path: &str) -> Result<Vec<String>> {
        if path.is_empty() {
            return Ok(vec!["usage: /upload <path.pdf>".to_string()]);
        }
        let bytes = match tokio::fs::read(path).await.map_err(DocumentError::from) {
            Ok(bytes) => bytes,
            Err(e) => return Ok(vec![format!("error: {path}: {e}")]),
        };
        let name = std::path::Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path)
            .to_string();
        match self.sessions.upload_document(id, &name, bytes).await {
            Ok(result) if result.added => Ok(vec![format!("Added {name} to the conversation.")]),
            Ok(_) => Ok(vec![format!("{name} was already uploaded.")]),
            Err(Error::Chat(e)) => Ok(vec![format!("error: {e}")]),
            Err(Error::Document(e)) => Ok(vec![format!("error: {e}")]),
            Err(e) => Err(e),
        }
    }
}

async fn write_lines<W: AsyncWrite + Unpin>(out: &mut W, lines: &[String]) {
    for line in lines {
        let written = out.write_all(format!("{line}\n").as_bytes()).await;
        if let Err(e) = written {
            tracing::warn!("Failed to write output: {}", e);
            return;
        }
    }
    if let Err(e) = out.flush().await {
        tracing::warn!("Failed to flush output: {}", e);
    }
}
