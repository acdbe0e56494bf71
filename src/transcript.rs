//! Per-user chat transcripts on disk.
//!
//! One plain-text file per user under the log directory, named
//! `<user_id>.txt`. Exchanges are only ever appended.

use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Append-only transcript writer rooted at a directory.
#[derive(Debug, Clone)]
pub struct TranscriptLog {
    base_path: PathBuf,
}

impl TranscriptLog {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File holding `user_id`'s transcript.
    pub fn path_for(&self, user_id: Uuid) -> PathBuf {
        self.base_path.join(format!("{user_id}.txt"))
    }

    /// Append one user/bot exchange, creating the file and directory if needed.
    pub async fn append_exchange(
        &self,
        user_id: Uuid,
        user_text: &str,
        bot_text: &str,
    ) -> std::io::Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(user_id))
            .await?;
        file.write_all(format_exchange(user_text, bot_text).as_bytes())
            .await?;
        file.flush().await?;
        Ok(())
    }
}

fn format_exchange(user_text: &str, bot_text: &str) -> String {
    format!("\nUser: {user_text}\nBot: {bot_text}\n")
}
