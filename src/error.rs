//! Error types for Compliance Assist.
//!
//! One enum per concern, folded into [`Error`] for the session layer and
//! the HTTP handlers.

use std::time::Duration;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("session store: {0}")]
    Database(#[from] DatabaseError),

    #[error("model: {0}")]
    Llm(#[from] LlmError),

    #[error("document: {0}")]
    Document(#[from] DocumentError),

    #[error("{0}")]
    Chat(#[from] ChatError),

    #[error("Session {0} not found")]
    SessionNotFound(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingEnvVar(String),

    #[error("{key} has an unusable value {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures of the session store backends.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("cannot open database: {0}")]
    Pool(String),

    #[error("statement failed: {0}")]
    Query(String),

    #[error("schema upgrade failed: {0}")]
    Migration(String),

    #[error("stored session is unreadable: {0}")]
    Serialization(String),
}

/// Failures talking to the hosted model.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("{provider} call failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("{provider} is rate limiting us (retry after {retry_after:?})")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("{provider} sent an unusable reply: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("{provider} rejected the API key")]
    AuthFailed { provider: String },

    #[error("malformed {provider} payload: {source}")]
    Json {
        provider: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Uploaded document errors.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("could not read text from {name}: {reason}")]
    Extraction { name: String, reason: String },

    #[error("{name} has no extractable text")]
    Empty { name: String },

    #[error("upload needs a file name")]
    MissingName,

    #[error("reading upload: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Onboarding is not complete")]
    OnboardingIncomplete,

    #[error("Message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
