//! Compliance Assist: company onboarding wizard feeding a compliance chat.

pub mod chat;
pub mod config;
pub mod documents;
pub mod error;
pub mod llm;
pub mod onboarding;
pub mod repl;
pub mod server;
pub mod session;
pub mod store;
pub mod transcript;
