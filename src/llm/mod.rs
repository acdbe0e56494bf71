//! LLM integration for Compliance Assist.
//!
//! The chat talks to the model through the `LlmProvider` trait; the only
//! shipped backend is Google Gemini over its REST API.

pub mod gemini;
pub mod provider;

pub use gemini::GeminiProvider;
pub use provider::*;

use std::sync::Arc;
use std::time::Duration;

use crate::error::LlmError;

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Gemini,
}

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: secrecy::SecretString,
    pub model: String,
    /// Endpoint root; the backend's public URL when `None`.
    pub base_url: Option<String>,
    pub timeout: Duration,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    match config.backend {
        LlmBackend::Gemini => {
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| gemini::DEFAULT_BASE_URL.to_string());
            let provider = GeminiProvider::new(
                config.api_key.clone(),
                &config.model,
                base_url,
                config.timeout,
            )?;
            tracing::info!("Using Gemini (model: {})", config.model);
            Ok(Arc::new(provider))
        }
    }
}
