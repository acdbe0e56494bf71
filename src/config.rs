//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::documents::DEFAULT_EXCERPT_CHARS;
use crate::error::ConfigError;
use crate::llm::{LlmBackend, LlmConfig};

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Service configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: SecretString,
    pub model: String,
    /// Overrides the Gemini endpoint root (used for local testing).
    pub llm_base_url: Option<String>,
    pub llm_timeout: Duration,
    pub port: u16,
    /// libSQL database for sessions; in-memory store when `None`.
    pub db_path: Option<PathBuf>,
    /// Directory for per-user chat transcripts.
    pub log_dir: PathBuf,
    /// Characters of each uploaded PDF fed into the chat.
    pub excerpt_chars: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = get("GEMINI_API_KEY")
            .or_else(|| get("API_KEY"))
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            model: get("COMPLIANCE_ASSIST_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_base_url: get("GEMINI_BASE_URL"),
            llm_timeout: Duration::from_secs(parse_or(&get, "COMPLIANCE_ASSIST_LLM_TIMEOUT_SECS", 120)?),
            port: parse_or(&get, "COMPLIANCE_ASSIST_PORT", 8080)?,
            db_path: get("COMPLIANCE_ASSIST_DB_PATH").map(PathBuf::from),
            log_dir: get("COMPLIANCE_ASSIST_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs")),
            excerpt_chars: parse_or(&get, "COMPLIANCE_ASSIST_EXCERPT_CHARS", DEFAULT_EXCERPT_CHARS)?,
        })
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            backend: LlmBackend::Gemini,
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.llm_base_url.clone(),
            timeout: self.llm_timeout,
        }
    }
}

fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.api_key.expose_secret(), "k");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.port, 8080);
        assert_eq!(config.excerpt_chars, 3000);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert!(config.db_path.is_none());
        assert!(config.llm_base_url.is_none());
    }

    #[test]
    fn legacy_api_key_name_is_accepted() {
        let config = AppConfig::from_lookup(lookup(&[("API_KEY", "legacy")])).unwrap();
        assert_eq!(config.api_key.expose_secret(), "legacy");
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));

        let err = AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("COMPLIANCE_ASSIST_MODEL", "gemini-2.0-flash"),
            ("COMPLIANCE_ASSIST_PORT", "9000"),
            ("COMPLIANCE_ASSIST_DB_PATH", "/tmp/s.db"),
            ("COMPLIANCE_ASSIST_EXCERPT_CHARS", "500"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.port, 9000);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/s.db")));
        assert_eq!(config.excerpt_chars, 500);
        assert_eq!(config.llm_config().model, "gemini-2.0-flash");
    }

    #[test]
    fn bad_number_is_invalid_value() {
        let err = AppConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("COMPLIANCE_ASSIST_PORT", "eighty"),
        ]))
        .unwrap_err();
        match err {
            ConfigError::InvalidValue { key, .. } => assert_eq!(key, "COMPLIANCE_ASSIST_PORT"),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }
}
