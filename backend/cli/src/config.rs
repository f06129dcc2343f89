use std::time::Duration;

use accessibridge_core::FailureMode;
use accessibridge_providers::openrouter::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// AccessiBridge runtime configuration. Read once at startup, never mutated.
#[derive(Clone)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// OpenRouter API key; `None` disables AI and enables fallbacks
    pub api_key: Option<String>,
    /// API base or full chat completions endpoint
    pub api_base: String,
    /// Model identifier
    pub model: String,
    /// Single origin allowed by CORS; permissive when unset
    pub allowed_origin: Option<String>,
    /// Per-call AI timeout
    pub ai_timeout_secs: u64,
    /// Default handling of failed per-image AI calls
    pub alt_failure_mode: FailureMode,
    /// Log level
    pub log_level: String,
    /// Directory for rolling NDJSON logs
    pub log_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 5000,
            api_key: None,
            api_base: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            allowed_origin: None,
            ai_timeout_secs: 20,
            alt_failure_mode: FailureMode::Report,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (useful for testing).
    ///
    /// Empty values count as unset. Unparseable numbers and failure modes fall
    /// back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            bind_address: get("ACCESSIBRIDGE_BIND").unwrap_or(defaults.bind_address),
            port: get("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            api_key: get("OPENROUTER_API_KEY"),
            api_base: get("API_BASE").unwrap_or(defaults.api_base),
            model: get("MODEL_NAME").unwrap_or(defaults.model),
            allowed_origin: get("ALLOWED_ORIGIN"),
            ai_timeout_secs: get("AI_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(defaults.ai_timeout_secs),
            alt_failure_mode: get("ALT_FAILURE_MODE")
                .and_then(|m| m.parse().ok())
                .unwrap_or(defaults.alt_failure_mode),
            log_level: get("RUST_LOG").unwrap_or(defaults.log_level),
            log_dir: get("ACCESSIBRIDGE_LOG_DIR"),
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 5000);
        assert_eq!(config.model, "google/gemini-flash-1.5");
        assert_eq!(config.api_base, "https://openrouter.ai/api/v1");
        assert_eq!(config.ai_timeout(), Duration::from_secs(20));
        assert_eq!(config.alt_failure_mode, FailureMode::Report);
        assert!(!config.ai_enabled());
        assert!(config.allowed_origin.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8088"),
            ("OPENROUTER_API_KEY", "sk-or-v1-abc"),
            ("MODEL_NAME", "openai/gpt-4o-mini"),
            ("ALLOWED_ORIGIN", "chrome-extension://abcdef"),
            ("AI_TIMEOUT_SECS", "30"),
            ("ALT_FAILURE_MODE", "fallback"),
        ]);
        assert_eq!(config.port, 8088);
        assert!(config.ai_enabled());
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.allowed_origin.as_deref(), Some("chrome-extension://abcdef"));
        assert_eq!(config.ai_timeout_secs, 30);
        assert_eq!(config.alt_failure_mode, FailureMode::Fallback);
    }

    #[test]
    fn test_empty_key_means_ai_disabled() {
        let config = config_from(&[("OPENROUTER_API_KEY", "  ")]);
        assert!(!config.ai_enabled());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("PORT", "not-a-port"),
            ("AI_TIMEOUT_SECS", "0"),
            ("ALT_FAILURE_MODE", "explode"),
        ]);
        assert_eq!(config.port, 5000);
        assert_eq!(config.ai_timeout_secs, 20);
        assert_eq!(config.alt_failure_mode, FailureMode::Report);
    }
}
