//! Log Redaction
//!
//! Scrubs API keys and bearer tokens from strings before they are logged or
//! echoed back to a client.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)|(sk-or-v1-[a-zA-Z0-9]{16,})|(sk-[a-zA-Z0-9]{32,})")
        .unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]").to_string()
}
