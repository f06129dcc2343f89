use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Upper bound on the length of any alt-text, in characters.
pub const MAX_ALT_LEN: usize = 100;

/// Alt-text produced for a single image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltResult {
    pub url: String,
    pub alt: String,
}

impl AltResult {
    /// Build a result, clamping `alt` to [`MAX_ALT_LEN`] characters.
    pub fn new(url: impl Into<String>, alt: impl AsRef<str>) -> Self {
        Self {
            url: url.into(),
            alt: truncate_chars(alt.as_ref().trim(), MAX_ALT_LEN),
        }
    }
}

/// An eligible image whose AI description could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingError {
    pub url: String,
    pub message: String,
}

/// Outcome of one alt-text batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltBatch {
    pub alts: Vec<AltResult>,
    pub errors: Vec<ProcessingError>,
    /// Set only when the batch produced nothing usable.
    pub error: Option<String>,
}

/// How a failed per-image AI call is surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Record a [`ProcessingError`] and leave the image out of `alts`.
    #[default]
    Report,
    /// Substitute the domain-based fallback text silently.
    Fallback,
}

impl FromStr for FailureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "report" => Ok(FailureMode::Report),
            "fallback" => Ok(FailureMode::Fallback),
            other => Err(format!("unknown failure mode '{other}'")),
        }
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureMode::Report => write!(f, "report"),
            FailureMode::Fallback => write!(f, "fallback"),
        }
    }
}

/// Structural issue counts submitted for scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    pub missing_alt: u32,
    pub contrast_issues: u32,
}

/// Page-level metadata collected by the browser extension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub missing_alt: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub inputs_without_label: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub generic_text: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkStats {
    #[serde(default, deserialize_with = "lenient_flag")]
    pub has_main: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accessibility heuristics for one page.
///
/// Only the fields used by the fallback report are typed; everything else the
/// extension sends is kept in `extra` so it reaches the AI prompt untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeuristicsReport {
    #[serde(default, deserialize_with = "lenient_section")]
    pub meta: PageMeta,
    #[serde(default, deserialize_with = "lenient_section")]
    pub images: ImageStats,
    #[serde(default, deserialize_with = "lenient_section")]
    pub forms: FormStats,
    #[serde(default, deserialize_with = "lenient_section")]
    pub links: LinkStats,
    #[serde(default, deserialize_with = "lenient_section")]
    pub landmarks: LandmarkStats,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// The extension's heuristics are loosely typed; a bad value degrades to the
// field's default rather than rejecting the whole request.

fn lenient_section<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f > 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(count.unwrap_or(0))
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Where a report's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    Ai,
    Fallback,
}

impl fmt::Display for ReportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportSource::Ai => write!(f, "ai"),
            ReportSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// A Markdown report plus its provenance.
#[derive(Debug, Clone)]
pub struct SynthesizedReport {
    pub markdown: String,
    pub source: ReportSource,
    /// Reason the AI path was abandoned, if it was attempted.
    pub ai_error: Option<String>,
}

/// Truncate to at most `max` characters without splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
