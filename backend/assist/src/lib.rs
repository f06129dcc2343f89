//! AI-augmented analysis: alt-text for images and narrative reports, each
//! with a deterministic fallback when the AI provider is absent or failing.

pub mod alt_text;
pub mod report;

pub use alt_text::{AltTextGenerator, ALL_FAILED_MESSAGE, MAX_IMAGES_PER_REQUEST, NO_VALID_URLS_MESSAGE};
pub use report::{fallback_report, ReportSynthesizer};
