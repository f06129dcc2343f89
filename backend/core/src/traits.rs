use anyhow::Result;
use async_trait::async_trait;

use crate::types::HeuristicsReport;

/// An AI backend able to describe images and write accessibility reports.
///
/// Implementations are free to fail on any call; callers decide whether a
/// failure becomes a fallback value or a per-item error.
#[async_trait]
pub trait AssistProvider: Send + Sync {
    /// Provider name (e.g., "openrouter", "mock").
    fn name(&self) -> &str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Produce a short description of the image at `image_url`.
    async fn generate_alt_text(&self, image_url: &str) -> Result<String>;

    /// Produce a Markdown narrative for the given page heuristics.
    async fn generate_report(&self, heuristics: &HeuristicsReport) -> Result<String>;
}
