use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use accessibridge_analysis::{fallback_alt_text, is_valid_image_url};
use accessibridge_core::{
    AccessError, AltBatch, AltResult, AssistProvider, FailureMode, ProcessingError,
};
use accessibridge_logging::redact_sensitive_data;

/// At most this many images are described per request.
pub const MAX_IMAGES_PER_REQUEST: usize = 5;

pub const NO_VALID_URLS_MESSAGE: &str = "No valid image URLs provided.";
pub const ALL_FAILED_MESSAGE: &str =
    "AI service unavailable or API error. Check API key, model, or network.";

/// Produces alt-text for batches of candidate image URLs.
pub struct AltTextGenerator {
    provider: Option<Arc<dyn AssistProvider>>,
    failure_mode: FailureMode,
}

impl AltTextGenerator {
    /// `provider` is `None` when no AI credential is configured.
    pub fn new(provider: Option<Arc<dyn AssistProvider>>) -> Self {
        Self {
            provider,
            failure_mode: FailureMode::default(),
        }
    }

    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    pub fn ai_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Eligible URLs in input order, capped at [`MAX_IMAGES_PER_REQUEST`].
    pub fn select_urls<S: AsRef<str>>(candidates: &[S]) -> Vec<&str> {
        candidates
            .iter()
            .map(AsRef::as_ref)
            .filter(|u| is_valid_image_url(u))
            .take(MAX_IMAGES_PER_REQUEST)
            .collect()
    }

    /// Alt-text for one eligible URL.
    ///
    /// Without a provider this is the domain fallback and cannot fail.
    pub async fn generate_one(&self, url: &str) -> Result<String, AccessError> {
        let Some(provider) = &self.provider else {
            return Ok(fallback_alt_text(url));
        };

        provider
            .generate_alt_text(url)
            .await
            .map(|text| AltResult::new(url, text).alt)
            .map_err(|e| AccessError::AiGenerationFailed {
                target: url.to_string(),
                message: redact_sensitive_data(&format!("{e:#}")),
            })
    }

    /// Describe up to five eligible images from `candidates`.
    ///
    /// `mode` overrides the configured [`FailureMode`] for this batch. One
    /// failing image never affects the others.
    pub async fn generate<S: AsRef<str>>(
        &self,
        candidates: &[S],
        mode: Option<FailureMode>,
    ) -> AltBatch {
        let mode = mode.unwrap_or(self.failure_mode);
        let urls = Self::select_urls(candidates);

        debug!(
            candidates = candidates.len(),
            eligible = urls.len(),
            ai_enabled = self.ai_enabled(),
            "Selected images for alt-text"
        );

        if urls.is_empty() {
            return AltBatch {
                error: Some(NO_VALID_URLS_MESSAGE.to_string()),
                ..AltBatch::default()
            };
        }

        let outcomes = join_all(urls.iter().map(|url| async move {
            (*url, self.generate_one(url).await)
        }))
        .await;

        let mut batch = AltBatch::default();
        for (url, outcome) in outcomes {
            match outcome {
                Ok(alt) => batch.alts.push(AltResult::new(url, alt)),
                Err(err) => {
                    warn!(url = %url, error = %err, mode = %mode, "Alt-text generation failed");
                    match mode {
                        FailureMode::Fallback => {
                            batch.alts.push(AltResult::new(url, fallback_alt_text(url)))
                        }
                        FailureMode::Report => batch.errors.push(ProcessingError {
                            url: url.to_string(),
                            message: failure_message(err),
                        }),
                    }
                }
            }
        }

        if batch.alts.is_empty() && !batch.errors.is_empty() {
            batch.error = Some(ALL_FAILED_MESSAGE.to_string());
        }

        info!(
            generated = batch.alts.len(),
            failed = batch.errors.len(),
            "Alt-text batch complete"
        );

        batch
    }
}

fn failure_message(err: AccessError) -> String {
    match err {
        AccessError::AiGenerationFailed { message, .. } => message,
        other => other.to_string(),
    }
}
