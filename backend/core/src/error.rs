use thiserror::Error;

/// Top-level error type for AccessiBridge.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("invalid color format: {0}")]
    InvalidColorFormat(String),

    #[error("AI generation failed for {target}: {message}")]
    AiGenerationFailed { target: String, message: String },

    #[error("invalid request: {0}")]
    InvalidRequestShape(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AccessError {
    /// Whether the error was caused by the caller's input rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AccessError::InvalidColorFormat(_) | AccessError::InvalidRequestShape(_)
        )
    }
}
