use std::time::Duration;
use thiserror::Error;

/// Failure kinds for the individual stages of the compression cascade.
///
/// These never reach the library caller as errors: the service converts an
/// exhausted cascade into a `Compression Failed` outcome that still carries
/// the original bytes. The variants exist so logs and tests can tell a
/// missing binary apart from a corrupt input.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("compression engine not found")]
    EngineUnavailable,

    #[error("compression engine failed: {0}")]
    EngineFailed(String),

    #[error("compression engine timed out after {0:?}")]
    EngineTimeout(Duration),

    #[error("image decode error: {0}")]
    Decode(String),

    #[error("image encode error: {0}")]
    Encode(String),

    #[error("PDF rewrite error: {0}")]
    PdfRewrite(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("blocking task join error: {0}")]
    TaskJoin(String),
}

impl StageError {
    /// True when the failure means "the external engine cannot be used",
    /// as opposed to "this particular input is broken".
    pub fn is_engine_unavailable(&self) -> bool {
        matches!(self, StageError::EngineUnavailable)
    }
}
