mod error;

pub use error::StageError;

/// Result type for individual cascade stages
pub type StageResult<T> = Result<T, StageError>;
