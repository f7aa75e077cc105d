use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("Overlap detected")]
    OverlapDetected,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
