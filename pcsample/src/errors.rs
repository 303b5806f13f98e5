use thiserror::Error;

/// Errors surfaced by the sampling entry points. Numeric edge cases such as points without
/// neighbors or a zero-area bounding box are absorbed by the samplers and never appear here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SampleError {
    #[error("target count must be greater than zero")]
    InvalidTargetCount,

    #[error("cannot sample an empty point set")]
    EmptyInput,

    #[error("invalid sampling options: {0}")]
    InvalidOptions(String),

    #[error("sampling was cancelled before completion")]
    Cancelled,

    #[error("background sampling job ended without producing a result")]
    WorkerLost,
}
