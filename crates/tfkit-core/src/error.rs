/// Errors raised by curve storage, remapping, and configuration.
#[derive(Debug, thiserror::Error)]
pub enum TransferFunctionError {
    #[error("degenerate source range [{lo}, {hi}]: cannot normalize positions")]
    DegenerateRange { lo: f64, hi: f64 },
    #[error("non-finite value for {0}")]
    NonFiniteValue(&'static str),
    #[error("control point index {index} out of bounds (len {len})")]
    PointOutOfBounds { index: usize, len: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TransferFunctionError>;
