use thiserror::Error;

/// Errors raised while detecting transposable elements.
#[derive(Debug, Error)]
pub enum TeError {
    /// The sequence source could not be opened
    #[error("input not found: {0}")]
    InputNotFound(String),

    /// A character outside {A, C, G, T, N}
    #[error("invalid nucleotide symbol {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    /// Ground truth could not be read; validation is skipped by callers
    #[error("ground truth unavailable: {0}")]
    GroundTruthUnavailable(String),

    /// Out-of-range or inconsistent thresholds
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// The scan was cancelled or ran past its deadline
    #[error("scan cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TeError>;
