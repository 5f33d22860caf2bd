use thiserror::Error;

/// Errors raised while loading table scenarios.
///
/// Reconciliation itself never fails; these only surface at the edges where
/// configuration is read from outside the process.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid scenario at event {index}: {message}")]
    InvalidScenario { index: usize, message: String },
}

pub type Result<T> = std::result::Result<T, TableError>;
