use thiserror::Error;

/// Error taxonomy shared by every ledger operation.
///
/// Operations either complete fully or report one of these with no partial
/// effect; store failures surface as [`LedgerError::Dependency`].
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Dependency failure: {0}")]
    Dependency(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Dependency(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Dependency(err.to_string())
    }
}
