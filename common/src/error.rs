use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The wire message is fixed: clients match on it.
    #[error("Invalid endpoint")]
    InvalidOperation(String),
    #[error("Invalid caption length: {0}")]
    InvalidCaptionLength(String),
    #[error("Invalid display size: {0}")]
    InvalidDisplaySize(String),
}
