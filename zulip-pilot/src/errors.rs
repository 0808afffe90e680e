use thiserror::Error;

/// Errors surfaced by browser automation steps.
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    #[error("webdriver error: {0}")]
    DriverError(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
