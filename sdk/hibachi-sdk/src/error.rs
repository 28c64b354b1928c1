use std::time::Duration;
use thiserror::Error;

/// Error types for the survey flow.
///
/// Every variant is recoverable through a user action; none of them end the
/// session on their own.
#[derive(Debug, Error)]
pub enum FlowError {
    /// No wallet extension and no modal provider could be found
    #[error("No wallet provider detected. Please install a browser wallet first.")]
    NoProviderDetected,

    /// Provider present but connection or authorization failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// A connection attempt is already pending
    #[error("A wallet connection is already in progress")]
    ConnectionInProgress,

    /// The gate was released while this attempt was pending
    #[error("Wallet connection was cancelled by a restart")]
    ConnectionSuperseded,

    /// The provider did not answer in time
    #[error("Wallet connection timed out after {0:?}")]
    ConnectionTimedOut(Duration),

    /// Valid address that is not on the allow-list
    #[error("Wallet {0} is not approved for this survey")]
    NotApproved(String),

    /// Platform refused clipboard access
    #[error("Clipboard access denied: {0}")]
    ClipboardDenied(String),

    /// Operation not allowed in the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Option {option:?} is not offered by question {question}")]
    UnknownOption { question: String, option: String },

    /// Survey graph failed validation
    #[error("Invalid survey graph: {0}")]
    InvalidGraph(String),

    /// Reward issuance failed
    #[error("Reward error: {0}")]
    Reward(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for flow operations
pub type Result<T> = std::result::Result<T, FlowError>;
