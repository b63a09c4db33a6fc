//! Error types for the core data model

use thiserror::Error;

/// Core errors
#[derive(Error, Debug)]
pub enum TicketError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No prizes defined")]
    EmptyPrizeList,

    #[error("Invalid ticket data: {0}")]
    InvalidData(String),

    #[error("Unsupported ticket data version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for core operations
pub type TicketResult<T> = Result<T, TicketError>;
