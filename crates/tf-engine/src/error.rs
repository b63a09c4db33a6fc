//! Engine error types

use thiserror::Error;

use tf_core::TicketError;

/// Ticket generation errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] TicketError),

    #[error("Ticket count must be at least 1")]
    ZeroTicketCount,

    #[error("Degenerate configuration: {0}")]
    DegenerateEngine(String),

    #[error("All {capacity} possible serial numbers are already allocated")]
    SerialSpaceExhausted { capacity: u128 },

    #[error("No unique serial number found after {attempts} attempts")]
    SerialRetryLimit { attempts: u32 },

    #[error("Could not complete fields for {ticket} after {rejections} rejected draws")]
    FieldRetryLimit { ticket: String, rejections: u32 },
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
