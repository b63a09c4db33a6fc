//! # tf-engine — Ticket field-assignment engine
//!
//! Produces ticket sets where every designated winner shows exactly the
//! required winning pattern and no other ticket wins by accident.
//!
//! ## Architecture
//!
//! ```text
//! TicketSetBuilder
//!     │
//!     ├── SerialNumberAllocator (unique random serials, per build)
//!     └── FieldAssignmentEngine (rejection-sampled field lists)
//!           │
//!           v
//!     TicketSet (sorted by serial number)
//! ```
//!
//! All sampling loops are bounded by [`RetryLimits`]; a configuration that
//! cannot be satisfied fails with an [`EngineError`] instead of spinning.

pub mod builder;
pub mod error;
pub mod fields;
pub mod serial;

pub use builder::*;
pub use error::*;
pub use fields::*;
pub use serial::*;

/// Upper bounds for the rejection sampling loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryLimits {
    /// Draws allowed for one serial number before giving up
    pub max_serial_attempts: u32,
    /// Rejected draws allowed while completing one ticket's fields
    pub max_field_rejections: u32,
}

impl Default for RetryLimits {
    fn default() -> Self {
        Self {
            max_serial_attempts: 100_000,
            max_field_rejections: 100_000,
        }
    }
}
