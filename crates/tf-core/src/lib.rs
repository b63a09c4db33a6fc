//! # tf-core — TicketForge core types
//!
//! Shared data model for lottery ticket preparation:
//!
//! - **Prize lists**: `(name, count)` pairs read from CSV-like text
//! - **Engine configuration**: field count, win threshold, serial number shape
//! - **Ticket sets**: the sorted, serializable output of a generation run
//!
//! ## Data flow
//!
//! ```text
//! prizes.csv ──> PrizeListReader ──> PrizeList
//!                                       │
//!                                       v
//!                   (tf-engine) TicketSetBuilder + EngineConfig
//!                                       │
//!                                       v
//!                                   TicketSet ──> tickets.json
//! ```

pub mod config;
pub mod error;
pub mod prize;
pub mod ticket;

pub use config::*;
pub use error::*;
pub use prize::*;
pub use ticket::*;
