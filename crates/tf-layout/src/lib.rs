//! # tf-layout — Print layout for ticket sets
//!
//! Everything the rendering stage needs besides pixels:
//!
//! - **Ticket layout**: where the serial number, barcode and fields go
//! - **Colours**: HTML colour strings parsed to RGB
//! - **Font fitting**: shrink-to-fit search over an external text measurer
//! - **Page tiling**: ticket images placed on print pages with cut marks
//!
//! No raster or font I/O happens here; measuring text is delegated through
//! the [`TextMeasure`] trait.

pub mod color;
pub mod fit;
pub mod layout;
pub mod tiling;

pub use color::*;
pub use fit::*;
pub use layout::*;
pub use tiling::*;

use thiserror::Error;

/// Layout errors
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(transparent)]
    Core(#[from] tf_core::TicketError),

    #[error("Invalid colour {value:?}: {reason}")]
    InvalidColor { value: String, reason: &'static str },

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Layout has {layout} fields but tickets have {tickets}")]
    FieldCountMismatch { layout: usize, tickets: usize },

    #[error("Text {text:?} does not fit into {width}x{height} at any font size")]
    TextDoesNotFit { text: String, width: u32, height: u32 },

    #[error("Invalid page grid: {0}")]
    InvalidGrid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;
