//! Shrink-to-fit font size search

use crate::layout::{Rect, TextStyle};
use crate::{LayoutError, LayoutResult};

/// Font size decrement per attempt (points)
pub const FONT_SIZE_STEP: u32 = 2;

const POINTS_PER_INCH: f32 = 72.0;

/// Measured text extent in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

/// Text measurement provided by the font/rendering library
pub trait TextMeasure {
    /// Measure `text` set in `style` at `size` points, wrapped at `wrap_width` pixels
    fn measure(&self, text: &str, style: &TextStyle, size: u32, wrap_width: u32) -> TextExtent;
}

/// Font-independent estimate: every glyph advances `advance_em`, lines are
/// `line_height_em` apart, and lines wrap at the box width. Point sizes are
/// converted to pixels at `dpi`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateMeasure {
    pub advance_em: f32,
    pub line_height_em: f32,
    pub dpi: u32,
}

impl Default for ApproximateMeasure {
    fn default() -> Self {
        Self {
            advance_em: 0.6,
            line_height_em: 1.2,
            dpi: 300,
        }
    }
}

impl ApproximateMeasure {
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }
}

impl TextMeasure for ApproximateMeasure {
    fn measure(&self, text: &str, _style: &TextStyle, size: u32, wrap_width: u32) -> TextExtent {
        let em = size as f32 * self.dpi as f32 / POINTS_PER_INCH;
        let advance = em * self.advance_em;
        let per_line = ((wrap_width as f32 / advance).floor() as usize).max(1);

        let mut lines = 0usize;
        let mut widest = 0usize;
        for line in text.split('\n') {
            let chars = line.chars().count().max(1);
            lines += chars.div_ceil(per_line);
            widest = widest.max(chars.min(per_line));
        }
        TextExtent {
            width: widest as f32 * advance,
            height: lines as f32 * em * self.line_height_em,
        }
    }
}

/// A field value placed in its box at the fitted size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittedText {
    pub text: String,
    /// Centre of the box; text is drawn centred on it
    pub origin: (i32, i32),
    pub size: u32,
}

/// Largest font size, stepping down from `style.size`, at which `text` fits
/// inside `rect`.
pub fn fit_font_size<M: TextMeasure + ?Sized>(
    measurer: &M,
    text: &str,
    style: &TextStyle,
    rect: &Rect,
) -> LayoutResult<u32> {
    let mut size = style.size;
    while size > 0 {
        let extent = measurer.measure(text, style, size, rect.width);
        if extent.width <= rect.width as f32 && extent.height <= rect.height as f32 {
            if size != style.size {
                log::debug!("{:?} shrunk from {}pt to {}pt", text, style.size, size);
            }
            return Ok(size);
        }
        size = size.saturating_sub(FONT_SIZE_STEP);
    }

    Err(LayoutError::TextDoesNotFit {
        text: text.to_string(),
        width: rect.width,
        height: rect.height,
    })
}
