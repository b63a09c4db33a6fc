//! HTML colour strings

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{LayoutError, LayoutResult};

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[0-9a-f]{6}").expect("static colour pattern"));

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`. Surrounding whitespace is ignored and only
    /// the first six hex digits are read.
    pub fn from_html(value: &str) -> LayoutResult<Self> {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(invalid(value, "value cannot be empty"));
        }
        let hex = normalized.strip_prefix('#').unwrap_or(&normalized);
        if !HEX_COLOR.is_match(hex) {
            return Err(invalid(value, "must be a valid HTML colour string"));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| invalid(value, "must be a valid HTML colour string"))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_html(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn invalid(value: &str, reason: &'static str) -> LayoutError {
    LayoutError::InvalidColor {
        value: value.to_string(),
        reason,
    }
}
