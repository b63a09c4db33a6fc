//! Engine configuration

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{TicketError, TicketResult};

/// Permitted number of fields per ticket
pub const FIELD_COUNT_RANGE: RangeInclusive<usize> = 3..=50;
/// Permitted win threshold (before clamping to the field count)
pub const FIELDS_TO_WIN_RANGE: RangeInclusive<usize> = 2..=50;
/// Permitted length of the random part of a serial number
pub const SERIAL_LENGTH_RANGE: RangeInclusive<usize> = 5..=20;

/// Default serial alphabet (no easily confused letters)
pub const DEFAULT_SERIAL_ALPHABET: &str = "0123456789ABCDEFGHKLMNPSTUWXYZ";

/// Ticket generation configuration, immutable for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Number of fields printed on each ticket
    pub field_count: usize,
    /// Number of equal fields required to win
    pub fields_to_win: usize,
    /// Length of the random part of the serial number
    pub serial_length: usize,
    /// Characters permitted in serial numbers
    pub serial_alphabet: String,
    /// Fixed prefix for all serial numbers (e.g. batch number)
    pub serial_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            field_count: 3,
            fields_to_win: 3,
            serial_length: 10,
            serial_alphabet: DEFAULT_SERIAL_ALPHABET.into(),
            serial_prefix: String::new(),
        }
    }
}

impl EngineConfig {
    /// Load config from a JSON file. Missing keys take default values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> TicketResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse config from JSON
    pub fn from_json(json: &str) -> TicketResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set field count
    pub fn with_fields(mut self, field_count: usize) -> Self {
        self.field_count = field_count;
        self
    }

    /// Set win threshold
    pub fn with_fields_to_win(mut self, fields_to_win: usize) -> Self {
        self.fields_to_win = fields_to_win;
        self
    }

    /// Set serial number length
    pub fn with_serial_length(mut self, length: usize) -> Self {
        self.serial_length = length;
        self
    }

    /// Set serial number alphabet
    pub fn with_serial_alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.serial_alphabet = alphabet.into();
        self
    }

    /// Set serial number prefix
    pub fn with_serial_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.serial_prefix = prefix.into();
        self
    }

    /// Check every value against its permitted range.
    ///
    /// `fields_to_win > field_count` is not an error here; see [`EngineConfig::clamped`].
    pub fn validate(&self) -> TicketResult<()> {
        check_range("field count", self.field_count, &FIELD_COUNT_RANGE)?;
        check_range("fields to win", self.fields_to_win, &FIELDS_TO_WIN_RANGE)?;
        check_range("serial length", self.serial_length, &SERIAL_LENGTH_RANGE)?;
        if self.serial_alphabet.is_empty() {
            return Err(TicketError::InvalidConfig(
                "serial alphabet must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Whether the win threshold exceeds the field count
    pub fn needs_clamp(&self) -> bool {
        self.fields_to_win > self.field_count
    }

    /// Copy with `fields_to_win` reduced to `field_count` when it exceeds it
    pub fn clamped(&self) -> Self {
        Self {
            fields_to_win: self.fields_to_win.min(self.field_count),
            ..self.clone()
        }
    }
}

fn check_range(name: &str, value: usize, range: &RangeInclusive<usize>) -> TicketResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(TicketError::InvalidConfig(format!(
            "{} must be between {} and {}, got {}",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.field_count, 3);
        assert_eq!(config.fields_to_win, 3);
        assert_eq!(config.serial_length, 10);
    }

    #[test]
    fn test_out_of_range_values() {
        assert!(EngineConfig::default().with_fields(2).validate().is_err());
        assert!(EngineConfig::default().with_fields(51).validate().is_err());
        assert!(EngineConfig::default().with_fields_to_win(1).validate().is_err());
        assert!(EngineConfig::default().with_serial_length(4).validate().is_err());
        assert!(EngineConfig::default().with_serial_length(21).validate().is_err());
        assert!(EngineConfig::default().with_serial_alphabet("").validate().is_err());
    }

    #[test]
    fn test_clamp() {
        let config = EngineConfig::default().with_fields(3).with_fields_to_win(4);
        assert!(config.validate().is_ok());
        assert!(config.needs_clamp());

        let clamped = config.clamped();
        assert_eq!(clamped.fields_to_win, 3);
        assert!(!clamped.needs_clamp());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "fieldCount": 6, "serialPrefix": "B7-" }"#).unwrap();
        assert_eq!(config.field_count, 6);
        assert_eq!(config.serial_prefix, "B7-");
        assert_eq!(config.fields_to_win, 3);
        assert_eq!(config.serial_alphabet, DEFAULT_SERIAL_ALPHABET);
    }
}
