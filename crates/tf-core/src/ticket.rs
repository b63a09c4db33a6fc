//! Tickets, ticket sets and their JSON persistence

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TicketError, TicketResult};

/// Current ticket data file version
pub const TICKET_DATA_VERSION: u32 = 1;

/// A single ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    /// Unique serial number (case-insensitive)
    pub serial_number: String,
    /// Designated winning prize, `None` for a non-winning ticket
    #[serde(rename = "result", default)]
    pub designated_winner: Option<String>,
    /// Printed field values in final order
    pub fields: Vec<String>,
}

impl Ticket {
    pub fn new(serial_number: String, designated_winner: Option<String>, fields: Vec<String>) -> Self {
        Self {
            serial_number,
            designated_winner,
            fields,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.designated_winner.is_some()
    }

    /// Occurrence count per distinct field value
    pub fn value_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for field in &self.fields {
            *counts.entry(field.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

/// How the ticket set was prepared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Several fields per ticket, N equal fields win
    Multi,
    /// One field per ticket naming the prize
    Single,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Multi
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Multi => f.write_str("multi"),
            Self::Single => f.write_str("single"),
        }
    }
}

/// A broken ticket set invariant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    DuplicateSerial { serial: String },
    FieldCount { serial: String, expected: usize, actual: usize },
    Unsorted { index: usize },
    WinnerShort { serial: String, prize: String, count: usize },
    ExtraWinningValue { serial: String, value: String },
    LoserWins { serial: String, value: String },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSerial { serial } => write!(f, "duplicate serial number {}", serial),
            Self::FieldCount {
                serial,
                expected,
                actual,
            } => write!(f, "{}: {} fields, expected {}", serial, actual, expected),
            Self::Unsorted { index } => write!(f, "ticket #{} is out of serial number order", index),
            Self::WinnerShort {
                serial,
                prize,
                count,
            } => write!(f, "{}: only {} fields show winning prize {:?}", serial, count, prize),
            Self::ExtraWinningValue { serial, value } => {
                write!(f, "{}: {:?} also reaches the win threshold", serial, value)
            }
            Self::LoserWins { serial, value } => {
                write!(f, "{}: non-winning ticket wins with {:?}", serial, value)
            }
        }
    }
}

/// A complete batch of tickets, sorted by serial number
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSet {
    pub version: u32,
    pub date_created: DateTime<FixedOffset>,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<Uuid>,
    /// Effective win threshold, absent for single-field tickets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_to_win: Option<usize>,
    pub tickets: Vec<Ticket>,
}

impl TicketSet {
    /// Stamp metadata and sort tickets by serial number
    pub fn new(strategy: Strategy, fields_to_win: Option<usize>, tickets: Vec<Ticket>) -> Self {
        let mut set = Self {
            version: TICKET_DATA_VERSION,
            date_created: Local::now().fixed_offset(),
            strategy,
            batch_id: Some(Uuid::new_v4()),
            fields_to_win,
            tickets,
        };
        set.sort_by_serial();
        set
    }

    /// Ordinal sort by serial number
    pub fn sort_by_serial(&mut self) {
        self.tickets
            .sort_by(|a, b| a.serial_number.cmp(&b.serial_number));
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn winners(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.iter().filter(|t| t.is_winner())
    }

    pub fn losers(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.iter().filter(|t| !t.is_winner())
    }

    /// Field count shared by all tickets, `None` if empty or mixed
    pub fn field_count(&self) -> Option<usize> {
        let first = self.tickets.first()?.fields.len();
        self.tickets
            .iter()
            .all(|t| t.fields.len() == first)
            .then_some(first)
    }

    /// Structural checks required before a ticket set can be rendered
    pub fn validate(&self) -> TicketResult<()> {
        if self.version != TICKET_DATA_VERSION {
            return Err(TicketError::UnsupportedVersion {
                found: self.version,
                expected: TICKET_DATA_VERSION,
            });
        }
        if self.tickets.is_empty() {
            return Err(TicketError::InvalidData("no tickets in data".into()));
        }
        if self.field_count().is_none() {
            return Err(TicketError::InvalidData(
                "invalid number of columns in data".into(),
            ));
        }
        Ok(())
    }

    /// Check every ticket invariant and report all violations found
    pub fn verify(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        let mut seen = HashSet::new();
        for ticket in &self.tickets {
            if !seen.insert(ticket.serial_number.to_lowercase()) {
                violations.push(Violation::DuplicateSerial {
                    serial: ticket.serial_number.clone(),
                });
            }
        }

        for (index, pair) in self.tickets.windows(2).enumerate() {
            if pair[0].serial_number > pair[1].serial_number {
                violations.push(Violation::Unsorted { index: index + 1 });
            }
        }

        if let Some(expected) = self.tickets.first().map(|t| t.fields.len()) {
            for ticket in &self.tickets {
                if ticket.fields.len() != expected {
                    violations.push(Violation::FieldCount {
                        serial: ticket.serial_number.clone(),
                        expected,
                        actual: ticket.fields.len(),
                    });
                }
            }
        }

        if let Some(threshold) = self.fields_to_win {
            for ticket in &self.tickets {
                verify_win_rule(ticket, threshold, &mut violations);
            }
        }

        violations
    }

    /// Write as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> TicketResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read from JSON and run [`TicketSet::validate`]
    pub fn load<P: AsRef<Path>>(path: P) -> TicketResult<Self> {
        let file = File::open(path)?;
        let set: Self = serde_json::from_reader(BufReader::new(file))?;
        set.validate()?;
        Ok(set)
    }

    pub fn to_json(&self) -> TicketResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> TicketResult<Self> {
        let set: Self = serde_json::from_str(json)?;
        set.validate()?;
        Ok(set)
    }
}

fn verify_win_rule(ticket: &Ticket, threshold: usize, violations: &mut Vec<Violation>) {
    let counts = ticket.value_counts();
    let serial = &ticket.serial_number;

    match &ticket.designated_winner {
        Some(prize) => {
            let count = counts.get(prize.as_str()).copied().unwrap_or(0);
            if count < threshold {
                violations.push(Violation::WinnerShort {
                    serial: serial.clone(),
                    prize: prize.clone(),
                    count,
                });
            }
            for (value, &n) in &counts {
                if *value != prize.as_str() && n >= threshold {
                    violations.push(Violation::ExtraWinningValue {
                        serial: serial.clone(),
                        value: (*value).to_string(),
                    });
                }
            }
        }
        None => {
            for (value, &n) in &counts {
                if n >= threshold {
                    violations.push(Violation::LoserWins {
                        serial: serial.clone(),
                        value: (*value).to_string(),
                    });
                }
            }
        }
    }
}
