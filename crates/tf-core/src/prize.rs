//! Prize lists and the CSV-like prize reader

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TicketResult;

/// A named reward and the number of tickets that must win it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    pub name: String,
    pub count: u32,
}

impl Prize {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Ordered list of prizes, immutable once read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeList {
    prizes: Vec<Prize>,
}

impl PrizeList {
    pub fn new(prizes: Vec<Prize>) -> Self {
        Self { prizes }
    }

    /// Number of prize entries
    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Prize> {
        self.prizes.iter()
    }

    /// Total number of prize instances (sum of all counts)
    pub fn total_instances(&self) -> u64 {
        self.prizes.iter().map(|p| u64::from(p.count)).sum()
    }

    /// Entry names in list order, used as the pool for uniform field draws.
    /// A name listed twice is drawn twice as often.
    pub fn pool(&self) -> Vec<String> {
        self.prizes.iter().map(|p| p.name.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a PrizeList {
    type Item = &'a Prize;
    type IntoIter = std::slice::Iter<'a, Prize>;

    fn into_iter(self) -> Self::IntoIter {
        self.prizes.iter()
    }
}

impl FromIterator<Prize> for PrizeList {
    fn from_iter<I: IntoIterator<Item = Prize>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Why a prize line was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Empty line or comment
    CommentOrEmpty,
    /// Wrong field count, blank name, or invalid count
    SyntaxError,
}

/// Diagnostic recorded for a skipped line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostic {
    /// 1-based line number
    pub line: usize,
    pub reason: SkipReason,
}

impl std::fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            SkipReason::CommentOrEmpty => write!(f, "Ignoring line {}: Comment or empty", self.line),
            SkipReason::SyntaxError => write!(f, "Ignoring line {}: Syntax error", self.line),
        }
    }
}

/// Result of reading a prize list
#[derive(Debug, Clone, Default)]
pub struct PrizeReport {
    pub prizes: PrizeList,
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl PrizeReport {
    /// Diagnostics for malformed lines only
    pub fn syntax_errors(&self) -> impl Iterator<Item = &ParseDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.reason == SkipReason::SyntaxError)
    }
}

/// Line-oriented prize reader: `<name><separator><count>` per line
#[derive(Debug, Clone)]
pub struct PrizeListReader {
    separator: String,
    comment: String,
}

impl Default for PrizeListReader {
    fn default() -> Self {
        Self {
            separator: ",".into(),
            comment: "#".into(),
        }
    }
}

impl PrizeListReader {
    pub fn new(separator: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            comment: comment.into(),
        }
    }

    /// Set field separator
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set comment marker
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Read prizes from a file
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> TicketResult<PrizeReport> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Read prizes from any buffered reader. Malformed lines are skipped, never fatal.
    pub fn read<R: BufRead>(&self, reader: R) -> TicketResult<PrizeReport> {
        let mut report = PrizeReport::default();
        let mut prizes = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            let line_number = index + 1;

            match self.parse_line(line) {
                Ok(prize) => prizes.push(prize),
                Err(reason) => {
                    let diagnostic = ParseDiagnostic {
                        line: line_number,
                        reason,
                    };
                    match reason {
                        SkipReason::CommentOrEmpty => log::debug!("{}", diagnostic),
                        SkipReason::SyntaxError => log::warn!("{}", diagnostic),
                    }
                    report.diagnostics.push(diagnostic);
                }
            }
        }

        report.prizes = PrizeList::new(prizes);
        Ok(report)
    }

    /// Read prizes from an in-memory string
    pub fn read_str(&self, text: &str) -> TicketResult<PrizeReport> {
        self.read(text.as_bytes())
    }

    fn parse_line(&self, line: &str) -> Result<Prize, SkipReason> {
        if line.is_empty() || (!self.comment.is_empty() && line.starts_with(&self.comment)) {
            return Err(SkipReason::CommentOrEmpty);
        }

        let parts: Vec<&str> = if self.separator.is_empty() {
            vec![line]
        } else {
            line.split(self.separator.as_str()).collect()
        };
        let [name, count] = parts.as_slice() else {
            return Err(SkipReason::SyntaxError);
        };
        if name.trim().is_empty() {
            return Err(SkipReason::SyntaxError);
        }
        // Counts are signed 32-bit in the prize file format
        let count: i32 = count.trim().parse().map_err(|_| SkipReason::SyntaxError)?;
        let count = u32::try_from(count)
            .ok()
            .filter(|&count| count >= 1)
            .ok_or(SkipReason::SyntaxError)?;

        Ok(Prize::new(name.replace("\\n", "\n"), count))
    }
}
