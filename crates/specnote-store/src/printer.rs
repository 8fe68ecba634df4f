//! Plaintext rendering of metadata entries
//!
//! One `name: value` line per entry. Names are padded to the longest name;
//! values are cut with `...` so each line fits [`LINE_LENGTH`] columns.

use crate::entry::MetadataEntry;
use std::io::{self, BufRead, Write};

/// Target width of a printed line
pub const LINE_LENGTH: usize = 100;

const ELLIPSIS: &str = "...";

/// Printer/scanner for the `name: value` format
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextPrinter;

impl PlaintextPrinter {
    /// Create printer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Write `entries` to `writer`
    ///
    /// # Errors
    /// Returns error if the writer fails
    pub fn print<W: Write>(&self, writer: &mut W, entries: &[MetadataEntry]) -> io::Result<()> {
        let longest = entries
            .iter()
            .map(|entry| entry.name.chars().count())
            .max()
            .unwrap_or(0);
        let value_width = LINE_LENGTH.saturating_sub(longest + 2);

        for entry in entries {
            writeln!(
                writer,
                "{:<longest$}: {}",
                entry.name,
                truncate(&entry.value, value_width)
            )?;
        }
        Ok(())
    }

    /// Read `(name, value)` pairs back from printed lines
    ///
    /// Lines without a `:` are ignored. Values keep any further colons.
    ///
    /// # Errors
    /// Returns error if the reader fails
    pub fn scan<R: BufRead>(&self, reader: R) -> io::Result<Vec<(String, String)>> {
        let mut pairs = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if let Some((name, value)) = line.split_once(':') {
                pairs.push((name.trim().to_string(), value.trim().to_string()));
            }
        }
        Ok(pairs)
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let keep = if width > ELLIPSIS.len() {
        width - ELLIPSIS.len()
    } else {
        width
    };
    let mut out: String = value.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
