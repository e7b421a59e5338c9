// src/loader/csv_reader.rs
//
// Row-level CSV access for the catalog files
//
// Files have a header row. Fields are trimmed. Rows may be ragged;
// a missing field reads as an empty string.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::AppResult;

/// A data row with its 1-based line number in the source file
#[derive(Debug, Clone)]
pub struct CsvRow {
    pub line: u64,
    record: StringRecord,
}

impl CsvRow {
    /// Field `index`, or "" when the row is too short
    pub fn field(&self, index: usize) -> &str {
        self.record.get(index).unwrap_or("")
    }

    /// Comma separated list in field `index`, empty items dropped
    pub fn list(&self, index: usize) -> Vec<&str> {
        self.field(index)
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect()
    }
}

/// Reads every data row of `path`
pub fn read_rows(path: &Path) -> AppResult<Vec<CsvRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push(CsvRow { line, record });
    }

    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
