//! CSV loader for village water-access tables.

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::config::{CanonicalField, SchemaMapping};

/// One input row, reduced to the mapped columns in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    /// 1-based data row number (the header is not counted).
    pub row: usize,
    values: [String; 7],
}

impl SourceRow {
    pub fn new(row: usize, values: [String; 7]) -> Self {
        Self { row, values }
    }

    pub fn get(&self, field: CanonicalField) -> &str {
        &self.values[field.index()]
    }
}

/// Reads the CSV file at `path` and resolves its header against `mapping`.
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, if a row is
/// malformed, or if any mapped source column is absent from the header.
#[tracing::instrument(skip(mapping), fields(path = %path.display()))]
pub fn load_rows(path: &Path, mapping: &SchemaMapping) -> Result<Vec<SourceRow>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open input file {}", path.display()))?;
    read_rows(file, mapping).with_context(|| format!("failed to load {}", path.display()))
}

/// Same as [`load_rows`], over any reader.
pub fn read_rows<R: Read>(reader: R, mapping: &SchemaMapping) -> Result<Vec<SourceRow>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = rdr.headers().context("failed to read CSV header")?.clone();
    let positions = resolve_columns(&headers, mapping)?;
    debug!(columns = headers.len(), "CSV header resolved");

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("malformed CSV at data row {}", idx + 1))?;
        let values = positions.map(|pos| record.get(pos).unwrap_or_default().to_string());
        rows.push(SourceRow::new(idx + 1, values));
    }

    debug!(rows = rows.len(), "CSV rows loaded");
    Ok(rows)
}

/// Maps each canonical field to its column index in `headers`.
///
/// Names are compared trimmed and case-insensitively.
fn resolve_columns(headers: &StringRecord, mapping: &SchemaMapping) -> Result<[usize; 7]> {
    let mut positions = [0usize; 7];
    let mut missing = Vec::new();

    for field in CanonicalField::ALL {
        let Some(column) = mapping.get(field) else {
            bail!("schema mapping has no column for {field}");
        };
        let wanted = column.source.trim();

        match headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        {
            Some(pos) => positions[field.index()] = pos,
            None => missing.push(wanted.to_string()),
        }
    }

    if !missing.is_empty() {
        bail!("input is missing required column(s): {}", missing.join(", "));
    }

    Ok(positions)
}
