//! Schema normalisation of the comma-joined viewing export.
//!
//! The export delivers every field of a record inside a single cell. Cells are
//! split on commas and the resulting positional fields are named against the
//! canonical schema, tolerating column-count drift in either direction.

use std::path::Path;

use serde::Serialize;
use tracing::warn;
use viewing_core::error::{Result, ViewingError};
use viewing_core::models::extra_column_name;

// ── RawTable ──────────────────────────────────────────────────────────────────

/// Rows of optional text cells under named columns.
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column called `name`, if the export carried it.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell text at `row` under `column`; `None` for missing columns or cells.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }
}

// ── SchemaReconciliation ──────────────────────────────────────────────────────

/// How the observed export width was reconciled with the canonical schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaReconciliation {
    /// Widest row, in fields.
    pub observed_width: usize,
    /// Number of canonical column names.
    pub canonical_width: usize,
    /// Canonical columns for which the export carried no field.
    pub missing_columns: Vec<String>,
    /// Number of `Extra Column N` placeholders appended.
    pub extra_columns: usize,
    /// Rows narrower than the observed width, padded with empty cells.
    pub short_rows: usize,
}

impl SchemaReconciliation {
    /// Total number of dropped names, appended placeholders and padded rows.
    pub fn warning_count(&self) -> usize {
        self.missing_columns.len() + self.extra_columns + self.short_rows
    }

    pub fn is_exact(&self) -> bool {
        self.warning_count() == 0
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub table: RawTable,
    pub reconciliation: SchemaReconciliation,
}

// ── normalize ─────────────────────────────────────────────────────────────────

/// Split comma-joined `cells` into positional fields named after `canonical`.
///
/// The widest row defines the width. Narrower exports keep only the leading
/// canonical names; wider ones gain `Extra Column 0`, `Extra Column 1`, ...
/// Fails only when no row yields any field; `source` names the export in that
/// error.
pub fn normalize(
    cells: &[Option<String>],
    canonical: &[&str],
    source: &Path,
) -> Result<Normalized> {
    let split_rows: Vec<Vec<Option<String>>> = cells
        .iter()
        .map(|cell| match cell {
            Some(text) => text.split(',').map(|field| Some(field.to_string())).collect(),
            None => Vec::new(),
        })
        .collect();

    let width = split_rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return Err(ViewingError::EmptySheet(source.to_path_buf()));
    }

    let mut columns: Vec<String> = canonical
        .iter()
        .take(width)
        .map(|name| name.to_string())
        .collect();
    let missing_columns: Vec<String> = canonical
        .iter()
        .skip(width)
        .map(|name| name.to_string())
        .collect();
    let extra_columns = width.saturating_sub(canonical.len());
    columns.extend((0..extra_columns).map(extra_column_name));

    let mut short_rows = 0usize;
    let rows: Vec<Vec<Option<String>>> = split_rows
        .into_iter()
        .map(|mut row| {
            if row.len() < width {
                short_rows += 1;
                row.resize(width, None);
            }
            row
        })
        .collect();

    let reconciliation = SchemaReconciliation {
        observed_width: width,
        canonical_width: canonical.len(),
        missing_columns,
        extra_columns,
        short_rows,
    };

    if !reconciliation.missing_columns.is_empty() {
        warn!(
            "Export has {} fields, {} expected; no data for columns: {}",
            width,
            canonical.len(),
            reconciliation.missing_columns.join(", ")
        );
    }
    if extra_columns > 0 {
        warn!(
            "Export has {} fields, {} expected; appended {} extra column(s)",
            width,
            canonical.len(),
            extra_columns
        );
    }
    if short_rows > 0 {
        warn!("{} row(s) narrower than {} fields were padded", short_rows, width);
    }

    Ok(Normalized {
        table: RawTable { columns, rows },
        reconciliation,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
