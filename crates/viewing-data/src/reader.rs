//! Raw export discovery and loading.
//!
//! Locates the viewing activity and clickstream exports under the input
//! directory and reads them into plain text cells for the normaliser.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, DataType, Reader};
use tracing::{debug, warn};
use viewing_core::error::{Result, ViewingError};

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Resolve `file_name` inside `input_dir`.
///
/// The direct child path wins. Otherwise the directory is searched
/// recursively, since service exports usually unpack into nested folders.
/// Fails with [`ViewingError::InputNotFound`] naming the expected path.
pub fn resolve_input(input_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let direct = input_dir.join(file_name);
    if direct.is_file() {
        return Ok(direct);
    }

    match find_named_file(input_dir, file_name) {
        Some(found) => {
            debug!("Resolved {} to {}", file_name, found.display());
            Ok(found)
        }
        None => Err(ViewingError::InputNotFound(direct)),
    }
}

/// Find the first file called `file_name` under `root`, in path order.
pub fn find_named_file(root: &Path, file_name: &str) -> Option<PathBuf> {
    if !root.exists() {
        warn!("Input path does not exist: {}", root.display());
        return None;
    }

    let mut matches: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
        .map(|entry| entry.into_path())
        .collect();

    matches.sort();
    matches.into_iter().next()
}

// ── Viewing activity ──────────────────────────────────────────────────────────

/// Read the first column of the viewing activity export, one cell per data row.
///
/// The header row is skipped. Blank cells come back as `None`. Spreadsheets
/// (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`) are read from their first worksheet;
/// `csv` / `txt` files contribute each physical line as the cell text.
pub fn read_viewing_cells(path: &Path) -> Result<Vec<Option<String>>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let cells = match extension.as_str() {
        "csv" | "txt" => read_text_cells(path)?,
        _ => read_workbook_cells(path)?,
    };

    debug!("Read {} viewing rows from {}", cells.len(), path.display());
    Ok(cells)
}

fn read_workbook_cells(path: &Path) -> Result<Vec<Option<String>>> {
    let workbook_error = |message: String| ViewingError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| workbook_error("workbook has no worksheets".to_string()))?
        .map_err(|e| workbook_error(e.to_string()))?;

    let cells = range
        .rows()
        .skip(1)
        .map(|row| match row.first() {
            None | Some(DataType::Empty) => None,
            Some(DataType::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        })
        .collect();

    Ok(cells)
}

fn read_text_cells(path: &Path) -> Result<Vec<Option<String>>> {
    let content = std::fs::read_to_string(path).map_err(|source| ViewingError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let cells = content
        .lines()
        .skip(1)
        .map(|line| {
            if line.trim().is_empty() {
                None
            } else {
                Some(line.to_string())
            }
        })
        .collect();

    Ok(cells)
}

// ── Clickstream ───────────────────────────────────────────────────────────────

/// Count the data records of the clickstream export.
///
/// Records may have differing lengths; only structural CSV errors fail.
pub fn count_clickstream_records(path: &Path) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let mut count = 0usize;
    for record in reader.byte_records() {
        record?;
        count += 1;
    }

    debug!("Clickstream {}: {} records", path.display(), count);
    Ok(count)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
