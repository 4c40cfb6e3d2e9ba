//! The ETL pipeline: normalise → coerce/filter → derive → aggregate → write.
//!
//! [`process_cells`] runs the in-memory stages and is what tests drive;
//! [`run_pipeline`] wraps it with input discovery and artifact output.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, info};
use viewing_core::error::{Result, ViewingError};
use viewing_core::formatting::format_hms;
use viewing_core::models::{ViewingRecord, CANONICAL_COLUMNS};
use viewing_core::settings::Settings;
use viewing_core::time_utils::parse_timezone;

use crate::aggregator::{Aggregates, ViewingAggregator, WatchTotals};
use crate::cleaner::{coerce_and_filter, derive_records, DeriveOptions, FilterReport};
use crate::normalizer::{normalize, SchemaReconciliation};
use crate::reader::{count_clickstream_records, read_viewing_cells, resolve_input};
use crate::writer::write_artifacts;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Resolved inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub viewing_file: String,
    pub clickstream_file: String,
    pub season_marker: String,
    pub timezone: Tz,
}

impl TryFrom<&Settings> for PipelineConfig {
    type Error = ViewingError;

    fn try_from(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let timezone = parse_timezone(&settings.timezone)
            .ok_or_else(|| ViewingError::Config(format!("unknown timezone {}", settings.timezone)))?;

        Ok(Self {
            input_dir: settings.input_dir.clone(),
            output_dir: settings.output_dir.clone(),
            viewing_file: settings.viewing_file.clone(),
            clickstream_file: settings.clickstream_file.clone(),
            season_marker: settings.season_marker.clone(),
            timezone,
        })
    }
}

// ── In-memory stages ──────────────────────────────────────────────────────────

/// Output of the in-memory stages.
#[derive(Debug, Clone)]
pub struct ProcessedViewing {
    pub reconciliation: SchemaReconciliation,
    pub filter: FilterReport,
    pub records: Vec<ViewingRecord>,
    pub aggregates: Aggregates,
    pub totals: WatchTotals,
}

/// Run normalise → coerce/filter → derive → aggregate over raw export cells.
///
/// `source` only labels the export in errors.
pub fn process_cells(
    cells: &[Option<String>],
    source: &Path,
    options: &DeriveOptions,
) -> Result<ProcessedViewing> {
    let normalized = normalize(cells, &CANONICAL_COLUMNS, source)?;
    let (rows, filter) = coerce_and_filter(&normalized.table);
    let records = derive_records(rows, options);
    let aggregates = ViewingAggregator::aggregate_all(&records);
    let totals = ViewingAggregator::totals(&records);

    debug!(
        "Processed {} cells into {} records, {} titles",
        cells.len(),
        records.len(),
        totals.unique_titles
    );

    Ok(ProcessedViewing {
        reconciliation: normalized.reconciliation,
        filter,
        records,
        aggregates,
        totals,
    })
}

// ── RunSummary ────────────────────────────────────────────────────────────────

/// What one run read, kept, computed and wrote.
///
/// Holds no wall-clock values, so identical inputs give identical summaries.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub viewing_file: PathBuf,
    pub clickstream_file: PathBuf,
    pub clickstream_records: usize,
    pub schema: SchemaReconciliation,
    pub filter: FilterReport,
    /// `HH:MM:SS`.
    pub total_watch_time: String,
    /// `HH:MM:SS`; `None` when no record survived.
    pub average_watch_time: Option<String>,
    pub unique_titles: usize,
    pub current_year: Option<i32>,
    pub artifacts: Vec<PathBuf>,
}

impl RunSummary {
    /// Number of schema reconciliation warnings raised by the normaliser.
    pub fn schema_warnings(&self) -> usize {
        self.schema.warning_count()
    }

    /// Persist the summary as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json).map_err(|source| ViewingError::ArtifactWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline once.
///
/// 1. Resolve both raw exports (either missing is fatal).
/// 2. Count clickstream records.
/// 3. Read the viewing export and run [`process_cells`].
/// 4. Write the eight artifacts, replacing previous ones.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunSummary> {
    let viewing_path = resolve_input(&config.input_dir, &config.viewing_file)?;
    let clickstream_path = resolve_input(&config.input_dir, &config.clickstream_file)?;

    let clickstream_records = count_clickstream_records(&clickstream_path)?;

    let cells = read_viewing_cells(&viewing_path)?;
    let options = DeriveOptions {
        season_marker: config.season_marker.clone(),
        timezone: config.timezone,
    };
    let processed = process_cells(&cells, &viewing_path, &options)?;

    let artifacts = write_artifacts(&config.output_dir, &processed.aggregates)?;
    info!(
        "Wrote {} artifacts to {}",
        artifacts.len(),
        config.output_dir.display()
    );

    Ok(RunSummary {
        viewing_file: viewing_path,
        clickstream_file: clickstream_path,
        clickstream_records,
        schema: processed.reconciliation,
        filter: processed.filter,
        total_watch_time: format_hms(processed.totals.total_duration),
        average_watch_time: processed.totals.average_duration.map(format_hms),
        unique_titles: processed.totals.unique_titles,
        current_year: processed.totals.max_year,
        artifacts,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
