//! Artifact writer: one CSV file per aggregate table.
//!
//! File names and headers form the contract with the dashboard that reloads
//! these files; changing either is a breaking change for that consumer.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::info;
use viewing_core::error::{Result, ViewingError};
use viewing_core::formatting::format_hms;
use viewing_core::time_utils::weekday_name;

use crate::aggregator::Aggregates;

// ── ArtifactKind ──────────────────────────────────────────────────────────────

/// The eight persisted aggregate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    AccessByType,
    AccessByTitle,
    HoursByTitle,
    AccessByMonth,
    AccessByDay,
    AccessByWeekday,
    AccessByHour,
    AccessComparison,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 8] = [
        ArtifactKind::AccessByType,
        ArtifactKind::AccessByTitle,
        ArtifactKind::HoursByTitle,
        ArtifactKind::AccessByMonth,
        ArtifactKind::AccessByDay,
        ArtifactKind::AccessByWeekday,
        ArtifactKind::AccessByHour,
        ArtifactKind::AccessComparison,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::AccessByType => "access_by_type.csv",
            ArtifactKind::AccessByTitle => "access_by_title.csv",
            ArtifactKind::HoursByTitle => "hours_by_title.csv",
            ArtifactKind::AccessByMonth => "access_by_month.csv",
            ArtifactKind::AccessByDay => "access_by_day.csv",
            ArtifactKind::AccessByWeekday => "access_by_weekday.csv",
            ArtifactKind::AccessByHour => "access_by_hour.csv",
            ArtifactKind::AccessComparison => "access_comparison.csv",
        }
    }

    /// Header row as the dashboard reads it: value counts are named `count`,
    /// per-period counts carry the counted `Title` column name.
    pub fn header(&self) -> [&'static str; 2] {
        match self {
            ArtifactKind::AccessByType => ["Type", "count"],
            ArtifactKind::AccessByTitle => ["Title", "count"],
            ArtifactKind::HoursByTitle => ["Title", "Duration"],
            ArtifactKind::AccessByMonth => ["Month", "Title"],
            ArtifactKind::AccessByDay => ["Day", "Title"],
            ArtifactKind::AccessByWeekday => ["Weekday", "count"],
            ArtifactKind::AccessByHour => ["Hour", "Title"],
            ArtifactKind::AccessComparison => ["Year", "Access"],
        }
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// An aggregate table rendered to text cells, ready to serialise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactTable {
    pub kind: ArtifactKind,
    pub rows: Vec<[String; 2]>,
}

fn render<K, V>(
    kind: ArtifactKind,
    rows: &[(K, V)],
    key: impl Fn(&K) -> String,
    value: impl Fn(&V) -> String,
) -> ArtifactTable {
    ArtifactTable {
        kind,
        rows: rows.iter().map(|(k, v)| [key(k), value(v)]).collect(),
    }
}

/// Render all aggregates in [`ArtifactKind::ALL`] order.
pub fn render_tables(aggregates: &Aggregates) -> Vec<ArtifactTable> {
    let count = |c: &u64| c.to_string();
    vec![
        render(
            ArtifactKind::AccessByType,
            &aggregates.access_by_type,
            |t| t.to_string(),
            count,
        ),
        render(
            ArtifactKind::AccessByTitle,
            &aggregates.access_by_title,
            String::clone,
            count,
        ),
        render(
            ArtifactKind::HoursByTitle,
            &aggregates.hours_by_title,
            String::clone,
            |d| format_hms(*d),
        ),
        render(
            ArtifactKind::AccessByMonth,
            &aggregates.access_by_month,
            u32::to_string,
            count,
        ),
        render(
            ArtifactKind::AccessByDay,
            &aggregates.access_by_day,
            u32::to_string,
            count,
        ),
        render(
            ArtifactKind::AccessByWeekday,
            &aggregates.access_by_weekday,
            |d| weekday_name(*d).to_string(),
            count,
        ),
        render(
            ArtifactKind::AccessByHour,
            &aggregates.access_by_hour,
            u32::to_string,
            count,
        ),
        render(
            ArtifactKind::AccessComparison,
            &aggregates.access_comparison,
            i32::to_string,
            count,
        ),
    ]
}

// ── Writing ───────────────────────────────────────────────────────────────────

/// Write every aggregate table under `output_dir`, replacing existing files.
///
/// Creates `output_dir` when missing. Returns the written paths in
/// [`ArtifactKind::ALL`] order.
pub fn write_artifacts(output_dir: &Path, aggregates: &Aggregates) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).map_err(|source| ViewingError::ArtifactWrite {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(ArtifactKind::ALL.len());
    for table in render_tables(aggregates) {
        let path = output_dir.join(table.kind.file_name());
        write_table(&path, &table)?;
        info!("Wrote {} ({} rows)", path.display(), table.rows.len());
        written.push(path);
    }
    Ok(written)
}

/// Serialise one table with its header row and LF line endings.
pub fn write_table(path: &Path, table: &ArtifactTable) -> Result<()> {
    let write_error = |source: std::io::Error| ViewingError::ArtifactWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_error)?;
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);

    wtr.write_record(table.kind.header())?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush().map_err(write_error)?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Weekday};
    use tempfile::TempDir;
    use viewing_core::models::TitleType;

    fn sample() -> Aggregates {
        Aggregates {
            access_by_type: vec![(TitleType::Movie, 2), (TitleType::Series, 1)],
            access_by_title: vec![("A".to_string(), 2), ("Show, Part 2".to_string(), 1)],
            hours_by_title: vec![
                ("A".to_string(), TimeDelta::hours(2)),
                ("Show, Part 2".to_string(), TimeDelta::minutes(30)),
            ],
            access_by_month: vec![(1, 2), (2, 1)],
            access_by_day: vec![(5, 2), (10, 1)],
            access_by_weekday: vec![(Weekday::Thu, 1), (Weekday::Fri, 1), (Weekday::Sat, 1)],
            access_by_hour: vec![(10, 2), (20, 1)],
            access_comparison: vec![(2023, 1), (2024, 2)],
        }
    }

    fn read(dir: &Path, kind: ArtifactKind) -> String {
        std::fs::read_to_string(dir.join(kind.file_name())).unwrap()
    }

    #[test]
    fn test_write_artifacts_creates_all_files() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("processed");
        let written = write_artifacts(&out, &sample()).unwrap();

        assert_eq!(written.len(), 8);
        for kind in ArtifactKind::ALL {
            assert!(out.join(kind.file_name()).is_file(), "{:?}", kind);
        }
    }

    #[test]
    fn test_artifact_contents() {
        let dir = TempDir::new().unwrap();
        write_artifacts(dir.path(), &sample()).unwrap();

        assert_eq!(
            read(dir.path(), ArtifactKind::AccessByType),
            "Type,count\nMovie,2\nSeries,1\n"
        );
        assert_eq!(
            read(dir.path(), ArtifactKind::HoursByTitle),
            "Title,Duration\nA,02:00:00\n\"Show, Part 2\",00:30:00\n"
        );
        assert_eq!(
            read(dir.path(), ArtifactKind::AccessByWeekday),
            "Weekday,count\nThursday,1\nFriday,1\nSaturday,1\n"
        );
        assert_eq!(
            read(dir.path(), ArtifactKind::AccessComparison),
            "Year,Access\n2023,1\n2024,2\n"
        );
    }

    #[test]
    fn test_empty_aggregates_write_header_only() {
        let dir = TempDir::new().unwrap();
        write_artifacts(dir.path(), &Aggregates::default()).unwrap();
        assert_eq!(read(dir.path(), ArtifactKind::AccessByMonth), "Month,Title\n");
        assert_eq!(read(dir.path(), ArtifactKind::AccessComparison), "Year,Access\n");
    }

    #[test]
    fn test_existing_artifact_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(ArtifactKind::AccessByHour.file_name());
        std::fs::write(&path, "stale content that is longer than the new file\n").unwrap();

        write_artifacts(dir.path(), &sample()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Hour,Title\n10,2\n20,1\n"
        );
    }

    #[test]
    fn test_headers_match_dashboard_columns() {
        let headers: Vec<[&str; 2]> = ArtifactKind::ALL.iter().map(|k| k.header()).collect();
        assert_eq!(
            headers,
            vec![
                ["Type", "count"],
                ["Title", "count"],
                ["Title", "Duration"],
                ["Month", "Title"],
                ["Day", "Title"],
                ["Weekday", "count"],
                ["Hour", "Title"],
                ["Year", "Access"],
            ]
        );
    }

    #[test]
    fn test_per_period_tables_use_title_value_column() {
        let dir = TempDir::new().unwrap();
        write_artifacts(dir.path(), &sample()).unwrap();
        assert_eq!(read(dir.path(), ArtifactKind::AccessByMonth), "Month,Title\n1,2\n2,1\n");
        assert_eq!(read(dir.path(), ArtifactKind::AccessByDay), "Day,Title\n5,2\n10,1\n");
        assert_eq!(
            read(dir.path(), ArtifactKind::AccessByTitle),
            "Title,count\nA,2\n\"Show, Part 2\",1\n"
        );
    }

    #[test]
    fn test_render_tables_order_matches_all() {
        let kinds: Vec<ArtifactKind> = render_tables(&sample()).iter().map(|t| t.kind).collect();
        assert_eq!(kinds, ArtifactKind::ALL.to_vec());
    }
}
