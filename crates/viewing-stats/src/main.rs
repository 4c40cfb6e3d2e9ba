mod bootstrap;
mod report;

use anyhow::{Context, Result};
use viewing_core::settings::Settings;
use viewing_data::pipeline::{run_pipeline, PipelineConfig, RunSummary};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("viewing-stats v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, Output: {}, Season marker: {:?}, Timezone: {}",
        settings.input_dir.display(),
        settings.output_dir.display(),
        settings.season_marker,
        settings.timezone
    );

    let summary = run(&settings)?;
    print!("{}", report::render_summary(&summary));

    Ok(())
}

/// Run the pipeline once for `settings` and persist the optional JSON summary.
fn run(settings: &Settings) -> Result<RunSummary> {
    let config = PipelineConfig::try_from(settings)?;

    let summary = run_pipeline(&config).with_context(|| {
        format!(
            "processing viewing history from {}",
            config.input_dir.display()
        )
    })?;

    if summary.schema_warnings() > 0 {
        tracing::warn!(
            "{} schema reconciliation warning(s); check the export format",
            summary.schema_warnings()
        );
    }

    if let Some(path) = &settings.summary_json {
        summary
            .write_json(path)
            .with_context(|| format!("writing run summary to {}", path.display()))?;
    }

    Ok(summary)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings_for(input: &TempDir, output: &TempDir, extra: &[&str]) -> Settings {
        let mut args = vec![
            "viewing-stats".to_string(),
            "--input-dir".to_string(),
            input.path().display().to_string(),
            "--output-dir".to_string(),
            output.path().display().to_string(),
            "--viewing-file".to_string(),
            "ViewingActivity.csv".to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Settings::load_from_args(args)
    }

    fn write_inputs(dir: &TempDir) {
        std::fs::write(
            dir.path().join("ViewingActivity.csv"),
            "Profile Name,Start Time,Duration,Attributes,Title,Supplemental Video Type,Device Type,Bookmark,Latest Bookmark,Country\n\
             Ana,2024-01-05 10:00:00,1:00:00,,Série: Temporada 1: Episódio 1,,TV,,,BR\n\
             Ana,2024-01-06 10:00:00,1:30:00,,Filme,,TV,,,BR\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("Clickstream.csv"), "Profile Name\nAna\n").unwrap();
    }

    #[test]
    fn test_run_writes_artifacts_and_summary_json() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_inputs(&input);
        let json_path = output.path().join("summary.json");
        let json_arg = json_path.display().to_string();

        let settings = settings_for(
            &input,
            &output,
            &["--season-marker", "Temporada", "--summary-json", &json_arg],
        );
        let summary = run(&settings).unwrap();

        assert_eq!(summary.filter.rows_retained, 2);
        assert_eq!(summary.total_watch_time, "02:30:00");
        assert!(json_path.is_file());
        assert_eq!(
            std::fs::read_to_string(output.path().join("access_by_type.csv")).unwrap(),
            "Type,count\nMovie,1\nSeries,1\n"
        );
    }

    #[test]
    fn test_run_missing_input_names_path() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();

        let settings = settings_for(&input, &output, &[]);
        let err = run(&settings).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("ViewingActivity.csv"), "{chain}");
    }

    #[test]
    fn test_run_rejects_bad_timezone() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_inputs(&input);

        let settings = settings_for(&input, &output, &["--timezone", "Atlantis/Capital"]);
        let err = run(&settings).unwrap_err();
        assert!(err.to_string().contains("Atlantis/Capital"));
    }
}
