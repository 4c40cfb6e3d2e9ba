use clap::Parser;
use std::path::PathBuf;

use crate::error::{Result, ViewingError};
use crate::models::DEFAULT_SEASON_MARKER;
use crate::time_utils::parse_timezone;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Summarise a streaming-service viewing history export into aggregate tables
#[derive(Parser, Debug, Clone)]
#[command(
    name = "viewing-stats",
    about = "Summarise a streaming-service viewing history export into aggregate tables",
    version
)]
pub struct Settings {
    /// Directory holding the raw exports
    #[arg(long, env = "VIEWING_STATS_INPUT_DIR", default_value = "data/raw")]
    pub input_dir: PathBuf,

    /// Directory the aggregate artifacts are written to
    #[arg(long, env = "VIEWING_STATS_OUTPUT_DIR", default_value = "data/processed")]
    pub output_dir: PathBuf,

    /// Viewing activity export file name (xlsx, xls, ods or csv)
    #[arg(long, default_value = "ViewingActivity.xlsx")]
    pub viewing_file: String,

    /// Clickstream export file name
    #[arg(long, default_value = "Clickstream.csv")]
    pub clickstream_file: String,

    /// Title substring that marks series content
    #[arg(long, env = "VIEWING_STATS_SEASON_MARKER", default_value = DEFAULT_SEASON_MARKER)]
    pub season_marker: String,

    /// Timezone in which calendar fields are derived
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    /// Also write the run summary as JSON to this path
    #[arg(long)]
    pub summary_json: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Reject values clap cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.season_marker.is_empty() {
            return Err(ViewingError::Config(
                "season marker must not be empty".to_string(),
            ));
        }
        if parse_timezone(&self.timezone).is_none() {
            return Err(ViewingError::Config(format!(
                "unknown timezone {}",
                self.timezone
            )));
        }
        Ok(())
    }
}
