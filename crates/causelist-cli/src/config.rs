//! Command-line arguments and the pipeline configuration derived from them.
//!
//! Every argument has a default matching the working-directory layout, so a
//! bare `causelist` runs the full pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use causelist_fetch::DEFAULT_BASE_URL;
use clap::Parser;

/// Tables searched when backfilling master-table item numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MergeSource {
    /// Tables extracted from the cause lists (`convert/court<N>.csv`)
    Listing,
    /// Per-court respondent diagnostics (`csv_files/<N>.csv`)
    Diagnostics,
}

#[derive(Parser, Debug)]
#[command(name = "causelist", version, about = "Pull Hyderabad revenue-officer writs out of daily cause lists")]
pub struct Args {
    /// File listing court numbers, one per line.
    #[arg(long, env = "CAUSELIST_COURTS", default_value = "court_numbers.txt")]
    pub courts: PathBuf,

    /// Directory holding `court<N>.html` cause lists.
    #[arg(long, env = "CAUSELIST_HTML_DIR", default_value = "html")]
    pub html_dir: PathBuf,

    /// Directory for tables extracted from the cause lists.
    #[arg(long, env = "CAUSELIST_LISTING_DIR", default_value = "convert")]
    pub listing_dir: PathBuf,

    /// Directory for per-court respondent diagnostics.
    #[arg(long, env = "CAUSELIST_DIAGNOSTICS_DIR", default_value = "csv_files")]
    pub diagnostics_dir: PathBuf,

    /// Directory for per-court output tables.
    #[arg(long, env = "CAUSELIST_OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Combined output table.
    #[arg(long, env = "CAUSELIST_MASTER", default_value = "case_details.csv")]
    pub master: PathBuf,

    /// Case-details endpoint, up to and including `casedet=`.
    #[arg(long, env = "CAUSELIST_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "CAUSELIST_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Courts processed concurrently.
    #[arg(long, env = "CAUSELIST_WORKERS", default_value_t = 8)]
    pub workers: usize,

    /// Case fetches in flight per court.
    #[arg(long, env = "CAUSELIST_FETCH_CONCURRENCY", default_value_t = 1)]
    pub fetch_concurrency: usize,

    /// District whose cases are kept.
    #[arg(long, env = "CAUSELIST_DISTRICT", default_value = "hyderabad")]
    pub district: String,

    /// Tables used to backfill item numbers.
    #[arg(long, env = "CAUSELIST_MERGE_SOURCE", value_enum, default_value_t = MergeSource::Listing)]
    pub merge_source: MergeSource,

    /// Log file, appended to. `-` logs to stderr.
    #[arg(long, env = "CAUSELIST_LOG_FILE", default_value = "app.log")]
    pub log_file: PathBuf,
}

/// Paths and limits for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub html_dir: PathBuf,
    pub listing_dir: PathBuf,
    pub diagnostics_dir: PathBuf,
    pub output_dir: PathBuf,
    pub master: PathBuf,
    pub base_url: String,
    pub timeout: Duration,
    pub workers: usize,
    pub fetch_concurrency: usize,
    pub district: String,
    pub merge_source: MergeSource,
}

impl From<&Args> for PipelineConfig {
    fn from(args: &Args) -> Self {
        Self {
            html_dir: args.html_dir.clone(),
            listing_dir: args.listing_dir.clone(),
            diagnostics_dir: args.diagnostics_dir.clone(),
            output_dir: args.output_dir.clone(),
            master: args.master.clone(),
            base_url: args.base_url.clone(),
            timeout: Duration::from_secs(args.timeout_secs),
            workers: args.workers.max(1),
            fetch_concurrency: args.fetch_concurrency.max(1),
            district: args.district.clone(),
            merge_source: args.merge_source,
        }
    }
}

impl PipelineConfig {
    /// Default layout rooted at `root`.
    #[cfg(test)]
    pub fn rooted(root: &Path) -> Self {
        let args = Args::parse_from(["causelist"]);
        let mut cfg = Self::from(&args);
        for dir in [
            &mut cfg.html_dir,
            &mut cfg.listing_dir,
            &mut cfg.diagnostics_dir,
            &mut cfg.output_dir,
            &mut cfg.master,
        ] {
            *dir = root.join(&*dir);
        }
        cfg
    }

    pub fn court_document(&self, court_no: u32) -> PathBuf {
        self.html_dir.join(format!("court{court_no}.html"))
    }

    pub fn listing_path(&self, court_no: u32) -> PathBuf {
        self.listing_dir.join(format!("court{court_no}.csv"))
    }

    pub fn diagnostic_path(&self, court_no: u32) -> PathBuf {
        self.diagnostics_dir.join(format!("{court_no}.csv"))
    }

    pub fn court_table_path(&self, court_no: u32) -> PathBuf {
        self.output_dir.join(format!("court{court_no}.csv"))
    }
}

/// Court numbers from `text`: one per line, non-numeric and zero lines skipped.
pub fn parse_court_numbers(text: &str) -> Vec<u32> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && l.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|l| l.parse().ok())
        .filter(|&n| n > 0)
        .collect()
}

/// Read the court list. Failure here aborts the run.
pub fn load_court_numbers(path: &Path) -> anyhow::Result<Vec<u32>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading court list {}", path.display()))?;
    Ok(parse_court_numbers(&text))
}
