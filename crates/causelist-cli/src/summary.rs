//! Run counters and the end-of-run report.

use std::fmt;
use std::path::PathBuf;

/// Counters for one court.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourtStats {
    /// 1 when the cause list was found.
    pub documents: usize,
    pub discovered: usize,
    pub fetched: usize,
    pub failed: usize,
    pub included: usize,
}

/// Totals across a run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub courts: usize,
    pub documents: usize,
    pub discovered: usize,
    pub fetched: usize,
    pub failed: usize,
    pub included: usize,
    pub master_rows: usize,
    pub merged: usize,
    pub master: Option<PathBuf>,
    pub elapsed_secs: f64,
}

impl RunSummary {
    pub fn add(&mut self, court: &CourtStats) {
        self.documents += court.documents;
        self.discovered += court.discovered;
        self.fetched += court.fetched;
        self.failed += court.failed;
        self.included += court.included;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Courts          {} ({} with cause lists)", self.courts, self.documents)?;
        writeln!(f, "  Cases found     {}", self.discovered)?;
        writeln!(f, "  Fetched         {} ({} failed)", self.fetched, self.failed)?;
        writeln!(f, "  Included        {}", self.included)?;
        match &self.master {
            Some(path) => writeln!(
                f,
                "  Master table    {} rows, {} item numbers from listings -> {}",
                self.master_rows,
                self.merged,
                path.display()
            )?,
            None => writeln!(f, "  Master table    not written (no rows)")?,
        }
        write!(f, "  Elapsed         {:.1}s", self.elapsed_secs)
    }
}
