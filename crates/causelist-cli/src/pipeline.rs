//! Fetch–classify–aggregate pipeline: per-court processing, the bounded
//! court worker pool, and the master-table merge after all courts finish.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use arrow::record_batch::RecordBatch;
use causelist_classify::RespondentClassifier;
use causelist_core::schema::tables;
use causelist_core::{CourtRecord, extract_case_numbers};
use causelist_fetch::{CaseSource, FetchError};
use causelist_store::{
    ReferenceTable, combine_court_tables, court_records_batch, diagnostic_batch, extract_listing,
    listing_batch, merge_item_numbers, read_csv, write_csv,
};
use futures::{FutureExt, StreamExt};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::{MergeSource, PipelineConfig};
use crate::summary::{CourtStats, RunSummary};

/// Result of processing one court.
#[derive(Debug)]
pub struct CourtOutcome {
    /// Court table written for this court; `None` when the cause list was missing.
    pub table: Option<PathBuf>,
    pub stats: CourtStats,
}

/// Process one court: read its cause list, fetch and classify every case
/// found in it, and write its output, diagnostic, and listing tables.
pub async fn process_court(
    court_no: u32,
    cfg: &PipelineConfig,
    source: &dyn CaseSource,
    classifier: &RespondentClassifier,
) -> anyhow::Result<CourtOutcome> {
    let doc_path = cfg.court_document(court_no);
    let mut stats = CourtStats::default();

    let html = match tokio::fs::read(&doc_path).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %doc_path.display(), "cause list missing, skipping court");
            return Ok(CourtOutcome {
                table: None,
                stats,
            });
        }
        Err(e) => {
            return Err(e).with_context(|| format!("reading {}", doc_path.display()));
        }
    };
    stats.documents = 1;

    write_listing(court_no, cfg, &html);

    let cases = extract_case_numbers(&html);
    stats.discovered = cases.len();
    info!(cases = cases.len(), "case numbers found");

    // Cases may complete out of order; outcomes are put back in discovery
    // order before indices are assigned. A panic while fetching or
    // classifying one case is caught here and costs only that case.
    let mut outcomes: Vec<_> = futures::stream::iter(cases.iter().cloned().enumerate())
        .map(|(i, case_no)| async move {
            let work = async {
                let record = source.fetch(&case_no).await?;
                Ok::<_, FetchError>(classifier.classify(&case_no, court_no, &record))
            };
            (i, AssertUnwindSafe(work).catch_unwind().await)
        })
        .buffer_unordered(cfg.fetch_concurrency)
        .collect()
        .await;
    outcomes.sort_by_key(|(i, _)| *i);

    let mut records = Vec::new();
    let mut diagnostics = Vec::new();
    for (i, outcome) in outcomes {
        let case_no = &cases[i];
        let item_no = i as u32 + 1;
        let classified = match outcome {
            Ok(Ok(classified)) => classified,
            Ok(Err(e)) => {
                stats.failed += 1;
                error!(case = %case_no, timeout = e.is_timeout(), error = %e, "fetch failed");
                continue;
            }
            Err(payload) => {
                stats.failed += 1;
                error!(
                    case = %case_no,
                    panic = panic_message(&*payload),
                    "case processing panicked"
                );
                continue;
            }
        };
        stats.fetched += 1;

        diagnostics.push(classified.diagnostic);
        if let Some(result) = classified.result {
            let sl_no = records.len() as u32 + 1;
            debug!(case = %case_no, sl_no, item_no, "case included");
            records.push(CourtRecord::new(
                sl_no,
                court_no,
                item_no,
                case_no.clone(),
                result,
            ));
        }
    }
    stats.included = records.len();

    let table = cfg.court_table_path(court_no);
    write_csv(&table, &court_records_batch(&records)?)
        .with_context(|| format!("writing {}", table.display()))?;
    let diag_path = cfg.diagnostic_path(court_no);
    write_csv(&diag_path, &diagnostic_batch(&diagnostics)?)
        .with_context(|| format!("writing {}", diag_path.display()))?;

    info!(
        discovered = stats.discovered,
        fetched = stats.fetched,
        failed = stats.failed,
        included = stats.included,
        "court done"
    );
    Ok(CourtOutcome {
        table: Some(table),
        stats,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Extract and persist the cause-list table. Failures only cost the merge
/// its reference rows for this court.
fn write_listing(court_no: u32, cfg: &PipelineConfig, html: &str) {
    let Some(rows) = extract_listing(html) else {
        warn!("no table in cause list");
        return;
    };
    let path = cfg.listing_path(court_no);
    match listing_batch(&rows).and_then(|batch| write_csv(&path, &batch)) {
        Ok(()) => debug!(path = %path.display(), rows = rows.len(), "listing written"),
        Err(e) => error!(path = %path.display(), error = %e, "failed to write listing"),
    }
}

/// Run every court on a pool of `cfg.workers` tasks, then combine and merge.
///
/// Never fails: court-level errors and panics are logged and the court is
/// left out of the master table.
pub async fn run(
    cfg: Arc<PipelineConfig>,
    courts: &[u32],
    source: Arc<dyn CaseSource>,
) -> RunSummary {
    let start = Instant::now();
    let classifier = Arc::new(RespondentClassifier::new(&cfg.district));
    let mut summary = RunSummary {
        courts: courts.len(),
        ..RunSummary::default()
    };
    info!(courts = courts.len(), workers = cfg.workers, "starting run");

    let mut completed = futures::stream::iter(courts.iter().copied())
        .map(|court_no| {
            let cfg = Arc::clone(&cfg);
            let source = Arc::clone(&source);
            let classifier = Arc::clone(&classifier);
            let span = info_span!("court", court = court_no);
            let handle = tokio::spawn(
                async move { process_court(court_no, &cfg, source.as_ref(), &classifier).await }
                    .instrument(span),
            );
            async move { (court_no, handle.await) }
        })
        .buffer_unordered(cfg.workers);

    // Completion order decides master-table order.
    let mut tables = Vec::new();
    while let Some((court_no, joined)) = completed.next().await {
        match joined {
            Ok(Ok(outcome)) => {
                summary.add(&outcome.stats);
                if let Some(path) = outcome.table {
                    tables.push(path);
                }
            }
            Ok(Err(e)) => error!(court = court_no, error = %format!("{e:#}"), "court failed"),
            Err(e) => error!(court = court_no, error = %e, "court worker panicked"),
        }
    }

    match finalize(&cfg, courts, &tables) {
        Ok(Some((rows, merged))) => {
            summary.master_rows = rows;
            summary.merged = merged;
            summary.master = Some(cfg.master.clone());
        }
        Ok(None) => warn!("no valid court tables to combine"),
        Err(e) => error!(error = %format!("{e:#}"), "failed to build master table"),
    }

    summary.elapsed_secs = start.elapsed().as_secs_f64();
    info!(
        master_rows = summary.master_rows,
        merged = summary.merged,
        elapsed_secs = summary.elapsed_secs,
        "run complete"
    );
    summary
}

/// Build the master table and write it once, after the item-number merge.
///
/// Returns `None` when no court produced a row, in which case nothing is
/// written.
fn finalize(
    cfg: &PipelineConfig,
    courts: &[u32],
    court_tables: &[PathBuf],
) -> anyhow::Result<Option<(usize, usize)>> {
    let Some((master, matched)) = build_master(cfg, courts, court_tables)? else {
        return Ok(None);
    };
    write_csv(&cfg.master, &master)
        .with_context(|| format!("writing {}", cfg.master.display()))?;
    info!(
        path = %cfg.master.display(),
        rows = master.num_rows(),
        matched,
        "master table written"
    );
    Ok(Some((master.num_rows(), matched)))
}

/// Combine non-empty court tables and backfill item numbers from the
/// reference tables. Returns the merged batch and the number of matched rows.
fn build_master(
    cfg: &PipelineConfig,
    courts: &[u32],
    court_tables: &[PathBuf],
) -> anyhow::Result<Option<(RecordBatch, usize)>> {
    let present: Vec<&PathBuf> = court_tables
        .iter()
        .filter(|p| std::fs::metadata(p).is_ok_and(|m| m.len() > 0))
        .collect();
    if present.is_empty() {
        return Ok(None);
    }

    let combined = combine_court_tables(&present).context("combining court tables")?;
    if combined.num_rows() == 0 {
        return Ok(None);
    }
    let references = load_references(cfg, courts);
    let merged = merge_item_numbers(&combined, &references)?;
    Ok(Some(merged))
}

/// Reference tables for the configured courts, in configuration order,
/// from the configured merge source. Missing or unreadable tables are skipped.
fn load_references(cfg: &PipelineConfig, courts: &[u32]) -> Vec<ReferenceTable> {
    let schema = Arc::new(match cfg.merge_source {
        MergeSource::Listing => tables::listing_schema(),
        MergeSource::Diagnostics => tables::diagnostic_schema(),
    });
    courts
        .iter()
        .filter_map(|&court_no| {
            let path = match cfg.merge_source {
                MergeSource::Listing => cfg.listing_path(court_no),
                MergeSource::Diagnostics => cfg.diagnostic_path(court_no),
            };
            if !path.exists() {
                debug!(path = %path.display(), "no reference table for court");
                return None;
            }
            let source = path.display().to_string();
            let table = read_csv(&path, schema.clone()).and_then(|batches| match cfg.merge_source {
                MergeSource::Listing => ReferenceTable::from_listing_batches(source, &batches),
                MergeSource::Diagnostics => {
                    ReferenceTable::from_diagnostic_batches(source, &batches)
                }
            });
            match table {
                Ok(table) => Some(table),
                Err(e) => {
                    error!(path = %path.display(), error = %e, "failed to read reference table");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::path::Path;
    use std::time::Duration;

    use arrow::array::{Array, StringArray, UInt32Array};
    use async_trait::async_trait;
    use causelist_core::{CaseIdentifier, CaseRecord};
    use causelist_fetch::CaseClient;

    use super::*;
    use crate::config::PipelineConfig;

    /// In-memory case service keyed by case number. Unknown cases fail with a
    /// 404.
    #[derive(Default)]
    struct FakeService {
        bodies: HashMap<String, String>,
        panic_on: Option<String>,
    }

    impl FakeService {
        fn with(mut self, case_no: &str, body: String) -> Self {
            self.bodies.insert(case_no.to_string(), body);
            self
        }
    }

    #[async_trait]
    impl CaseSource for FakeService {
        async fn fetch(&self, case_no: &CaseIdentifier) -> Result<CaseRecord, FetchError> {
            if self.panic_on.as_deref() == Some(case_no.as_str()) {
                panic!("service fault for {case_no}");
            }
            match self.bodies.get(case_no.as_str()) {
                Some(body) => Ok(CaseRecord::from_json(body)?),
                None => Err(FetchError::Server {
                    status: 404,
                    body: String::new(),
                }),
            }
        }
    }

    /// Routes one case to a real client and everything else to a fake.
    struct Routed {
        slow_case: String,
        slow: CaseClient,
        rest: FakeService,
    }

    #[async_trait]
    impl CaseSource for Routed {
        async fn fetch(&self, case_no: &CaseIdentifier) -> Result<CaseRecord, FetchError> {
            if case_no.as_str() == self.slow_case {
                self.slow.fetch(case_no).await
            } else {
                self.rest.fetch(case_no).await
            }
        }
    }

    fn body(district: &str, respondents: &[(&str, &str)]) -> String {
        let res: Vec<String> = respondents
            .iter()
            .map(|(n, a)| format!(r#"{{"rname":"{n}","address":"{a}"}}"#))
            .collect();
        format!(
            r#"[{{"district":"{district}","prayer":"mandamus","orderdetails":[{{"judgename":"JUSTICE X"}}],
                "respondentadv":"GP","petdetails":[{{"pname":"P"}}],"resdetails":[{}]}}]"#,
            res.join(",")
        )
    }

    fn tahsildar() -> String {
        body("Hyderabad", &[("The Tahsildar", "Charminar, Hyderabad")])
    }

    fn write_doc(cfg: &PipelineConfig, court_no: u32, rows: &[(&str, &str)]) {
        let cells: String = rows
            .iter()
            .map(|(i, c)| format!("<tr><td>{i}</td><td>{c}</td></tr>\n"))
            .collect();
        let html = format!("<html><table><tr><th>No</th><th>Case</th></tr>\n{cells}</table></html>");
        std::fs::create_dir_all(&cfg.html_dir).unwrap();
        std::fs::write(cfg.court_document(court_no), html).unwrap();
    }

    fn read_table(path: &Path) -> RecordBatch {
        combine_court_tables(&[path]).unwrap()
    }

    fn strings(batch: &RecordBatch, name: &str) -> Vec<String> {
        let arr = batch
            .column_by_name(name)
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        (0..arr.len()).map(|i| arr.value(i).to_string()).collect()
    }

    fn numbers(batch: &RecordBatch, name: &str) -> Vec<u32> {
        let arr = batch
            .column_by_name(name)
            .unwrap()
            .as_any()
            .downcast_ref::<UInt32Array>()
            .unwrap();
        arr.values().to_vec()
    }

    #[tokio::test]
    async fn court_assigns_indices_in_discovery_order() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = PipelineConfig::rooted(tmp.path());
        write_doc(
            &cfg,
            5,
            &[
                ("1", "WP/10/2024"),
                ("2", "WP/20/2024"),
                ("3", "WP/30/2024"),
                ("4", "WP/10/2024"),
            ],
        );
        let source = FakeService::default()
            .with("WP/10/2024", tahsildar())
            .with("WP/20/2024", body("Medchal", &[("The Tahsildar", "Charminar")]))
            .with("WP/30/2024", tahsildar());

        let outcome = process_court(5, &cfg, &source, &RespondentClassifier::default())
            .await
            .unwrap();
        assert_eq!(outcome.stats.discovered, 3);
        assert_eq!(outcome.stats.fetched, 3);
        assert_eq!(outcome.stats.included, 2);

        let table = read_table(&outcome.table.unwrap());
        assert_eq!(strings(&table, tables::CASE_NO), vec!["WP/10/2024", "WP/30/2024"]);
        assert_eq!(numbers(&table, tables::SL_NO), vec![1, 2]);
        assert_eq!(numbers(&table, tables::ITEM_NO), vec![1, 3]);
        assert_eq!(numbers(&table, tables::COURT_NO), vec![5, 5]);
        assert_eq!(strings(&table, tables::RESPONDENT), vec!["Tahsildar Charminar"; 2]);
    }

    #[tokio::test]
    async fn concurrent_fetches_keep_discovery_order() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut cfg = PipelineConfig::rooted(tmp.path());
        cfg.fetch_concurrency = 4;
        let cases: Vec<String> = (1..=6).map(|n| format!("WP/{n}/2024")).collect();
        let rows: Vec<(String, String)> =
            cases.iter().enumerate().map(|(i, c)| ((i + 1).to_string(), c.clone())).collect();
        let rows: Vec<(&str, &str)> = rows.iter().map(|(i, c)| (i.as_str(), c.as_str())).collect();
        write_doc(&cfg, 2, &rows);
        let source = cases
            .iter()
            .fold(FakeService::default(), |s, c| s.with(c, tahsildar()));

        let outcome = process_court(2, &cfg, &source, &RespondentClassifier::default())
            .await
            .unwrap();
        let table = read_table(&outcome.table.unwrap());
        assert_eq!(strings(&table, tables::CASE_NO), cases);
        assert_eq!(numbers(&table, tables::ITEM_NO), vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn missing_cause_list_contributes_nothing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = PipelineConfig::rooted(tmp.path());
        let outcome = process_court(9, &cfg, &FakeService::default(), &RespondentClassifier::default())
            .await
            .unwrap();
        assert!(outcome.table.is_none());
        assert_eq!(outcome.stats.documents, 0);
        assert!(!cfg.court_table_path(9).exists());
    }

    #[tokio::test]
    async fn failed_fetch_omits_only_that_case() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = PipelineConfig::rooted(tmp.path());
        write_doc(&cfg, 1, &[("1", "WP/1/2024"), ("2", "WP/2/2024"), ("3", "WP/3/2024")]);
        let source = FakeService::default()
            .with("WP/1/2024", tahsildar())
            .with("WP/2/2024", "<html>Service Unavailable</html>".into())
            .with("WP/3/2024", tahsildar());

        let outcome = process_court(1, &cfg, &source, &RespondentClassifier::default())
            .await
            .unwrap();
        assert_eq!(outcome.stats.failed, 1);
        let table = read_table(&outcome.table.unwrap());
        assert_eq!(strings(&table, tables::CASE_NO), vec!["WP/1/2024", "WP/3/2024"]);
        assert_eq!(numbers(&table, tables::ITEM_NO), vec![1, 3]);
    }

    #[tokio::test]
    async fn timed_out_fetch_is_absent_from_court_table() {
        // A listener that accepts and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((sock, _)) = listener.accept().await {
                held.push(sock);
            }
        });

        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = PipelineConfig::rooted(tmp.path());
        write_doc(&cfg, 3, &[("1", "WP/1/2024"), ("2", "WP/2/2024"), ("3", "WP/3/2024")]);
        let source = Routed {
            slow_case: "WP/2/2024".into(),
            slow: CaseClient::new(
                format!("http://127.0.0.1:{port}/caseDetails.jsp?casedet="),
                Duration::from_millis(300),
            )
            .unwrap(),
            rest: FakeService::default()
                .with("WP/1/2024", tahsildar())
                .with("WP/3/2024", tahsildar()),
        };

        let outcome = process_court(3, &cfg, &source, &RespondentClassifier::default())
            .await
            .unwrap();
        assert_eq!(outcome.stats.failed, 1);
        let table = read_table(&outcome.table.unwrap());
        let cases = strings(&table, tables::CASE_NO);
        assert!(!cases.contains(&"WP/2/2024".to_string()));
        assert_eq!(cases, vec!["WP/1/2024", "WP/3/2024"]);
    }

    #[tokio::test]
    async fn diagnostics_cover_excluded_cases() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = PipelineConfig::rooted(tmp.path());
        write_doc(&cfg, 4, &[("1", "WP/1/2024"), ("2", "WP/2/2024")]);
        let source = FakeService::default()
            .with("WP/1/2024", tahsildar())
            .with("WP/2/2024", body("Warangal", &[("The RDO", "Hanamkonda")]));

        process_court(4, &cfg, &source, &RespondentClassifier::default())
            .await
            .unwrap();
        let batches = read_csv(
            &cfg.diagnostic_path(4),
            Arc::new(tables::diagnostic_schema()),
        )
        .unwrap();
        let diag = arrow::compute::concat_batches(&Arc::new(tables::diagnostic_schema()), &batches)
            .unwrap();
        assert_eq!(strings(&diag, tables::CASE_NO), vec!["WP/1/2024", "WP/2/2024"]);
        assert_eq!(strings(&diag, tables::RESPONDENT)[1], "the rdohanamkonda");
    }

    #[tokio::test]
    async fn run_skips_court_without_cause_list() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = PipelineConfig::rooted(tmp.path());
        write_doc(&cfg, 1, &[("7", "WP/11/2024")]);
        write_doc(&cfg, 3, &[("9", "WP/33/2024")]);
        let source = FakeService::default()
            .with("WP/11/2024", tahsildar())
            .with("WP/33/2024", tahsildar());

        let summary = run(Arc::new(cfg.clone()), &[1, 2, 3], Arc::new(source)).await;
        assert_eq!(summary.courts, 3);
        assert_eq!(summary.documents, 2);
        assert_eq!(summary.master_rows, 2);
        assert_eq!(summary.master.as_deref(), Some(cfg.master.as_path()));

        let master = read_table(&cfg.master);
        let courts: HashSet<u32> = numbers(&master, tables::COURT_NO).into_iter().collect();
        assert_eq!(courts, HashSet::from([1, 3]));
    }

    #[tokio::test]
    async fn run_backfills_item_numbers_from_listings() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = PipelineConfig::rooted(tmp.path());
        write_doc(&cfg, 1, &[("14", "WP/11/2024"), ("15", "WP/12/2024")]);
        let source = FakeService::default()
            .with("WP/11/2024", tahsildar())
            .with("WP/12/2024", tahsildar());

        let summary = run(Arc::new(cfg.clone()), &[1], Arc::new(source)).await;
        assert_eq!(summary.merged, 2);

        let master = read_table(&cfg.master);
        assert_eq!(strings(&master, tables::CASE_NO), vec!["WP/11/2024", "WP/12/2024"]);
        assert_eq!(numbers(&master, tables::ITEM_NO), vec![14, 15]);
        // Court tables keep positional indices.
        let court = read_table(&cfg.court_table_path(1));
        assert_eq!(numbers(&court, tables::ITEM_NO), vec![1, 2]);
    }

    #[tokio::test]
    async fn diagnostics_merge_source_ignores_listings() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut cfg = PipelineConfig::rooted(tmp.path());
        cfg.merge_source = MergeSource::Diagnostics;
        write_doc(&cfg, 1, &[("14", "WP/11/2024"), ("15", "WP/12/2024")]);
        let source = FakeService::default()
            .with("WP/11/2024", tahsildar())
            .with(
                "WP/12/2024",
                body("Hyderabad", &[("The Tahsildar", "Charminar, see WP/11/2024")]),
            );

        let summary = run(Arc::new(cfg.clone()), &[1], Arc::new(source)).await;
        assert_eq!(summary.master_rows, 2);
        // Diagnostic text is lower-cased, so the case number in the address
        // no longer matches and the listing's 14 and 15 are never used.
        let master = read_table(&cfg.master);
        assert_eq!(numbers(&master, tables::ITEM_NO), vec![1, 2]);
        assert_eq!(summary.merged, 0);
    }

    #[tokio::test]
    async fn run_without_rows_writes_no_master() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = PipelineConfig::rooted(tmp.path());
        write_doc(&cfg, 1, &[("1", "WP/1/2024")]);
        let source = FakeService::default().with("WP/1/2024", body("Nalgonda", &[]));

        let summary = run(Arc::new(cfg.clone()), &[1, 2], Arc::new(source)).await;
        assert_eq!(summary.master_rows, 0);
        assert!(summary.master.is_none());
        assert!(!cfg.master.exists());
    }

    #[tokio::test]
    async fn panicking_case_keeps_its_court_siblings() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = PipelineConfig::rooted(tmp.path());
        write_doc(&cfg, 1, &[("1", "WP/1/2024"), ("2", "WP/2/2024"), ("3", "WP/3/2024")]);
        let source = FakeService {
            panic_on: Some("WP/2/2024".into()),
            ..FakeService::default()
        }
        .with("WP/1/2024", tahsildar())
        .with("WP/3/2024", tahsildar());

        let summary = run(Arc::new(cfg.clone()), &[1], Arc::new(source)).await;
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.included, 2);
        assert_eq!(summary.master_rows, 2);

        let master = read_table(&cfg.master);
        assert_eq!(strings(&master, tables::CASE_NO), vec!["WP/1/2024", "WP/3/2024"]);
        assert_eq!(numbers(&master, tables::ITEM_NO), vec![1, 3]);
        let batches = read_csv(&cfg.diagnostic_path(1), Arc::new(tables::diagnostic_schema()))
            .unwrap();
        let diag_rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
        assert_eq!(diag_rows, 2);
    }

    #[tokio::test]
    async fn master_is_built_without_touching_the_output_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = PipelineConfig::rooted(tmp.path());
        write_doc(&cfg, 1, &[("21", "WP/11/2024")]);
        let source = FakeService::default().with("WP/11/2024", tahsildar());
        let outcome = process_court(1, &cfg, &source, &RespondentClassifier::default())
            .await
            .unwrap();
        let court_tables = vec![outcome.table.unwrap()];

        let (master, matched) = build_master(&cfg, &[1], &court_tables).unwrap().unwrap();
        assert!(!cfg.master.exists());
        assert_eq!(matched, 1);
        assert_eq!(numbers(&master, tables::ITEM_NO), vec![21]);

        assert_eq!(finalize(&cfg, &[1], &court_tables).unwrap(), Some((1, 1)));
        let written = read_table(&cfg.master);
        assert_eq!(numbers(&written, tables::ITEM_NO), vec![21]);
    }

    #[tokio::test]
    async fn faulting_court_does_not_stop_siblings() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cfg = PipelineConfig::rooted(tmp.path());
        write_doc(&cfg, 1, &[("1", "WP/1/2024")]);
        write_doc(&cfg, 2, &[("1", "WP/2/2024")]);
        let source = FakeService {
            panic_on: Some("WP/2/2024".into()),
            ..FakeService::default()
        }
        .with("WP/1/2024", tahsildar());

        let summary = run(Arc::new(cfg.clone()), &[1, 2], Arc::new(source)).await;
        assert_eq!(summary.master_rows, 1);
        let master = read_table(&cfg.master);
        assert_eq!(strings(&master, tables::CASE_NO), vec!["WP/1/2024"]);
    }
}
