mod config;
mod pipeline;
mod summary;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use causelist_fetch::CaseClient;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::{Args, PipelineConfig, load_court_numbers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_file)?;
    tracing::info!("causelist v{}", env!("CARGO_PKG_VERSION"));

    let courts = load_court_numbers(&args.courts)?;
    let cfg = PipelineConfig::from(&args);
    let client = CaseClient::new(cfg.base_url.clone(), cfg.timeout)
        .context("building case-details client")?;

    eprintln!("Processing {} courts...", courts.len());
    let summary = pipeline::run(Arc::new(cfg), &courts, Arc::new(client)).await;
    println!("{summary}");
    Ok(())
}

/// Log to `log_file` (appending), or to stderr when it is `-`. `RUST_LOG`
/// overrides the default `info` level.
fn init_tracing(log_file: &Path) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if log_file == Path::new("-") {
        builder.with_writer(std::io::stderr).init();
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .with_context(|| format!("opening log file {}", log_file.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    }
    Ok(())
}
