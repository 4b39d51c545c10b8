//! ngff-stats - Size and provenance inventory of OME-Zarr stores.
//!
//! This binary reads the sample list, evaluates every store not yet in the
//! report, and writes one CSV row per store in input order.

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ngff_stats::{
    config::Config,
    error::ReportError,
    io::{DocumentSource, FilesystemSource, HttpSource, RoutingSource},
    report::{format_bytes, load_sample_urls, CsvReport, StatsRow, WriteMode},
    stats::{StatsEngine, StoreStats},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.log_filter());

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let urls = match load_sample_urls(&config.input) {
        Ok(urls) => urls,
        Err(e) => {
            error!("Failed to read {}: {}", config.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let mode = if config.overwrite {
        WriteMode::Overwrite
    } else {
        WriteMode::Append
    };
    let mut report = match CsvReport::open(&config.output, mode) {
        Ok(report) => report,
        Err(e) => {
            error!("Failed to open {}: {}", config.output.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let pending: Vec<String> = urls
        .into_iter()
        .filter(|url| {
            let seen = report.contains(url);
            if seen {
                info!("Skipping already processed store: {}", url);
            }
            !seen
        })
        .collect();

    let http = match HttpSource::new(config.timeout()) {
        Ok(http) => http,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let source = RoutingSource::new(http, FilesystemSource::new(config.timeout()));
    let engine = Arc::new(StatsEngine::with_options(source, config.engine_options()));

    info!("Configuration:");
    info!("  Input: {}", config.input.display());
    info!("  Output: {} ({:?})", config.output.display(), mode);
    info!("  Stores to evaluate: {}", pending.len());
    info!(
        "  Mode: {:?}, {} sampled wells, {}s timeout, {} concurrent",
        config.traversal_mode(),
        config.sample_wells,
        config.timeout_secs,
        config.concurrency
    );

    let total = match evaluate_all(engine, pending, config.concurrency, &mut report).await {
        Ok(total) => total,
        Err(e) => {
            error!("Failed to write report: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = report.finish() {
        error!("Failed to write report: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Total written: {}", format_bytes(total));
    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(env_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// =============================================================================
// Bulk Evaluation
// =============================================================================

/// Evaluate `urls` with at most `concurrency` stores in flight.
///
/// Rows are written in input order as soon as every earlier store has
/// finished. A store whose evaluation panics gets no row. Returns the sum of
/// written bytes over all rows.
async fn evaluate_all<S>(
    engine: Arc<StatsEngine<S>>,
    urls: Vec<String>,
    concurrency: usize,
    report: &mut CsvReport,
) -> Result<u64, ReportError>
where
    S: DocumentSource + 'static,
{
    let count = urls.len();
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    for (index, url) in urls.into_iter().enumerate() {
        let engine = Arc::clone(&engine);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            let task_url = url.clone();
            // Inner task so a panic maps back to its store
            let outcome = tokio::spawn(async move { engine.evaluate(&task_url).await }).await;
            match outcome {
                Ok(stats) => (index, Some(stats)),
                Err(e) => {
                    error!("Evaluation of {} failed: {}", url, e);
                    (index, None)
                }
            }
        });
    }

    let mut buffered: BTreeMap<usize, Option<StoreStats>> = BTreeMap::new();
    let mut next = 0;
    let mut total: u64 = 0;

    while let Some(joined) = tasks.join_next().await {
        let (index, stats) = match joined {
            Ok(result) => result,
            Err(e) => {
                warn!("Worker task failed: {}", e);
                continue;
            }
        };
        buffered.insert(index, stats);

        while let Some(stats) = buffered.remove(&next) {
            next += 1;
            if let Some(stats) = stats {
                total = total.saturating_add(write_stats(report, &stats, next, count)?);
            }
        }
    }

    // Only reachable if a worker was lost before reporting its index
    for (index, stats) in buffered {
        if let Some(stats) = stats {
            total = total.saturating_add(write_stats(report, &stats, index + 1, count)?);
        }
    }

    Ok(total)
}

fn write_stats(
    report: &mut CsvReport,
    stats: &StoreStats,
    position: usize,
    count: usize,
) -> Result<u64, ReportError> {
    info!(
        "[{}/{}] {} {} {}",
        position,
        count,
        stats.location,
        stats.kind,
        format_bytes(stats.written)
    );
    report.write_row(&StatsRow::from(stats))?;
    Ok(stats.written)
}
