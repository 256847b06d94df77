// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Batch mode: read a URL list, run every URL through the pipeline and write
//! one CSV row per URL.

use crate::models::config::FetchConfig;
use crate::models::crawler::{CrawlResult, CrawlRow, CSV_COLUMNS};
use crate::models::storage::Location;
use crate::services::pipeline::Pipeline;
use crate::services::storage::{read_text, write_csv};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use tracing::info;

/// Options for one batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input: Location,
    pub output: Location,
    pub use_statistical: bool,
    /// URLs processed at the same time; output order always follows the input
    pub concurrency: usize,
}

/// Counts reported after a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Non-empty, trimmed lines of a URL list
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn read_urls(location: &Location) -> Result<Vec<String>> {
    info!("Reading input urls from path: {}", location);
    let text = read_text(location).await?;
    Ok(parse_url_list(&text))
}

/// Serialize rows as CSV with a header line, even when there are no rows
pub fn to_csv(rows: &[CrawlRow]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))
}

pub async fn write_results(rows: &[CrawlRow], location: &Location) -> Result<()> {
    let csv = to_csv(rows)?;
    write_csv(location, csv)
        .await
        .with_context(|| format!("Failed to write results to {}", location))?;
    info!("Results written to {}", location);
    Ok(())
}

/// Process `urls` with at most `concurrency` in flight, keeping input order
pub async fn process_all(
    pipeline: &Pipeline,
    config: &FetchConfig,
    urls: Vec<String>,
    use_statistical: bool,
    concurrency: usize,
) -> Vec<CrawlResult> {
    stream::iter(urls)
        .map(|url| async move {
            info!("Processing: {}", url);
            pipeline.process(&url, config, use_statistical).await
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

pub async fn run_batch(
    pipeline: &Pipeline,
    config: &FetchConfig,
    options: &BatchOptions,
) -> Result<BatchSummary> {
    let urls = read_urls(&options.input).await?;
    info!("Loaded {} URLs", urls.len());
    info!("Use statistical classifier: {}", options.use_statistical);

    let results = process_all(
        pipeline,
        config,
        urls,
        options.use_statistical,
        options.concurrency,
    )
    .await;

    let summary = BatchSummary {
        processed: results.len(),
        failed: results.iter().filter(|r| r.is_error()).count(),
    };

    let rows: Vec<CrawlRow> = results.into_iter().map(CrawlRow::from).collect();
    write_results(&rows, &options.output).await?;

    info!(
        "Batch finished: {} processed, {} failed",
        summary.processed, summary.failed
    );
    Ok(summary)
}
