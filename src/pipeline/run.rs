// src/pipeline/run.rs

//! Full scrape-and-check run.

use chrono::Utc;

use crate::error::Result;
use crate::models::Config;
use crate::notify::Notifier;
use crate::pipeline::check::{CheckReport, run_check};
use crate::pipeline::filter::InterestFilter;
use crate::services::PortalScraper;
use crate::storage::BatchStore;

/// Scrape the portal once and run the check against `store`.
pub async fn run_once(
    config: &Config,
    store: &dyn BatchStore,
    notifier: &dyn Notifier,
) -> Result<CheckReport> {
    let start_time = Utc::now();

    let scraper = PortalScraper::from_config(&config.portal)?;
    let rows = scraper.fetch_latest().await?;
    log::info!("Scraped {} rows from {}", rows.len(), scraper.url());

    let filter = InterestFilter::from_config(&config.filter);
    let report = run_check(&rows, store, &filter, notifier).await?;

    let elapsed = Utc::now() - start_time;
    log::info!(
        "Check complete in {}ms: {} newly arrived, {} matching, persisted={}, notified={}",
        elapsed.num_milliseconds(),
        report.newly_arrived,
        report.matches,
        report.persisted,
        report.notified
    );

    Ok(report)
}
