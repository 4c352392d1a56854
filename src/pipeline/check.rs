// src/pipeline/check.rs

//! One check run: compare, persist, filter, notify.

use serde::Serialize;

use crate::error::Result;
use crate::models::NotificationRow;
use crate::notify::Notifier;
use crate::pipeline::diff::{ChangeKind, detect};
use crate::pipeline::filter::InterestFilter;
use crate::storage::BatchStore;

/// Summary of a check run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    /// `None` when the scrape was empty and nothing was compared
    pub kind: Option<ChangeKind>,
    pub total_rows: usize,
    pub newly_arrived: usize,
    pub matches: usize,
    pub persisted: bool,
    pub notified: bool,
}

impl CheckReport {
    fn empty_scrape() -> Self {
        Self {
            kind: None,
            total_rows: 0,
            newly_arrived: 0,
            matches: 0,
            persisted: false,
            notified: false,
        }
    }
}

/// Run the change pipeline for one scraped batch.
///
/// Store failures abort the run before any notification. Notification
/// failures are logged and do not fail the run.
pub async fn run_check(
    scraped: &[NotificationRow],
    store: &dyn BatchStore,
    filter: &InterestFilter,
    notifier: &dyn Notifier,
) -> Result<CheckReport> {
    if scraped.is_empty() {
        log::warn!("No notifications found");
        return Ok(CheckReport::empty_scrape());
    }

    let stored = store.get_all().await?;
    let decision = detect(&stored, scraped)?;

    match decision.kind {
        ChangeKind::FirstRun => log::info!("First run - storing initial data"),
        ChangeKind::NewBatch => log::info!(
            "New batch detected (was: {}, now: {})",
            stored[0].published_date,
            scraped[0].published_date
        ),
        ChangeKind::RowsChanged => log::info!(
            "Batch {} changed: {} newly arrived row(s)",
            scraped[0].published_date,
            decision.newly_arrived.len()
        ),
        ChangeKind::Unchanged => log::info!("No new notifications (already stored)"),
    }

    if decision.should_persist {
        store.replace_all(scraped).await?;
    }

    let matches = filter.select(&decision.newly_arrived);
    let mut report = CheckReport {
        kind: Some(decision.kind),
        total_rows: scraped.len(),
        newly_arrived: decision.newly_arrived.len(),
        matches: matches.len(),
        persisted: decision.should_persist,
        notified: false,
    };

    if matches.is_empty() {
        log::info!("No new matching notifications to send");
        return Ok(report);
    }

    match notifier.notify(&matches).await {
        Ok(()) => {
            log::info!(
                "Notification sent for {} new matching notification(s)",
                matches.len()
            );
            report.notified = true;
        }
        Err(e) => log::error!("Notification dispatch failed: {}", e),
    }

    Ok(report)
}
