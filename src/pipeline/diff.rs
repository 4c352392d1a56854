//! Change detection between the stored batch and a fresh scrape.
//!
//! The store only ever holds the latest batch, so two transitions are
//! distinguished:
//!
//! - a different publish date supersedes the old batch, and every scraped
//!   row counts as newly arrived;
//! - the same publish date keeps the old rows comparable, and only rows
//!   whose `(exam_name, published_date)` key is absent from the old batch
//!   count as newly arrived.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::NotificationRow;

/// Kind of transition between the stored and scraped batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Nothing stored yet
    FirstRun,
    /// Publish date changed
    NewBatch,
    /// Same publish date, different row set
    RowsChanged,
    /// Same publish date, same row set
    Unchanged,
}

/// Outcome of comparing two batches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDecision {
    pub kind: ChangeKind,
    /// Replace the stored batch with the scraped one
    pub should_persist: bool,
    /// Scraped rows not attributable to the stored batch
    pub newly_arrived: Vec<NotificationRow>,
}

impl ChangeDecision {
    fn persist_all(kind: ChangeKind, rows: &[NotificationRow]) -> Self {
        Self {
            kind,
            should_persist: true,
            newly_arrived: rows.to_vec(),
        }
    }

    fn unchanged() -> Self {
        Self {
            kind: ChangeKind::Unchanged,
            should_persist: false,
            newly_arrived: Vec::new(),
        }
    }
}

/// Return the publish date shared by every row of `rows`.
///
/// Fails when the batch is empty or mixes dates.
pub fn batch_date<'a>(rows: &'a [NotificationRow], label: &str) -> Result<&'a str> {
    let first = rows
        .first()
        .ok_or_else(|| AppError::malformed(format!("{label} batch is empty")))?;

    if let Some(odd) = rows
        .iter()
        .find(|r| r.published_date != first.published_date)
    {
        return Err(AppError::malformed(format!(
            "{label} batch mixes publish dates '{}' and '{}'",
            first.published_date, odd.published_date
        )));
    }

    Ok(&first.published_date)
}

/// Compare the stored batch with a freshly scraped one.
pub fn detect(old: &[NotificationRow], new: &[NotificationRow]) -> Result<ChangeDecision> {
    let new_date = batch_date(new, "scraped")?;

    if old.is_empty() {
        return Ok(ChangeDecision::persist_all(ChangeKind::FirstRun, new));
    }

    let old_date = batch_date(old, "stored")?;
    if old_date != new_date {
        log::debug!("Publish date changed: {} -> {}", old_date, new_date);
        return Ok(ChangeDecision::persist_all(ChangeKind::NewBatch, new));
    }

    let old_keys: HashSet<(&str, &str)> = old.iter().map(NotificationRow::key).collect();
    let new_keys: HashSet<(&str, &str)> = new.iter().map(NotificationRow::key).collect();

    if old_keys == new_keys {
        return Ok(ChangeDecision::unchanged());
    }

    let newly_arrived = new
        .iter()
        .filter(|row| !old_keys.contains(&row.key()))
        .cloned()
        .collect();

    Ok(ChangeDecision {
        kind: ChangeKind::RowsChanged,
        should_persist: true,
        newly_arrived,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, name: &str) -> NotificationRow {
        NotificationRow::new(date, name, format!("http://x/{}.pdf", name.len()))
    }

    #[test]
    fn test_first_run_takes_everything() {
        let new = vec![row("12-01-2024", "A"), row("12-01-2024", "B")];
        let decision = detect(&[], &new).unwrap();

        assert_eq!(decision.kind, ChangeKind::FirstRun);
        assert!(decision.should_persist);
        assert_eq!(decision.newly_arrived, new);
    }

    #[test]
    fn test_identical_batch_is_noop() {
        let batch = vec![row("12-01-2024", "A"), row("12-01-2024", "B")];
        let decision = detect(&batch, &batch).unwrap();

        assert_eq!(decision.kind, ChangeKind::Unchanged);
        assert!(!decision.should_persist);
        assert!(decision.newly_arrived.is_empty());
    }

    #[test]
    fn test_reordered_batch_is_noop() {
        let old = vec![row("12-01-2024", "A"), row("12-01-2024", "B")];
        let new = vec![row("12-01-2024", "B"), row("12-01-2024", "A")];

        assert!(!detect(&old, &new).unwrap().should_persist);
    }

    #[test]
    fn test_link_change_alone_is_noop() {
        let old = vec![NotificationRow::new("12-01-2024", "A", "http://x/1.pdf")];
        let new = vec![NotificationRow::new("12-01-2024", "A", "http://x/2.pdf")];

        assert_eq!(detect(&old, &new).unwrap().kind, ChangeKind::Unchanged);
    }

    #[test]
    fn test_new_date_supersedes_despite_overlap() {
        let old = vec![row("12-01-2024", "A"), row("12-01-2024", "B")];
        let new = vec![row("15-01-2024", "A"), row("15-01-2024", "B")];
        let decision = detect(&old, &new).unwrap();

        assert_eq!(decision.kind, ChangeKind::NewBatch);
        assert!(decision.should_persist);
        assert_eq!(decision.newly_arrived, new);
    }

    #[test]
    fn test_same_date_added_rows() {
        let old = vec![row("12-01-2024", "A")];
        let new = vec![row("12-01-2024", "A"), row("12-01-2024", "B")];
        let decision = detect(&old, &new).unwrap();

        assert_eq!(decision.kind, ChangeKind::RowsChanged);
        assert!(decision.should_persist);
        assert_eq!(decision.newly_arrived, vec![row("12-01-2024", "B")]);
    }

    #[test]
    fn test_same_date_removed_rows_persists_without_arrivals() {
        let old = vec![row("12-01-2024", "A"), row("12-01-2024", "B")];
        let new = vec![row("12-01-2024", "A")];
        let decision = detect(&old, &new).unwrap();

        assert_eq!(decision.kind, ChangeKind::RowsChanged);
        assert!(decision.should_persist);
        assert!(decision.newly_arrived.is_empty());
    }

    #[test]
    fn test_same_date_swap_reports_only_additions() {
        let old = vec![row("12-01-2024", "A"), row("12-01-2024", "B")];
        let new = vec![row("12-01-2024", "A"), row("12-01-2024", "C")];
        let decision = detect(&old, &new).unwrap();

        assert!(decision.should_persist);
        assert_eq!(decision.newly_arrived, vec![row("12-01-2024", "C")]);
    }

    #[test]
    fn test_rejects_empty_scrape() {
        let old = vec![row("12-01-2024", "A")];
        assert!(matches!(
            detect(&old, &[]),
            Err(AppError::MalformedBatch(_))
        ));
    }

    #[test]
    fn test_rejects_mixed_dates() {
        let new = vec![row("12-01-2024", "A"), row("13-01-2024", "B")];
        assert!(matches!(detect(&[], &new), Err(AppError::MalformedBatch(_))));

        let old = new.clone();
        let fresh = vec![row("12-01-2024", "A")];
        assert!(matches!(
            detect(&old, &fresh),
            Err(AppError::MalformedBatch(_))
        ));
    }
}
