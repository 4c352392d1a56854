//! Notification row data structure.

use serde::{Deserialize, Serialize};

/// One row of a published notification batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NotificationRow {
    /// Batch-level publish date, shared by every row of one scrape
    pub published_date: String,

    /// Exam title as shown on the portal
    pub exam_name: String,

    /// Absolute URL of the PDF (empty string if the row had no link)
    #[serde(default)]
    pub pdf_link: String,
}

impl NotificationRow {
    pub fn new(
        published_date: impl Into<String>,
        exam_name: impl Into<String>,
        pdf_link: impl Into<String>,
    ) -> Self {
        Self {
            published_date: published_date.into(),
            exam_name: exam_name.into(),
            pdf_link: pdf_link.into(),
        }
    }

    /// Identity key used when comparing two batches.
    pub fn key(&self) -> (&str, &str) {
        (self.exam_name.as_str(), self.published_date.as_str())
    }

    pub fn has_link(&self) -> bool {
        !self.pdf_link.is_empty()
    }

    /// Format row for display using a template.
    ///
    /// Supported placeholders: `{date}`, `{name}`, `{link}`
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{date}", &self.published_date)
            .replace("{name}", &self.exam_name)
            .replace("{link}", &self.pdf_link)
    }
}
