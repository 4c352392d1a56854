//! Year and keyword filter for notification-worthy rows.

use crate::models::{FilterConfig, NotificationRow};

/// True if `year` appears verbatim in the exam name and at least one
/// keyword appears in it ignoring case.
pub fn is_interesting<S: AsRef<str>>(row: &NotificationRow, year: &str, keywords: &[S]) -> bool {
    if !row.exam_name.contains(year) {
        return false;
    }

    let name = row.exam_name.to_lowercase();
    keywords
        .iter()
        .any(|k| name.contains(&k.as_ref().to_lowercase()))
}

/// Configured interest filter.
#[derive(Debug, Clone)]
pub struct InterestFilter {
    year: String,
    keywords: Vec<String>,
}

impl InterestFilter {
    pub fn new(year: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            year: year.into(),
            keywords,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.year.clone(), config.keywords.clone())
    }

    pub fn matches(&self, row: &NotificationRow) -> bool {
        is_interesting(row, &self.year, &self.keywords)
    }

    /// Keep the matching rows, preserving order.
    pub fn select(&self, rows: &[NotificationRow]) -> Vec<NotificationRow> {
        rows.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> NotificationRow {
        NotificationRow::new("12-01-2024", name, "")
    }

    const KEYWORDS: [&str; 2] = ["btech", "b.tech"];

    #[test]
    fn test_year_and_keyword_required() {
        assert!(is_interesting(
            &named("BTech 2018 Scheme S1 Exam"),
            "2018",
            &KEYWORDS
        ));
        assert!(is_interesting(
            &named("Fourth Semester B.Tech (2018 Scheme) Result"),
            "2018",
            &KEYWORDS
        ));
        assert!(!is_interesting(&named("BTech 2019 Scheme"), "2018", &KEYWORDS));
        assert!(!is_interesting(&named("MBA 2018 Scheme"), "2018", &KEYWORDS));
    }

    #[test]
    fn test_keyword_case_folded_on_both_sides() {
        assert!(is_interesting(
            &named("Bachelor of Technology 2018"),
            "2018",
            &["BACHELOR OF TECHNOLOGY"]
        ));
    }

    #[test]
    fn test_year_is_substring_match() {
        assert!(is_interesting(&named("BTech code 120185"), "2018", &KEYWORDS));
    }

    #[test]
    fn test_no_keywords_never_matches() {
        let empty: [&str; 0] = [];
        assert!(!is_interesting(&named("BTech 2018"), "2018", &empty));
    }

    #[test]
    fn test_filter_select_keeps_order() {
        let filter = InterestFilter::from_config(&FilterConfig::default());
        let rows = vec![
            named("B.Tech 2018 S3"),
            named("MCA 2018"),
            named("btech 2018 S5"),
        ];

        let picked = filter.select(&rows);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].exam_name, "B.Tech 2018 S3");
        assert_eq!(picked[1].exam_name, "btech 2018 S5");
    }
}
