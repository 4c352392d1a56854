// src/services/portal.rs

//! Exam portal scraper.
//!
//! The portal lists batches as table sections: a `tr.tableHeading` row
//! holding "Published on <date>", followed by `tr.displayList` rows until
//! the next heading. Only the first (most recent) section is read.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{NotificationRow, PortalConfig};
use crate::utils::{http, normalize_whitespace, resolve_url};

const HEADING_CLASS: &str = "tableHeading";
const ROW_CLASS: &str = "displayList";

static PUBLISHED_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^published\s+on\s*").expect("valid regex"));

/// Service for fetching the latest published batch.
pub struct PortalScraper {
    client: Client,
    url: String,
}

impl PortalScraper {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Build a scraper with its own HTTP client.
    pub fn from_config(config: &PortalConfig) -> Result<Self> {
        let client = http::create_async_client(config)?;
        Ok(Self::new(client, &config.url))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the portal page and parse its latest batch.
    pub async fn fetch_latest(&self) -> Result<Vec<NotificationRow>> {
        log::info!("Fetching from {}", self.url);
        let html = http::fetch_text(&self.client, &self.url).await?;
        parse_latest_batch(&html, &self.url)
    }
}

/// Parse the most recent batch out of a portal page.
///
/// Returns an empty batch when the page has no heading row.
pub fn parse_latest_batch(html: &str, base_url: &str) -> Result<Vec<NotificationRow>> {
    let base = Url::parse(base_url)?;
    let document = Html::parse_document(html);
    let heading_sel = parse_selector(&format!("tr.{HEADING_CLASS}"))?;

    let Some(heading) = document.select(&heading_sel).next() else {
        log::warn!("No '{}' row found on {}", HEADING_CLASS, base_url);
        return Ok(Vec::new());
    };

    let heading_text = normalize_whitespace(&heading.text().collect::<String>());
    let published_date = PUBLISHED_PREFIX.replace(&heading_text, "").trim().to_string();
    if published_date.is_empty() {
        return Err(AppError::scrape(base_url, "heading row has no publish date"));
    }

    let mut rows = Vec::new();
    for tr in heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
    {
        if has_class(&tr, HEADING_CLASS) {
            break;
        }
        if !has_class(&tr, ROW_CLASS) {
            continue;
        }
        if let Some(row) = parse_row(&tr, &published_date, &base) {
            rows.push(row);
        }
    }

    log::debug!("Parsed {} rows published on {}", rows.len(), published_date);
    Ok(rows)
}

fn parse_row(tr: &ElementRef, published_date: &str, base: &Url) -> Option<NotificationRow> {
    let cols: Vec<ElementRef> = tr
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "td")
        .collect();
    if cols.len() < 2 {
        return None;
    }

    // Each text node is trimmed; spacing inside a node is kept as published.
    let exam_name = cols[1]
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let pdf_link = cols
        .get(2)
        .and_then(|td| {
            td.descendants()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == "a")
        })
        .and_then(|a| a.value().attr("href"))
        .map(|href| resolve_url(base, href))
        .unwrap_or_default();

    Some(NotificationRow {
        published_date: published_date.to_string(),
        exam_name,
        pdf_link,
    })
}

fn has_class(el: &ElementRef, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://exams.keralauniversity.ac.in/Login/check1";

    const PAGE: &str = r#"
        <html><body><table>
          <tr class="tableHeading"><td colspan="3"> Published on 12-01-2024 </td></tr>
          <tr class="displayList">
            <td>1</td>
            <td>  BTech 2018 Scheme
                  <b>S1</b> Exam </td>
            <td><a href="/Images/a.pdf">Download</a></td>
          </tr>
          <tr class="spacer"><td>-</td></tr>
          <tr class="displayList"><td>2</td><td>MCA Result</td></tr>
          <tr class="displayList"><td>only one column</td></tr>
          <tr class="tableHeading"><td>Published on 05-01-2024</td></tr>
          <tr class="displayList"><td>3</td><td>Old Exam</td><td></td></tr>
        </table></body></html>
    "#;

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("tr.tableHeading").is_ok());
        assert!(parse_selector("[[invalid").is_err());
    }

    #[test]
    fn test_parses_first_section_only() {
        let rows = parse_latest_batch(PAGE, BASE).unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.published_date == "12-01-2024"));
        assert_eq!(rows[0].exam_name, "BTech 2018 Scheme S1 Exam");
        assert_eq!(
            rows[0].pdf_link,
            "https://exams.keralauniversity.ac.in/Images/a.pdf"
        );
        assert_eq!(rows[1].exam_name, "MCA Result");
        assert_eq!(rows[1].pdf_link, "");
    }

    #[test]
    fn test_inner_spacing_is_kept() {
        let page = r#"<table>
            <tr class="tableHeading"><td>Published on 12-01-2024</td></tr>
            <tr class="displayList"><td>1</td><td> bachelor  of technology 2018 </td></tr>
        </table>"#;
        let rows = parse_latest_batch(page, BASE).unwrap();

        assert_eq!(rows[0].exam_name, "bachelor  of technology 2018");
        assert!(!crate::pipeline::is_interesting(
            &rows[0],
            "2018",
            &["bachelor of technology"]
        ));
    }

    #[test]
    fn test_page_without_heading_is_empty() {
        let page = "<html><body><p>Maintenance</p></body></html>";
        let rows = parse_latest_batch(page, BASE).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_heading_without_date_is_error() {
        let page = r#"<table><tr class="tableHeading"><td>Published on</td></tr></table>"#;
        assert!(matches!(
            parse_latest_batch(page, BASE),
            Err(AppError::Scrape { .. })
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            parse_latest_batch(PAGE, "not a url"),
            Err(AppError::Url(_))
        ));
    }
}
