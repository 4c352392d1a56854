//! Application configuration structures.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Exam portal fetch settings
    #[serde(default)]
    pub portal: PortalConfig,

    /// Which exams are worth an email
    #[serde(default)]
    pub filter: FilterConfig,

    /// Digest email settings
    #[serde(default)]
    pub email: EmailConfig,

    /// Local batch store settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration, or return the defaults if the file does not exist.
    ///
    /// Any other failure (unreadable or malformed file) is returned.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::load(&path) {
            Err(AppError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!(
                    "Config file {:?} not found. Using defaults.",
                    path.as_ref()
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Override values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| env::var(key).ok());
    }

    /// Override values using the given variable lookup.
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BASE_URL") {
            self.portal.url = url;
        }
        if let Some(year) = lookup("NOTIFY_YEAR") {
            self.filter.year = year;
        }
        if let Some(keywords) = lookup("NOTIFY_KEYWORDS") {
            self.filter.keywords = split_list(&keywords);
        }
        if let Some(from) = lookup("EMAIL_FROM") {
            self.email.from = from;
        }
        if let Some(to) = lookup("EMAIL_TO") {
            self.email.to = split_list(&to);
        }
        if let Some(key) = lookup("RESEND_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.email.api_key = Some(key);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.portal.url.trim().is_empty() {
            return Err(AppError::validation("portal.url is empty"));
        }
        url::Url::parse(&self.portal.url)?;
        if self.portal.user_agent.trim().is_empty() {
            return Err(AppError::validation("portal.user_agent is empty"));
        }
        if self.portal.timeout_secs == 0 {
            return Err(AppError::validation("portal.timeout_secs must be > 0"));
        }
        if self.email.timeout_secs == 0 {
            return Err(AppError::validation("email.timeout_secs must be > 0"));
        }
        if self.filter.year.trim().is_empty() {
            return Err(AppError::validation("filter.year is empty"));
        }
        if self.filter.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(AppError::validation("No filter keywords defined"));
        }
        if self.email.api_key.is_some() && (self.email.from.is_empty() || self.email.to.is_empty())
        {
            return Err(AppError::validation(
                "email.from and email.to are required when an API key is set",
            ));
        }
        Ok(())
    }
}

/// Exam portal fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Page listing the published notification batches
    #[serde(default = "defaults::portal_url")]
    pub url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            url: defaults::portal_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Year and keyword filter for interesting rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Scheme year that must appear verbatim in the exam name
    #[serde(default = "defaults::year")]
    pub year: String,

    /// Course keywords, matched case-insensitively
    #[serde(default = "defaults::keywords")]
    pub keywords: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            year: defaults::year(),
            keywords: defaults::keywords(),
        }
    }
}

/// Digest email settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Sender address
    #[serde(default)]
    pub from: String,

    /// Recipient addresses
    #[serde(default)]
    pub to: Vec<String>,

    #[serde(default = "defaults::subject")]
    pub subject: String,

    /// Transactional email endpoint
    #[serde(default = "defaults::email_api_url")]
    pub api_url: String,

    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from: String::new(),
            to: Vec::new(),
            subject: defaults::subject(),
            api_url: defaults::email_api_url(),
            timeout_secs: defaults::timeout(),
            api_key: None,
        }
    }
}

/// Local batch store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::storage_dir")]
    pub dir: PathBuf,

    #[serde(default = "defaults::storage_file")]
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: defaults::storage_dir(),
            file_name: defaults::storage_file(),
        }
    }
}

/// Split a comma separated list, dropping blank entries.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

mod defaults {
    use std::path::PathBuf;

    pub fn portal_url() -> String {
        "https://exams.keralauniversity.ac.in/Login/check1".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; ku-notify/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    pub fn year() -> String {
        "2018".into()
    }
    pub fn keywords() -> Vec<String> {
        vec![
            "btech".into(),
            "b.tech".into(),
            "bachelor of technology".into(),
        ]
    }

    pub fn subject() -> String {
        "Kerala University - New Examination Notifications Available".into()
    }
    pub fn email_api_url() -> String {
        "https://api.resend.com/emails".into()
    }

    pub fn storage_dir() -> PathBuf {
        PathBuf::from("storage")
    }
    pub fn storage_file() -> String {
        "latest.json".into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.portal.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_keywords() {
        let mut config = Config::default();
        config.filter.keywords = vec![" ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_requires_addresses_with_api_key() {
        let mut config = Config::default();
        config.email.api_key = Some("re_test".to_string());
        assert!(config.validate().is_err());

        config.email.from = "alerts@example.com".to_string();
        config.email.to = vec!["me@example.com".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [filter]
            year = "2019"
            "#,
        )
        .unwrap();
        assert_eq!(config.filter.year, "2019");
        assert_eq!(config.filter.keywords.len(), 3);
        assert_eq!(config.storage.file_name, "latest.json");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = Config::load_or_default(tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.filter.year, defaults::year());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("ku-notify.toml");
        std::fs::write(&path, "[filter]\nyear = \"2020\"\nkeywords = [\"mtech\"\n").unwrap();

        assert!(matches!(
            Config::load_or_default(&path),
            Err(AppError::Toml(_))
        ));
    }

    #[test]
    fn existing_file_is_loaded() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("ku-notify.toml");
        std::fs::write(&path, "[filter]\nyear = \"2020\"\nkeywords = [\"mtech\"]\n").unwrap();

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.filter.year, "2020");
        assert_eq!(config.filter.keywords, vec!["mtech"]);
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("NOTIFY_YEAR", "2020"),
            ("NOTIFY_KEYWORDS", "mtech, m.tech ,,"),
            ("EMAIL_TO", "a@example.com,b@example.com"),
            ("RESEND_API_KEY", "re_123"),
        ]);

        let mut config = Config::default();
        config.apply_vars(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.filter.year, "2020");
        assert_eq!(config.filter.keywords, vec!["mtech", "m.tech"]);
        assert_eq!(config.email.to.len(), 2);
        assert_eq!(config.email.api_key.as_deref(), Some("re_123"));
        assert_eq!(config.portal.url, defaults::portal_url());
    }
}
