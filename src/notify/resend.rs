//! Resend transactional email backend.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::Notifier;
use super::digest;
use crate::error::{AppError, Result};
use crate::models::{EmailConfig, NotificationRow};

/// Resend transactional email backend.
pub struct ResendNotifier {
    api_url: String,
    api_key: String,
    from: String,
    to: Vec<String>,
    subject: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct SendEmail<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: String,
    text: String,
}

impl ResendNotifier {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AppError::config("RESEND_API_KEY is not set"))?;
        if config.from.is_empty() || config.to.is_empty() {
            return Err(AppError::config("email.from and email.to must be set"));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_url: config.api_url.clone(),
            api_key,
            from: config.from.clone(),
            to: config.to.clone(),
            subject: config.subject.clone(),
            http,
        })
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn notify(&self, matches: &[NotificationRow]) -> Result<()> {
        let payload = SendEmail {
            from: &self.from,
            to: &self.to,
            subject: &self.subject,
            html: digest::render_html(matches),
            text: digest::render_text(matches),
        };

        let resp = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(AppError::notify)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            log::warn!("Email API returned {}: {}", status, body);
            return Err(AppError::notify(format!("email API returned {status}")));
        }

        log::info!("Digest email sent to {} recipient(s)", self.to.len());
        Ok(())
    }
}
