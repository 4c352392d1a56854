//! Digest notification backends.

pub mod digest;
mod log_only;
mod resend;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{EmailConfig, NotificationRow};

pub use log_only::LogNotifier;
pub use resend::ResendNotifier;

/// Pluggable notification backend.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one digest covering every row in `matches`.
    ///
    /// Callers only invoke this with a non-empty slice.
    async fn notify(&self, matches: &[NotificationRow]) -> Result<()>;
}

/// Pick the email backend if an API key is configured, otherwise log only.
pub fn from_config(config: &EmailConfig) -> Result<Box<dyn Notifier>> {
    match &config.api_key {
        Some(_) => Ok(Box::new(ResendNotifier::new(config)?)),
        None => {
            log::warn!("RESEND_API_KEY not set; digests will only be logged");
            Ok(Box::new(LogNotifier))
        }
    }
}
