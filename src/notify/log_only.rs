//! Digest backend that only writes to the log.

use async_trait::async_trait;

use super::Notifier;
use super::digest;
use crate::error::Result;
use crate::models::NotificationRow;

/// Notifier that writes the digest to the log instead of sending it.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, matches: &[NotificationRow]) -> Result<()> {
        log::info!("Digest (not sent):\n{}", digest::render_text(matches));
        Ok(())
    }
}
