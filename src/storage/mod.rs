//! Storage abstractions for the latest notification batch.
//!
//! Only one batch is ever retained. Writes replace the whole document:
//!
//! ```text
//! storage/
//! └── latest.json    # { updated_at, count, rows }
//! ```

pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::NotificationRow;

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStore;

/// Persisted form of the latest batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredBatch {
    /// ISO 8601 timestamp of last replacement
    pub updated_at: DateTime<Utc>,
    /// Row count
    pub count: usize,
    /// The rows of the batch
    pub rows: Vec<NotificationRow>,
}

impl StoredBatch {
    pub fn new(rows: Vec<NotificationRow>) -> Self {
        Self {
            updated_at: Utc::now(),
            count: rows.len(),
            rows,
        }
    }
}

/// Trait for batch storage backends.
#[async_trait]
pub trait BatchStore: Send + Sync {
    /// Load every row of the stored batch (empty if nothing is stored).
    async fn get_all(&self) -> Result<Vec<NotificationRow>>;

    /// Replace the stored batch with `rows`.
    ///
    /// Readers observe either the previous batch or `rows`, never a mix.
    /// An empty slice clears the store.
    async fn replace_all(&self, rows: &[NotificationRow]) -> Result<()>;
}
