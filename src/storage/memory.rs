//! In-process batch store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::NotificationRow;
use crate::storage::BatchStore;

/// Batch store backed by memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<NotificationRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `rows`.
    pub fn with_rows(rows: Vec<NotificationRow>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait]
impl BatchStore for MemoryStore {
    async fn get_all(&self) -> Result<Vec<NotificationRow>> {
        Ok(self.rows.read().await.clone())
    }

    async fn replace_all(&self, rows: &[NotificationRow]) -> Result<()> {
        *self.rows.write().await = rows.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replace_is_total() {
        let store = MemoryStore::with_rows(vec![NotificationRow::new("d1", "A", "")]);
        store
            .replace_all(&[NotificationRow::new("d2", "B", "")])
            .await
            .unwrap();

        let rows = store.get_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].exam_name, "B");
    }
}
