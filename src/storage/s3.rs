//! AWS S3 storage implementation.
//!
//! The latest batch lives in a single object, `{prefix}/latest.json`.
//! `put_object` replaces the object in one step, so readers never see a
//! partially written batch.

use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::NotificationRow;
use crate::storage::{BatchStore, StoredBatch};

/// S3-based batch storage.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    key: String,
}

impl S3Storage {
    /// Create a new S3 storage instance.
    pub fn new(client: Client, bucket: impl Into<String>, prefix: &str) -> Self {
        let prefix = prefix.trim_matches('/');
        let key = if prefix.is_empty() {
            "latest.json".to_string()
        } else {
            format!("{prefix}/latest.json")
        };

        Self {
            client,
            bucket: bucket.into(),
            key,
        }
    }

    /// Create S3 storage from environment configuration.
    pub async fn from_env() -> Result<Self> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);

        let bucket = std::env::var("S3_BUCKET").unwrap_or_else(|_| "ku-notify".to_string());
        let prefix = std::env::var("S3_PREFIX").unwrap_or_else(|_| "KuNotifications".to_string());

        Ok(Self::new(client, bucket, &prefix))
    }

    /// Read the stored batch document.
    async fn read_batch(&self) -> Result<Option<StoredBatch>> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await;

        match result {
            Ok(output) => {
                let bytes = output.body.collect().await.map_err(AppError::storage)?;
                Ok(Some(serde_json::from_slice(&bytes.into_bytes())?))
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    log::info!("No existing batch at s3://{}/{}", self.bucket, self.key);
                    Ok(None)
                } else {
                    Err(AppError::storage(service_err))
                }
            }
        }
    }
}

#[async_trait]
impl BatchStore for S3Storage {
    async fn get_all(&self) -> Result<Vec<NotificationRow>> {
        Ok(self.read_batch().await?.map(|b| b.rows).unwrap_or_default())
    }

    async fn replace_all(&self, rows: &[NotificationRow]) -> Result<()> {
        let batch = StoredBatch::new(rows.to_vec());
        let json = serde_json::to_vec_pretty(&batch)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .body(ByteStream::from(json))
            .content_type("application/json")
            .send()
            .await
            .map_err(AppError::storage)?;

        log::info!(
            "Wrote {} notifications to s3://{}/{}",
            batch.count,
            self.bucket,
            self.key
        );
        Ok(())
    }
}
