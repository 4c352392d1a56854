//! AWS Lambda entry point for ku-notify
//!
//! Deploy with `cargo lambda build --release --features lambda` and trigger
//! it from an EventBridge schedule. Each invocation performs one check.

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};

use serde_json::Value;
use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ku_notify::{error::Result, models::Config, notify, pipeline, storage::s3::S3Storage};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> std::result::Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("ku-notify Lambda starting...");
    lambda_runtime::run(service_fn(handler)).await
}

/// Handler for AWS Lambda events.
#[instrument(skip(event))]
async fn handler(event: LambdaEvent<Value>) -> std::result::Result<Value, LambdaError> {
    info!("Received event: {:?}", event.payload);

    into_response(run_lambda_check().await)
}

/// Map a check outcome to the Lambda result.
///
/// Failures are returned as errors so the runtime records the invocation
/// as failed.
fn into_response(
    outcome: Result<pipeline::CheckReport>,
) -> std::result::Result<Value, LambdaError> {
    match outcome {
        Ok(report) => {
            info!(
                "Check successful: {} newly arrived, {} matching",
                report.newly_arrived, report.matches
            );
            Ok(serde_json::json!({
                "status": "success",
                "report": report,
            }))
        }
        Err(e) => {
            error!("Check failed: {}", e);
            Err(e.into())
        }
    }
}

/// Configuration comes from defaults plus the environment only.
async fn run_lambda_check() -> Result<pipeline::CheckReport> {
    let mut config = Config::default();
    config.apply_env();
    config.validate()?;

    let storage = S3Storage::from_env().await?;
    let notifier = notify::from_config(&config.email)?;

    pipeline::run_once(&config, &storage, notifier.as_ref()).await
}

#[cfg(test)]
mod tests {
    use ku_notify::error::AppError;
    use ku_notify::pipeline::{ChangeKind, CheckReport};

    use super::*;

    #[test]
    fn test_store_failure_fails_invocation() {
        let result = into_response(Err(AppError::storage("put_object denied")));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("put_object denied"));
    }

    #[test]
    fn test_malformed_batch_fails_invocation() {
        assert!(into_response(Err(AppError::malformed("mixed dates"))).is_err());
    }

    #[test]
    fn test_success_reports_status() {
        let report = CheckReport {
            kind: Some(ChangeKind::FirstRun),
            total_rows: 1,
            newly_arrived: 1,
            matches: 1,
            persisted: true,
            notified: true,
        };

        let value = into_response(Ok(report)).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["report"]["kind"], "first_run");
    }
}
