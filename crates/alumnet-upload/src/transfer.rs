//! Resilient transfer: `put` with bounded retry and exponential backoff.

use std::sync::Arc;

use alumnet_core::{ProgressReport, TransferOptions};
use alumnet_storage::{Storage, StorageError};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::error::UploadError;
use crate::progress::{estimated_duration, MonotonicProgress, ProgressEstimator};
use crate::retry::RetryPolicy;

/// Where a payload ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Path returned by the store.
    pub storage_path: String,
    pub url: String,
    /// Attempts it took, first try included.
    pub attempts: u32,
}

/// One payload to send.
#[derive(Debug, Clone)]
pub struct TransferRequest<'a> {
    pub data: Bytes,
    pub key: &'a str,
    pub content_type: &'a str,
}

/// Sends payloads to the object store.
#[derive(Clone)]
pub struct TransferEngine {
    storage: Arc<dyn Storage>,
}

impl TransferEngine {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Upload `request` into `options.bucket`.
    ///
    /// Transient store errors are retried until `options.max_retries`
    /// attempts were made; permanent ones end the transfer at once. Both the
    /// in-flight `put` and the backoff wait give way to `cancel`.
    pub async fn upload(
        &self,
        request: TransferRequest<'_>,
        options: &TransferOptions,
        progress: Option<&MonotonicProgress>,
        cancel: &CancellationToken,
    ) -> Result<StoredObject, UploadError> {
        let policy = RetryPolicy::from_options(options);
        let bucket = options.bucket.as_str();
        let total_bytes = request.data.len() as u64;
        let estimated = estimated_duration(total_bytes);

        if let Some(progress) = progress {
            progress.report(ProgressReport::started(total_bytes));
        }

        let mut attempt: u32 = 1;
        loop {
            let start = std::time::Instant::now();
            let estimator = progress.cloned().map(|sink| {
                ProgressEstimator::start(total_bytes, estimated, move |report| sink.report(report))
            });

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                result = self.storage.put(
                    bucket,
                    request.key,
                    request.data.clone(),
                    request.content_type,
                ) => Some(result),
            };

            if let Some(estimator) = estimator {
                estimator.stop().await;
            }

            let Some(result) = outcome else {
                tracing::info!(key = %request.key, attempt = attempt, "Upload cancelled");
                return Err(UploadError::Cancelled);
            };

            match result {
                Ok(storage_path) => {
                    if let Some(progress) = progress {
                        progress.report(ProgressReport::completed(total_bytes));
                    }
                    let url = self.storage.public_url(bucket, &storage_path);

                    tracing::info!(
                        bucket = %bucket,
                        key = %request.key,
                        size_bytes = total_bytes,
                        attempt = attempt,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "Upload completed"
                    );

                    return Ok(StoredObject {
                        storage_path,
                        url,
                        attempts: attempt,
                    });
                }
                Err(StorageError::InvalidKey(msg)) => {
                    return Err(UploadError::InvalidKey(msg));
                }
                Err(e) if policy.should_retry(attempt, &e) => {
                    let delay = policy.delay_for_attempt(attempt);
                    tracing::warn!(
                        error = %e,
                        key = %request.key,
                        attempt = attempt,
                        max_attempts = policy.max_attempts(),
                        backoff_ms = delay.as_millis() as u64,
                        "Upload attempt failed, retrying"
                    );

                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            tracing::info!(key = %request.key, attempt = attempt, "Upload cancelled during backoff");
                            return Err(UploadError::Cancelled);
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        key = %request.key,
                        attempt = attempt,
                        transient = e.is_transient(),
                        "Upload failed"
                    );
                    return Err(UploadError::TransferFailed {
                        attempts: attempt,
                        source: e,
                    });
                }
            }
        }
    }
}
