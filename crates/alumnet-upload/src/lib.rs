//! Alumnet Upload Library
//!
//! Takes locally selected images and videos to the object store: optimize,
//! validate, transfer with retry, report progress, batch.

pub mod batch;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod retry;
pub mod telemetry;
pub mod transfer;
pub mod uploader;

// Re-export commonly used types
pub use batch::{aggregate_report, BatchOrchestrator};
pub use error::UploadError;
pub use pipeline::{AssetPipeline, ObjectKey, UploadOutcome, UploadedAsset};
pub use progress::{MonotonicProgress, ProgressEstimator, ProgressHandle};
pub use retry::RetryPolicy;
pub use transfer::{StoredObject, TransferEngine, TransferRequest};
pub use uploader::MediaUploader;

pub use tokio_util::sync::CancellationToken;
