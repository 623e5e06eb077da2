//! Alumnet Core Library
//!
//! Domain types, configuration and error metadata shared by the media upload
//! pipeline crates (storage, processing, upload) and the CLI.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::UploadConfig;
pub use error::{ErrorMetadata, LogLevel};
pub use models::{
    AssetRef, MediaKind, OptimizationPolicy, ProgressCallback, ProgressReport, SizeCheck,
    TransferOptions,
};
pub use storage_types::StorageBackend;
