//! Domain models for the media upload pipeline.

pub mod asset;
pub mod options;
pub mod progress;
pub mod size_check;

pub use asset::{AssetRef, MediaKind};
pub use options::{OptimizationPolicy, TransferOptions};
pub use progress::{ProgressCallback, ProgressReport};
pub use size_check::SizeCheck;
