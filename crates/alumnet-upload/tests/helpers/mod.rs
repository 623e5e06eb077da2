//! Test helpers: in-memory storage, asset fixtures and progress recording.
//!
//! Run from workspace root: `cargo test -p alumnet-upload`.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use std::sync::{Arc, Mutex};

use alumnet_core::{ProgressReport, TransferOptions};
use alumnet_processing::{AssetSource, ImageOptimizer};
use alumnet_upload::MediaUploader;

pub use fixtures::{FailingOptimizer, FakeAssetSource, FixedSizeOptimizer};
pub use storage::{MockStorage, PutBehavior};

/// Uploader over `storage` with the given asset source and optimizer.
pub fn uploader(
    storage: Arc<MockStorage>,
    source: Arc<dyn AssetSource>,
    optimizer: Arc<dyn ImageOptimizer>,
) -> MediaUploader {
    MediaUploader::new(storage, source, optimizer)
}

/// Collects every progress report it is handed.
#[derive(Clone, Default)]
pub struct ProgressRecorder {
    reports: Arc<Mutex<Vec<ProgressReport>>>,
}

impl ProgressRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `options` with this recorder as progress callback.
    pub fn attach(&self, options: TransferOptions) -> TransferOptions {
        let reports = self.reports.clone();
        options.with_progress(move |report| reports.lock().unwrap().push(report))
    }

    pub fn reports(&self) -> Vec<ProgressReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn percentages(&self) -> Vec<f64> {
        self.reports().iter().map(|r| r.percentage).collect()
    }

    pub fn assert_monotonic(&self) {
        let reports = self.reports();
        assert!(!reports.is_empty(), "no progress reported");
        for pair in reports.windows(2) {
            assert!(
                pair[1].percentage >= pair[0].percentage,
                "progress went backwards: {:?} -> {:?}",
                pair[0],
                pair[1]
            );
        }
        for report in &reports {
            assert!(report.bytes_loaded <= report.bytes_total, "{report:?}");
            assert!((0.0..=100.0).contains(&report.percentage), "{report:?}");
        }
    }
}
