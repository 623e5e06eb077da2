//! Sequential multi-asset uploads with one aggregated progress stream.

use std::sync::Arc;

use alumnet_core::{AssetRef, ProgressCallback, ProgressReport, TransferOptions};
use tokio_util::sync::CancellationToken;

use crate::error::UploadError;
use crate::pipeline::{AssetPipeline, ObjectKey, UploadOutcome};
use crate::progress::MonotonicProgress;

/// Rescale the progress of asset `index` onto the whole batch:
/// `((index + fraction) / total_assets) * 100`.
///
/// Bytes count everything already sent plus the current asset.
pub fn aggregate_report(
    index: usize,
    total_assets: usize,
    completed_bytes: u64,
    asset: ProgressReport,
) -> ProgressReport {
    let percentage = if total_assets == 0 {
        100.0
    } else {
        ((index as f64 + asset.fraction()) / total_assets as f64 * 100.0).clamp(0.0, 100.0)
    };

    ProgressReport {
        bytes_loaded: completed_bytes.saturating_add(asset.bytes_loaded),
        bytes_total: completed_bytes.saturating_add(asset.bytes_total),
        percentage,
    }
}

/// Owns the batch-level progress merge.
struct BatchProgress {
    sink: Option<MonotonicProgress>,
    total_assets: usize,
}

impl BatchProgress {
    fn new(on_progress: Option<ProgressCallback>, total_assets: usize) -> Self {
        Self {
            sink: on_progress.map(MonotonicProgress::new),
            total_assets,
        }
    }

    /// Per-asset progress sink feeding the aggregate. Fresh for every asset,
    /// so each asset's own reports start again from zero.
    fn for_asset(&self, index: usize, completed_bytes: u64) -> Option<MonotonicProgress> {
        let batch = self.sink.clone()?;
        let total_assets = self.total_assets;
        let callback: ProgressCallback = Arc::new(move |report| {
            batch.report(aggregate_report(index, total_assets, completed_bytes, report));
        });
        Some(MonotonicProgress::new(callback))
    }

    fn finish(&self, completed_bytes: u64) {
        if let Some(sink) = &self.sink {
            sink.report(ProgressReport::completed(completed_bytes));
        }
    }
}

/// Uploads assets one after another.
///
/// A failed asset never stops the batch; the result holds one outcome per
/// input, in input order.
#[derive(Clone)]
pub struct BatchOrchestrator {
    pipeline: Arc<AssetPipeline>,
}

impl BatchOrchestrator {
    pub fn new(pipeline: Arc<AssetPipeline>) -> Self {
        Self { pipeline }
    }

    pub async fn run(
        &self,
        assets: &[AssetRef],
        options: &TransferOptions,
        cancel: &CancellationToken,
    ) -> Vec<UploadOutcome> {
        let start = std::time::Instant::now();
        let progress = BatchProgress::new(options.on_progress.clone(), assets.len());
        let mut outcomes = Vec::with_capacity(assets.len());
        let mut completed_bytes: u64 = 0;

        tracing::info!(assets = assets.len(), bucket = %options.bucket, "Starting batch upload");

        for (index, asset) in assets.iter().enumerate() {
            if cancel.is_cancelled() {
                outcomes.push(Err(UploadError::Cancelled));
                continue;
            }

            let sink = progress.for_asset(index, completed_bytes);
            let outcome = self
                .pipeline
                .process(asset, ObjectKey::Generated, options, sink.as_ref(), cancel)
                .await;

            match &outcome {
                Ok(uploaded) => {
                    completed_bytes = completed_bytes.saturating_add(uploaded.size_bytes);
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    tracing::warn!(
                        asset = %asset,
                        index = index,
                        error = %e,
                        "Batch asset failed, continuing with next"
                    );
                }
            }
            outcomes.push(outcome);
        }

        if !cancel.is_cancelled() {
            progress.finish(completed_bytes);
        }

        let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
        tracing::info!(
            assets = assets.len(),
            succeeded = succeeded,
            failed = assets.len() - succeeded,
            size_bytes = completed_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            cancelled = cancel.is_cancelled(),
            "Batch upload finished"
        );

        outcomes
    }
}
