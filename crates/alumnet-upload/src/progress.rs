//! Synthetic upload progress.
//!
//! The object store gives no byte-level feedback, so while a `put` is in
//! flight progress follows an ease-out curve over an estimated duration and
//! parks below 95 %. Only the transfer engine reports 100 %, after the store
//! confirmed the write.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use alumnet_core::constants::{
    BYTES_PER_MB, ESTIMATED_MS_PER_MB, MAX_ESTIMATED_DURATION_MS, MIN_ESTIMATED_DURATION_MS,
    PROGRESS_TICK_INTERVAL_MS, SYNTHETIC_PROGRESS_CEILING, SYNTHETIC_PROGRESS_JITTER,
};
use alumnet_core::{ProgressCallback, ProgressReport};
use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Highest fraction the estimator will ever report.
pub const MAX_SYNTHETIC_FRACTION: f64 = SYNTHETIC_PROGRESS_CEILING - 0.001;

/// Expected transfer time for a payload: one second per MB, kept within 2..=15 s.
pub fn estimated_duration(size_bytes: u64) -> Duration {
    let size_mb = size_bytes as f64 / BYTES_PER_MB as f64;
    let ms = (size_mb * ESTIMATED_MS_PER_MB as f64).round() as u64;
    Duration::from_millis(ms.clamp(MIN_ESTIMATED_DURATION_MS, MAX_ESTIMATED_DURATION_MS))
}

/// `0.95 * (1 - e^(-3r)) + jitter` with `r = min(elapsed / estimated, 1)`,
/// kept below the ceiling.
pub fn synthetic_fraction(elapsed: Duration, estimated: Duration, jitter: f64) -> f64 {
    let ratio = if estimated.is_zero() {
        1.0
    } else {
        (elapsed.as_secs_f64() / estimated.as_secs_f64()).min(1.0)
    };
    let eased = SYNTHETIC_PROGRESS_CEILING * (1.0 - (-3.0 * ratio).exp());
    (eased + jitter.max(0.0)).min(MAX_SYNTHETIC_FRACTION)
}

/// Forwards reports to a callback, never letting the percentage go down.
///
/// One guard lives for the whole transfer of an asset (all attempts), so a
/// retry that restarts the estimator holds the last value instead of
/// dropping back.
#[derive(Clone)]
pub struct MonotonicProgress {
    callback: ProgressCallback,
    last: Arc<Mutex<Option<ProgressReport>>>,
}

impl MonotonicProgress {
    pub fn new(callback: ProgressCallback) -> Self {
        Self {
            callback,
            last: Arc::new(Mutex::new(None)),
        }
    }

    /// Emits `max(previous, report)`.
    pub fn report(&self, report: ProgressReport) {
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let next = match *last {
            Some(prev) if prev.percentage > report.percentage => prev,
            _ => report,
        };
        *last = Some(next);
        (self.callback)(next);
    }

    pub fn last(&self) -> Option<ProgressReport> {
        match self.last.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Ticks synthetic progress on a background task.
pub struct ProgressEstimator;

impl ProgressEstimator {
    /// Start ticking every 200 ms until the returned handle is stopped.
    pub fn start<F>(total_bytes: u64, estimated: Duration, on_tick: F) -> ProgressHandle
    where
        F: Fn(ProgressReport) + Send + Sync + 'static,
    {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(Self::run(total_bytes, estimated, on_tick, cancel.clone()));
        ProgressHandle {
            cancel,
            task: Some(task),
        }
    }

    async fn run<F>(total_bytes: u64, estimated: Duration, on_tick: F, cancel: CancellationToken)
    where
        F: Fn(ProgressReport) + Send + Sync + 'static,
    {
        let started = Instant::now();
        let mut ticker = interval(Duration::from_millis(PROGRESS_TICK_INTERVAL_MS));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_fraction = 0.0_f64;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let jitter = rand::rng().random_range(0.0..SYNTHETIC_PROGRESS_JITTER);
                    let fraction = synthetic_fraction(started.elapsed(), estimated, jitter);
                    last_fraction = last_fraction.max(fraction);
                    on_tick(ProgressReport::from_fraction(last_fraction, total_bytes));
                }
            }
        }
    }
}

/// Handle to a running estimator.
///
/// Dropping the handle cancels the ticker as well, so an upload future that
/// is abandoned mid-transfer does not leave it reporting.
pub struct ProgressHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ProgressHandle {
    /// Stop ticking. Returns once the ticker has exited, so no report from
    /// this estimator can arrive afterwards.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Progress estimator task ended abnormally");
            }
        }
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
