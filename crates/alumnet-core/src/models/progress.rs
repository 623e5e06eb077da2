use serde::Serialize;
use std::sync::Arc;

/// Callback receiving progress reports. Called from the pipeline's task, so it
/// must be cheap; forward to a channel if the consumer does real work.
pub type ProgressCallback = Arc<dyn Fn(ProgressReport) + Send + Sync>;

/// A single progress observation for an upload.
///
/// `bytes_loaded` never exceeds `bytes_total` and `percentage` stays within
/// `0.0..=100.0`; `from_fraction` clamps its input to hold that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressReport {
    pub bytes_loaded: u64,
    pub bytes_total: u64,
    pub percentage: f64,
}

impl ProgressReport {
    /// Report derived from a completion fraction in `0.0..=1.0`.
    pub fn from_fraction(fraction: f64, bytes_total: u64) -> Self {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let bytes_loaded = ((bytes_total as f64 * fraction).floor() as u64).min(bytes_total);
        Self {
            bytes_loaded,
            bytes_total,
            percentage: fraction * 100.0,
        }
    }

    pub fn started(bytes_total: u64) -> Self {
        Self::from_fraction(0.0, bytes_total)
    }

    pub fn completed(bytes_total: u64) -> Self {
        Self::from_fraction(1.0, bytes_total)
    }

    pub fn fraction(&self) -> f64 {
        self.percentage / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_total_reports_zero_until_completed() {
        assert_eq!(ProgressReport::started(0).percentage, 0.0);
        let done = ProgressReport::completed(0);
        assert_eq!(done.percentage, 100.0);
        assert_eq!(done.bytes_loaded, 0);
    }

    #[test]
    fn test_from_fraction_bounds() {
        let report = ProgressReport::from_fraction(0.5, 1001);
        assert_eq!(report.bytes_loaded, 500);
        assert_eq!(report.percentage, 50.0);

        let over = ProgressReport::from_fraction(1.7, 10);
        assert_eq!(over.bytes_loaded, 10);
        assert_eq!(over.percentage, 100.0);

        let nan = ProgressReport::from_fraction(f64::NAN, 10);
        assert_eq!(nan.percentage, 0.0);
    }
}
