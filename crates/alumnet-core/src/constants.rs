//! Pipeline-wide constants and defaults.

/// Bytes in one megabyte as used for every size ceiling and size report.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Bucket used when the caller does not name one.
pub const DEFAULT_BUCKET: &str = "media";

/// Total transfer attempts per asset (first try included).
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base of the exponential backoff: attempt `n` waits `base * 2^n`.
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;

/// Image ceiling, checked after optimization.
pub const DEFAULT_MAX_IMAGE_SIZE_MB: u64 = 10;

pub const DEFAULT_MAX_VIDEO_SIZE_MB: u64 = 100;

/// Longer edge of an optimized image.
pub const DEFAULT_MAX_DIMENSION_PX: u32 = 1920;

/// JPEG quality factor (0..1) used when re-encoding images.
pub const DEFAULT_QUALITY_FACTOR: f32 = 0.85;

/// Interval between two synthetic progress reports.
pub const PROGRESS_TICK_INTERVAL_MS: u64 = 200;

/// Synthetic progress approaches this fraction but never reaches it.
pub const SYNTHETIC_PROGRESS_CEILING: f64 = 0.95;

/// Upper bound of the per-tick jitter added to synthetic progress.
pub const SYNTHETIC_PROGRESS_JITTER: f64 = 0.01;

/// Estimated transfer time per megabyte of payload.
pub const ESTIMATED_MS_PER_MB: u64 = 1000;

pub const MIN_ESTIMATED_DURATION_MS: u64 = 2_000;
pub const MAX_ESTIMATED_DURATION_MS: u64 = 15_000;
