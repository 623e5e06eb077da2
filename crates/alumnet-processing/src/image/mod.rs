//! Image optimization module
//!
//! Shrinks images before upload: downscale to a bounded longer edge
//! (resize) and re-encode as JPEG (optimizer).

pub mod optimizer;
pub mod resize;

pub use optimizer::{ImageOptimizer, JpegOptimizer, OptimizedImage, ProcessingError};
pub use resize::ImageResize;
