//! Alumnet Media Processing Library
//!
//! Local, pre-network stages of the upload pipeline: reading asset metadata,
//! shrinking images and enforcing size ceilings.

pub mod content_type;
pub mod inspector;
pub mod validator;

#[cfg(feature = "image")]
pub mod image;

// Re-export commonly used types
pub use content_type::content_type_for;
pub use inspector::{AssetInfo, AssetSource, AssetUnreadable, FsAssetSource};
pub use validator::{SizeExceeded, SizeValidator, ValidationError};

#[cfg(feature = "image")]
pub use self::image::{ImageOptimizer, ImageResize, JpegOptimizer, OptimizedImage, ProcessingError};
