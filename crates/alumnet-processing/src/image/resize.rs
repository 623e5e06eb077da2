use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Dimensions bounded so the longer edge is at most `max_dimension`,
    /// preserving aspect ratio. Images already within bounds are never upscaled.
    pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
        let longer = width.max(height);
        if longer <= max_dimension || max_dimension == 0 {
            return (width, height);
        }

        let scale = max_dimension as f64 / longer as f64;
        let new_width = ((width as f64 * scale).round() as u32).clamp(1, max_dimension);
        let new_height = ((height as f64 * scale).round() as u32).clamp(1, max_dimension);
        (new_width, new_height)
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width.max(1) as f32;
        let height_ratio = orig_height as f32 / new_height.max(1) as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Downscale `img` so it fits within `max_dimension`.
    pub fn downscale(img: DynamicImage, max_dimension: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = Self::fit_within(orig_width, orig_height, max_dimension);
        if (width, height) == (orig_width, orig_height) {
            return img;
        }

        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }
}
