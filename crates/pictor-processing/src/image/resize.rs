use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Target size for the optimized original.
    ///
    /// Only width is bounded; height follows the aspect ratio.
    pub fn optimized_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
        if width <= max_width {
            return (width, height);
        }
        let new_height = (height as f64 * max_width as f64 / width as f64).round() as u32;
        (max_width, new_height.max(1))
    }

    /// Target size for a thumbnail fitted inside a `box_size` square.
    ///
    /// Never enlarges.
    pub fn thumbnail_dimensions(width: u32, height: u32, box_size: u32) -> (u32, u32) {
        if width <= box_size && height <= box_size {
            return (width, height);
        }
        if width >= height {
            let h = (height as f64 * box_size as f64 / width as f64).round() as u32;
            (box_size, h.max(1))
        } else {
            let w = (width as f64 * box_size as f64 / height as f64).round() as u32;
            (w.max(1), box_size)
        }
    }

    /// Select filter based on resize ratio
    ///
    /// Heavy reductions use CatmullRom, everything else Lanczos3.
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;

        if width_ratio.max(height_ratio) > 2.0 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Resize image to exact dimensions
    pub fn resize_image(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }

    /// Bound the raster to `max_width`, returning it untouched when it already fits.
    pub fn optimize(img: DynamicImage, max_width: u32) -> DynamicImage {
        let (width, height) = img.dimensions();
        let (new_width, new_height) = Self::optimized_dimensions(width, height, max_width);
        if (new_width, new_height) == (width, height) {
            return img;
        }

        tracing::debug!(
            from_width = width,
            from_height = height,
            to_width = new_width,
            to_height = new_height,
            "Optimizing original"
        );
        Self::resize_image(&img, new_width, new_height)
    }

    /// Fit a thumbnail of the raster into a `box_size` square.
    pub fn fit_thumbnail(img: &DynamicImage, box_size: u32) -> DynamicImage {
        let (width, height) = img.dimensions();
        let (new_width, new_height) = Self::thumbnail_dimensions(width, height, box_size);
        if (new_width, new_height) == (width, height) {
            return img.clone();
        }
        Self::resize_image(img, new_width, new_height)
    }
}
