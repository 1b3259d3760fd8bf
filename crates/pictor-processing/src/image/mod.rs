//! Image processing module
//!
//! - Header probing and full decoding (processor)
//! - Width bounding and thumbnail fitting (resize)

pub mod processor;
pub mod resize;

pub use processor::{DecodedImage, FormatTag, ImageProcessor};
pub use resize::ImageResize;
