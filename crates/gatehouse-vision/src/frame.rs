//! Captured camera frames and pre-recognition processing.

use image::imageops::FilterType;
use image::RgbImage;

/// Downsampling factor applied to every frame before recognition, bounding
/// the per-attempt encoding cost.
pub const DOWNSAMPLE_FACTOR: u32 = 4;

/// One captured camera frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbImage,
    /// Capture sequence number within one camera session.
    pub sequence: u32,
}

impl Frame {
    #[must_use]
    pub fn new(image: RgbImage, sequence: u32) -> Self {
        Self { image, sequence }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Downsample an image by an integer factor.
///
/// Dimensions are clamped so the result is never empty.
#[must_use]
pub fn downsample(image: &RgbImage, factor: u32) -> RgbImage {
    let factor = factor.max(1);
    let width = (image.width() / factor).max(1);
    let height = (image.height() / factor).max(1);
    image::imageops::resize(image, width, height, FilterType::Triangle)
}
