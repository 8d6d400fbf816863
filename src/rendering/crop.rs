//! Vertical cropping around the highlighted region.

use crate::{Error, Result};
use image::{imageops, RgbImage};

/// Rows `[upper, lower)` of the source image kept after cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub upper: u32,
    pub lower: u32,
}

impl CropWindow {
    pub fn height(&self) -> u32 {
        self.lower - self.upper
    }

    pub fn is_full(&self, image_height: u32) -> bool {
        self.upper == 0 && self.lower == image_height
    }
}

/// Position of the middle of the highlighted range as a fraction of the
/// source's line count.
pub fn center_ratio(first_line: i64, last_line: i64, total_lines: usize) -> Result<f64> {
    if total_lines == 0 {
        return Err(Error::CropError(
            "cannot center a crop on a source with no lines".into(),
        ));
    }
    Ok(((first_line as f64 + last_line as f64) / 2.0) / total_lines as f64)
}

/// Window of `crop_height` rows centered at `ratio * image_height`.
///
/// The lower edge is clamped to the image first, the upper edge is derived
/// from it and clamped at 0, and the lower edge is then re-extended so the
/// window keeps `min(crop_height, image_height)` rows.
pub fn crop_window(ratio: f64, image_height: u32, crop_height: u32) -> Result<CropWindow> {
    if crop_height == 0 {
        return Err(Error::CropError("crop height must be positive".into()));
    }
    if image_height == 0 {
        return Err(Error::CropError("cannot crop an empty image".into()));
    }

    let full = image_height as f64;
    let h = crop_height as f64;
    let center = ratio * full;

    let lower = (center + h / 2.0).min(full).max(0.0);
    let upper = (lower - h).max(0.0);
    let lower = (upper + h).min(full);

    let upper = upper.round() as u32;
    let lower = (lower.round() as u32).clamp(upper, image_height);
    if lower == upper {
        return Err(Error::CropError(format!(
            "degenerate crop window at row {}",
            upper
        )));
    }
    Ok(CropWindow { upper, lower })
}

/// Full-width slice of `img` covering `window`.
pub fn crop_rows(img: &RgbImage, window: CropWindow) -> RgbImage {
    imageops::crop_imm(img, 0, window.upper, img.width(), window.height()).to_image()
}
