//! Rendering: tokens to pixels, optional crop, PNG encoding.

pub mod crop;
pub mod font;
pub mod layout;
pub mod raster;
pub mod theme;

use crate::Result;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

/// An encoded thumbnail together with its pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Thumbnail {
    /// Encode `img` as PNG.
    pub fn encode(img: &RgbImage) -> Result<Self> {
        let mut png_data = Vec::new();
        img.write_to(&mut Cursor::new(&mut png_data), ImageFormat::Png)?;
        Ok(Self {
            width: img.width(),
            height: img.height(),
            png_data,
        })
    }
}
