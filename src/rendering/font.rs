//! Glyph sources: the built-in bitmap font and named system fonts.

use crate::{Error, Result};
use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgb, RgbImage};

/// Fixed advance and height of one character cell, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub advance: u32,
    pub height: u32,
}

/// A monospace face used to draw source text.
pub enum GlyphFace {
    /// font8x8 glyphs resampled to `size` pixels square.
    Bitmap { size: u32 },
    /// An outline font loaded from the system font database.
    Outline { font: FontVec, scale: PxScale },
}

impl std::fmt::Debug for GlyphFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlyphFace::Bitmap { size } => f.debug_struct("Bitmap").field("size", size).finish(),
            GlyphFace::Outline { scale, .. } => {
                f.debug_struct("Outline").field("scale", &scale.y).finish()
            }
        }
    }
}

impl GlyphFace {
    /// Load the face for a font name and pixel size.
    ///
    /// `None` selects the built-in bitmap font. A name that the system font
    /// database does not know fails with [`Error::RenderError`].
    pub fn load(font_name: Option<&str>, font_size: f32) -> Result<Self> {
        if !(font_size.is_finite() && font_size > 0.0) {
            return Err(Error::RenderError(format!("invalid font size {}", font_size)));
        }
        match font_name {
            None => Ok(GlyphFace::Bitmap {
                size: (font_size.round() as u32).max(1),
            }),
            Some(name) => {
                let font = load_system_font(name)?;
                Ok(GlyphFace::Outline {
                    font,
                    scale: PxScale::from(font_size),
                })
            }
        }
    }

    pub fn metrics(&self) -> CellMetrics {
        match self {
            GlyphFace::Bitmap { size } => CellMetrics {
                advance: *size,
                height: *size,
            },
            GlyphFace::Outline { font, scale } => {
                let scaled = font.as_scaled(*scale);
                let advance = scaled.h_advance(font.glyph_id('M')).ceil() as u32;
                let height = (scaled.ascent() - scaled.descent()).ceil() as u32;
                CellMetrics {
                    advance: advance.max(1),
                    height: height.max(1),
                }
            }
        }
    }

    /// Draw `ch` with its cell's top-left corner at `(x, y)`. Pixels outside
    /// the image are skipped.
    pub fn draw_char(&self, img: &mut RgbImage, x: u32, y: u32, ch: char, color: Rgb<u8>) {
        if ch.is_whitespace() {
            return;
        }
        match self {
            GlyphFace::Bitmap { size } => draw_bitmap_char(img, x, y, *size, ch, color),
            GlyphFace::Outline { font, scale } => {
                let ascent = font.as_scaled(*scale).ascent();
                let glyph = font
                    .glyph_id(ch)
                    .with_scale_and_position(*scale, point(x as f32, y as f32 + ascent));
                let Some(outlined) = font.outline_glyph(glyph) else {
                    return;
                };
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px = gx as i64 + bounds.min.x as i64;
                    let py = gy as i64 + bounds.min.y as i64;
                    if px < 0 || py < 0 || px >= img.width() as i64 || py >= img.height() as i64 {
                        return;
                    }
                    let pixel = img.get_pixel_mut(px as u32, py as u32);
                    *pixel = mix(*pixel, color, coverage.clamp(0.0, 1.0));
                });
            }
        }
    }
}

fn draw_bitmap_char(img: &mut RgbImage, x: u32, y: u32, size: u32, ch: char, color: Rgb<u8>) {
    let glyph = BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'));
    let Some(glyph) = glyph else {
        return;
    };

    // Nearest-neighbour resample of the 8x8 cell to size x size.
    for dy in 0..size {
        let row = glyph[(dy * 8 / size) as usize];
        for dx in 0..size {
            let col = dx * 8 / size;
            if (row >> col) & 1 == 0 {
                continue;
            }
            let (px, py) = (x + dx, y + dy);
            if px < img.width() && py < img.height() {
                img.put_pixel(px, py, color);
            }
        }
    }
}

fn mix(under: Rgb<u8>, over: Rgb<u8>, t: f32) -> Rgb<u8> {
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Rgb([lerp(under[0], over[0]), lerp(under[1], over[1]), lerp(under[2], over[2])])
}

#[cfg(feature = "system-fonts")]
fn load_system_font(name: &str) -> Result<FontVec> {
    use std::sync::OnceLock;

    static FONT_DB: OnceLock<fontdb::Database> = OnceLock::new();
    let db = FONT_DB.get_or_init(|| {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("loaded {} system font faces", db.len());
        db
    });

    let families = [fontdb::Family::Name(name)];
    let query = fontdb::Query {
        families: &families,
        ..fontdb::Query::default()
    };
    let id = db
        .query(&query)
        .ok_or_else(|| Error::RenderError(format!("font {:?} not found", name)))?;
    let (data, index) = db
        .with_face_data(id, |data, index| (data.to_vec(), index))
        .ok_or_else(|| Error::RenderError(format!("font {:?} could not be read", name)))?;

    FontVec::try_from_vec_and_index(data, index)
        .map_err(|e| Error::RenderError(format!("font {:?} is invalid: {}", name, e)))
}

#[cfg(not(feature = "system-fonts"))]
fn load_system_font(name: &str) -> Result<FontVec> {
    Err(Error::RenderError(format!(
        "font {:?} requested but system font lookup is disabled",
        name
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_face_uses_square_cells() {
        let face = GlyphFace::load(None, 3.0).unwrap();
        assert_eq!(face.metrics(), CellMetrics { advance: 3, height: 3 });

        let face = GlyphFace::load(None, 0.2).unwrap();
        assert_eq!(face.metrics().advance, 1);
    }

    #[test]
    fn invalid_sizes_are_rejected() {
        assert!(GlyphFace::load(None, 0.0).is_err());
        assert!(GlyphFace::load(None, f32::NAN).is_err());
    }

    #[test]
    fn missing_font_is_a_render_error() {
        let err = GlyphFace::load(Some("NoSuchFont"), 14.0).unwrap_err();
        assert!(matches!(err, Error::RenderError(_)));
    }

    #[test]
    fn bitmap_draw_sets_pixels_inside_cell_only() {
        let face = GlyphFace::load(None, 8.0).unwrap();
        let bg = Rgb([0, 0, 0]);
        let fg = Rgb([255, 255, 255]);
        let mut img = RgbImage::from_pixel(20, 10, bg);
        face.draw_char(&mut img, 2, 1, 'A', fg);

        let lit: Vec<(u32, u32)> = img
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == fg)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|&(x, y)| (2..10).contains(&x) && (1..9).contains(&y)));
    }

    #[test]
    fn whitespace_draws_nothing() {
        let face = GlyphFace::load(None, 8.0).unwrap();
        let mut img = RgbImage::new(8, 8);
        face.draw_char(&mut img, 0, 0, ' ', Rgb([255, 0, 0]));
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
