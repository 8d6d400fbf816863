//! Rasterizer: paints tokenized lines onto an RGB canvas.

use super::font::GlyphFace;
use super::layout::TextLayout;
use super::theme::{blend, Palette};
use crate::lexer::Token;
use crate::Result;
use image::{Rgb, RgbImage};
use syntect::highlighting::{Highlighter, Theme};

const TAB_WIDTH: usize = 4;

/// Inclusive 1-based range of lines to paint with the highlight band.
/// Values outside the source are accepted and simply match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightRange {
    pub first: i64,
    pub last: i64,
}

impl HighlightRange {
    pub fn new(first: i64, last: i64) -> Self {
        Self { first, last }
    }

    /// Whether zero-based line `line` falls in the range.
    pub fn contains_index(&self, line: usize) -> bool {
        let number = line as i64 + 1;
        self.first <= number && number <= self.last
    }
}

/// Paint `lines` with `theme` colors, line numbers off.
pub fn rasterize(
    lines: &[Vec<Token>],
    face: &GlyphFace,
    layout: &TextLayout,
    theme: &Theme,
    highlight: HighlightRange,
) -> Result<RgbImage> {
    let palette = Palette::from_theme(theme);
    let highlighter = Highlighter::new(theme);

    let max_columns = lines.iter().map(|l| line_columns(l)).max().unwrap_or(0);
    let (width, height) = layout.image_size(max_columns, lines.len())?;
    let mut img = RgbImage::from_pixel(width, height, palette.background);

    for (index, tokens) in lines.iter().enumerate() {
        let band = if highlight.contains_index(index) {
            let rect = layout.highlight_rect(index, width);
            fill_rect(&mut img, rect.x, rect.y, rect.width, rect.height, palette.highlight);
            palette.highlight
        } else {
            palette.background
        };

        let mut column = 0usize;
        for token in tokens {
            let style = highlighter.style_for_stack(token.scopes.as_slice());
            let color = blend(style.foreground, band);
            for ch in token.text.chars() {
                if ch == '\t' {
                    column += TAB_WIDTH - column % TAB_WIDTH;
                    continue;
                }
                let (x, y) = layout.text_origin(column, index);
                face.draw_char(&mut img, x, y, ch, color);
                column += 1;
            }
        }
    }

    Ok(img)
}

/// Rendered width of a line in cells, with tabs expanded.
fn line_columns(tokens: &[Token]) -> usize {
    let mut column = 0usize;
    for ch in tokens.iter().flat_map(|t| t.text.chars()) {
        if ch == '\t' {
            column += TAB_WIDTH - column % TAB_WIDTH;
        } else {
            column += 1;
        }
    }
    column
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = x.saturating_add(width).min(img.width());
    let y_end = y.saturating_add(height).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}
