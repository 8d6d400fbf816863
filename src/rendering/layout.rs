//! Page geometry for a code thumbnail: where each line sits and how large the
//! image must be.

use super::font::CellMetrics;
use crate::{Error, Result};

/// Largest canvas, in pixels, a single render may allocate.
pub const MAX_PIXELS: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Fixed-pitch text layout with uniform padding around the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    pub cell: CellMetrics,
    /// Extra vertical space below each line
    pub line_pad: u32,
    /// Margin on all four sides of the image
    pub image_pad: u32,
}

impl TextLayout {
    pub fn new(cell: CellMetrics, line_pad: u32, image_pad: u32) -> Self {
        Self {
            cell,
            line_pad,
            image_pad,
        }
    }

    /// Height of one line including its padding.
    pub fn line_height(&self) -> u32 {
        self.cell.height + self.line_pad
    }

    /// Image size needed for `line_count` lines of at most `max_columns` cells.
    ///
    /// Fails with [`Error::RenderError`] when a dimension overflows `u32` or
    /// the canvas would exceed [`MAX_PIXELS`].
    pub fn image_size(&self, max_columns: usize, line_count: usize) -> Result<(u32, u32)> {
        let width = padded_extent(self.cell.advance, max_columns, self.image_pad);
        let height = self
            .cell
            .height
            .checked_add(self.line_pad)
            .and_then(|line| padded_extent(line, line_count, self.image_pad));
        let (Some(width), Some(height)) = (width, height) else {
            return Err(Error::RenderError(format!(
                "{} lines of {} columns do not fit in an image",
                line_count, max_columns
            )));
        };
        if width as u64 * height as u64 > MAX_PIXELS {
            return Err(Error::RenderError(format!(
                "{}x{} image exceeds the {} pixel limit",
                width, height, MAX_PIXELS
            )));
        }
        Ok((width, height))
    }

    /// Top-left corner of column `column` on zero-based line `line`.
    pub fn text_origin(&self, column: usize, line: usize) -> (u32, u32) {
        (
            self.image_pad + self.cell.advance * column as u32,
            self.image_pad + self.line_height() * line as u32,
        )
    }

    /// Background band for zero-based line `line`, from the text margin to
    /// the right edge of the image.
    pub fn highlight_rect(&self, line: usize, image_width: u32) -> Rect {
        let (x, y) = self.text_origin(0, line);
        Rect {
            x,
            y,
            width: image_width.saturating_sub(x),
            height: self.line_height(),
        }
    }
}

/// `pad * 2 + step * count`, or `None` on overflow.
fn padded_extent(step: u32, count: usize, pad: u32) -> Option<u32> {
    let count = u32::try_from(count).ok()?;
    step.checked_mul(count)?.checked_add(pad.checked_mul(2)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> TextLayout {
        TextLayout::new(CellMetrics { advance: 3, height: 3 }, 2, 10)
    }

    #[test]
    fn image_size_includes_padding() {
        assert_eq!(layout().image_size(4, 5).unwrap(), (32, 45));
        assert_eq!(layout().image_size(0, 0).unwrap(), (20, 20));
    }

    #[test]
    fn oversized_canvas_is_rejected_before_allocation() {
        let huge = TextLayout::new(CellMetrics { advance: 600_000, height: 600_000 }, 2, 10);
        assert!(matches!(huge.image_size(10, 3), Err(Error::RenderError(_))));

        // u32 overflow of a single dimension.
        let wide = TextLayout::new(CellMetrics { advance: u32::MAX / 2, height: 3 }, 2, 10);
        assert!(matches!(wide.image_size(3, 1), Err(Error::RenderError(_))));

        // Within u32 but over the pixel budget.
        assert!(matches!(layout().image_size(100_000, 100_000), Err(Error::RenderError(_))));
    }

    #[test]
    fn lines_stack_vertically() {
        let l = layout();
        assert_eq!(l.text_origin(0, 0), (10, 10));
        assert_eq!(l.text_origin(2, 3), (16, 25));
    }

    #[test]
    fn highlight_spans_to_right_edge() {
        let r = layout().highlight_rect(1, 32);
        assert_eq!(r, Rect { x: 10, y: 15, width: 22, height: 5 });
    }
}
