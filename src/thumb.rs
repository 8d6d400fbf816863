//! The thumbnail service: lexer resolution, rendering and cropping behind a
//! shared, mutable configuration.

use crate::lexer::{line_count, LexerRegistry};
use crate::rendering::crop::{center_ratio, crop_rows, crop_window};
use crate::rendering::font::GlyphFace;
use crate::rendering::layout::TextLayout;
use crate::rendering::raster::{rasterize, HighlightRange};
use crate::rendering::theme::ThemeCatalog;
use crate::rendering::Thumbnail;
use crate::{Error, RenderRequest, Result, ThumbConfig};
use log::debug;
use std::sync::{PoisonError, RwLock};

/// Largest accepted font size, in pixels.
pub const MAX_FONT_SIZE: f32 = 256.0;

fn check_font_size(size: f32) -> Result<()> {
    if !(size.is_finite() && size > 0.0 && size <= MAX_FONT_SIZE) {
        return Err(Error::ConfigError(format!(
            "font size must be in (0, {}], got {}",
            MAX_FONT_SIZE, size
        )));
    }
    Ok(())
}

/// Renders code thumbnails. Cheap to share behind an `Arc`; configuration
/// changes are visible to every later render.
pub struct CodeThumb {
    registry: LexerRegistry,
    themes: ThemeCatalog,
    config: RwLock<ThumbConfig>,
}

impl CodeThumb {
    /// Build a service over the extended syntax and theme collections.
    pub fn new(config: ThumbConfig) -> Result<Self> {
        Self::with_registry(config, LexerRegistry::with_extended_syntaxes())
    }

    pub fn with_registry(config: ThumbConfig, registry: LexerRegistry) -> Result<Self> {
        let themes = ThemeCatalog::load();
        themes
            .get(&config.style)
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        check_font_size(config.font_size)?;
        Ok(Self {
            registry,
            themes,
            config: RwLock::new(config),
        })
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> ThumbConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Set the font used by later renders. The name is not checked here; an
    /// unknown font fails the next render. `None` selects the built-in font.
    pub fn set_font_name(&self, name: Option<String>) {
        debug!("font name set to {:?}", name);
        self.config
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .font_name = name;
    }

    pub fn set_style(&self, name: &str) -> Result<()> {
        self.themes.get(name)?;
        self.config
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .style = name.to_string();
        Ok(())
    }

    pub fn set_font_size(&self, size: f32) -> Result<()> {
        check_font_size(size)?;
        self.config
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .font_size = size;
        Ok(())
    }

    /// Style names accepted by [`CodeThumb::set_style`].
    pub fn styles(&self) -> Vec<String> {
        self.themes.names()
    }

    pub fn registry(&self) -> &LexerRegistry {
        &self.registry
    }

    /// Render `request` to a PNG thumbnail.
    pub fn render(&self, request: &RenderRequest) -> Result<Thumbnail> {
        let config = self.config();

        let lexer = self
            .registry
            .resolve(request.filename.as_deref(), &request.code)?;
        let lines = lexer.tokenize(&request.code)?;

        let theme = self.themes.get(&config.style)?;
        let face = GlyphFace::load(config.font_name.as_deref(), config.font_size)?;
        let layout = TextLayout::new(face.metrics(), config.line_pad, config.image_pad);
        let highlight = HighlightRange::new(request.hl_line_min, request.hl_line_max);
        let img = rasterize(&lines, &face, &layout, theme, highlight)?;

        debug!(
            "rendered {} lines with {} lexer into {}x{}",
            lines.len(),
            lexer.name(),
            img.width(),
            img.height()
        );

        let Some(crop_height) = request.height_px else {
            return Thumbnail::encode(&img);
        };

        let ratio = center_ratio(
            request.hl_line_min,
            request.hl_line_max,
            line_count(&request.code),
        )?;
        let window = crop_window(ratio, img.height(), crop_height)?;
        if window.is_full(img.height()) {
            return Thumbnail::encode(&img);
        }
        debug!("cropping rows {}..{}", window.upper, window.lower);
        Thumbnail::encode(&crop_rows(&img, window))
    }
}

impl std::fmt::Debug for CodeThumb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeThumb")
            .field("lexers", &self.registry.len())
            .field("config", &self.config())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(code: &str, first: i64, last: i64, height: Option<u32>) -> RenderRequest {
        RenderRequest {
            code: code.to_string(),
            filename: Some("sample.py".to_string()),
            hl_line_min: first,
            hl_line_max: last,
            height_px: height,
        }
    }

    #[test]
    fn rejects_unknown_style_at_startup() {
        let cfg = ThumbConfig {
            style: "nope".into(),
            ..Default::default()
        };
        assert!(matches!(CodeThumb::new(cfg), Err(Error::ConfigError(_))));
    }

    #[test]
    fn set_font_name_is_lazy() {
        let thumb = CodeThumb::new(ThumbConfig::default()).unwrap();
        thumb.set_font_name(Some("NoSuchFont".into()));
        assert_eq!(thumb.config().font_name.as_deref(), Some("NoSuchFont"));

        let err = thumb.render(&request("print(1)\n", 1, 1, None)).unwrap_err();
        assert!(matches!(err, Error::RenderError(_)));

        thumb.set_font_name(None);
        assert!(thumb.render(&request("print(1)\n", 1, 1, None)).is_ok());
    }

    #[test]
    fn uncropped_size_follows_layout() {
        let thumb = CodeThumb::new(ThumbConfig::default()).unwrap();
        let t = thumb.render(&request("ab\nc\n", 1, 1, None)).unwrap();
        // 3px cells, 2px line pad, 10px margins.
        assert_eq!((t.width, t.height), (26, 30));
    }

    #[test]
    fn crop_on_empty_source_is_a_crop_error() {
        let thumb = CodeThumb::new(ThumbConfig::default()).unwrap();
        let err = thumb.render(&request("", 1, 1, Some(10))).unwrap_err();
        assert!(matches!(err, Error::CropError(_)));
    }

    #[test]
    fn config_setters_validate() {
        let thumb = CodeThumb::new(ThumbConfig::default()).unwrap();
        assert!(thumb.styles().iter().any(|s| s == "InspiredGitHub"));
        assert!(thumb.set_style("InspiredGitHub").is_ok());
        assert_eq!(thumb.config().style, "InspiredGitHub");
        assert!(thumb.set_style("bogus").is_err());
        assert!(thumb.set_font_size(-1.0).is_err());
        assert!(thumb.set_font_size(6.0).is_ok());
        assert_eq!(thumb.config().font_size, 6.0);
    }

    #[test]
    fn huge_font_size_is_refused() {
        let thumb = CodeThumb::new(ThumbConfig::default()).unwrap();
        assert!(matches!(thumb.set_font_size(600_000.0), Err(Error::ConfigError(_))));
        assert_eq!(thumb.config().font_size, 3.0);
        assert!(thumb.render(&request("print(1)\n", 1, 1, None)).is_ok());

        let cfg = ThumbConfig {
            font_size: 600_000.0,
            ..Default::default()
        };
        assert!(matches!(CodeThumb::new(cfg), Err(Error::ConfigError(_))));
    }

    #[test]
    fn oversized_image_is_a_render_error() {
        let thumb = CodeThumb::new(ThumbConfig::default()).unwrap();
        thumb.set_font_size(MAX_FONT_SIZE).unwrap();
        let line = "x".repeat(20_000);
        let err = thumb.render(&request(&line, 1, 1, None)).unwrap_err();
        assert!(matches!(err, Error::RenderError(_)));
    }

    #[test]
    fn extreme_line_numbers_crop_cleanly() {
        let thumb = CodeThumb::new(ThumbConfig::default()).unwrap();
        let code = "a = 1\nb = 2\nc = 3\n";
        let full = thumb.render(&request(code, 1, 1, None)).unwrap();

        let t = thumb.render(&request(code, i64::MAX, i64::MAX, Some(10))).unwrap();
        assert_eq!((t.width, t.height), (full.width, 10));
        let t = thumb.render(&request(code, i64::MIN, i64::MIN, Some(10))).unwrap();
        assert_eq!(t.height, 10);
    }
}
