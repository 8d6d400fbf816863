//! Highlight styles and the palette derived from them.

use crate::{Error, Result};
use image::Rgb;
use syntect::highlighting::{Color, Theme, ThemeSet};
use two_face::theme::EmbeddedThemeName;

/// Style used when none is configured.
pub const DEFAULT_STYLE: &str = "monokai";

/// Named highlight themes: syntect's defaults plus Monokai from two-face.
pub struct ThemeCatalog {
    defaults: ThemeSet,
    monokai: Theme,
}

impl ThemeCatalog {
    pub fn load() -> Self {
        let extra = two_face::theme::extra();
        Self {
            defaults: ThemeSet::load_defaults(),
            monokai: extra.get(EmbeddedThemeName::MonokaiExtended).clone(),
        }
    }

    /// Look a theme up by name. `monokai` is matched case-insensitively;
    /// syntect names (`"InspiredGitHub"`, `"Solarized (dark)"`, ...) exactly.
    pub fn get(&self, name: &str) -> Result<&Theme> {
        if name.eq_ignore_ascii_case("monokai") || name.eq_ignore_ascii_case("monokai-extended") {
            return Ok(&self.monokai);
        }
        self.defaults
            .themes
            .get(name)
            .ok_or_else(|| Error::RenderError(format!("unknown highlight style {:?}", name)))
    }

    /// All style names accepted by [`ThemeCatalog::get`].
    pub fn names(&self) -> Vec<String> {
        let mut names = vec![DEFAULT_STYLE.to_string()];
        names.extend(self.defaults.themes.keys().cloned());
        names
    }
}

impl Default for ThemeCatalog {
    fn default() -> Self {
        Self::load()
    }
}

/// Flat colors used for the parts of the image that are not tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb<u8>,
    pub highlight: Rgb<u8>,
}

impl Palette {
    pub fn from_theme(theme: &Theme) -> Self {
        let background = theme
            .settings
            .background
            .map(|c| Rgb([c.r, c.g, c.b]))
            .unwrap_or(Rgb([0x27, 0x28, 0x22]));
        let highlight = theme
            .settings
            .line_highlight
            .map(|c| blend(c, background))
            .unwrap_or(Rgb([0x49, 0x48, 0x3e]));
        Self {
            background,
            highlight,
        }
    }
}

/// Composite a possibly translucent theme color over `under`.
pub fn blend(c: Color, under: Rgb<u8>) -> Rgb<u8> {
    let a = c.a as u32;
    let mix = |top: u8, bottom: u8| ((top as u32 * a + bottom as u32 * (255 - a)) / 255) as u8;
    Rgb([mix(c.r, under[0]), mix(c.g, under[1]), mix(c.b, under[2])])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monokai_is_available_by_default() {
        let catalog = ThemeCatalog::load();
        assert!(catalog.get(DEFAULT_STYLE).is_ok());
        assert!(catalog.get("Monokai").is_ok());
        assert!(catalog.get("InspiredGitHub").is_ok());
        assert!(catalog.names().iter().any(|n| n == "base16-ocean.dark"));
    }

    #[test]
    fn unknown_style_is_a_render_error() {
        let catalog = ThemeCatalog::load();
        assert!(matches!(catalog.get("no-such-style"), Err(Error::RenderError(_))));
    }

    #[test]
    fn blend_respects_alpha() {
        let under = Rgb([0, 0, 0]);
        assert_eq!(blend(Color { r: 200, g: 100, b: 50, a: 255 }, under), Rgb([200, 100, 50]));
        assert_eq!(blend(Color { r: 200, g: 100, b: 50, a: 0 }, under), Rgb([0, 0, 0]));
    }

    #[test]
    fn highlight_differs_from_background() {
        let catalog = ThemeCatalog::load();
        let palette = Palette::from_theme(catalog.get(DEFAULT_STYLE).unwrap());
        assert_ne!(palette.highlight, palette.background);
    }
}
