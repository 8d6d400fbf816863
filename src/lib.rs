//! codethumb
//!
//! Renders PNG thumbnails of source code with a range of lines highlighted,
//! optionally cropped to a fixed pixel height around that range, and serves
//! them to editors over a small line-delimited JSON-RPC transport.
//!
//! # Features
//!
//! - **Lexer registry**: languages chosen by filename, with content heuristics
//!   as the tiebreaker and as the fallback when no filename is known
//! - **Rasterizer**: syntect themes painted with a built-in bitmap font or a
//!   named system font (`system-fonts` feature, on by default)
//! - **RPC service**: `render`, `set_font_name` and friends over TCP; the bound
//!   port is printed on stdout at startup
//!
//! # Example
//!
//! ```no_run
//! use codethumb::{CodeThumb, RenderRequest, ThumbConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let thumb = CodeThumb::new(ThumbConfig::default())?;
//! let png = thumb.render(&RenderRequest {
//!     code: "def f():\n    return 1\n".to_string(),
//!     filename: Some("f.py".to_string()),
//!     hl_line_min: 2,
//!     hl_line_max: 2,
//!     height_px: None,
//! })?;
//! println!("{}x{} ({} bytes)", png.width, png.height, png.png_data.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod lexer;
pub mod rendering;
pub mod rpc;
pub mod thumb;

pub use rendering::Thumbnail;
pub use thumb::CodeThumb;

use serde::{Deserialize, Serialize};

/// Rendering configuration shared by every request.
///
/// The defaults produce small overview thumbnails:
/// - no `font_name`, which selects the built-in bitmap font
/// - a 3px font, so whole files fit in a few hundred pixels
/// - the `monokai` highlight style
///
/// # Examples
///
/// ```
/// let cfg = codethumb::ThumbConfig::default();
/// assert_eq!(cfg.style, "monokai");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbConfig {
    /// System font family; `None` uses the built-in bitmap font
    pub font_name: Option<String>,
    /// Font size in pixels
    pub font_size: f32,
    /// Highlight style (theme) name
    pub style: String,
    /// Extra pixels below each line
    pub line_pad: u32,
    /// Margin around the text on every side
    pub image_pad: u32,
}

impl Default for ThumbConfig {
    fn default() -> Self {
        Self {
            font_name: None,
            font_size: 3.0,
            style: rendering::theme::DEFAULT_STYLE.to_string(),
            line_pad: 2,
            image_pad: 10,
        }
    }
}

/// Where the RPC service listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub address: String,
    /// 0 binds any free port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "localhost".to_string(),
            port: 0,
        }
    }
}

/// One thumbnail request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Source text
    pub code: String,
    /// File name hint for lexer selection
    pub filename: Option<String>,
    /// First highlighted line (1-based, inclusive)
    pub hl_line_min: i64,
    /// Last highlighted line (1-based, inclusive)
    pub hl_line_max: i64,
    /// Crop the result to this many rows around the highlight
    pub height_px: Option<u32>,
}
