//! Error types for the thumbnail service

use thiserror::Error;

/// Result type alias for thumbnail operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, rendering or serving a thumbnail
#[derive(Error, Debug)]
pub enum Error {
    /// No lexer matched the filename or the source content
    #[error("Lexer resolution failed: {0}")]
    LexerResolutionError(String),

    /// Tokenizing, rasterizing or encoding failed (includes unknown fonts)
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// The crop window could not be computed
    #[error("Crop failed: {0}")]
    CropError(String),

    /// Malformed request, unknown method or bad arguments
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Socket or stdio failure
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Error code reported in RPC error responses.
    ///
    /// Protocol errors use the JSON-RPC reserved range; domain failures use
    /// small positive codes so clients can tell them apart.
    pub fn rpc_code(&self) -> i64 {
        match self {
            Error::LexerResolutionError(_) => 1,
            Error::RenderError(_) => 2,
            Error::CropError(_) => 3,
            Error::ConfigError(_) => 4,
            Error::ProtocolError(_) => -32602,
            Error::IoError(_) => -32603,
        }
    }

    /// Rebuild an error from a code and message received over the wire.
    pub fn from_rpc(code: i64, message: String) -> Self {
        match code {
            1 => Error::LexerResolutionError(message),
            2 => Error::RenderError(message),
            3 => Error::CropError(message),
            4 => Error::ConfigError(message),
            _ => Error::ProtocolError(message),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::RenderError(err.to_string())
    }
}
