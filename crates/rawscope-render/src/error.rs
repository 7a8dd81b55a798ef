//! Rendering error types.

use rawscope_core::RawscopeError;
use thiserror::Error;

/// Errors that can occur while rasterizing or writing images.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to write an image file.
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding failed.
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    /// File extension is not a supported image format.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// No color map registered under this name.
    #[error("unknown color map: {0}")]
    UnknownColorMap(String),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

impl From<RenderError> for RawscopeError {
    fn from(err: RenderError) -> Self {
        RawscopeError::Render(err.to_string())
    }
}
