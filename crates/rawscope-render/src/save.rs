//! Writing rendered images to disk.

use std::path::Path;

use image::RgbImage;

use crate::error::{RenderError, RenderResult};

/// Saves an image, choosing the format from the file extension.
///
/// # Arguments
/// * `path` - Output path (supports .png, .jpg, .jpeg)
/// * `image` - The image to write
pub fn save_image(path: impl AsRef<Path>, image: &RgbImage) -> RenderResult<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let format = match extension.as_str() {
        "png" => image::ImageFormat::Png,
        "jpg" | "jpeg" => image::ImageFormat::Jpeg,
        _ => return Err(RenderError::UnsupportedFormat(extension)),
    };
    image.save_with_format(path, format)?;
    log::info!("wrote {}", path.display());
    Ok(())
}
