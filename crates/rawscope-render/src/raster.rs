//! Slice rasterization and contour overlays.

use glam::{Vec2, Vec3};
use image::RgbImage;
use rawscope_core::{ContourSet, SliceView};

use crate::color_maps::{to_rgb, ColorMap};

/// Where row 0 of a slice is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageOrigin {
    /// Row 0 at the top of the image.
    UpperLeft,
    /// Row 0 at the bottom of the image.
    #[default]
    LowerLeft,
}

/// Colors a slice through `color_map`, mapping `range.0..=range.1` onto `0..=1`.
///
/// Each slice cell becomes a `scale x scale` block of pixels. A degenerate
/// range maps everything to the low end.
pub fn rasterize_slice(
    slice: &SliceView<'_>,
    color_map: &ColorMap,
    range: (f32, f32),
    origin: ImageOrigin,
    scale: u32,
) -> RgbImage {
    let scale = scale.max(1);
    let (rows, cols) = slice.shape();
    let width = cols as u32 * scale;
    let height = rows as u32 * scale;
    let span = range.1 - range.0;

    RgbImage::from_fn(width, height, |px, py| {
        let col = (px / scale) as usize;
        let row = match origin {
            ImageOrigin::UpperLeft => (py / scale) as usize,
            ImageOrigin::LowerLeft => rows - 1 - (py / scale) as usize,
        };
        let value = slice.get(row, col);
        let t = if span > 0.0 {
            (value - range.0) / span
        } else {
            0.0
        };
        color_map.sample_rgb(t)
    })
}

/// Maps a grid-space point (`x` = column, `y` = row) to pixel space.
fn to_pixel(p: Vec2, image_height: u32, origin: ImageOrigin, scale: u32) -> Vec2 {
    let s = scale as f32;
    let x = (p.x + 0.5) * s;
    let y = match origin {
        ImageOrigin::UpperLeft => (p.y + 0.5) * s,
        ImageOrigin::LowerLeft => image_height as f32 - (p.y + 0.5) * s,
    };
    Vec2::new(x, y)
}

/// Draws every contour segment onto `image` in `color`.
///
/// `scale` and `origin` must match the ones used by [`rasterize_slice`].
pub fn draw_contours(
    image: &mut RgbImage,
    contours: &ContourSet,
    color: Vec3,
    origin: ImageOrigin,
    scale: u32,
) {
    let scale = scale.max(1);
    let pixel = to_rgb(color);
    let height = image.height();
    for contour in contours.iter() {
        for (a, b) in contour.segments() {
            let a = to_pixel(a, height, origin, scale);
            let b = to_pixel(b, height, origin, scale);
            draw_line(image, a, b, pixel);
        }
    }
}

/// Steps along the segment one pixel at a time, clipping at the image border.
fn draw_line(image: &mut RgbImage, a: Vec2, b: Vec2, pixel: image::Rgb<u8>) {
    let steps = (b - a).abs().max_element().ceil().max(1.0) as u32;
    for i in 0..=steps {
        let p = a.lerp(b, i as f32 / steps as f32);
        if p.x < 0.0 || p.y < 0.0 {
            continue;
        }
        let (x, y) = (p.x as u32, p.y as u32);
        if x < image.width() && y < image.height() {
            image.put_pixel(x, y, pixel);
        }
    }
}
