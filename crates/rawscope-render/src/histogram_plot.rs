//! Bar plot of an intensity histogram.

use glam::Vec3;
use image::{Rgb, RgbImage};
use rawscope_core::Histogram;

use crate::color_maps::to_rgb;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Draws `histogram` as bars on a white `width x height` image.
///
/// Bar heights are relative to the largest bin. Bins share the width evenly;
/// when there are more bins than pixel columns, neighbouring bins share a column.
pub fn plot_histogram(histogram: &Histogram, width: u32, height: u32, color: Vec3) -> RgbImage {
    let mut image = RgbImage::from_pixel(width.max(1), height.max(1), BACKGROUND);
    let peak = histogram.peak();
    let bins = histogram.bins();
    if peak == 0 || bins == 0 {
        return image;
    }

    let (width, height) = image.dimensions();
    let bar = to_rgb(color);
    for x in 0..width {
        let bin = (x as usize * bins / width as usize).min(bins - 1);
        let fraction = histogram.counts[bin] as f64 / peak as f64;
        let bar_height = (fraction * f64::from(height)).round() as u32;
        for y in height - bar_height.min(height)..height {
            image.put_pixel(x, y, bar);
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tallest_bar_fills_column() {
        let hist = Histogram {
            min: 0.0,
            max: 1.0,
            counts: vec![1, 4, 2, 0],
        };
        let img = plot_histogram(&hist, 8, 10, Vec3::ZERO);
        assert_eq!(img.dimensions(), (8, 10));

        let black = Rgb([0, 0, 0]);
        // Bin 1 covers columns 2..4 and reaches the top
        assert_eq!(*img.get_pixel(2, 0), black);
        // Bin 0 is a quarter of the peak
        assert_eq!(*img.get_pixel(0, 9), black);
        assert_eq!(*img.get_pixel(0, 6), BACKGROUND);
        // Empty bin draws nothing
        assert!((0..10).all(|y| *img.get_pixel(7, y) == BACKGROUND));
    }

    #[test]
    fn test_empty_histogram_is_blank() {
        let hist = Histogram::compute(std::iter::empty::<f32>(), 10);
        let img = plot_histogram(&hist, 20, 5, Vec3::ZERO);
        assert!(img.pixels().all(|p| *p == BACKGROUND));
    }
}
