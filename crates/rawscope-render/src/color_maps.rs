//! Color map system.

use std::collections::HashMap;

use glam::Vec3;
use image::Rgb;

use crate::error::{RenderError, RenderResult};

/// A color map for mapping scalar values to colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    /// Color map name.
    pub name: String,
    /// Color samples (evenly spaced from 0 to 1).
    pub colors: Vec<Vec3>,
}

impl ColorMap {
    /// Creates a new color map.
    pub fn new(name: impl Into<String>, colors: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Linear black-to-white map.
    pub fn gray() -> Self {
        Self::new("gray", vec![Vec3::ZERO, Vec3::ONE])
    }

    /// Samples the color map at a given value (0 to 1). NaN samples the low end.
    pub fn sample(&self, t: f32) -> Vec3 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        if self.colors.is_empty() {
            return Vec3::ZERO;
        }

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let n = self.colors.len() - 1;
        let idx = (t * n as f32).floor() as usize;
        let idx = idx.min(n - 1);
        let frac = t * n as f32 - idx as f32;

        self.colors[idx].lerp(self.colors[idx + 1], frac)
    }

    /// Samples the color map as an 8-bit pixel.
    #[inline]
    pub fn sample_rgb(&self, t: f32) -> Rgb<u8> {
        to_rgb(self.sample(t))
    }
}

/// Converts a 0-1 RGB color to an 8-bit pixel.
#[inline]
pub fn to_rgb(color: Vec3) -> Rgb<u8> {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    Rgb([c.x as u8, c.y as u8, c.z as u8])
}

/// Registry for managing color maps.
#[derive(Default)]
pub struct ColorMapRegistry {
    color_maps: HashMap<String, ColorMap>,
}

impl ColorMapRegistry {
    /// Creates a new color map registry with default color maps.
    pub fn new() -> Self {
        let mut registry = Self::default();
        registry.register_defaults();
        registry
    }

    fn register_defaults(&mut self) {
        self.register(ColorMap::gray());

        // Inferno color map
        self.register(ColorMap::new(
            "inferno",
            vec![
                Vec3::new(0.001, 0.000, 0.014),
                Vec3::new(0.087, 0.045, 0.225),
                Vec3::new(0.258, 0.039, 0.406),
                Vec3::new(0.416, 0.090, 0.433),
                Vec3::new(0.578, 0.148, 0.404),
                Vec3::new(0.735, 0.216, 0.330),
                Vec3::new(0.865, 0.317, 0.226),
                Vec3::new(0.955, 0.463, 0.099),
                Vec3::new(0.988, 0.645, 0.040),
                Vec3::new(0.964, 0.844, 0.273),
                Vec3::new(0.988, 0.998, 0.645),
            ],
        ));

        // Viridis color map
        self.register(ColorMap::new(
            "viridis",
            vec![
                Vec3::new(0.267, 0.004, 0.329),
                Vec3::new(0.282, 0.140, 0.457),
                Vec3::new(0.253, 0.265, 0.529),
                Vec3::new(0.206, 0.371, 0.553),
                Vec3::new(0.163, 0.471, 0.558),
                Vec3::new(0.127, 0.566, 0.550),
                Vec3::new(0.134, 0.658, 0.517),
                Vec3::new(0.266, 0.749, 0.440),
                Vec3::new(0.477, 0.821, 0.318),
                Vec3::new(0.741, 0.873, 0.150),
                Vec3::new(0.993, 0.906, 0.144),
            ],
        ));
    }

    /// Registers a color map.
    pub fn register(&mut self, color_map: ColorMap) {
        self.color_maps.insert(color_map.name.clone(), color_map);
    }

    /// Gets a color map by name.
    pub fn get(&self, name: &str) -> Option<&ColorMap> {
        self.color_maps.get(name)
    }

    /// Gets a color map by name, or fails with [`RenderError::UnknownColorMap`].
    pub fn require(&self, name: &str) -> RenderResult<&ColorMap> {
        self.get(name)
            .ok_or_else(|| RenderError::UnknownColorMap(name.to_string()))
    }

    /// Returns all color map names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.color_maps.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
