//! Rendering collaborator for rawscope.
//!
//! This crate turns slices, contour sets and histograms into RGB images:
//! - Color maps (`gray`, `inferno`, `viridis`)
//! - Slice rasterization with contour overlays
//! - Histogram bar plots
//! - [`PngFrameSink`], a [`rawscope_core::RenderTarget`] writing PNG frames

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Pixel coordinates move between u32, usize and f32
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod color_maps;
pub mod error;
pub mod histogram_plot;
pub mod png_sink;
pub mod raster;
pub mod save;

pub use color_maps::{to_rgb, ColorMap, ColorMapRegistry};
pub use error::{RenderError, RenderResult};
pub use histogram_plot::plot_histogram;
pub use png_sink::{PngFrameSink, CURRENT_FRAME};
pub use raster::{draw_contours, rasterize_slice, ImageOrigin};
pub use save::save_image;

pub use image::RgbImage;
