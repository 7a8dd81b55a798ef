//! rawscope: inspect and explore headerless raw volume scans.
//!
//! A raw scan is a flat blob of voxel intensities with no header. rawscope
//! infers its encoding from the byte length and the expected grid, loads it,
//! and renders diagnostic views and iso-contours of individual slices.
//!
//! # Quick Start
//!
//! ```no_run
//! use rawscope::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let options = Options {
//!         input: "head256x256x109".into(),
//!         ..Options::default()
//!     };
//!
//!     // Mid slice, histogram and stretched views as PNGs
//!     let report = run_inspection(&options)?;
//!     println!("{}", report.diagnosis);
//!
//!     // Drive the explorer from stdin
//!     let stdin = std::io::stdin();
//!     run_explorer(&options, stdin.lock(), std::io::stdout())?;
//!     Ok(())
//! }
//! ```
//!
//! # Crates
//!
//! - [`rawscope_core`]: inference, loading, normalization, marching squares, interaction
//! - [`rawscope_render`]: color maps, rasterization, PNG frame sink

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod explore;
pub mod inspect;
pub mod pipeline;

// Re-export core types
pub use rawscope_core::{
    compute_display_range, decode, equalize, infer, inspect_source, load, marching_squares,
    render, stretch, stretch_values, ArchiveEntrySource, ByteOrder, ByteSource, Contour,
    ContourSet, Controller, DisplayRange, ElementType, EncodingHint, FileSource, FormatDiagnosis,
    Frame, Histogram, InteractionEvent, InteractionState, MemorySource, NormalizedVolume, Options,
    RawVolume, RawscopeError, RenderTarget, Result, SliceView, Vec2, Vec3, VolumeStats,
    VoxelData, VoxelEncoding, VoxelGridSpec, DEFAULT_DIMS, DEFAULT_PERCENTILES, DEFAULT_THRESHOLD,
};

// Re-export render types
pub use rawscope_render::{
    draw_contours, plot_histogram, rasterize_slice, save_image, ColorMap, ColorMapRegistry,
    ImageOrigin, PngFrameSink, RenderError, CURRENT_FRAME,
};

pub use explore::{run_explorer, run_session, Command, ExplorerSummary};
pub use inspect::{inspect_loaded, run_inspection, InspectionReport};
pub use pipeline::{load_from, load_volume, LoadedVolume};

/// Installs the `env_logger` backend, reading `RUST_LOG` and defaulting to `info`.
///
/// Does nothing if a logger is already installed.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}
