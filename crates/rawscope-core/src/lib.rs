//! Core pipeline for rawscope.
//!
//! This crate provides everything needed to make sense of a headerless raw volume:
//! - [`infer`] guesses the voxel encoding from the byte length and the expected grid
//! - [`load`] decodes a [`ByteSource`] into a typed [`RawVolume`]
//! - [`compute_display_range`] and [`stretch`] map raw intensities into `[0, 1]`
//! - [`render`] extracts a slice and its iso-contour via [`marching_squares`]
//! - [`Controller`] drives slice/threshold updates against a [`RenderTarget`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Voxel counts and intensities move between usize, integer and float domains
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod encoding;
pub mod equalize;
pub mod error;
pub mod grid;
pub mod histogram;
pub mod inference;
pub mod interaction;
pub mod loader;
pub mod marching_squares;
pub mod normalize;
pub mod options;
pub mod slice;
pub mod volume;

pub use encoding::{ByteOrder, ElementType, VoxelEncoding};
pub use error::{RawscopeError, Result};
pub use grid::VoxelGridSpec;
pub use histogram::Histogram;
pub use inference::{infer, inspect_source, EncodingHint, FormatDiagnosis};
pub use interaction::{Controller, Frame, InteractionEvent, InteractionState, RenderTarget};
pub use loader::{decode, load, ArchiveEntrySource, ByteSource, FileSource, MemorySource};
pub use marching_squares::{marching_squares, Contour, ContourSet};
pub use normalize::{compute_display_range, stretch, stretch_values, DisplayRange};
pub use options::{Options, DEFAULT_DIMS, DEFAULT_PERCENTILES, DEFAULT_THRESHOLD};
pub use slice::{render, SliceView};
pub use volume::{NormalizedVolume, RawVolume, VolumeStats, VoxelData};

// Re-export glam types for convenience
pub use glam::{Vec2, Vec3};
