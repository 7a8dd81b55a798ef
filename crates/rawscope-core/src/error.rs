//! Error types for rawscope.

use std::path::PathBuf;

use thiserror::Error;

use crate::encoding::VoxelEncoding;

/// The main error type for rawscope operations.
#[derive(Error, Debug)]
pub enum RawscopeError {
    /// Bytes-per-voxel matches no known layout.
    #[error(
        "unsupported encoding: {file_size} bytes over {voxel_count} voxels is {bytes_per_voxel:.2} \
         bytes per voxel; check the dimensions or whether the file is compressed or has a header"
    )]
    UnsupportedEncoding {
        file_size: u64,
        voxel_count: usize,
        bytes_per_voxel: f64,
    },

    /// Several encodings fit the byte length and the hint did not pick one.
    #[error("ambiguous encoding: candidates are {}", format_candidates(.candidates))]
    AmbiguousEncoding { candidates: Vec<VoxelEncoding> },

    /// The hint rules out every encoding that fits the byte length.
    #[error(
        "no encoding matches {hint}: the file size allows {}",
        format_candidates(.candidates)
    )]
    NoMatchingEncoding {
        hint: String,
        candidates: Vec<VoxelEncoding>,
    },

    /// Decoded element count disagrees with the grid.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Slice index outside the volume.
    #[error("slice index {index} out of range for depth {depth}")]
    IndexOutOfRange { index: usize, depth: usize },

    /// Grid dimensions are zero or overflow.
    #[error("invalid grid dimensions: {0}")]
    InvalidDimensions(String),

    /// Percentile pair is out of order or outside [0, 100].
    #[error("invalid percentiles: low {low}, high {high}")]
    InvalidPercentiles { low: f64, high: f64 },

    /// No finite values to summarize.
    #[error("volume has no finite values")]
    EmptyVolume,

    /// Archive entry not found.
    #[error("entry '{entry}' not found in archive {}", .archive.display())]
    EntryNotFound { archive: PathBuf, entry: String },

    /// Archive error.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Rendering error.
    #[error("render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_candidates(candidates: &[VoxelEncoding]) -> String {
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A specialized Result type for rawscope operations.
pub type Result<T> = std::result::Result<T, RawscopeError>;
