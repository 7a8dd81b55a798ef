//! Configuration options for rawscope.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::encoding::ByteOrder;
use crate::error::Result;
use crate::grid::VoxelGridSpec;
use crate::inference::EncodingHint;
use crate::interaction::InteractionState;
use crate::loader::{ArchiveEntrySource, ByteSource, FileSource};

/// Default grid `(depth, height, width)` of the head CT scan.
pub const DEFAULT_DIMS: [usize; 3] = [109, 256, 256];

/// Default display-range percentiles.
pub const DEFAULT_PERCENTILES: (f64, f64) = (2.0, 98.0);

/// Default iso-contour threshold.
pub const DEFAULT_THRESHOLD: f32 = 0.2;

/// Options for one inspection or exploration run.
///
/// Every field has a default, so a JSON config only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Raw volume file, or the zip archive holding it.
    pub input: PathBuf,

    /// Entry to read when `input` is a zip archive.
    pub archive_entry: Option<String>,

    /// Expected grid.
    pub dims: VoxelGridSpec,

    /// Low and high percentiles of the display range.
    pub percentiles: (f64, f64),

    /// Slice shown first; `None` for the middle slice.
    pub initial_slice: Option<usize>,

    /// Iso-contour threshold shown first.
    pub threshold: f32,

    /// Byte order of multi-byte elements.
    pub byte_order: ByteOrder,

    /// Disambiguates two-byte encodings.
    pub encoding_hint: EncodingHint,

    /// Directory for rendered images.
    pub output_dir: PathBuf,

    /// Color map name for the explorer view.
    pub colormap: String,

    /// Contour line color (RGB, 0-1).
    pub contour_color: Vec3,

    /// Integer upscaling of rendered slices.
    pub scale: u32,

    /// Keep every explorer frame as a numbered file instead of replacing one.
    pub keep_frames: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            input: PathBuf::from("head256x256x109"),
            archive_entry: None,
            dims: VoxelGridSpec::from_dims_unchecked(DEFAULT_DIMS),
            percentiles: DEFAULT_PERCENTILES,
            initial_slice: None,
            threshold: DEFAULT_THRESHOLD,
            byte_order: ByteOrder::Native,
            encoding_hint: EncodingHint::None,
            output_dir: PathBuf::from("rawscope-out"),
            colormap: "gray".to_string(),
            contour_color: Vec3::new(0.0, 0.0, 1.0),
            scale: 2,
            keep_frames: false,
        }
    }
}

impl Options {
    /// Parses options from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let options = Self::from_json_str(&text)?;
        log::debug!("loaded options from {}", path.as_ref().display());
        Ok(options)
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The expected grid.
    #[must_use]
    pub fn grid(&self) -> &VoxelGridSpec {
        &self.dims
    }

    /// Byte source for the configured input.
    #[must_use]
    pub fn source(&self) -> Box<dyn ByteSource> {
        match &self.archive_entry {
            Some(entry) => Box::new(ArchiveEntrySource::new(&self.input, entry.clone())),
            None => Box::new(FileSource::new(&self.input)),
        }
    }

    /// Starting explorer state, clamped to the grid.
    #[must_use]
    pub fn initial_state(&self) -> InteractionState {
        InteractionState::initial(&self.dims, self.initial_slice, self.threshold)
    }
}
