//! Voxel encoding inference from byte length.
//!
//! A headerless volume carries no description of its own layout. Given the
//! expected grid, the only evidence left is the byte length: it must be an
//! exact multiple of the voxel count, and the multiple selects the layout.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::encoding::{ByteOrder, ElementType, VoxelEncoding};
use crate::error::{RawscopeError, Result};
use crate::grid::VoxelGridSpec;
use crate::loader::ByteSource;

/// Caller-supplied information used to pick among candidate encodings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingHint {
    /// No extra information; only an unambiguous diagnosis resolves.
    #[default]
    None,
    /// The element type is known.
    Explicit(ElementType),
    /// Intensities are expected to fall within this range.
    ExpectedRange { min: f64, max: f64 },
}

impl fmt::Display for EncodingHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingHint::None => f.write_str("no hint"),
            EncodingHint::Explicit(element_type) => write!(f, "element type {element_type}"),
            EncodingHint::ExpectedRange { min, max } => {
                write!(f, "expected range [{min}, {max}]")
            }
        }
    }
}

/// Result of inspecting a byte length against a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatDiagnosis {
    /// Total byte length.
    pub file_size: u64,
    /// Voxels in the expected grid.
    pub voxel_count: usize,
    /// `file_size / voxel_count`.
    pub bytes_per_voxel: f64,
    /// Encodings consistent with the byte length, in preference order.
    pub candidates: Vec<VoxelEncoding>,
}

impl FormatDiagnosis {
    /// Whether more than one encoding fits.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }

    /// Picks a single encoding using `hint`, applying `byte_order` to the result.
    pub fn resolve(&self, hint: &EncodingHint, byte_order: ByteOrder) -> Result<VoxelEncoding> {
        let matching: Vec<VoxelEncoding> = match *hint {
            EncodingHint::None => self.candidates.clone(),
            EncodingHint::Explicit(element_type) => self
                .candidates
                .iter()
                .copied()
                .filter(|c| c.element_type == element_type)
                .collect(),
            EncodingHint::ExpectedRange { min, max } => self
                .candidates
                .iter()
                .copied()
                .filter(|c| c.element_type.can_represent(min, max))
                .collect(),
        };

        match matching.as_slice() {
            [single] => Ok(single.with_byte_order(byte_order)),
            [] => Err(RawscopeError::NoMatchingEncoding {
                hint: hint.to_string(),
                candidates: self.candidates.clone(),
            }),
            _ => Err(RawscopeError::AmbiguousEncoding {
                candidates: matching,
            }),
        }
    }
}

impl fmt::Display for FormatDiagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File size: {} bytes", self.file_size)?;
        writeln!(f, "Bytes per voxel: {:.2}", self.bytes_per_voxel)?;
        let names: Vec<String> = self.candidates.iter().map(ToString::to_string).collect();
        write!(f, "Candidate encodings: {}", names.join(", "))
    }
}

/// Infers candidate encodings from a byte length.
///
/// Exact multiples only: 1 byte per voxel is `uint8`, 2 is `int16` or `uint16`
/// (ambiguous), 3 is three interleaved `uint8` channels.
pub fn infer(file_size: u64, grid: &VoxelGridSpec) -> Result<FormatDiagnosis> {
    let voxel_count = grid.voxel_count();
    let bytes_per_voxel = file_size as f64 / voxel_count as f64;
    log::info!("File size: {file_size} bytes");
    log::info!("Bytes per voxel: {bytes_per_voxel:.2}");

    let unsupported = || RawscopeError::UnsupportedEncoding {
        file_size,
        voxel_count,
        bytes_per_voxel,
    };

    let voxel_count_u64 = voxel_count as u64;
    if file_size % voxel_count_u64 != 0 {
        return Err(unsupported());
    }

    let candidates = match file_size / voxel_count_u64 {
        1 => vec![VoxelEncoding::scalar(ElementType::UInt8)],
        2 => vec![
            VoxelEncoding::scalar(ElementType::Int16),
            VoxelEncoding::scalar(ElementType::UInt16),
        ],
        3 => vec![VoxelEncoding::vector(ElementType::UInt8, 3)],
        _ => return Err(unsupported()),
    };

    Ok(FormatDiagnosis {
        file_size,
        voxel_count,
        bytes_per_voxel,
        candidates,
    })
}

/// Runs [`infer`] on the byte length of `source` without reading its content.
pub fn inspect_source(source: &dyn ByteSource, grid: &VoxelGridSpec) -> Result<FormatDiagnosis> {
    let len = source.byte_len()?;
    log::debug!("inspecting {}", source.describe());
    infer(len, grid)
}
