//! Expected voxel grid of a raw volume.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RawscopeError, Result};

/// The expected voxel grid, in (depth, height, width) order.
///
/// Depth is the slowest-varying axis on disk (Z), width the fastest (X).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[usize; 3]", into = "[usize; 3]")]
pub struct VoxelGridSpec {
    depth: usize,
    height: usize,
    width: usize,
}

impl VoxelGridSpec {
    /// Creates a grid spec. All axes must be positive and the voxel count must fit in `usize`.
    pub fn new(depth: usize, height: usize, width: usize) -> Result<Self> {
        if depth == 0 || height == 0 || width == 0 {
            return Err(RawscopeError::InvalidDimensions(format!(
                "{depth}x{height}x{width} has a zero axis"
            )));
        }
        depth
            .checked_mul(height)
            .and_then(|n| n.checked_mul(width))
            .ok_or_else(|| {
                RawscopeError::InvalidDimensions(format!("{depth}x{height}x{width} overflows"))
            })?;
        Ok(Self {
            depth,
            height,
            width,
        })
    }

    /// For known-valid constant dims.
    pub(crate) const fn from_dims_unchecked(dims: [usize; 3]) -> Self {
        Self {
            depth: dims[0],
            height: dims[1],
            width: dims[2],
        }
    }

    /// Number of slices.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Rows per slice.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Columns per row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Voxels in one slice.
    #[must_use]
    pub fn slice_len(&self) -> usize {
        self.height * self.width
    }

    /// Total voxel count.
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.depth * self.slice_len()
    }

    /// Index of the middle slice.
    #[must_use]
    pub fn mid_slice(&self) -> usize {
        self.depth / 2
    }

    /// Returns the dimensions as an array.
    #[must_use]
    pub fn dims(&self) -> [usize; 3] {
        [self.depth, self.height, self.width]
    }
}

impl TryFrom<[usize; 3]> for VoxelGridSpec {
    type Error = RawscopeError;

    fn try_from([depth, height, width]: [usize; 3]) -> Result<Self> {
        Self::new(depth, height, width)
    }
}

impl From<VoxelGridSpec> for [usize; 3] {
    fn from(spec: VoxelGridSpec) -> Self {
        spec.dims()
    }
}

impl fmt::Display for VoxelGridSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.depth, self.height, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        let grid = VoxelGridSpec::new(109, 256, 256).unwrap();
        assert_eq!(grid.voxel_count(), 109 * 256 * 256);
        assert_eq!(grid.slice_len(), 256 * 256);
        assert_eq!(grid.mid_slice(), 54);
        assert_eq!(grid.to_string(), "(109, 256, 256)");
    }

    #[test]
    fn test_zero_axis_rejected() {
        assert!(matches!(
            VoxelGridSpec::new(0, 4, 4),
            Err(RawscopeError::InvalidDimensions(_))
        ));
        assert!(VoxelGridSpec::new(4, 4, 0).is_err());
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(VoxelGridSpec::new(usize::MAX, 2, 2).is_err());
    }

    #[test]
    fn test_serde_as_array() {
        let grid = VoxelGridSpec::new(2, 3, 4).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[2,3,4]");
        let back: VoxelGridSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
        assert!(serde_json::from_str::<VoxelGridSpec>("[0,3,4]").is_err());
    }
}
