//! Slice extraction and the per-frame render step.

use std::borrow::Cow;

use crate::error::{RawscopeError, Result};
use crate::marching_squares::{marching_squares, ContourSet};
use crate::volume::{NormalizedVolume, RawVolume};

/// A read-only `(height, width)` field taken at one depth index.
///
/// Single-channel volumes are borrowed; for multi-channel volumes channel 0 is
/// copied out.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceView<'a> {
    index: usize,
    width: usize,
    height: usize,
    values: Cow<'a, [f32]>,
}

impl<'a> SliceView<'a> {
    /// Extracts channel 0 of slice `index`.
    pub fn extract(volume: &'a NormalizedVolume, index: usize) -> Result<Self> {
        let grid = volume.grid();
        if index >= grid.depth() {
            return Err(RawscopeError::IndexOutOfRange {
                index,
                depth: grid.depth(),
            });
        }

        let channels = volume.channel_count();
        let len = grid.slice_len();
        let start = index * len * channels;
        let plane = &volume.values()[start..start + len * channels];
        let values = if channels == 1 {
            Cow::Borrowed(plane)
        } else {
            Cow::Owned(plane.iter().step_by(channels).copied().collect())
        };

        Ok(Self {
            index,
            width: grid.width(),
            height: grid.height(),
            values,
        })
    }

    /// Depth index this slice was taken at.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Value at `(row, col)`.
    ///
    /// # Panics
    /// Panics if `row >= height` or `col >= width`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(row < self.height && col < self.width, "slice index ({row}, {col}) out of bounds");
        self.values[row * self.width + col]
    }

    /// Row-major values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Smallest and largest finite value, or `None` if there are none.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Iso-contours of this slice at `level`.
    pub fn contours(&self, level: f32) -> ContourSet {
        marching_squares(&self.values, level, self.width, self.height)
    }
}

impl SliceView<'static> {
    /// Copies channel 0 of slice `index` of a raw volume as floats.
    pub fn from_raw(volume: &RawVolume, index: usize) -> Result<Self> {
        let grid = volume.grid();
        if index >= grid.depth() {
            return Err(RawscopeError::IndexOutOfRange {
                index,
                depth: grid.depth(),
            });
        }

        let channels = volume.channel_count();
        let start = index * grid.slice_len() * channels;
        let values = (0..grid.slice_len())
            .map(|i| volume.data().get_f32(start + i * channels))
            .collect();

        Ok(Self {
            index,
            width: grid.width(),
            height: grid.height(),
            values: Cow::Owned(values),
        })
    }
}

/// Extracts slice `slice_index` and its iso-contour at `threshold`.
///
/// Recomputes everything on each call.
pub fn render(
    volume: &NormalizedVolume,
    slice_index: usize,
    threshold: f32,
) -> Result<(SliceView<'_>, ContourSet)> {
    let slice = SliceView::extract(volume, slice_index)?;
    let contours = slice.contours(threshold);
    Ok((slice, contours))
}
