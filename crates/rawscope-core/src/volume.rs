//! Typed and normalized volume storage.

use std::fmt;

use byteorder::{BigEndian, ByteOrder as _, LittleEndian, NativeEndian};

use crate::encoding::{ByteOrder, ElementType, VoxelEncoding};
use crate::error::{RawscopeError, Result};
use crate::grid::VoxelGridSpec;
use crate::normalize::{compute_display_range, DisplayRange};

/// Flat voxel storage, channels interleaved, depth-major.
#[derive(Debug, Clone, PartialEq)]
pub enum VoxelData {
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
}

impl VoxelData {
    /// Number of stored elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::UInt8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::UInt16(v) => v.len(),
        }
    }

    /// Returns true if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type of the storage.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::UInt8(_) => ElementType::UInt8,
            Self::Int16(_) => ElementType::Int16,
            Self::UInt16(_) => ElementType::UInt16,
        }
    }

    /// Element at `index` widened to `f32`.
    #[must_use]
    pub fn get_f32(&self, index: usize) -> f32 {
        match self {
            Self::UInt8(v) => f32::from(v[index]),
            Self::Int16(v) => f32::from(v[index]),
            Self::UInt16(v) => f32::from(v[index]),
        }
    }

    /// Iterates over all elements widened to `f32`.
    pub fn iter_f32(&self) -> Box<dyn Iterator<Item = f32> + '_> {
        match self {
            Self::UInt8(v) => Box::new(v.iter().map(|&x| f32::from(x))),
            Self::Int16(v) => Box::new(v.iter().map(|&x| f32::from(x))),
            Self::UInt16(v) => Box::new(v.iter().map(|&x| f32::from(x))),
        }
    }

    /// Serializes the elements with the given byte order.
    #[must_use]
    pub fn to_bytes(&self, byte_order: ByteOrder) -> Vec<u8> {
        match self {
            Self::UInt8(v) => v.clone(),
            Self::Int16(v) => {
                let mut out = vec![0_u8; v.len() * 2];
                match byte_order {
                    ByteOrder::Native => NativeEndian::write_i16_into(v, &mut out),
                    ByteOrder::Little => LittleEndian::write_i16_into(v, &mut out),
                    ByteOrder::Big => BigEndian::write_i16_into(v, &mut out),
                }
                out
            }
            Self::UInt16(v) => {
                let mut out = vec![0_u8; v.len() * 2];
                match byte_order {
                    ByteOrder::Native => NativeEndian::write_u16_into(v, &mut out),
                    ByteOrder::Little => LittleEndian::write_u16_into(v, &mut out),
                    ByteOrder::Big => BigEndian::write_u16_into(v, &mut out),
                }
                out
            }
        }
    }
}

/// A decoded volume, shaped `(depth, height, width[, channels])`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVolume {
    grid: VoxelGridSpec,
    channel_count: usize,
    data: VoxelData,
}

impl RawVolume {
    /// Wraps flat data. The length must equal `voxel_count * channel_count`.
    pub fn new(grid: VoxelGridSpec, channel_count: usize, data: VoxelData) -> Result<Self> {
        let expected = grid.voxel_count() * channel_count;
        if channel_count == 0 || data.len() != expected {
            return Err(RawscopeError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            grid,
            channel_count,
            data,
        })
    }

    /// The voxel grid.
    #[must_use]
    pub fn grid(&self) -> &VoxelGridSpec {
        &self.grid
    }

    /// Interleaved channels per voxel.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Element type.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    /// The underlying storage.
    #[must_use]
    pub fn data(&self) -> &VoxelData {
        &self.data
    }

    /// Array shape; the channel axis is present only for multi-channel volumes.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = self.grid.dims().to_vec();
        if self.channel_count > 1 {
            shape.push(self.channel_count);
        }
        shape
    }

    /// Element at `(z, y, x, channel)` widened to `f32`.
    #[must_use]
    pub fn get(&self, z: usize, y: usize, x: usize, channel: usize) -> f32 {
        let voxel = (z * self.grid.height() + y) * self.grid.width() + x;
        self.data.get_f32(voxel * self.channel_count + channel)
    }

    /// Encoding that reproduces this volume's bytes with `byte_order`.
    #[must_use]
    pub fn encoding(&self, byte_order: ByteOrder) -> VoxelEncoding {
        VoxelEncoding {
            element_type: self.element_type(),
            channel_count: self.channel_count,
            byte_order,
        }
    }

    /// Serializes the volume to raw bytes.
    #[must_use]
    pub fn to_bytes(&self, byte_order: ByteOrder) -> Vec<u8> {
        self.data.to_bytes(byte_order)
    }

    /// Summary statistics over all elements.
    #[must_use]
    pub fn stats(&self) -> VolumeStats {
        let (min, max) = self
            .data
            .iter_f32()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        VolumeStats {
            shape: self.shape(),
            element_type: self.element_type(),
            channel_count: self.channel_count,
            min,
            max,
        }
    }

    /// Global percentile display range over every element.
    pub fn display_range(&self, low_pct: f64, high_pct: f64) -> Result<DisplayRange> {
        let values: Vec<f32> = self.data.iter_f32().collect();
        compute_display_range(&values, low_pct, high_pct)
    }

    /// Scales intensities to `[0, 1]` by the element type's maximum.
    ///
    /// Negative signed values clamp to 0.
    #[must_use]
    pub fn to_unit_range(&self) -> NormalizedVolume {
        let max = self.element_type().max_value() as f32;
        let values = self
            .data
            .iter_f32()
            .map(|v| (v / max).clamp(0.0, 1.0))
            .collect();
        NormalizedVolume::from_parts(self.grid, self.channel_count, values)
    }
}

/// Shape, type and range of a volume, as reported by inspection.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeStats {
    pub shape: Vec<usize>,
    pub element_type: ElementType,
    pub channel_count: usize,
    pub min: f32,
    pub max: f32,
}

impl VolumeStats {
    /// Human-readable interpretation of the channel layout.
    #[must_use]
    pub fn interpretation(&self) -> String {
        if self.channel_count > 1 {
            format!(
                "Likely vector with {} channels (e.g., color).",
                self.channel_count
            )
        } else {
            "Likely scalar intensities.".to_string()
        }
    }
}

impl fmt::Display for VolumeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.interpretation())?;
        writeln!(f, "Shape: {:?}", self.shape)?;
        writeln!(f, "Dtype: {}", self.element_type)?;
        write!(f, "Min/Max: {} {}", self.min, self.max)
    }
}

/// A float volume with intensities in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedVolume {
    grid: VoxelGridSpec,
    channel_count: usize,
    values: Vec<f32>,
}

impl NormalizedVolume {
    /// Wraps flat values. The length must equal `voxel_count * channel_count`.
    pub fn new(grid: VoxelGridSpec, channel_count: usize, values: Vec<f32>) -> Result<Self> {
        let expected = grid.voxel_count() * channel_count;
        if channel_count == 0 || values.len() != expected {
            return Err(RawscopeError::SizeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            grid,
            channel_count,
            values,
        })
    }

    /// The voxel grid.
    #[must_use]
    pub fn grid(&self) -> &VoxelGridSpec {
        &self.grid
    }

    /// Interleaved channels per voxel.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Flat values.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Array shape; the channel axis is present only for multi-channel volumes.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = self.grid.dims().to_vec();
        if self.channel_count > 1 {
            shape.push(self.channel_count);
        }
        shape
    }

    /// Unchecked constructor for values derived element-by-element from a checked volume.
    pub(crate) fn from_parts(grid: VoxelGridSpec, channel_count: usize, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), grid.voxel_count() * channel_count);
        Self {
            grid,
            channel_count,
            values,
        }
    }

    /// Builds a volume with the same shape from new values.
    #[cfg(feature = "equalize")]
    pub(crate) fn with_values(&self, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), self.values.len());
        Self {
            grid: self.grid,
            channel_count: self.channel_count,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> VoxelGridSpec {
        VoxelGridSpec::new(2, 2, 3).unwrap()
    }

    #[test]
    fn test_shape_scalar_and_vector() {
        let scalar = RawVolume::new(grid(), 1, VoxelData::UInt8(vec![0; 12])).unwrap();
        assert_eq!(scalar.shape(), vec![2, 2, 3]);

        let rgb = RawVolume::new(grid(), 3, VoxelData::UInt8(vec![0; 36])).unwrap();
        assert_eq!(rgb.shape(), vec![2, 2, 3, 3]);
    }

    #[test]
    fn test_length_validated() {
        let err = RawVolume::new(grid(), 1, VoxelData::Int16(vec![0; 11])).unwrap_err();
        assert!(matches!(
            err,
            RawscopeError::SizeMismatch {
                expected: 12,
                actual: 11
            }
        ));
    }

    #[test]
    fn test_indexing() {
        let values: Vec<u16> = (0..12).collect();
        let vol = RawVolume::new(grid(), 1, VoxelData::UInt16(values)).unwrap();
        // (z=1, y=0, x=2) -> 1*6 + 0*3 + 2
        assert_eq!(vol.get(1, 0, 2, 0), 8.0);

        let rgb: Vec<u8> = (0..36).collect();
        let vol = RawVolume::new(grid(), 3, VoxelData::UInt8(rgb)).unwrap();
        assert_eq!(vol.get(0, 1, 0, 2), 11.0);
    }

    #[test]
    fn test_stats() {
        let values = vec![-1000_i16, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 3000];
        let vol = RawVolume::new(grid(), 1, VoxelData::Int16(values)).unwrap();
        let stats = vol.stats();
        assert_eq!(stats.min, -1000.0);
        assert_eq!(stats.max, 3000.0);
        assert_eq!(stats.element_type, ElementType::Int16);
        assert_eq!(stats.interpretation(), "Likely scalar intensities.");
    }

    #[test]
    fn test_unit_range() {
        let vol = RawVolume::new(
            VoxelGridSpec::new(1, 1, 3).unwrap(),
            1,
            VoxelData::Int16(vec![-5, 0, i16::MAX]),
        )
        .unwrap();
        let unit = vol.to_unit_range();
        assert_eq!(unit.values(), &[0.0, 0.0, 1.0]);

        let vol = RawVolume::new(
            VoxelGridSpec::new(1, 1, 2).unwrap(),
            1,
            VoxelData::UInt8(vec![0, 255]),
        )
        .unwrap();
        assert_eq!(vol.to_unit_range().values(), &[0.0, 1.0]);
    }

    #[test]
    fn test_to_bytes_big_endian() {
        let data = VoxelData::UInt16(vec![0x0102, 0x0304]);
        assert_eq!(data.to_bytes(ByteOrder::Big), vec![1, 2, 3, 4]);
        assert_eq!(data.to_bytes(ByteOrder::Little), vec![2, 1, 4, 3]);
    }
}
