//! On-disk voxel encodings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Element type of a single voxel channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Unsigned 8-bit.
    UInt8,
    /// Signed 16-bit.
    Int16,
    /// Unsigned 16-bit.
    UInt16,
}

impl ElementType {
    /// Size of one element in bytes.
    #[must_use]
    pub fn size_bytes(self) -> usize {
        match self {
            Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
        }
    }

    /// Largest representable value.
    #[must_use]
    pub fn max_value(self) -> f64 {
        match self {
            Self::UInt8 => f64::from(u8::MAX),
            Self::Int16 => f64::from(i16::MAX),
            Self::UInt16 => f64::from(u16::MAX),
        }
    }

    /// Smallest representable value.
    #[must_use]
    pub fn min_value(self) -> f64 {
        match self {
            Self::UInt8 | Self::UInt16 => 0.0,
            Self::Int16 => f64::from(i16::MIN),
        }
    }

    /// Whether `[min, max]` lies inside the representable range.
    #[must_use]
    pub fn can_represent(self, min: f64, max: f64) -> bool {
        min >= self.min_value() && max <= self.max_value()
    }

    /// Short lowercase name, as used in configuration files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uint8" | "u8" => Ok(Self::UInt8),
            "int16" | "i16" => Ok(Self::Int16),
            "uint16" | "u16" => Ok(Self::UInt16),
            other => Err(format!("unknown element type '{other}'")),
        }
    }
}

/// Byte order of multi-byte elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrder {
    /// Byte order of the host.
    #[default]
    Native,
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl std::str::FromStr for ByteOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "little" | "le" => Ok(Self::Little),
            "big" | "be" => Ok(Self::Big),
            other => Err(format!("unknown byte order '{other}'")),
        }
    }
}

/// How voxels are laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoxelEncoding {
    /// Element type of each channel.
    pub element_type: ElementType,
    /// Interleaved channels per voxel.
    pub channel_count: usize,
    /// Byte order of multi-byte elements.
    pub byte_order: ByteOrder,
}

impl VoxelEncoding {
    /// Single-channel encoding in native byte order.
    pub fn scalar(element_type: ElementType) -> Self {
        Self {
            element_type,
            channel_count: 1,
            byte_order: ByteOrder::Native,
        }
    }

    /// Multi-channel encoding in native byte order.
    pub fn vector(element_type: ElementType, channel_count: usize) -> Self {
        Self {
            element_type,
            channel_count,
            byte_order: ByteOrder::Native,
        }
    }

    /// Sets the byte order.
    #[must_use]
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Bytes occupied by one voxel (all channels).
    #[must_use]
    pub fn bytes_per_voxel(&self) -> usize {
        self.element_type.size_bytes() * self.channel_count
    }
}

impl fmt::Display for VoxelEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.channel_count == 1 {
            write!(f, "{}", self.element_type)
        } else {
            write!(f, "{}x{}", self.element_type, self.channel_count)
        }
    }
}
