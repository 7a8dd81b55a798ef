//! Raw volume loading.
//!
//! Bytes come from a [`ByteSource`] (a whole file, a named zip entry, or memory),
//! are decoded per a [`VoxelEncoding`], validated against the grid, and wrapped
//! as a [`RawVolume`]. Any length disagreement is fatal; there is no partial load.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ByteOrder as _, LittleEndian, NativeEndian};

use crate::encoding::{ByteOrder, ElementType, VoxelEncoding};
use crate::error::{RawscopeError, Result};
use crate::grid::VoxelGridSpec;
use crate::volume::{RawVolume, VoxelData};

/// Upper bound on the buffer reserved from an archive's declared entry size.
const MAX_ENTRY_PREALLOC: u64 = 256 * 1024 * 1024;

/// Capacity to reserve for an entry whose header claims `declared` bytes.
///
/// The header is not trusted; larger entries still grow the buffer as read.
fn entry_capacity(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_ENTRY_PREALLOC)).unwrap_or(0)
}

/// Something that can hand over the raw bytes of a volume.
pub trait ByteSource {
    /// Reads the full content.
    fn bytes(&self) -> Result<Vec<u8>>;

    /// Content length in bytes, without reading the content.
    fn byte_len(&self) -> Result<u64>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

/// A whole file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn bytes(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }

    fn byte_len(&self) -> Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A named entry inside a zip archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntrySource {
    archive: PathBuf,
    entry: String,
}

impl ArchiveEntrySource {
    pub fn new(archive: impl Into<PathBuf>, entry: impl Into<String>) -> Self {
        Self {
            archive: archive.into(),
            entry: entry.into(),
        }
    }

    fn open(&self) -> Result<zip::ZipArchive<BufReader<File>>> {
        let file = File::open(&self.archive)?;
        Ok(zip::ZipArchive::new(BufReader::new(file))?)
    }

    fn entry_error(&self, err: zip::result::ZipError) -> RawscopeError {
        match err {
            zip::result::ZipError::FileNotFound => RawscopeError::EntryNotFound {
                archive: self.archive.clone(),
                entry: self.entry.clone(),
            },
            other => RawscopeError::Archive(other),
        }
    }
}

impl ByteSource for ArchiveEntrySource {
    fn bytes(&self) -> Result<Vec<u8>> {
        let mut archive = self.open()?;
        let mut entry = archive
            .by_name(&self.entry)
            .map_err(|e| self.entry_error(e))?;
        let mut buffer = Vec::with_capacity(entry_capacity(entry.size()));
        entry.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    fn byte_len(&self) -> Result<u64> {
        let mut archive = self.open()?;
        let entry = archive
            .by_name(&self.entry)
            .map_err(|e| self.entry_error(e))?;
        Ok(entry.size())
    }

    fn describe(&self) -> String {
        format!("{}:{}", self.archive.display(), self.entry)
    }
}

/// Bytes already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl ByteSource for MemorySource {
    fn bytes(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn byte_len(&self) -> Result<u64> {
        Ok(self.bytes.len() as u64)
    }

    fn describe(&self) -> String {
        format!("<memory: {} bytes>", self.bytes.len())
    }
}

/// Decodes a byte buffer into typed elements.
///
/// Bytes past the last whole element are ignored; [`load`] rejects such buffers
/// before decoding.
#[must_use]
pub fn decode(bytes: &[u8], encoding: &VoxelEncoding) -> VoxelData {
    let size = encoding.element_type.size_bytes();
    let whole = &bytes[..bytes.len() - bytes.len() % size];

    match encoding.element_type {
        ElementType::UInt8 => VoxelData::UInt8(whole.to_vec()),
        ElementType::Int16 => {
            let mut out = vec![0_i16; whole.len() / 2];
            match encoding.byte_order {
                ByteOrder::Native => NativeEndian::read_i16_into(whole, &mut out),
                ByteOrder::Little => LittleEndian::read_i16_into(whole, &mut out),
                ByteOrder::Big => BigEndian::read_i16_into(whole, &mut out),
            }
            VoxelData::Int16(out)
        }
        ElementType::UInt16 => {
            let mut out = vec![0_u16; whole.len() / 2];
            match encoding.byte_order {
                ByteOrder::Native => NativeEndian::read_u16_into(whole, &mut out),
                ByteOrder::Little => LittleEndian::read_u16_into(whole, &mut out),
                ByteOrder::Big => BigEndian::read_u16_into(whole, &mut out),
            }
            VoxelData::UInt16(out)
        }
    }
}

/// Loads a volume from `source` with an inferred or explicit encoding.
///
/// The decoded element count must equal `voxel_count * channel_count`. A buffer
/// that ends in a partial element is reported in bytes instead.
pub fn load(
    source: &dyn ByteSource,
    grid: &VoxelGridSpec,
    encoding: &VoxelEncoding,
) -> Result<RawVolume> {
    let bytes = source.bytes()?;
    let size = encoding.element_type.size_bytes();
    let expected = grid.voxel_count() * encoding.channel_count;

    if bytes.len() % size != 0 {
        return Err(RawscopeError::SizeMismatch {
            expected: expected * size,
            actual: bytes.len(),
        });
    }

    let data = decode(&bytes, encoding);
    if data.len() != expected {
        return Err(RawscopeError::SizeMismatch {
            expected,
            actual: data.len(),
        });
    }

    let volume = RawVolume::new(*grid, encoding.channel_count, data)?;
    log::info!(
        "loaded {} as {} with shape {:?}",
        source.describe(),
        encoding,
        volume.shape()
    );
    Ok(volume)
}
