//! Shared loading steps: byte length, inference, resolution, decode.

use rawscope_core::{
    inspect_source, load, ByteSource, FormatDiagnosis, Options, RawVolume, Result, VoxelEncoding,
};

/// A decoded volume together with how its layout was decided.
#[derive(Debug, Clone)]
pub struct LoadedVolume {
    pub diagnosis: FormatDiagnosis,
    pub encoding: VoxelEncoding,
    pub volume: RawVolume,
}

/// Loads the volume named by `options`.
pub fn load_volume(options: &Options) -> Result<LoadedVolume> {
    let source = options.source();
    load_from(source.as_ref(), options)
}

/// Loads from an explicit source, using the grid, hint and byte order of `options`.
///
/// Any inference or size error aborts before a volume exists.
pub fn load_from(source: &dyn ByteSource, options: &Options) -> Result<LoadedVolume> {
    let grid = options.grid();
    let diagnosis = inspect_source(source, grid)?;
    let encoding = diagnosis.resolve(&options.encoding_hint, options.byte_order)?;
    let volume = load(source, grid, &encoding)?;
    Ok(LoadedVolume {
        diagnosis,
        encoding,
        volume,
    })
}
