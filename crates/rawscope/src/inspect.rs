//! One-shot diagnostic views of a raw volume.

use std::path::{Path, PathBuf};

use glam::Vec3;
use rawscope_core::equalize::{available as equalize_available, try_equalize};
use rawscope_core::histogram::DEFAULT_BINS;
use rawscope_core::{
    compute_display_range, stretch, DisplayRange, FormatDiagnosis, Histogram, Options, Result,
    SliceView, VolumeStats, VoxelEncoding,
};
use rawscope_render::{
    plot_histogram, rasterize_slice, save_image, ColorMap, ColorMapRegistry, ImageOrigin,
};

use crate::pipeline::{load_volume, LoadedVolume};

pub const MID_SLICE_FILE: &str = "mid_slice.png";
pub const HISTOGRAM_FILE: &str = "histogram.png";
pub const STRETCHED_FILE: &str = "stretched_slice.png";
pub const EQUALIZED_FILE: &str = "equalized_slice.png";

const HISTOGRAM_SIZE: (u32, u32) = (640, 360);
const HISTOGRAM_COLOR: Vec3 = Vec3::new(0.122, 0.467, 0.706);

/// What an inspection found and wrote.
#[derive(Debug, Clone)]
pub struct InspectionReport {
    pub diagnosis: FormatDiagnosis,
    pub encoding: VoxelEncoding,
    pub stats: VolumeStats,
    /// Percentile range; only computed for single-channel volumes.
    pub display_range: Option<DisplayRange>,
    /// Images written, in order.
    pub written: Vec<PathBuf>,
}

/// Loads the configured volume and writes its diagnostic views.
pub fn run_inspection(options: &Options) -> Result<InspectionReport> {
    let loaded = load_volume(options)?;
    inspect_loaded(loaded, options)
}

/// Writes the diagnostic views of an already loaded volume into `options.output_dir`.
///
/// Always writes the raw mid slice and the value histogram. Single-channel
/// volumes also get the percentile-stretched mid slice and, when compiled in,
/// the equalized one.
pub fn inspect_loaded(loaded: LoadedVolume, options: &Options) -> Result<InspectionReport> {
    let LoadedVolume {
        diagnosis,
        encoding,
        volume,
    } = loaded;

    let stats = volume.stats();
    log::info!("{}", stats.interpretation());
    log::info!("Shape: {:?}", stats.shape);
    log::info!("Dtype: {}", stats.element_type);
    log::info!("Min/Max: {} {}", stats.min, stats.max);

    let out = options.output_dir.as_path();
    std::fs::create_dir_all(out)?;
    let registry = ColorMapRegistry::new();
    let mid = volume.grid().mid_slice();
    let mut written = Vec::new();

    let raw_slice = SliceView::from_raw(&volume, mid)?;
    let range = raw_slice.value_range().unwrap_or((0.0, 1.0));
    written.push(write_slice(
        out,
        MID_SLICE_FILE,
        &raw_slice,
        registry.require("gray")?,
        range,
        options.scale,
    )?);

    let values: Vec<f32> = volume.data().iter_f32().collect();
    let histogram = Histogram::compute(values.iter().copied(), DEFAULT_BINS);
    let plot = plot_histogram(&histogram, HISTOGRAM_SIZE.0, HISTOGRAM_SIZE.1, HISTOGRAM_COLOR);
    let path = out.join(HISTOGRAM_FILE);
    save_image(&path, &plot)?;
    written.push(path);

    let mut display_range = None;
    if volume.channel_count() == 1 {
        let (low, high) = options.percentiles;
        let range = compute_display_range(&values, low, high)?;
        log::info!("display range p{low}-p{high}: [{}, {}]", range.low, range.high);
        display_range = Some(range);

        let inferno = registry.require("inferno")?;
        let stretched = stretch(&volume, &range);
        let slice = SliceView::extract(&stretched, mid)?;
        written.push(write_slice(
            out,
            STRETCHED_FILE,
            &slice,
            inferno,
            (0.0, 1.0),
            options.scale,
        )?);

        match try_equalize(&stretched) {
            Some(equalized) => {
                let slice = SliceView::extract(&equalized, mid)?;
                written.push(write_slice(
                    out,
                    EQUALIZED_FILE,
                    &slice,
                    inferno,
                    (0.0, 1.0),
                    options.scale,
                )?);
            }
            None => log::debug!(
                "equalized view skipped (available: {})",
                equalize_available()
            ),
        }
    } else {
        log::debug!(
            "stretched views skipped for {}-channel volume",
            volume.channel_count()
        );
    }

    Ok(InspectionReport {
        diagnosis,
        encoding,
        stats,
        display_range,
        written,
    })
}

fn write_slice(
    dir: &Path,
    name: &str,
    slice: &SliceView<'_>,
    color_map: &ColorMap,
    range: (f32, f32),
    scale: u32,
) -> Result<PathBuf> {
    let image = rasterize_slice(slice, color_map, range, ImageOrigin::UpperLeft, scale);
    let path = dir.join(name);
    save_image(&path, &image)?;
    Ok(path)
}
