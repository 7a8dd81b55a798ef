//! A [`RenderTarget`] that writes each frame as a PNG.

use std::path::{Path, PathBuf};

use glam::Vec3;
use image::RgbImage;
use rawscope_core::{Frame, RenderTarget};

use crate::color_maps::ColorMap;
use crate::error::RenderResult;
use crate::raster::{draw_contours, rasterize_slice, ImageOrigin};
use crate::save::save_image;

/// File that every frame replaces.
pub const CURRENT_FRAME: &str = "explorer.png";

/// Writes explorer frames into a directory.
///
/// Each frame overwrites [`CURRENT_FRAME`]; with `keep_frames` a numbered copy
/// (`frame_0000.png`, ...) is kept as well.
#[derive(Debug)]
pub struct PngFrameSink {
    output_dir: PathBuf,
    color_map: ColorMap,
    contour_color: Vec3,
    origin: ImageOrigin,
    scale: u32,
    keep_frames: bool,
    frames_written: usize,
    last_title: Option<String>,
}

impl PngFrameSink {
    /// Creates the sink, creating `output_dir` if needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> RenderResult<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            color_map: ColorMap::gray(),
            contour_color: Vec3::new(1.0, 0.0, 0.0),
            origin: ImageOrigin::LowerLeft,
            scale: 1,
            keep_frames: false,
            frames_written: 0,
            last_title: None,
        })
    }

    #[must_use]
    pub fn with_color_map(mut self, color_map: ColorMap) -> Self {
        self.color_map = color_map;
        self
    }

    #[must_use]
    pub fn with_contour_color(mut self, color: Vec3) -> Self {
        self.contour_color = color;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: ImageOrigin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.max(1);
        self
    }

    #[must_use]
    pub fn keep_frames(mut self, keep: bool) -> Self {
        self.keep_frames = keep;
        self
    }

    /// Path of the continuously replaced frame.
    pub fn current_path(&self) -> PathBuf {
        self.output_dir.join(CURRENT_FRAME)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Title of the most recent frame.
    pub fn last_title(&self) -> Option<&str> {
        self.last_title.as_deref()
    }

    /// Rasterizes a frame: the slice autoscaled through the color map, contours on top.
    pub fn compose(&self, frame: &Frame<'_>) -> RgbImage {
        let range = frame.slice.value_range().unwrap_or((0.0, 1.0));
        let mut image = rasterize_slice(
            &frame.slice,
            &self.color_map,
            range,
            self.origin,
            self.scale,
        );
        draw_contours(&mut image, &frame.contours, self.contour_color, self.origin, self.scale);
        image
    }

    fn write(&mut self, frame: &Frame<'_>) -> RenderResult<()> {
        let image = self.compose(frame);

        // Write-then-rename replaces the frame atomically
        let tmp = self.output_dir.join(format!(".{CURRENT_FRAME}.tmp.png"));
        save_image(&tmp, &image)?;
        std::fs::rename(&tmp, self.current_path())?;

        if self.keep_frames {
            let numbered = self
                .output_dir
                .join(format!("frame_{:04}.png", self.frames_written));
            save_image(numbered, &image)?;
        }

        self.frames_written += 1;
        self.last_title = Some(frame.title.clone());
        Ok(())
    }
}

impl RenderTarget for PngFrameSink {
    fn present(&mut self, frame: &Frame<'_>) -> rawscope_core::Result<()> {
        self.write(frame)?;
        log::info!("{}", frame.title);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rawscope_core::{
        Controller, InteractionEvent, InteractionState, NormalizedVolume, VoxelGridSpec,
    };

    fn volume() -> NormalizedVolume {
        let grid = VoxelGridSpec::new(4, 8, 8).unwrap();
        let values = (0..grid.voxel_count())
            .map(|i| ((i % 8) as f32 / 7.0))
            .collect();
        NormalizedVolume::new(grid, 1, values).unwrap()
    }

    #[test]
    fn test_present_replaces_current_frame() {
        let dir = tempfile::tempdir().unwrap();
        let volume = volume();
        let sink = PngFrameSink::new(dir.path().join("out")).unwrap().with_scale(3);
        let state = InteractionState::initial(volume.grid(), Some(1), 0.5);
        let mut controller = Controller::new(&volume, state, sink);

        controller.redraw().unwrap();
        controller.handle(InteractionEvent::SliceChanged(2)).unwrap();

        let sink = controller.into_target();
        assert_eq!(sink.frames_written(), 2);
        assert_eq!(sink.last_title(), Some("Slice 2: Iso-Contour @ 0.500"));
        let img = image::open(sink.current_path()).unwrap();
        assert_eq!((img.width(), img.height()), (24, 24));
        assert!(!sink.output_dir().join("frame_0000.png").exists());
        assert!(!sink.output_dir().join(format!(".{CURRENT_FRAME}.tmp.png")).exists());
    }

    #[test]
    fn test_keep_frames_numbers_files() {
        let dir = tempfile::tempdir().unwrap();
        let volume = volume();
        let sink = PngFrameSink::new(dir.path()).unwrap().keep_frames(true);
        let state = InteractionState::initial(volume.grid(), None, 0.2);
        let mut controller = Controller::new(&volume, state, sink);
        controller.redraw().unwrap();
        controller.handle(InteractionEvent::ThresholdChanged(0.8)).unwrap();

        assert!(dir.path().join("frame_0000.png").exists());
        assert!(dir.path().join("frame_0001.png").exists());
        assert!(dir.path().join(CURRENT_FRAME).exists());
    }

    #[test]
    fn test_compose_draws_contour() {
        let dir = tempfile::tempdir().unwrap();
        let volume = volume();
        let sink = PngFrameSink::new(dir.path())
            .unwrap()
            .with_contour_color(Vec3::new(0.0, 1.0, 0.0));
        let (slice, contours) = rawscope_core::render(&volume, 0, 0.5).unwrap();
        let frame = Frame {
            state: InteractionState {
                slice_index: 0,
                threshold: 0.5,
            },
            slice,
            contours,
            title: String::new(),
        };
        let img = sink.compose(&frame);
        assert!(img.pixels().any(|p| *p == image::Rgb([0, 255, 0])));
    }
}
