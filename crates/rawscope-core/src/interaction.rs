//! Interactive slice/threshold state and the redraw loop.
//!
//! The [`Controller`] owns the current [`InteractionState`]. Each
//! [`InteractionEvent`] is clamped, applied, and followed by exactly one
//! synchronous redraw into a [`RenderTarget`].

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::VoxelGridSpec;
use crate::marching_squares::ContourSet;
use crate::slice::{render, SliceView};
use crate::volume::NormalizedVolume;

/// Current slice index and iso-threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionState {
    pub slice_index: usize,
    pub threshold: f32,
}

impl InteractionState {
    /// Starting state; `None` selects the middle slice.
    pub fn initial(grid: &VoxelGridSpec, initial_slice: Option<usize>, threshold: f32) -> Self {
        Self {
            slice_index: initial_slice.unwrap_or_else(|| grid.mid_slice()),
            threshold,
        }
        .clamped(grid)
    }

    /// Clamps the slice into `[0, depth - 1]` and the threshold into `[0, 1]`.
    ///
    /// A NaN threshold becomes 0.
    #[must_use]
    pub fn clamped(self, grid: &VoxelGridSpec) -> Self {
        Self {
            slice_index: self.slice_index.min(grid.depth() - 1),
            threshold: if self.threshold.is_nan() {
                0.0
            } else {
                self.threshold.clamp(0.0, 1.0)
            },
        }
    }

    /// Frame title for this state.
    pub fn title(&self) -> String {
        format!("Slice {}: Iso-Contour @ {:.3}", self.slice_index, self.threshold)
    }
}

/// A discrete control update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    /// New slice index; clamped to the volume depth.
    SliceChanged(i64),
    /// New iso-threshold; clamped to `[0, 1]`.
    ThresholdChanged(f32),
}

/// Everything a rendering collaborator needs for one redraw.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub state: InteractionState,
    pub slice: SliceView<'a>,
    pub contours: ContourSet,
    pub title: String,
}

/// Receives rendered frames.
pub trait RenderTarget {
    /// Displays `frame`, replacing whatever was shown before.
    fn present(&mut self, frame: &Frame<'_>) -> Result<()>;
}

impl<T: RenderTarget + ?Sized> RenderTarget for &mut T {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        (**self).present(frame)
    }
}

impl<T: RenderTarget + ?Sized> RenderTarget for Box<T> {
    fn present(&mut self, frame: &Frame<'_>) -> Result<()> {
        (**self).present(frame)
    }
}

/// Drives redraws of one volume in response to events.
pub struct Controller<'a, T: RenderTarget> {
    volume: &'a NormalizedVolume,
    state: InteractionState,
    target: T,
    redraws: usize,
}

impl<'a, T: RenderTarget> Controller<'a, T> {
    /// Creates a controller. The initial state is clamped; nothing is drawn yet.
    pub fn new(volume: &'a NormalizedVolume, state: InteractionState, target: T) -> Self {
        Self {
            volume,
            state: state.clamped(volume.grid()),
            target,
            redraws: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn volume(&self) -> &'a NormalizedVolume {
        self.volume
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    /// Number of frames presented so far.
    pub fn redraw_count(&self) -> usize {
        self.redraws
    }

    /// Renders the current state and presents it.
    pub fn redraw(&mut self) -> Result<()> {
        self.present(self.state)
    }

    fn present(&mut self, state: InteractionState) -> Result<()> {
        let (slice, contours) = render(self.volume, state.slice_index, state.threshold)?;
        let frame = Frame {
            state,
            slice,
            contours,
            title: state.title(),
        };
        log::debug!("{} ({} contours)", frame.title, frame.contours.len());
        self.target.present(&frame)?;
        self.redraws += 1;
        Ok(())
    }

    /// Applies an event, redraws once, and returns the new state.
    ///
    /// The state only changes once the frame has been presented. A NaN
    /// threshold is ignored with a warning and does not redraw.
    pub fn handle(&mut self, event: InteractionEvent) -> Result<InteractionState> {
        let grid = *self.volume.grid();
        let next = match event {
            InteractionEvent::SliceChanged(requested) => {
                let index = usize::try_from(requested.max(0)).unwrap_or(usize::MAX);
                InteractionState {
                    slice_index: index,
                    ..self.state
                }
            }
            InteractionEvent::ThresholdChanged(threshold) => {
                if threshold.is_nan() {
                    log::warn!("ignoring NaN threshold");
                    return Ok(self.state);
                }
                InteractionState {
                    threshold,
                    ..self.state
                }
            }
        }
        .clamped(&grid);

        self.present(next)?;
        self.state = next;
        Ok(self.state)
    }
}
