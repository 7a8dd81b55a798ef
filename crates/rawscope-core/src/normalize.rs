//! Percentile display ranges and linear intensity stretching.
//!
//! The display range is a global statistic over the whole volume, so brightness
//! stays comparable from slice to slice.

use serde::{Deserialize, Serialize};

use crate::error::{RawscopeError, Result};
use crate::volume::{NormalizedVolume, RawVolume};

/// Intensity bounds mapped to `[0, 1]` by [`stretch`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRange {
    pub low: f32,
    pub high: f32,
}

impl DisplayRange {
    /// Creates a range, swapping the bounds if given in the wrong order.
    pub fn new(low: f32, high: f32) -> Self {
        if high < low {
            Self {
                low: high,
                high: low,
            }
        } else {
            Self { low, high }
        }
    }

    /// The unit range, for data that is already normalized.
    pub fn unit() -> Self {
        Self {
            low: 0.0,
            high: 1.0,
        }
    }

    /// Width of the range; 1.0 for a degenerate range.
    #[must_use]
    pub fn span(&self) -> f32 {
        if self.high > self.low {
            self.high - self.low
        } else {
            1.0
        }
    }

    /// Maps a single value into `[0, 1]`. NaN maps to 0.
    #[inline]
    #[must_use]
    pub fn apply(&self, value: f32) -> f32 {
        let t = (value - self.low) / self.span();
        if t.is_nan() {
            0.0
        } else {
            t.clamp(0.0, 1.0)
        }
    }
}

/// Computes the `[low_pct, high_pct]` percentile range of `values`.
///
/// Percentiles use linear interpolation between closest ranks. Non-finite values
/// are ignored.
pub fn compute_display_range(values: &[f32], low_pct: f64, high_pct: f64) -> Result<DisplayRange> {
    if !(0.0..=100.0).contains(&low_pct)
        || !(0.0..=100.0).contains(&high_pct)
        || low_pct > high_pct
    {
        return Err(RawscopeError::InvalidPercentiles {
            low: low_pct,
            high: high_pct,
        });
    }

    let mut sorted: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Err(RawscopeError::EmptyVolume);
    }
    sorted.sort_unstable_by(f32::total_cmp);

    let low = percentile_sorted(&sorted, low_pct);
    let high = percentile_sorted(&sorted, high_pct);
    log::debug!("display range p{low_pct}={low} p{high_pct}={high}");
    Ok(DisplayRange { low, high })
}

fn percentile_sorted(sorted: &[f32], pct: f64) -> f32 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let a = f64::from(sorted[lo]);
    let b = f64::from(sorted[hi]);
    (a + (b - a) * (rank - lo as f64)) as f32
}

/// Stretches a raw volume into `[0, 1]` with `clip((v - low) / span, 0, 1)`.
#[must_use]
pub fn stretch(volume: &RawVolume, range: &DisplayRange) -> NormalizedVolume {
    let values = volume.data().iter_f32().map(|v| range.apply(v)).collect();
    NormalizedVolume::from_parts(*volume.grid(), volume.channel_count(), values)
}

/// Stretches float values with the same mapping as [`stretch`].
#[must_use]
pub fn stretch_values(values: &[f32], range: &DisplayRange) -> Vec<f32> {
    values.iter().map(|&v| range.apply(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::VoxelGridSpec;
    use crate::volume::VoxelData;
    use proptest::prelude::*;

    #[test]
    fn test_percentiles_match_linear_interpolation() {
        let values: Vec<f32> = (0..=100).map(|v| v as f32).collect();
        let range = compute_display_range(&values, 2.0, 98.0).unwrap();
        assert_eq!(range.low, 2.0);
        assert_eq!(range.high, 98.0);

        // 5 samples: rank for p10 is 0.4
        let range = compute_display_range(&[0.0, 10.0, 20.0, 30.0, 40.0], 10.0, 90.0).unwrap();
        assert!((range.low - 4.0).abs() < 1e-5);
        assert!((range.high - 36.0).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_percentiles() {
        assert!(matches!(
            compute_display_range(&[1.0], 98.0, 2.0),
            Err(RawscopeError::InvalidPercentiles { .. })
        ));
        assert!(compute_display_range(&[1.0], -1.0, 50.0).is_err());
        assert!(compute_display_range(&[1.0], 0.0, 101.0).is_err());
    }

    #[test]
    fn test_empty_volume() {
        assert!(matches!(
            compute_display_range(&[], 2.0, 98.0),
            Err(RawscopeError::EmptyVolume)
        ));
        assert!(matches!(
            compute_display_range(&[f32::NAN], 2.0, 98.0),
            Err(RawscopeError::EmptyVolume)
        ));
    }

    #[test]
    fn test_degenerate_range_uses_unit_span() {
        let range = compute_display_range(&[7.0; 10], 2.0, 98.0).unwrap();
        assert_eq!(range.low, range.high);
        assert_eq!(range.span(), 1.0);
        assert_eq!(range.apply(7.0), 0.0);
        assert_eq!(range.apply(7.5), 0.5);
    }

    #[test]
    fn test_stretch_volume() {
        let grid = VoxelGridSpec::new(1, 1, 4).unwrap();
        let vol = RawVolume::new(grid, 1, VoxelData::Int16(vec![-1000, 0, 500, 3000])).unwrap();
        let range = DisplayRange::new(0.0, 1000.0);
        let out = stretch(&vol, &range);
        assert_eq!(out.values(), &[0.0, 0.0, 0.5, 1.0]);
        assert_eq!(out.shape(), vol.shape());
    }

    #[test]
    fn test_nan_maps_to_zero() {
        assert_eq!(DisplayRange::unit().apply(f32::NAN), 0.0);
    }

    proptest! {
        #[test]
        fn prop_wider_percentiles_never_narrower(
            values in prop::collection::vec(-5000.0f32..5000.0, 1..200),
            inner_low in 2.0f64..50.0,
            inner_high in 50.0f64..98.0,
            widen in 0.0f64..2.0,
        ) {
            let inner = compute_display_range(&values, inner_low, inner_high).unwrap();
            let outer =
                compute_display_range(&values, inner_low - widen, inner_high + widen).unwrap();
            prop_assert!(outer.low <= inner.low);
            prop_assert!(outer.high >= inner.high);
        }

        #[test]
        fn prop_stretch_is_bounded(
            values in prop::collection::vec(-1.0e6f32..1.0e6, 1..200),
            low in -1000.0f32..1000.0,
            width in 0.0f32..1000.0,
        ) {
            let range = DisplayRange::new(low, low + width);
            for v in stretch_values(&values, &range) {
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }

        #[test]
        fn prop_stretch_unit_is_idempotent(values in prop::collection::vec(0.0f32..=1.0, 1..200)) {
            let once = stretch_values(&values, &DisplayRange::unit());
            prop_assert_eq!(&once, &values);
            let twice = stretch_values(&once, &DisplayRange::unit());
            prop_assert_eq!(twice, once);
        }
    }
}
