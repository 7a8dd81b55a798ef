//! Global histogram equalization (feature `equalize`).
//!
//! Used only for an extra diagnostic view. When the feature is disabled,
//! [`available`] is false and callers skip the view.

use crate::volume::NormalizedVolume;

/// Histogram bins used for equalization.
pub const EQUALIZE_BINS: usize = 256;

/// Whether equalization is compiled in.
#[must_use]
pub const fn available() -> bool {
    cfg!(feature = "equalize")
}

/// Equalizes a normalized volume, or returns `None` when the feature is disabled.
#[must_use]
pub fn try_equalize(volume: &NormalizedVolume) -> Option<NormalizedVolume> {
    #[cfg(feature = "equalize")]
    {
        Some(equalize(volume))
    }
    #[cfg(not(feature = "equalize"))]
    {
        let _ = volume;
        None
    }
}

/// Maps each value through the normalized cumulative histogram.
///
/// The CDF is sampled at bin centers and linearly interpolated in between;
/// values outside the outermost centers take the end values.
#[cfg(feature = "equalize")]
#[must_use]
pub fn equalize(volume: &NormalizedVolume) -> NormalizedVolume {
    volume.with_values(equalize_values(volume.values()))
}

#[cfg(feature = "equalize")]
fn equalize_values(values: &[f32]) -> Vec<f32> {
    use crate::histogram::Histogram;

    let hist = Histogram::compute(values.iter().copied(), EQUALIZE_BINS);
    let total = hist.total();
    if total == 0 {
        return vec![0.0; values.len()];
    }

    let mut running = 0_u64;
    let cdf: Vec<f32> = hist
        .counts
        .iter()
        .map(|&c| {
            running += c;
            (running as f64 / total as f64) as f32
        })
        .collect();
    let centers: Vec<f32> = (0..hist.bins()).map(|i| hist.bin_center(i)).collect();

    values
        .iter()
        .map(|&v| {
            if !v.is_finite() {
                return 0.0;
            }
            interp(v, &centers, &cdf)
        })
        .collect()
}

/// Piecewise-linear interpolation with clamped ends; `xs` ascending.
#[cfg(feature = "equalize")]
fn interp(x: f32, xs: &[f32], ys: &[f32]) -> f32 {
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }
    let i = xs.partition_point(|&c| c <= x).saturating_sub(1).min(last - 1);
    let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
    ys[i] + t * (ys[i + 1] - ys[i])
}

#[cfg(all(test, feature = "equalize"))]
mod tests {
    use super::*;
    use crate::grid::VoxelGridSpec;

    fn volume(values: Vec<f32>) -> NormalizedVolume {
        let grid = VoxelGridSpec::new(1, 1, values.len()).unwrap();
        NormalizedVolume::new(grid, 1, values).unwrap()
    }

    #[test]
    fn test_available() {
        assert!(available());
    }

    #[test]
    fn test_output_in_unit_range_and_monotonic() {
        let values: Vec<f32> = (0..1000).map(|i| (i as f32 / 999.0).powi(3)).collect();
        let out = equalize(&volume(values.clone()));
        assert_eq!(out.values().len(), values.len());
        for w in out.values().windows(2) {
            assert!(w[1] >= w[0]);
        }
        for &v in out.values() {
            assert!((0.0..=1.0).contains(&v));
        }
        assert_eq!(*out.values().last().unwrap(), 1.0);
    }

    #[test]
    fn test_flattens_skewed_distribution() {
        // Cubed ramp is crowded near zero; equalization spreads it out
        let values: Vec<f32> = (0..1000).map(|i| (i as f32 / 999.0).powi(3)).collect();
        let out = equalize(&volume(values));
        let median = out.values()[500];
        assert!((median - 0.5).abs() < 0.05, "median {median}");
    }

    #[test]
    fn test_try_equalize_some() {
        assert!(try_equalize(&volume(vec![0.0, 1.0])).is_some());
    }
}
