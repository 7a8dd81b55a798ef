//! Equal-width intensity histograms.

/// Default bin count for the diagnostic histogram view.
pub const DEFAULT_BINS: usize = 100;

/// Equal-width histogram over `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f32,
    pub max: f32,
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bins the finite values into `bins` equal-width bins; the last bin is closed.
    ///
    /// With no finite values the histogram spans `[0, 1]` and is empty. A constant
    /// input spans `[v - 0.5, v + 0.5]`.
    pub fn compute(values: impl IntoIterator<Item = f32> + Clone, bins: usize) -> Self {
        let bins = bins.max(1);
        let (mut min, mut max) = values
            .clone()
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            min = 0.0;
            max = 1.0;
        } else if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let mut counts = vec![0_u64; bins];
        let width = f64::from(max) - f64::from(min);
        for v in values.into_iter().filter(|v| v.is_finite()) {
            let t = (f64::from(v) - f64::from(min)) / width;
            let bin = ((t * bins as f64) as usize).min(bins - 1);
            counts[bin] += 1;
        }

        Self { min, max, counts }
    }

    /// Number of bins.
    #[must_use]
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Total number of binned values.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Width of one bin.
    #[must_use]
    pub fn bin_width(&self) -> f32 {
        (self.max - self.min) / self.counts.len() as f32
    }

    /// Center of bin `i`.
    #[must_use]
    pub fn bin_center(&self, i: usize) -> f32 {
        self.min + (i as f32 + 0.5) * self.bin_width()
    }

    /// Largest bin count.
    #[must_use]
    pub fn peak(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_bins() {
        let values = vec![0.0, 0.1, 0.5, 0.9, 1.0];
        let hist = Histogram::compute(values.iter().copied(), 2);
        assert_eq!(hist.counts, vec![2, 3]);
        assert_eq!(hist.total(), 5);
        assert_eq!(hist.bin_center(0), 0.25);
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let values: Vec<f32> = (0..=255).map(|v| v as f32).collect();
        let hist = Histogram::compute(values.iter().copied(), DEFAULT_BINS);
        assert_eq!(hist.bins(), DEFAULT_BINS);
        assert_eq!(hist.total(), 256);
        assert!(hist.counts[DEFAULT_BINS - 1] > 0);
    }

    #[test]
    fn test_constant_and_empty_input() {
        let hist = Histogram::compute([3.0_f32; 4], 10);
        assert_eq!(hist.total(), 4);
        assert_eq!(hist.peak(), 4);
        assert!(hist.min < 3.0 && hist.max > 3.0);

        let hist = Histogram::compute([f32::NAN], 10);
        assert_eq!(hist.total(), 0);
        assert_eq!((hist.min, hist.max), (0.0, 1.0));
    }
}
