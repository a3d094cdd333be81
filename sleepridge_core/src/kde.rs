//! One-dimensional Gaussian kernel density estimation.

use std::f64::consts::PI;

/// How many bandwidths the support grid extends past the data
const CUT: f64 = 3.0;

/// Gaussian KDE with Scott's rule bandwidth scaled by an adjustment factor
#[derive(Clone, Debug)]
pub struct GaussianKde {
    data: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fit a KDE to `data`.
    ///
    /// Returns `None` for fewer than two points or zero variance, where no
    /// bandwidth can be derived.
    pub fn fit(data: &[f64], bw_adjust: f64) -> Option<Self> {
        let n = data.len();
        if n < 2 {
            return None;
        }

        let mean = data.iter().sum::<f64>() / n as f64;
        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let scott = (n as f64).powf(-0.2);
        let bandwidth = variance.sqrt() * scott * bw_adjust;

        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return None;
        }

        Some(Self {
            data: data.to_vec(),
            bandwidth,
        })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Density at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = 1.0 / (self.data.len() as f64 * self.bandwidth * (2.0 * PI).sqrt());
        let sum: f64 = self
            .data
            .iter()
            .map(|xi| {
                let z = (x - xi) / self.bandwidth;
                (-0.5 * z * z).exp()
            })
            .sum();
        sum * norm
    }

    /// Evenly spaced evaluation points covering the data plus `CUT`
    /// bandwidths either side, clipped to `clip`.
    pub fn support(&self, clip: (f64, f64), gridsize: usize) -> Vec<f64> {
        let min = self.data.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lo = (min - CUT * self.bandwidth).max(clip.0);
        let hi = (max + CUT * self.bandwidth).min(clip.1);
        linspace(lo, hi, gridsize)
    }

    /// `(x, density)` pairs over the clipped support
    pub fn curve(&self, clip: (f64, f64), gridsize: usize) -> Vec<(f64, f64)> {
        self.support(clip, gridsize)
            .into_iter()
            .map(|x| (x, self.evaluate(x)))
            .collect()
    }
}

fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + i as f64 * step).collect()
        }
    }
}
