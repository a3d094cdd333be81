//! Cubehelix colour palettes for the ridge rows.
//!
//! Green's cubehelix scheme: brightness rises monotonically along the palette
//! while the hue rotates, so rows stay distinguishable in greyscale too.

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Per-channel (cos, sin) coefficients of the cubehelix perturbation
const RED: (f64, f64) = (-0.14861, 1.78277);
const GREEN: (f64, f64) = (-0.29227, -0.90649);
const BLUE: (f64, f64) = (1.97294, 0.0);

/// Cubehelix palette parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Cubehelix {
    /// Starting hue, in the 0..3 range
    pub start: f64,
    /// Rotations around the hue wheel over the palette
    pub rot: f64,
    pub gamma: f64,
    /// Saturation
    pub hue: f64,
    /// Brightness of the first colour
    pub light: f64,
    /// Brightness of the last colour
    pub dark: f64,
}

impl Default for Cubehelix {
    fn default() -> Self {
        Self {
            start: 0.0,
            rot: -0.25,
            gamma: 1.0,
            hue: 0.8,
            light: 0.8,
            dark: 0.15,
        }
    }
}

impl Cubehelix {
    /// `n` colours running from light to dark
    pub fn palette(&self, n: usize) -> Vec<RGBColor> {
        let positions: Vec<f64> = match n {
            0 => Vec::new(),
            1 => vec![self.light],
            _ => {
                let step = (self.dark - self.light) / (n - 1) as f64;
                (0..n).map(|i| self.light + i as f64 * step).collect()
            }
        };
        positions.into_iter().map(|x| self.color_at(x)).collect()
    }

    /// Colour at brightness `x` in `[0, 1]`
    pub fn color_at(&self, x: f64) -> RGBColor {
        let xg = x.powf(self.gamma);
        let amp = self.hue * xg * (1.0 - xg) / 2.0;
        let phi = 2.0 * PI * (self.start / 3.0 + self.rot * x);
        let channel = |(p0, p1): (f64, f64)| {
            let v = xg + amp * (p0 * phi.cos() + p1 * phi.sin());
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        };
        RGBColor(channel(RED), channel(GREEN), channel(BLUE))
    }
}
