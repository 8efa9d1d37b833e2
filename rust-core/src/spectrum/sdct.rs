//! Sliding discrete cosine transform (type II)
//!
//! The cosine recursion is second order, so two columns are seeded directly
//! and every later column follows from the previous two:
//!
//! `X[k][t] = 2cos(θk) X[k][t-1] - X[k][t-2]
//!          + cos(θk/2) * (x[t-h-2] - x[t-h-1] + (-1)^k (x[t+h] - x[t+h-1]))`
//!
//! with `θk = πk/W`. The DC row is divided by √2 after smoothing.

use ndarray::Array2;
use std::f64::consts::{PI, SQRT_2};

use super::transform::{check_samples, check_sizing, edge_sample, SlidingTransform};
use super::windowing::{cosine_bin, smooth_frequency_axis, ColumnScratch};
use crate::error::{ConfigError, TransformError};
use crate::filters::windows::WindowType;

/// Sliding DCT over a fixed window and trace length
pub struct SlidingDct {
    window_size: usize,
    num_samples: usize,

    /// cos(θk / 2)
    half_cos: Vec<f64>,

    /// 2 cos(θk)
    double_cos: Vec<f64>,

    scratch: ColumnScratch<f64>,
}

impl SlidingDct {
    /// Create a new sliding DCT
    ///
    /// # Arguments
    /// * `window_size` - Window length W, must be odd
    /// * `num_samples` - Samples per trace
    pub fn new(window_size: usize, num_samples: usize) -> Result<Self, ConfigError> {
        check_sizing(window_size, num_samples)?;

        let w = window_size as f64;
        let (half_cos, double_cos): (Vec<f64>, Vec<f64>) = (0..window_size)
            .map(|k| {
                let theta = PI * k as f64 / w;
                ((theta / 2.0).cos(), 2.0 * theta.cos())
            })
            .unzip();

        log::debug!(
            "sliding DCT: window {} samples, {} samples per trace",
            window_size,
            num_samples
        );

        Ok(Self {
            window_size,
            num_samples,
            half_cos,
            double_cos,
            scratch: ColumnScratch::new(window_size),
        })
    }

    pub fn half_width(&self) -> usize {
        self.window_size / 2
    }

    /// Direct DCT of the window centered on sample `t`
    fn seed_column(&self, samples: &[f32], t: usize, spectrum: &mut Array2<f64>) {
        let h = self.half_width() as isize;
        let w = self.window_size as f64;

        for k in 0..self.window_size {
            let theta = PI * k as f64 / w;
            let value: f64 = (0..self.window_size)
                .map(|m| {
                    let x = edge_sample(samples, t as isize + m as isize - h);
                    x * (theta * (m as f64 + 0.5)).cos()
                })
                .sum();
            spectrum[[k, t]] = value;
        }
    }

    fn smooth_raw(&mut self, window_type: WindowType, spectrum: &mut Array2<f64>) {
        smooth_frequency_axis(spectrum, window_type, 2, &mut self.scratch, cosine_bin);
    }
}

impl SlidingTransform for SlidingDct {
    type Coefficient = f64;

    fn build(window_size: usize, num_samples: usize) -> Result<Self, ConfigError> {
        Self::new(window_size, num_samples)
    }

    fn window_size(&self) -> usize {
        self.window_size
    }

    fn num_samples(&self) -> usize {
        self.num_samples
    }

    fn num_frequencies(&self) -> usize {
        self.window_size
    }

    fn bin_frequency(&self, bin: usize, dt: f64) -> f64 {
        bin as f64 / (2.0 * self.window_size as f64 * dt)
    }

    fn forward(
        &mut self,
        samples: &[f32],
        window_type: WindowType,
        spectrum: &mut Array2<f64>,
    ) -> Result<(), TransformError> {
        check_samples(self.num_samples, samples)?;
        self.check_spectrum(spectrum)?;

        let seeded = self.num_samples.min(2);
        for t in 0..seeded {
            self.seed_column(samples, t, spectrum);
        }

        let h = self.half_width() as isize;
        for t in 2..self.num_samples {
            let t = t as isize;
            let leaving_early = edge_sample(samples, t - h - 2);
            let leaving = edge_sample(samples, t - h - 1);
            let entering = edge_sample(samples, t + h);
            let entering_late = edge_sample(samples, t + h - 1);
            let tail = leaving_early - leaving;
            let head = entering - entering_late;

            let t = t as usize;
            let mut sign = 1.0;
            for k in 0..self.window_size {
                let delta = tail + sign * head;
                spectrum[[k, t]] = spectrum[[k, t - 1]] * self.double_cos[k] - spectrum[[k, t - 2]]
                    + self.half_cos[k] * delta;
                sign = -sign;
            }
        }

        self.smooth_raw(window_type, spectrum);
        spectrum.row_mut(0).mapv_inplace(|v| v / SQRT_2);
        Ok(())
    }

    fn smooth(&mut self, window_type: WindowType, spectrum: &mut Array2<f64>) {
        if window_type.spectral_taps().is_none() {
            return;
        }
        spectrum.row_mut(0).mapv_inplace(|v| v * SQRT_2);
        self.smooth_raw(window_type, spectrum);
        spectrum.row_mut(0).mapv_inplace(|v| v / SQRT_2);
    }

    fn inverse(&self, spectrum: &Array2<f64>, samples: &mut [f32]) -> Result<(), TransformError> {
        check_samples(self.num_samples, samples)?;
        self.check_spectrum(spectrum)?;

        let w = self.window_size as f64;
        for (t, out) in samples.iter_mut().enumerate() {
            let mut alternating = 0.0;
            let mut sign = -1.0;
            for j in 1..=self.half_width() {
                alternating += sign * spectrum[[2 * j, t]];
                sign = -sign;
            }
            *out = ((spectrum[[0, t]] * SQRT_2 + 2.0 * alternating) / w) as f32;
        }
        Ok(())
    }
}
