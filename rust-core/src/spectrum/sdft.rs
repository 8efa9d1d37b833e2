//! Sliding discrete Fourier transform
//!
//! Produces the W-point DFT of the window centered on every sample of a trace.
//! Only the first column is computed directly; every later column is one
//! complex multiply-add per bin away from its predecessor:
//!
//! `X[f][t] = (X[f][t-1] + x[t+h] - x[t-h-1]) * exp(+2πi f / W)`
//!
//! with `h = W/2` and edge-replicated samples outside the trace.

use ndarray::Array2;
use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use std::f64::consts::PI;
use std::sync::Arc;

use super::transform::{check_samples, check_sizing, edge_sample, SlidingTransform};
use super::windowing::{fourier_bin, smooth_frequency_axis, ColumnScratch};
use crate::error::{ConfigError, TransformError};
use crate::filters::windows::WindowType;

/// Sliding DFT over a fixed window and trace length
pub struct SlidingDft {
    /// Window length W (odd)
    window_size: usize,

    /// Samples per trace
    num_samples: usize,

    /// Per-bin update factor exp(+2πi f/W), f = 0..=W/2
    twiddle: Vec<Complex64>,

    /// Inverse factors exp(+2πi k h/W), k = 0..W, referenced to the window center
    inverse_twiddle: Vec<Complex64>,

    /// Real FFT used to seed the first column
    seed_fft: Arc<dyn RealToComplex<f64>>,

    /// Reusable seed buffers
    seed_input: Vec<f64>,
    seed_output: Vec<Complex64>,
    seed_scratch: Vec<Complex64>,

    scratch: ColumnScratch<Complex64>,
}

impl SlidingDft {
    /// Create a new sliding DFT
    ///
    /// # Arguments
    /// * `window_size` - Window length W, must be odd
    /// * `num_samples` - Samples per trace
    pub fn new(window_size: usize, num_samples: usize) -> Result<Self, ConfigError> {
        check_sizing(window_size, num_samples)?;

        let half_width = window_size / 2;
        let num_frequencies = half_width + 1;
        let w = window_size as f64;

        let twiddle = (0..num_frequencies)
            .map(|f| Complex64::from_polar(1.0, 2.0 * PI * f as f64 / w))
            .collect();
        let inverse_twiddle = (0..window_size)
            .map(|k| Complex64::from_polar(1.0, 2.0 * PI * (k * half_width) as f64 / w))
            .collect();

        let mut planner = RealFftPlanner::<f64>::new();
        let seed_fft = planner.plan_fft_forward(window_size);
        let seed_input = seed_fft.make_input_vec();
        let seed_output = seed_fft.make_output_vec();
        let seed_scratch = seed_fft.make_scratch_vec();

        log::debug!(
            "sliding DFT: window {} samples, {} bins, {} samples per trace",
            window_size,
            num_frequencies,
            num_samples
        );

        Ok(Self {
            window_size,
            num_samples,
            twiddle,
            inverse_twiddle,
            seed_fft,
            seed_input,
            seed_output,
            seed_scratch,
            scratch: ColumnScratch::new(num_frequencies),
        })
    }

    /// Half-width h = W/2
    pub fn half_width(&self) -> usize {
        self.window_size / 2
    }

    /// DFT of the window centered on sample 0
    fn seed(&mut self, samples: &[f32], spectrum: &mut Array2<Complex64>) -> Result<(), TransformError> {
        let h = self.half_width() as isize;
        for (i, value) in self.seed_input.iter_mut().enumerate() {
            *value = edge_sample(samples, i as isize - h);
        }

        self.seed_fft
            .process_with_scratch(
                &mut self.seed_input,
                &mut self.seed_output,
                &mut self.seed_scratch,
            )
            .map_err(|e| TransformError::Fft(e.to_string()))?;

        for (f, &value) in self.seed_output.iter().enumerate() {
            spectrum[[f, 0]] = value;
        }
        Ok(())
    }
}

impl SlidingTransform for SlidingDft {
    type Coefficient = Complex64;

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
        self.window_size / 2 + 1
    }

    fn bin_frequency(&self, bin: usize, dt: f64) -> f64 {
        bin as f64 / (self.window_size as f64 * dt)
    }

    fn forward(
        &mut self,
        samples: &[f32],
        window_type: WindowType,
        spectrum: &mut Array2<Complex64>,
    ) -> Result<(), TransformError> {
        check_samples(self.num_samples, samples)?;
        self.check_spectrum(spectrum)?;

        self.seed(samples, spectrum)?;

        let h = self.half_width() as isize;
        for t in 1..self.num_samples {
            let entering = edge_sample(samples, t as isize + h);
            let leaving = edge_sample(samples, t as isize - h - 1);
            let delta = entering - leaving;

            for (f, &twiddle) in self.twiddle.iter().enumerate() {
                let previous = spectrum[[f, t - 1]];
                spectrum[[f, t]] = (previous + delta) * twiddle;
            }
        }

        self.smooth(window_type, spectrum);
        Ok(())
    }

    fn smooth(&mut self, window_type: WindowType, spectrum: &mut Array2<Complex64>) {
        let window = self.window_size;
        smooth_frequency_axis(spectrum, window_type, 1, &mut self.scratch, |column, k| {
            fourier_bin(column, window, k)
        });
    }

    fn inverse(&self, spectrum: &Array2<Complex64>, samples: &mut [f32]) -> Result<(), TransformError> {
        check_samples(self.num_samples, samples)?;
        self.check_spectrum(spectrum)?;

        let w = self.window_size as f64;
        let num_frequencies = self.num_frequencies();
        for (t, out) in samples.iter_mut().enumerate() {
            let column = spectrum.column(t);
            let mut sum = Complex64::new(0.0, 0.0);
            for (k, &factor) in self.inverse_twiddle.iter().enumerate() {
                let bin = if k < num_frequencies {
                    column[k]
                } else {
                    column[self.window_size - k].conj()
                };
                sum += bin * factor;
            }
            *out = (sum.re / w) as f32;
        }
        Ok(())
    }
}
