//! Common interface of the sliding transform variants

use ndarray::Array2;
use std::fmt::Debug;

use crate::error::{ConfigError, TransformError};
use crate::filters::windows::WindowType;

/// A recursive transform producing one spectral column per time sample.
///
/// Coefficient tables are built once at construction and reused by every
/// `forward`/`inverse` call on the same instance.
pub trait SlidingTransform {
    /// Element type of the spectral frame
    type Coefficient: Copy + Default + Debug + Send + 'static;

    /// Construct for window length `window_size` and `num_samples`-sample traces
    fn build(window_size: usize, num_samples: usize) -> Result<Self, ConfigError>
    where
        Self: Sized;

    /// Transform window length W (odd)
    fn window_size(&self) -> usize;

    /// Samples per trace Ns
    fn num_samples(&self) -> usize;

    /// Number of frequency rows in a spectral frame
    fn num_frequencies(&self) -> usize;

    /// Frequency in Hz of `bin` for sampling interval `dt` seconds
    fn bin_frequency(&self, bin: usize, dt: f64) -> f64;

    /// Forward transform of `samples` into `spectrum` (shape `[nFreq, Ns]`),
    /// followed by frequency-axis smoothing with `window_type`.
    fn forward(
        &mut self,
        samples: &[f32],
        window_type: WindowType,
        spectrum: &mut Array2<Self::Coefficient>,
    ) -> Result<(), TransformError>;

    /// Smooth a finished spectrum along frequency in place
    fn smooth(&mut self, window_type: WindowType, spectrum: &mut Array2<Self::Coefficient>);

    /// Reconstruct one sample per time column
    fn inverse(
        &self,
        spectrum: &Array2<Self::Coefficient>,
        samples: &mut [f32],
    ) -> Result<(), TransformError>;

    /// Zeroed spectral frame of the right shape
    fn new_spectrum(&self) -> Array2<Self::Coefficient> {
        Array2::default((self.num_frequencies(), self.num_samples()))
    }

    /// Check a caller-supplied frame against this transform's shape
    fn check_spectrum(&self, spectrum: &Array2<Self::Coefficient>) -> Result<(), TransformError> {
        let expected = (self.num_frequencies(), self.num_samples());
        let found = spectrum.dim();
        if found != expected {
            return Err(TransformError::SpectrumShape { expected, found });
        }
        Ok(())
    }
}

/// Validate transform sizing shared by both variants
pub(crate) fn check_sizing(window_size: usize, num_samples: usize) -> Result<(), ConfigError> {
    if window_size == 0 {
        return Err(ConfigError::NonPositiveSize {
            name: "window size",
            value: window_size,
        });
    }
    if window_size % 2 == 0 {
        return Err(ConfigError::EvenSize {
            name: "window size",
            value: window_size,
        });
    }
    if num_samples == 0 {
        return Err(ConfigError::EmptyTrace);
    }
    Ok(())
}

/// Sample at `index`, replicating the edge samples outside `[0, len)`
#[inline]
pub(crate) fn edge_sample(samples: &[f32], index: isize) -> f64 {
    let last = samples.len() as isize - 1;
    samples[index.clamp(0, last) as usize] as f64
}

pub(crate) fn check_samples(expected: usize, samples: &[f32]) -> Result<(), TransformError> {
    if samples.len() != expected {
        return Err(TransformError::SampleCount {
            expected,
            found: samples.len(),
        });
    }
    Ok(())
}
