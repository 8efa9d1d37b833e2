//! Time-frequency decomposition of single traces
//!
//! Each input record is expanded into one output record per frequency bin,
//! holding the chosen component of that bin's coefficient at every time
//! sample.

use ndarray::Array2;
use num_complex::Complex64;
use std::fmt;
use std::str::FromStr;

use super::transform::SlidingTransform;
use crate::error::{ConfigError, FilterError};
use crate::filters::windows::WindowType;
use crate::record::Trace;

/// Which part of a spectral coefficient to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpectralComponent {
    #[default]
    Amplitude,
    Phase,
    Real,
    Imaginary,
}

impl fmt::Display for SpectralComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SpectralComponent::Amplitude => "amp",
            SpectralComponent::Phase => "phase",
            SpectralComponent::Real => "real",
            SpectralComponent::Imaginary => "imag",
        })
    }
}

impl FromStr for SpectralComponent {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "amp" => Ok(SpectralComponent::Amplitude),
            "phase" => Ok(SpectralComponent::Phase),
            "real" => Ok(SpectralComponent::Real),
            "imag" => Ok(SpectralComponent::Imaginary),
            _ => Err(ConfigError::UnknownComponent(s.to_string())),
        }
    }
}

/// Coefficient types that can be split into components
pub trait SpectralValue: Copy {
    fn component(&self, component: SpectralComponent) -> f64;
}

impl SpectralValue for Complex64 {
    fn component(&self, component: SpectralComponent) -> f64 {
        match component {
            SpectralComponent::Amplitude => self.norm(),
            SpectralComponent::Phase => {
                if self.norm_sqr() > 0.0 {
                    self.arg()
                } else {
                    0.0
                }
            }
            SpectralComponent::Real => self.re,
            SpectralComponent::Imaginary => self.im,
        }
    }
}

/// Cosine coefficients are real: no phase and no imaginary part
impl SpectralValue for f64 {
    fn component(&self, component: SpectralComponent) -> f64 {
        match component {
            SpectralComponent::Amplitude => self.abs(),
            SpectralComponent::Real => *self,
            SpectralComponent::Phase | SpectralComponent::Imaginary => 0.0,
        }
    }
}

/// One output record of a decomposition
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySlice {
    pub bin: usize,

    /// Bin frequency in Hz
    pub frequency: f64,

    pub trace: Trace,
}

/// Per-trace sliding-transform decomposition
pub struct TimeFrequencyDecomposer<T: SlidingTransform> {
    window_size: usize,
    dt: f64,
    component: SpectralComponent,
    kernel: WindowType,

    /// Built from the first trace's length
    transform: Option<T>,
    spectrum: Array2<T::Coefficient>,
}

impl<T> TimeFrequencyDecomposer<T>
where
    T: SlidingTransform,
    T::Coefficient: SpectralValue,
{
    /// # Arguments
    /// * `window_size` - Transform window, rounded up to odd
    /// * `dt` - Sampling interval in seconds
    /// * `component` - Coefficient component to emit
    /// * `kernel` - Frequency-axis smoothing
    pub fn new(
        window_size: usize,
        dt: f64,
        component: SpectralComponent,
        kernel: WindowType,
    ) -> Result<Self, ConfigError> {
        let window_size = crate::config::odd_size("window size", window_size)?;
        if !(dt > 0.0) {
            return Err(ConfigError::NonPositiveInterval(dt));
        }

        log::debug!(
            "time-frequency decomposer: window {}, dt {}s, {} component, {} smoothing",
            window_size,
            dt,
            component,
            kernel
        );

        Ok(Self {
            window_size,
            dt,
            component,
            kernel,
            transform: None,
            spectrum: Array2::default((0, 0)),
        })
    }

    /// Frequencies of the output bins, once the trace length is known
    pub fn frequencies(&self) -> Option<Vec<f64>> {
        self.transform.as_ref().map(|transform| {
            (0..transform.num_frequencies())
                .map(|bin| transform.bin_frequency(bin, self.dt))
                .collect()
        })
    }

    /// Decompose one trace, handing each frequency slice to `emit` in bin order
    pub fn decompose_with<E>(&mut self, trace: &Trace, mut emit: E) -> Result<usize, FilterError>
    where
        E: FnMut(FrequencySlice),
    {
        if self.transform.is_none() {
            let transform = T::build(self.window_size, trace.num_samples())?;
            self.spectrum = transform.new_spectrum();
            self.transform = Some(transform);
        }
        let Some(transform) = self.transform.as_mut() else {
            return Ok(0);
        };

        transform.forward(&trace.samples, self.kernel, &mut self.spectrum)?;

        for (bin, row) in self.spectrum.rows().into_iter().enumerate() {
            let samples = row
                .iter()
                .map(|value| value.component(self.component) as f32)
                .collect();
            emit(FrequencySlice {
                bin,
                frequency: transform.bin_frequency(bin, self.dt),
                trace: Trace::new(trace.header.clone(), samples),
            });
        }
        Ok(self.spectrum.nrows())
    }

    /// Decompose one trace into all of its frequency slices
    pub fn decompose(&mut self, trace: &Trace) -> Result<Vec<FrequencySlice>, FilterError> {
        let mut slices = Vec::new();
        self.decompose_with(trace, |slice| slices.push(slice))?;
        Ok(slices)
    }
}
