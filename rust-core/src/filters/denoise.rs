//! Time-frequency denoising across neighboring traces
//!
//! Every record is transformed once on arrival. For the center record, each
//! (sample, frequency) coefficient is replaced by a robust combination of the
//! same coefficient over the neighborhood, then the combined frame is
//! transformed back.

use super::robust::{CombineValue, RobustCombiner};
use super::windows::WindowType;
use crate::buffer::CyclicSpectralBuffer;
use crate::config::PanelConfig;
use crate::error::{ConfigError, FilterError};
use crate::panel::PanelFilter;
use crate::record::Trace;
use crate::spectrum::{SlidingDct, SlidingDft, SlidingTransform};

/// Denoiser over any sliding transform
pub struct SpectralDenoiser<T: SlidingTransform> {
    window_size: usize,
    neighborhood: usize,
    kernel: WindowType,
    combiner: RobustCombiner,

    /// Built from the first record's shape
    buffer: Option<CyclicSpectralBuffer<T>>,

    slice: Vec<T::Coefficient>,
    column: Vec<T::Coefficient>,
}

/// Denoiser in the Fourier domain
pub type DftDenoiser = SpectralDenoiser<SlidingDft>;

/// Denoiser in the cosine domain
pub type DctDenoiser = SpectralDenoiser<SlidingDct>;

impl<T> SpectralDenoiser<T>
where
    T: SlidingTransform,
    T::Coefficient: CombineValue,
{
    /// Create a denoiser; sizes and reject percentage are normalized first
    pub fn new(config: &PanelConfig) -> Result<Self, ConfigError> {
        let config = config.normalized()?;
        let combiner = config.combiner()?;

        log::debug!(
            "spectral denoiser: window {}, {} traces, {} smoothing, {}% rejected, {} {}",
            config.window_size,
            config.neighborhood,
            config.kernel,
            config.reject_percent,
            config.policy,
            config.mode
        );

        Ok(Self {
            window_size: config.window_size,
            neighborhood: config.neighborhood,
            kernel: config.kernel,
            combiner,
            buffer: None,
            slice: Vec::with_capacity(config.neighborhood),
            column: Vec::new(),
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn neighborhood(&self) -> usize {
        self.neighborhood
    }

    fn init_buffer(&mut self, first: &Trace) -> Result<(), ConfigError> {
        let transform = T::build(self.window_size, first.num_samples())?;
        let buffer = CyclicSpectralBuffer::new(
            transform,
            self.neighborhood,
            first.header.len(),
            self.kernel,
        )?;
        self.column = vec![T::Coefficient::default(); buffer.num_frequencies()];
        self.buffer = Some(buffer);
        Ok(())
    }
}

impl<T> PanelFilter for SpectralDenoiser<T>
where
    T: SlidingTransform,
    T::Coefficient: CombineValue,
{
    fn process(&mut self, trace: Option<&Trace>) -> Result<Option<Trace>, FilterError> {
        if self.buffer.is_none() {
            match trace {
                Some(first) => self.init_buffer(first)?,
                None => return Ok(None),
            }
        }
        let Some(buffer) = self.buffer.as_mut() else {
            return Ok(None);
        };

        if !buffer.push(trace)? {
            return Ok(None);
        }

        for sample in 0..buffer.num_samples() {
            for (freq, value) in self.column.iter_mut().enumerate() {
                let Some(center) = buffer.slice_into(sample, freq, &mut self.slice) else {
                    return Ok(None);
                };
                *value = self.combiner.combine(&self.slice, center);
            }
            buffer.set_result_column(sample, &self.column);
        }

        Ok(Some(buffer.result()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::robust::{CombinePolicy, OutputMode};
    use crate::panel::run_panel;

    fn smooth_panel(records: usize, ns: usize) -> Vec<Trace> {
        (0..records)
            .map(|r| {
                Trace::new(
                    vec![r as u8; 4],
                    (0..ns).map(|s| (s as f32 * 0.2).sin() * 3.0).collect(),
                )
            })
            .collect()
    }

    fn config(policy: CombinePolicy, mode: OutputMode) -> PanelConfig {
        PanelConfig {
            window_size: 7,
            neighborhood: 5,
            reject_percent: 20.0,
            policy,
            mode,
            ..Default::default()
        }
    }

    #[test]
    fn test_identical_traces_pass_through() {
        let traces = smooth_panel(7, 40);
        let mut denoiser = DftDenoiser::new(&config(CombinePolicy::Mean, OutputMode::Filtered)).unwrap();
        let output = run_panel(&mut denoiser, &traces).unwrap();

        assert_eq!(output.len(), traces.len());
        for (out, original) in output.iter().zip(traces.iter()) {
            assert_eq!(out.header, original.header);
            for (a, b) in out.samples.iter().zip(original.samples.iter()) {
                assert!((a - b).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_burst_is_removed() {
        let mut traces: Vec<Trace> = (0..7)
            .map(|r| Trace::new(vec![r as u8; 4], vec![2.0; 40]))
            .collect();
        for s in 18..22 {
            traces[3].samples[s] += 40.0;
        }

        let mut denoiser = DctDenoiser::new(&config(CombinePolicy::SwapMedian, OutputMode::Filtered)).unwrap();
        let output = run_panel(&mut denoiser, &traces).unwrap();

        assert_eq!(output.len(), 7);
        for (s, &value) in output[3].samples.iter().enumerate() {
            assert!((value - 2.0).abs() < 1e-3, "sample {}: {}", s, value);
        }
    }

    #[test]
    fn test_noise_mode_returns_burst() {
        let mut traces = smooth_panel(5, 32);
        traces[2].samples[16] += 25.0;

        let mut denoiser = DftDenoiser::new(&config(CombinePolicy::Median, OutputMode::Noise)).unwrap();
        let output = run_panel(&mut denoiser, &traces).unwrap();

        let residual = &output[2].samples;
        assert!((residual[16] - 25.0).abs() < 1e-3);
        assert!(residual[0].abs() < 1e-3);
        assert!(residual[31].abs() < 1e-3);
    }

    #[test]
    fn test_even_sizes_rounded_up() {
        let denoiser = DftDenoiser::new(&PanelConfig {
            window_size: 10,
            neighborhood: 6,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(denoiser.window_size(), 11);
        assert_eq!(denoiser.neighborhood(), 7);
    }
}
