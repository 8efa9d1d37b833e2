//! Rolling median across neighboring traces
//!
//! Each output sample is the median of that sample over the N records around
//! the center record. In noise mode the median is subtracted from the center
//! value instead, leaving only what the median removed.

use super::robust::OutputMode;
use crate::buffer::{BufferStrategy, TraceWindow};
use crate::config::{odd_size, PanelConfig};
use crate::error::{ConfigError, FilterError};
use crate::panel::PanelFilter;
use crate::record::Trace;

/// Trace-direction median filter
pub struct TraceMedianFilter {
    neighborhood: usize,
    mode: OutputMode,
    strategy: BufferStrategy,

    /// Built from the first record's shape
    buffer: Option<Box<dyn TraceWindow>>,

    slice: Vec<f32>,
}

impl TraceMedianFilter {
    /// # Arguments
    /// * `neighborhood` - Records per median, rounded up to odd
    /// * `mode` - Median or center-minus-median output
    /// * `strategy` - Buffer implementation
    pub fn new(neighborhood: usize, mode: OutputMode, strategy: BufferStrategy) -> Result<Self, ConfigError> {
        let neighborhood = odd_size("neighborhood size", neighborhood)?;
        log::debug!(
            "trace median filter: {} traces, {} output, {} buffer",
            neighborhood,
            mode,
            strategy
        );
        Ok(Self {
            neighborhood,
            mode,
            strategy,
            buffer: None,
            slice: Vec::with_capacity(neighborhood),
        })
    }

    pub fn from_config(config: &PanelConfig) -> Result<Self, ConfigError> {
        Self::new(config.neighborhood, config.mode, config.strategy)
    }

    pub fn neighborhood(&self) -> usize {
        self.neighborhood
    }
}

impl PanelFilter for TraceMedianFilter {
    fn process(&mut self, trace: Option<&Trace>) -> Result<Option<Trace>, FilterError> {
        if self.buffer.is_none() {
            match trace {
                Some(first) => {
                    self.buffer = Some(self.strategy.build(self.neighborhood, first.shape())?);
                }
                None => return Ok(None),
            }
        }
        let Some(buffer) = self.buffer.as_mut() else {
            return Ok(None);
        };

        if !buffer.push(trace)? {
            return Ok(None);
        }

        let mut out = buffer.shape().blank();
        for (sample, value) in out.samples.iter_mut().enumerate() {
            let Some(center) = buffer.slice_into(sample, &mut self.slice) else {
                return Ok(None);
            };
            let current = self.slice[center];
            let middle = self.slice.len() / 2;
            let (_, median, _) = self.slice.select_nth_unstable_by(middle, f32::total_cmp);

            *value = match self.mode {
                OutputMode::Filtered => *median,
                OutputMode::Noise => current - *median,
            };
        }
        if let Some(header) = buffer.current_header() {
            out.header.copy_from_slice(header);
        }
        Ok(Some(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::run_panel;

    fn panel(values: &[[f32; 4]]) -> Vec<Trace> {
        values
            .iter()
            .enumerate()
            .map(|(i, samples)| Trace::new(vec![i as u8; 3], samples.to_vec()))
            .collect()
    }

    #[test]
    fn test_removes_single_spike() {
        let traces = panel(&[
            [1.0, 1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0, 1.0],
            [1.0, 50.0, 1.0, -40.0],
            [1.0, 1.0, 1.0, 1.0],
            [1.0, 1.0, 1.0, 1.0],
        ]);

        for strategy in [BufferStrategy::Ordered, BufferStrategy::Cyclic] {
            let mut filter = TraceMedianFilter::new(3, OutputMode::Filtered, strategy).unwrap();
            let output = run_panel(&mut filter, &traces).unwrap();

            assert_eq!(output.len(), traces.len());
            for (out, original) in output.iter().zip(traces.iter()) {
                assert_eq!(out.header, original.header);
                assert_eq!(out.samples, vec![1.0; 4]);
            }
        }
    }

    #[test]
    fn test_noise_mode_isolates_spike() {
        let traces = panel(&[
            [0.0, 2.0, 0.0, 0.0],
            [0.0, 2.0, 9.0, 0.0],
            [0.0, 2.0, 0.0, 0.0],
        ]);
        let mut filter = TraceMedianFilter::new(3, OutputMode::Noise, BufferStrategy::Cyclic).unwrap();
        let output = run_panel(&mut filter, &traces).unwrap();

        assert_eq!(output.len(), 3);
        assert_eq!(output[1].samples, vec![0.0, 0.0, 9.0, 0.0]);
    }

    #[test]
    fn test_median_over_available_records() {
        // While filling, the median covers only the records seen so far
        let traces = panel(&[
            [5.0, 0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [3.0, 0.0, 0.0, 0.0],
            [4.0, 0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0, 0.0],
        ]);
        let mut filter = TraceMedianFilter::new(5, OutputMode::Filtered, BufferStrategy::Ordered).unwrap();
        let output = run_panel(&mut filter, &traces).unwrap();

        let firsts: Vec<f32> = output.iter().map(|t| t.samples[0]).collect();
        assert_eq!(firsts, vec![3.0, 4.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_even_neighborhood_rounded_up() {
        let filter = TraceMedianFilter::new(4, OutputMode::Filtered, BufferStrategy::Cyclic).unwrap();
        assert_eq!(filter.neighborhood(), 5);

        let config = PanelConfig {
            neighborhood: 8,
            ..Default::default()
        };
        assert_eq!(TraceMedianFilter::from_config(&config).unwrap().neighborhood(), 9);
        assert!(TraceMedianFilter::new(0, OutputMode::Filtered, BufferStrategy::Cyclic).is_err());
    }

    #[test]
    fn test_shape_change_is_an_error() {
        let mut filter = TraceMedianFilter::new(3, OutputMode::Filtered, BufferStrategy::Cyclic).unwrap();
        filter.process(Some(&Trace::new(vec![0; 3], vec![0.0; 4]))).unwrap();
        let err = filter
            .process(Some(&Trace::new(vec![0; 3], vec![0.0; 5])))
            .unwrap_err();
        assert!(matches!(err, FilterError::Buffer(_)));
    }
}
