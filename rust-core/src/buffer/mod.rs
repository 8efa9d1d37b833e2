//! Rolling neighborhoods of trace records
//!
//! Two interchangeable strategies share the [`TraceWindow`] contract:
//! [`OrderedTraceBuffer`] keeps records physically in arrival order,
//! [`CyclicTraceBuffer`] overwrites the oldest slot in place.
//! [`CyclicSpectralBuffer`] holds per-record spectra instead of samples.

pub mod ring;
pub mod ordered;
pub mod cyclic;
pub mod spectral;

pub use ring::RingIndex;
pub use ordered::OrderedTraceBuffer;
pub use cyclic::CyclicTraceBuffer;
pub use spectral::CyclicSpectralBuffer;

use std::fmt;
use std::str::FromStr;

use crate::error::{BufferError, ConfigError};
use crate::record::{Trace, TraceShape};

/// Rolling window of N records exposing center-record semantics
pub trait TraceWindow {
    /// Add a record, or `None` once the input stream is exhausted.
    ///
    /// Returns `true` while more than half the neighborhood holds records,
    /// i.e. when the center record can be processed.
    fn push(&mut self, trace: Option<&Trace>) -> Result<bool, BufferError>;

    /// Number of valid records
    fn trace_count(&self) -> usize;

    /// Neighborhood size N
    fn capacity(&self) -> usize;

    /// Shape every pushed record must have
    fn shape(&self) -> TraceShape;

    /// Whether the center record has enough neighbors to be processed
    fn is_ready(&self) -> bool {
        self.trace_count() > self.capacity() / 2
    }

    /// Header of the center record, `None` while empty
    fn current_header(&self) -> Option<&[u8]>;

    /// Collect every valid record's value at `sample`, oldest first, into `out`.
    ///
    /// Returns the position of the center record within `out`, or `None`
    /// (leaving `out` empty) while the buffer is not ready.
    ///
    /// # Panics
    /// If `sample` is not below the trace length.
    fn slice_into(&self, sample: usize, out: &mut Vec<f32>) -> Option<usize>;
}

/// Which buffer implementation a filter runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferStrategy {
    /// Shift records on every push, slots always in arrival order
    Ordered,

    /// O(1) push over a cyclic index
    #[default]
    Cyclic,
}

impl BufferStrategy {
    /// Build a buffer of this strategy
    pub fn build(self, capacity: usize, shape: TraceShape) -> Result<Box<dyn TraceWindow>, ConfigError> {
        Ok(match self {
            BufferStrategy::Ordered => Box::new(OrderedTraceBuffer::new(capacity, shape)?),
            BufferStrategy::Cyclic => Box::new(CyclicTraceBuffer::new(capacity, shape)?),
        })
    }
}

impl fmt::Display for BufferStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BufferStrategy::Ordered => "ordered",
            BufferStrategy::Cyclic => "cyclic",
        })
    }
}

impl FromStr for BufferStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ordered" => Ok(BufferStrategy::Ordered),
            "cyclic" => Ok(BufferStrategy::Cyclic),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

pub(crate) fn check_capacity(capacity: usize) -> Result<(), ConfigError> {
    if capacity == 0 {
        return Err(ConfigError::NonPositiveSize {
            name: "neighborhood size",
            value: capacity,
        });
    }
    Ok(())
}

pub(crate) fn check_sample_index(sample: usize, num_samples: usize) {
    assert!(
        sample < num_samples,
        "sample index {} out of range for {}-sample traces",
        sample,
        num_samples
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_trace(value: f32, tag: u8) -> Trace {
        Trace::new(vec![tag; 4], vec![value; 8])
    }

    /// Both strategies must agree on every observable of the contract
    #[test]
    fn test_strategies_agree() {
        let shape = TraceShape::new(4, 8);
        let mut ordered = BufferStrategy::Ordered.build(5, shape).unwrap();
        let mut cyclic = BufferStrategy::Cyclic.build(5, shape).unwrap();

        let mut a = Vec::new();
        let mut b = Vec::new();
        let inputs: Vec<Option<Trace>> = (0..9)
            .map(|i| Some(constant_trace(i as f32, i as u8)))
            .chain((0..4).map(|_| None))
            .collect();

        for input in &inputs {
            let ready_a = ordered.push(input.as_ref()).unwrap();
            let ready_b = cyclic.push(input.as_ref()).unwrap();
            assert_eq!(ready_a, ready_b);
            assert_eq!(ordered.trace_count(), cyclic.trace_count());
            assert_eq!(ordered.current_header(), cyclic.current_header());

            let center_a = ordered.slice_into(3, &mut a);
            let center_b = cyclic.slice_into(3, &mut b);
            assert_eq!(center_a, center_b);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("ordered".parse::<BufferStrategy>(), Ok(BufferStrategy::Ordered));
        assert_eq!("Cyclic".parse::<BufferStrategy>(), Ok(BufferStrategy::Cyclic));
        assert!("ring".parse::<BufferStrategy>().is_err());
    }
}
