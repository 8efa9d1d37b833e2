//! Cyclic trace buffer
//!
//! A push overwrites the oldest slot in place, so it costs one record copy.
//! Logical order (oldest to newest) is recovered from the [`RingIndex`].

use ndarray::Array2;

use super::{check_capacity, check_sample_index, RingIndex, TraceWindow};
use crate::error::{BufferError, ConfigError};
use crate::record::{Trace, TraceShape};

/// Rolling neighborhood over a cyclic slot index
pub struct CyclicTraceBuffer {
    shape: TraceShape,

    /// `[slot, sample]`
    data: Array2<f32>,

    headers: Vec<u8>,

    ring: RingIndex,
}

impl CyclicTraceBuffer {
    /// Create an empty buffer of `capacity` records
    pub fn new(capacity: usize, shape: TraceShape) -> Result<Self, ConfigError> {
        check_capacity(capacity)?;
        if shape.num_samples == 0 {
            return Err(ConfigError::EmptyTrace);
        }

        log::debug!(
            "cyclic trace buffer: {} traces of {} samples",
            capacity,
            shape.num_samples
        );

        Ok(Self {
            shape,
            data: Array2::zeros((capacity, shape.num_samples)),
            headers: vec![0; capacity * shape.header_len],
            ring: RingIndex::new(capacity),
        })
    }

    /// Samples of the center record, `None` while empty
    pub fn current_samples(&self) -> Option<&[f32]> {
        if self.ring.is_empty() {
            return None;
        }
        let row = self.ring.center() * self.shape.num_samples;
        self.data
            .as_slice()
            .map(|data| &data[row..row + self.shape.num_samples])
    }
}

impl TraceWindow for CyclicTraceBuffer {
    fn push(&mut self, trace: Option<&Trace>) -> Result<bool, BufferError> {
        match trace {
            Some(trace) => {
                self.shape.check(trace)?;
                let slot = self.ring.advance();
                self.data
                    .row_mut(slot)
                    .iter_mut()
                    .zip(trace.samples.iter())
                    .for_each(|(dst, &src)| *dst = src);
                let hl = self.shape.header_len;
                self.headers[slot * hl..(slot + 1) * hl].copy_from_slice(&trace.header);
            }
            None => self.ring.retreat(),
        }
        Ok(self.ring.is_ready())
    }

    fn trace_count(&self) -> usize {
        self.ring.count()
    }

    fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    fn shape(&self) -> TraceShape {
        self.shape
    }

    fn current_header(&self) -> Option<&[u8]> {
        if self.ring.is_empty() {
            return None;
        }
        let hl = self.shape.header_len;
        let start = self.ring.center() * hl;
        Some(&self.headers[start..start + hl])
    }

    fn slice_into(&self, sample: usize, out: &mut Vec<f32>) -> Option<usize> {
        check_sample_index(sample, self.shape.num_samples);
        out.clear();
        if !self.ring.is_ready() {
            log::debug!("cyclic trace buffer too empty for a slice");
            return None;
        }
        out.extend((0..self.ring.count()).map(|offset| self.data[[self.ring.physical(offset), sample]]));
        Some(self.ring.center_offset())
    }
}
