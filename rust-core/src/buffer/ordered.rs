//! Ordered trace buffer
//!
//! Every push shifts the retained records down one slot and writes the new
//! record into the last slot, so slot order always equals arrival order.
//! That costs O(N·Ns) per push but keeps the valid records contiguous, which
//! makes 2-D neighborhoods (see [`OrderedTraceBuffer::slab`]) easy to index.

use ndarray::{s, Array2, ArrayView1, ArrayView2};

use super::{check_capacity, check_sample_index, RingIndex, TraceWindow};
use crate::error::{BufferError, ConfigError};
use crate::record::{Trace, TraceShape};

/// Rolling neighborhood with records stored in arrival order
pub struct OrderedTraceBuffer {
    shape: TraceShape,

    /// `[slot, sample]`, newest record in the last row
    data: Array2<f32>,

    /// Header blobs, `header_len` bytes per slot
    headers: Vec<u8>,

    ring: RingIndex,
}

impl OrderedTraceBuffer {
    /// Create an empty buffer
    ///
    /// # Arguments
    /// * `capacity` - Neighborhood size N (odd for a unique center)
    /// * `shape` - Header length and samples per trace
    pub fn new(capacity: usize, shape: TraceShape) -> Result<Self, ConfigError> {
        check_capacity(capacity)?;
        if shape.num_samples == 0 {
            return Err(ConfigError::EmptyTrace);
        }

        log::debug!(
            "ordered trace buffer: {} traces of {} samples",
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

    /// First physical slot holding a valid record
    fn first_slot(&self) -> usize {
        self.ring.capacity() - self.ring.count()
    }

    /// Physical slot of the center record
    fn center_slot(&self) -> usize {
        self.first_slot() + self.ring.center_offset()
    }

    /// Valid records as a `[record, sample]` view, oldest first
    pub fn records(&self) -> ArrayView2<'_, f32> {
        self.data.slice(s![self.first_slot().., ..])
    }

    /// Samples of the center record, `None` while empty
    pub fn current_samples(&self) -> Option<&[f32]> {
        if self.ring.is_empty() {
            return None;
        }
        self.data.row(self.center_slot()).to_slice()
    }

    /// Fill `out` with the `(2h+1) x (2h+1)` block of `[record, sample]`
    /// values centered on the center record and `sample`.
    ///
    /// Rows beyond the valid records and columns beyond the trace repeat the
    /// nearest valid record or sample. Returns `false` (leaving `out`
    /// untouched) while the buffer is not ready.
    ///
    /// # Panics
    /// If `sample` is out of range or `out` is not `(2h+1) x (2h+1)`.
    pub fn slab(&self, sample: usize, half_width: usize, out: &mut Array2<f32>) -> bool {
        check_sample_index(sample, self.shape.num_samples);
        let size = 2 * half_width + 1;
        assert_eq!(out.dim(), (size, size), "slab output must be {}x{}", size, size);

        if !self.ring.is_ready() {
            log::debug!("ordered trace buffer too empty for a slab");
            return false;
        }

        let first = self.first_slot() as isize;
        let last = self.ring.capacity() as isize - 1;
        let center = self.center_slot() as isize;
        let last_sample = self.shape.num_samples as isize - 1;
        let h = half_width as isize;

        for ((row, col), value) in out.indexed_iter_mut() {
            let slot = (center + row as isize - h).clamp(first, last) as usize;
            let s = (sample as isize + col as isize - h).clamp(0, last_sample) as usize;
            *value = self.data[[slot, s]];
        }
        true
    }
}

impl TraceWindow for OrderedTraceBuffer {
    fn push(&mut self, trace: Option<&Trace>) -> Result<bool, BufferError> {
        match trace {
            Some(trace) => {
                self.shape.check(trace)?;
                let hl = self.shape.header_len;
                let capacity = self.ring.capacity();

                for row in 1..capacity {
                    let (mut dst, src) = self.data.multi_slice_mut((s![row - 1, ..], s![row, ..]));
                    dst.assign(&src);
                }
                self.data
                    .row_mut(capacity - 1)
                    .assign(&ArrayView1::from(trace.samples.as_slice()));
                self.headers.copy_within(hl.., 0);
                self.headers[(capacity - 1) * hl..].copy_from_slice(&trace.header);

                self.ring.advance();
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
        let start = self.center_slot() * hl;
        Some(&self.headers[start..start + hl])
    }

    fn slice_into(&self, sample: usize, out: &mut Vec<f32>) -> Option<usize> {
        check_sample_index(sample, self.shape.num_samples);
        out.clear();
        if !self.ring.is_ready() {
            log::debug!("ordered trace buffer too empty for a slice");
            return None;
        }
        out.extend(self.records().column(sample).iter().copied());
        Some(self.ring.center_offset())
    }
}
