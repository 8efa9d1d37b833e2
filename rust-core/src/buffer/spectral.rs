//! Cyclic buffer of per-record spectra
//!
//! Each slot holds the forward-transformed frame of one record instead of its
//! samples. A separate result frame collects one combined coefficient per
//! (sample, frequency) cell and is inverse-transformed into the output record.

use ndarray::Array2;

use super::{check_capacity, check_sample_index, RingIndex};
use crate::error::{ConfigError, SpectralBufferError};
use crate::filters::windows::WindowType;
use crate::record::{Trace, TraceShape};
use crate::spectrum::SlidingTransform;

/// Rolling neighborhood of spectral frames plus a result accumulator
pub struct CyclicSpectralBuffer<T: SlidingTransform> {
    transform: T,
    window_type: WindowType,
    shape: TraceShape,

    /// One `[nFreq, Ns]` frame per slot
    frames: Vec<Array2<T::Coefficient>>,

    /// Incoming frame, swapped into its slot only once the transform succeeds
    incoming: Array2<T::Coefficient>,

    headers: Vec<u8>,

    ring: RingIndex,

    /// Combined frame, rebuilt from scratch after every push
    result: Array2<T::Coefficient>,

    /// Cells of `result` written since the last push
    written: Array2<bool>,
    filled: usize,
}

impl<T: SlidingTransform> CyclicSpectralBuffer<T> {
    /// Create an empty buffer
    ///
    /// # Arguments
    /// * `transform` - Forward/inverse transform; fixes the trace length
    /// * `capacity` - Neighborhood size N
    /// * `header_len` - Header blob length in bytes
    /// * `window_type` - Frequency-axis smoothing applied at push time
    pub fn new(
        transform: T,
        capacity: usize,
        header_len: usize,
        window_type: WindowType,
    ) -> Result<Self, ConfigError> {
        check_capacity(capacity)?;

        let shape = TraceShape::new(header_len, transform.num_samples());
        let frames = (0..capacity).map(|_| transform.new_spectrum()).collect();
        let incoming = transform.new_spectrum();
        let result = transform.new_spectrum();
        let written = Array2::from_elem(result.dim(), false);

        log::debug!(
            "cyclic spectral buffer: {} frames of {}x{} ({} smoothing)",
            capacity,
            transform.num_frequencies(),
            transform.num_samples(),
            window_type
        );

        Ok(Self {
            transform,
            window_type,
            shape,
            frames,
            incoming,
            headers: vec![0; capacity * header_len],
            ring: RingIndex::new(capacity),
            result,
            written,
            filled: 0,
        })
    }

    /// Transform every incoming record, or drain one slot on `None`.
    ///
    /// Clears the result accumulator. Returns whether the center record can
    /// be processed.
    pub fn push(&mut self, trace: Option<&Trace>) -> Result<bool, SpectralBufferError> {
        match trace {
            Some(trace) => {
                self.shape.check(trace)?;
                self.transform
                    .forward(&trace.samples, self.window_type, &mut self.incoming)?;

                let slot = self.ring.advance();
                std::mem::swap(&mut self.frames[slot], &mut self.incoming);
                let hl = self.shape.header_len;
                self.headers[slot * hl..(slot + 1) * hl].copy_from_slice(&trace.header);
            }
            None => self.ring.retreat(),
        }

        self.clear_result();
        Ok(self.ring.is_ready())
    }

    fn clear_result(&mut self) {
        self.result.fill(T::Coefficient::default());
        self.written.fill(false);
        self.filled = 0;
    }

    pub fn trace_count(&self) -> usize {
        self.ring.count()
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    pub fn is_ready(&self) -> bool {
        self.ring.is_ready()
    }

    pub fn num_frequencies(&self) -> usize {
        self.transform.num_frequencies()
    }

    pub fn num_samples(&self) -> usize {
        self.shape.num_samples
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Header of the center record, `None` while empty
    pub fn current_header(&self) -> Option<&[u8]> {
        if self.ring.is_empty() {
            return None;
        }
        let hl = self.shape.header_len;
        let start = self.ring.center() * hl;
        Some(&self.headers[start..start + hl])
    }

    /// Collect coefficient `(freq, sample)` of every valid frame, oldest first.
    ///
    /// Returns the center record's position within `out`, or `None` (with
    /// `out` empty) while the buffer is not ready.
    ///
    /// # Panics
    /// If `sample` or `freq` is out of range.
    pub fn slice_into(
        &self,
        sample: usize,
        freq: usize,
        out: &mut Vec<T::Coefficient>,
    ) -> Option<usize> {
        self.check_cell(sample, freq);
        out.clear();
        if !self.ring.is_ready() {
            log::debug!("cyclic spectral buffer too empty for a slice");
            return None;
        }
        out.extend((0..self.ring.count()).map(|offset| self.frames[self.ring.physical(offset)][[freq, sample]]));
        Some(self.ring.center_offset())
    }

    /// Write one cell of the result accumulator
    ///
    /// # Panics
    /// If `sample` or `freq` is out of range.
    pub fn set_result(&mut self, sample: usize, freq: usize, value: T::Coefficient) {
        self.check_cell(sample, freq);
        self.result[[freq, sample]] = value;
        if !self.written[[freq, sample]] {
            self.written[[freq, sample]] = true;
            self.filled += 1;
        }
    }

    /// Write every frequency of one sample column
    ///
    /// # Panics
    /// If `sample` is out of range or `values` is not one per frequency.
    pub fn set_result_column(&mut self, sample: usize, values: &[T::Coefficient]) {
        assert_eq!(
            values.len(),
            self.num_frequencies(),
            "result column needs one value per frequency"
        );
        for (freq, &value) in values.iter().enumerate() {
            self.set_result(sample, freq, value);
        }
    }

    /// Inverse-transform the result accumulator into `out`, paired with the
    /// center record's header.
    ///
    /// Fails unless every cell was written since the last push.
    pub fn result_into(&self, out: &mut Trace) -> Result<(), SpectralBufferError> {
        if !self.ring.is_ready() {
            return Err(SpectralBufferError::NotReady);
        }
        let missing = self.result.len() - self.filled;
        if missing > 0 {
            return Err(SpectralBufferError::Incomplete { missing });
        }

        out.samples.resize(self.shape.num_samples, 0.0);
        self.transform.inverse(&self.result, &mut out.samples)?;

        out.header.clear();
        if let Some(header) = self.current_header() {
            out.header.extend_from_slice(header);
        }
        Ok(())
    }

    /// Allocating form of [`result_into`](Self::result_into)
    pub fn result(&self) -> Result<Trace, SpectralBufferError> {
        let mut out = self.shape.blank();
        self.result_into(&mut out)?;
        Ok(out)
    }

    fn check_cell(&self, sample: usize, freq: usize) {
        check_sample_index(sample, self.shape.num_samples);
        assert!(
            freq < self.num_frequencies(),
            "frequency index {} out of range for {} bins",
            freq,
            self.num_frequencies()
        );
    }
}
