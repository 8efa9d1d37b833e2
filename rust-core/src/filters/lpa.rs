//! Local polynomial approximation smoothing
//!
//! A fixed 5x5 kernel over (record, sample) neighborhoods taken from the
//! ordered buffer. The weights fit a quadratic surface by least squares and
//! evaluate it at the center, so they sum to one.

use ndarray::Array2;

use super::robust::OutputMode;
use crate::buffer::{OrderedTraceBuffer, TraceWindow};
use crate::error::FilterError;
use crate::panel::PanelFilter;
use crate::record::Trace;

const HALF_WIDTH: usize = 2;
const SIZE: usize = 2 * HALF_WIDTH + 1;

/// Kernel numerators, indexed `[record][sample]`
const WEIGHTS: [[f32; SIZE]; SIZE] = [
    [-13.0, 2.0, 7.0, 2.0, -13.0],
    [2.0, 17.0, 22.0, 17.0, 2.0],
    [7.0, 22.0, 27.0, 22.0, 7.0],
    [2.0, 17.0, 22.0, 17.0, 2.0],
    [-13.0, 2.0, 7.0, 2.0, -13.0],
];

const NORMALIZATION: f32 = 175.0;

/// 5x5 LPA smoother
pub struct LpaSmoother {
    mode: OutputMode,
    buffer: Option<OrderedTraceBuffer>,
    slab: Array2<f32>,
}

impl LpaSmoother {
    pub fn new(mode: OutputMode) -> Self {
        log::debug!("LPA smoother: {}x{} kernel, {} output", SIZE, SIZE, mode);
        Self {
            mode,
            buffer: None,
            slab: Array2::zeros((SIZE, SIZE)),
        }
    }
}

/// Kernel response at the center of a `SIZE x SIZE` slab
fn smooth_slab(slab: &Array2<f32>) -> f32 {
    let weighted: f32 = slab
        .indexed_iter()
        .map(|((r, s), &value)| WEIGHTS[r][s] * value)
        .sum();
    weighted / NORMALIZATION
}

impl Default for LpaSmoother {
    fn default() -> Self {
        Self::new(OutputMode::Filtered)
    }
}

impl PanelFilter for LpaSmoother {
    fn process(&mut self, trace: Option<&Trace>) -> Result<Option<Trace>, FilterError> {
        if self.buffer.is_none() {
            match trace {
                Some(first) => self.buffer = Some(OrderedTraceBuffer::new(SIZE, first.shape())?),
                None => return Ok(None),
            }
        }
        let Some(buffer) = self.buffer.as_mut() else {
            return Ok(None);
        };

        if !buffer.push(trace)? {
            return Ok(None);
        }

        let buffer = &*buffer;
        let mut out = buffer.shape().blank();
        for sample in 0..out.samples.len() {
            if !buffer.slab(sample, HALF_WIDTH, &mut self.slab) {
                return Ok(None);
            }
            let smoothed = smooth_slab(&self.slab);
            out.samples[sample] = match self.mode {
                OutputMode::Filtered => smoothed,
                OutputMode::Noise => self.slab[[HALF_WIDTH, HALF_WIDTH]] - smoothed,
            };
        }
        if let Some(header) = buffer.current_header() {
            out.header.copy_from_slice(header);
        }
        Ok(Some(out))
    }
}
