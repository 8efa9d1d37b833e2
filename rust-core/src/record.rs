//! Trace records: an opaque header blob plus a fixed-length sample array

use crate::error::BufferError;

/// Size of every record in a processing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceShape {
    /// Header blob length in bytes
    pub header_len: usize,

    /// Samples per trace
    pub num_samples: usize,
}

impl TraceShape {
    pub fn new(header_len: usize, num_samples: usize) -> Self {
        Self {
            header_len,
            num_samples,
        }
    }

    /// Shape of an existing trace (typically the first one in the stream)
    pub fn of(trace: &Trace) -> Self {
        Self::new(trace.header.len(), trace.samples.len())
    }

    /// Check that a trace matches this shape
    pub fn check(&self, trace: &Trace) -> Result<(), BufferError> {
        if trace.samples.len() != self.num_samples {
            return Err(BufferError::SampleCount {
                expected: self.num_samples,
                found: trace.samples.len(),
            });
        }
        if trace.header.len() != self.header_len {
            return Err(BufferError::HeaderSize {
                expected: self.header_len,
                found: trace.header.len(),
            });
        }
        Ok(())
    }

    /// Zeroed trace of this shape
    pub fn blank(&self) -> Trace {
        Trace {
            header: vec![0; self.header_len],
            samples: vec![0.0; self.num_samples],
        }
    }
}

/// One record of a panel. The header is copied verbatim and never interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub header: Vec<u8>,
    pub samples: Vec<f32>,
}

impl Trace {
    pub fn new(header: Vec<u8>, samples: Vec<f32>) -> Self {
        Self { header, samples }
    }

    pub fn shape(&self) -> TraceShape {
        TraceShape::of(self)
    }

    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_check() {
        let shape = TraceShape::new(4, 10);
        assert!(shape.check(&shape.blank()).is_ok());

        let short = Trace::new(vec![0; 4], vec![0.0; 9]);
        assert_eq!(
            shape.check(&short),
            Err(BufferError::SampleCount { expected: 10, found: 9 })
        );

        let bad_header = Trace::new(vec![0; 3], vec![0.0; 10]);
        assert_eq!(
            shape.check(&bad_header),
            Err(BufferError::HeaderSize { expected: 4, found: 3 })
        );
    }
}
