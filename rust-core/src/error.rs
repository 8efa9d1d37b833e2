//! Error types for transforms, buffers and panel filters

use thiserror::Error;

/// Fatal configuration problems. A run that hits one of these produces no output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive (got {value})")]
    NonPositiveSize { name: &'static str, value: usize },

    #[error("{name} must be odd (got {value})")]
    EvenSize { name: &'static str, value: usize },

    #[error("trace length must be at least one sample")]
    EmptyTrace,

    #[error("reject percentage {0} outside 0-100")]
    RejectOutOfRange(f64),

    #[error("sampling interval must be positive (got {0})")]
    NonPositiveInterval(f64),

    #[error("unknown smoothing window \"{0}\" (expected none, hann, hamming or blackman)")]
    UnknownWindow(String),

    #[error("unknown combination type \"{0}\" (expected mean, median, swmean or swmedian)")]
    UnknownPolicy(String),

    #[error("unknown output mode \"{0}\" (expected filtered or noise)")]
    UnknownMode(String),

    #[error("unknown buffer strategy \"{0}\" (expected ordered or cyclic)")]
    UnknownStrategy(String),

    #[error("unknown spectral component \"{0}\" (expected amp, phase, real or imag)")]
    UnknownComponent(String),
}

/// Errors raised by the sliding transforms
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("expected {expected} samples, found {found}")]
    SampleCount { expected: usize, found: usize },

    #[error("spectrum shape {found:?} does not match transform shape {expected:?}")]
    SpectrumShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("FFT processing failed: {0}")]
    Fft(String),
}

/// Record shape mismatches on push
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BufferError {
    #[error("trace has {found} samples, buffer holds {expected}-sample traces")]
    SampleCount { expected: usize, found: usize },

    #[error("trace header is {found} bytes, buffer holds {expected}-byte headers")]
    HeaderSize { expected: usize, found: usize },
}

/// Errors raised by the cyclic spectral buffer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectralBufferError {
    #[error("spectral buffer holds too few traces to produce a result")]
    NotReady,

    #[error("result accumulator incomplete: {missing} cells not set since the last push")]
    Incomplete { missing: usize },

    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Top-level error for the panel filters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Spectral(#[from] SpectralBufferError),
}
