//! Trace Panel - Sliding-Transform Filtering Core
//!
//! Record-at-a-time filtering of trace panels: rolling neighborhoods of
//! records, sliding DFT/DCT spectra per record and outlier-rejecting
//! combination across the neighborhood.

pub mod error;
pub mod record;
pub mod config;
pub mod buffer;
pub mod filters;
pub mod spectrum;
pub mod panel;

pub use error::{BufferError, ConfigError, FilterError, SpectralBufferError, TransformError};
pub use record::{Trace, TraceShape};
pub use config::PanelConfig;
pub use buffer::{BufferStrategy, CyclicSpectralBuffer, CyclicTraceBuffer, OrderedTraceBuffer, TraceWindow};
pub use filters::{
    CombinePolicy, DctDenoiser, DftDenoiser, LpaSmoother, OutputMode, RobustCombiner, SpectralDenoiser,
    TraceMedianFilter, WindowType,
};
pub use spectrum::{SlidingDct, SlidingDft, SlidingTransform, SpectralComponent, TimeFrequencyDecomposer};
pub use panel::{run_panel, stream_panel, PanelFilter};
