//! Sliding transforms: one spectrum per time sample

pub mod transform;
pub mod windowing;
pub mod sdft;
pub mod sdct;
pub mod analysis;

pub use transform::SlidingTransform;
pub use sdft::SlidingDft;
pub use sdct::SlidingDct;
pub use analysis::{FrequencySlice, SpectralComponent, SpectralValue, TimeFrequencyDecomposer};
