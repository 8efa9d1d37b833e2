//! Panel filters and the building blocks they share

pub mod windows;
pub mod robust;
pub mod median;
pub mod lpa;
pub mod denoise;

pub use windows::{periodic_window, WindowType};
pub use robust::{CombinePolicy, CombineValue, OutputMode, RobustCombiner};
pub use median::TraceMedianFilter;
pub use lpa::LpaSmoother;
pub use denoise::{DctDenoiser, DftDenoiser, SpectralDenoiser};
