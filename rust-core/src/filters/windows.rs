//! Window functions applied along the frequency axis of a sliding transform
//!
//! A raised-cosine window multiplied onto the W-wide time window is equivalent
//! to a short convolution across frequency bins, so the sliding transforms
//! apply it after the recursion instead of re-weighting samples.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Hann window: w[m] = 0.5 - 0.5*cos(2πm/W)
    Hann,

    /// Hamming window: w[m] = 0.54 - 0.46*cos(2πm/W)
    Hamming,

    /// Blackman window: w[m] = 0.42 - 0.5*cos(2πm/W) + 0.08*cos(4πm/W)
    Blackman,

    /// Rectangular window (no smoothing)
    #[default]
    Rectangular,
}

impl WindowType {
    /// Frequency-domain taps (a0, a1, a2) of the symmetric smoothing kernel.
    ///
    /// Output bin k is `a0*X[k] + a1*(X[k-1] + X[k+1]) + a2*(X[k-2] + X[k+2])`
    /// in units of one bin step. `None` for the rectangular window.
    pub fn spectral_taps(&self) -> Option<(f64, f64, f64)> {
        match self {
            WindowType::Hann => Some((0.5, -0.25, 0.0)),
            WindowType::Hamming => Some((0.54, -0.23, 0.0)),
            WindowType::Blackman => Some((0.42, -0.25, 0.04)),
            WindowType::Rectangular => None,
        }
    }

    /// Selector name as used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            WindowType::Hann => "hann",
            WindowType::Hamming => "hamming",
            WindowType::Blackman => "blackman",
            WindowType::Rectangular => "none",
        }
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "rectangular" => Ok(WindowType::Rectangular),
            "hann" => Ok(WindowType::Hann),
            "hamming" => Ok(WindowType::Hamming),
            "blackman" => Ok(WindowType::Blackman),
            _ => Err(ConfigError::UnknownWindow(s.to_string())),
        }
    }
}

/// Periodic window of length `length` matching the spectral taps.
///
/// Sample m of the returned window weights position m of a sliding window
/// (m = 0 is the oldest sample). The window peaks at the window center.
pub fn periodic_window(window_type: WindowType, length: usize) -> Vec<f64> {
    let taps = window_type.spectral_taps();
    let m = length as f64;

    (0..length)
        .map(|n| match taps {
            Some((a0, a1, a2)) => {
                let angle = 2.0 * PI * n as f64 / m;
                a0 + 2.0 * a1 * angle.cos() + 2.0 * a2 * (2.0 * angle).cos()
            }
            None => 1.0,
        })
        .collect()
}
