//! Panel filter configuration

use crate::buffer::BufferStrategy;
use crate::error::ConfigError;
use crate::filters::robust::{CombinePolicy, OutputMode, RobustCombiner};
use crate::filters::windows::WindowType;

/// Reject percentage used when the configured one is unusable
pub const DEFAULT_REJECT_PERCENT: f64 = 10.0;

/// Settings shared by the panel filters
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    /// Transform window length in samples (odd)
    pub window_size: usize,

    /// Records per neighborhood (odd)
    pub neighborhood: usize,

    /// Frequency-axis smoothing kernel
    pub kernel: WindowType,

    /// Share of largest-magnitude values rejected as outliers, in (0, 100]
    pub reject_percent: f64,

    pub policy: CombinePolicy,

    pub mode: OutputMode,

    /// Buffer used by the raw-domain filters
    pub strategy: BufferStrategy,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            window_size: 31,
            neighborhood: 9,
            kernel: WindowType::Rectangular,
            reject_percent: DEFAULT_REJECT_PERCENT,
            policy: CombinePolicy::SwapMean,
            mode: OutputMode::Filtered,
            strategy: BufferStrategy::Cyclic,
        }
    }
}

impl PanelConfig {
    /// Apply the usual caller-side adjustments: zero sizes are fatal, even
    /// sizes are rounded up to the next odd value and an unusable reject
    /// percentage falls back to the default. Every adjustment is logged.
    pub fn normalized(&self) -> Result<Self, ConfigError> {
        let mut config = self.clone();
        config.window_size = odd_size("window size", self.window_size)?;
        config.neighborhood = odd_size("neighborhood size", self.neighborhood)?;

        if !(self.reject_percent > 0.0 && self.reject_percent <= 100.0) {
            log::warn!(
                "reject percentage {} outside (0, 100], using {}",
                self.reject_percent,
                DEFAULT_REJECT_PERCENT
            );
            config.reject_percent = DEFAULT_REJECT_PERCENT;
        }
        Ok(config)
    }

    /// Combiner for this configuration's reject/policy/mode
    pub fn combiner(&self) -> Result<RobustCombiner, ConfigError> {
        RobustCombiner::new(self.reject_percent, self.policy, self.mode)
    }
}

/// Round an even size up to the next odd one
pub fn odd_size(name: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::NonPositiveSize { name, value });
    }
    if value % 2 == 0 {
        log::warn!("{} {} is even, using {}", name, value, value + 1);
        return Ok(value + 1);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_normal() {
        let config = PanelConfig::default();
        assert_eq!(config.normalized().unwrap(), config);
    }

    #[test]
    fn test_normalization() {
        let config = PanelConfig {
            window_size: 30,
            neighborhood: 4,
            reject_percent: 0.0,
            ..Default::default()
        };
        let normalized = config.normalized().unwrap();
        assert_eq!(normalized.window_size, 31);
        assert_eq!(normalized.neighborhood, 5);
        assert_eq!(normalized.reject_percent, DEFAULT_REJECT_PERCENT);

        let over = PanelConfig {
            reject_percent: 150.0,
            ..Default::default()
        };
        assert_eq!(over.normalized().unwrap().reject_percent, DEFAULT_REJECT_PERCENT);

        let full = PanelConfig {
            reject_percent: 100.0,
            ..Default::default()
        };
        assert_eq!(full.normalized().unwrap().reject_percent, 100.0);
    }

    #[test]
    fn test_zero_size_is_fatal() {
        let config = PanelConfig {
            neighborhood: 0,
            ..Default::default()
        };
        assert_eq!(
            config.normalized(),
            Err(ConfigError::NonPositiveSize {
                name: "neighborhood size",
                value: 0
            })
        );
    }
}
