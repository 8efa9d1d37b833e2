//! Outlier-rejecting combination of a neighborhood of values
//!
//! The `keep` smallest-magnitude values survive; the rest are treated as
//! outliers. Selection uses a partial order-statistic pass rather than a full
//! sort, with ties broken by position so results are deterministic.

use num_complex::Complex64;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::ConfigError;

/// A value that can be ranked by magnitude and averaged
pub trait CombineValue: Copy + Default + Add<Output = Self> + Sub<Output = Self> {
    fn magnitude(&self) -> f64;

    /// Multiply by a real factor
    fn scale(self, factor: f64) -> Self;
}

impl CombineValue for f32 {
    fn magnitude(&self) -> f64 {
        self.abs() as f64
    }

    fn scale(self, factor: f64) -> Self {
        (self as f64 * factor) as f32
    }
}

impl CombineValue for f64 {
    fn magnitude(&self) -> f64 {
        self.abs()
    }

    fn scale(self, factor: f64) -> Self {
        self * factor
    }
}

impl CombineValue for Complex64 {
    fn magnitude(&self) -> f64 {
        self.norm()
    }

    fn scale(self, factor: f64) -> Self {
        self * factor
    }
}

/// How the kept values are reduced to one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombinePolicy {
    Mean,
    Median,
    /// Mean, unless the current value is itself kept
    #[default]
    SwapMean,
    /// Median, unless the current value is itself kept
    SwapMedian,
}

impl CombinePolicy {
    fn swaps(self) -> bool {
        matches!(self, CombinePolicy::SwapMean | CombinePolicy::SwapMedian)
    }

    fn uses_median(self) -> bool {
        matches!(self, CombinePolicy::Median | CombinePolicy::SwapMedian)
    }
}

impl fmt::Display for CombinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CombinePolicy::Mean => "mean",
            CombinePolicy::Median => "median",
            CombinePolicy::SwapMean => "swmean",
            CombinePolicy::SwapMedian => "swmedian",
        })
    }
}

impl FromStr for CombinePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(CombinePolicy::Mean),
            "median" => Ok(CombinePolicy::Median),
            "swmean" | "swap-mean" => Ok(CombinePolicy::SwapMean),
            "swmedian" | "swap-median" => Ok(CombinePolicy::SwapMedian),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Emit the combined value, or what was removed from the current value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Filtered,
    /// current - combined
    Noise,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputMode::Filtered => "filtered",
            OutputMode::Noise => "noise",
        })
    }
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filtered" | "0" => Ok(OutputMode::Filtered),
            "noise" | "1" => Ok(OutputMode::Noise),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

/// Trimmed mean / median with optional swap and noise output
#[derive(Debug, Clone)]
pub struct RobustCombiner {
    reject_percent: f64,
    policy: CombinePolicy,
    mode: OutputMode,

    /// Index permutation reused across calls
    order: Vec<usize>,
}

impl RobustCombiner {
    /// # Arguments
    /// * `reject_percent` - Share of largest-magnitude values treated as
    ///   outliers, in [0, 100]
    /// * `policy` - Reduction of the kept values
    /// * `mode` - Filtered output or noise residual
    pub fn new(reject_percent: f64, policy: CombinePolicy, mode: OutputMode) -> Result<Self, ConfigError> {
        if !(0.0..=100.0).contains(&reject_percent) {
            return Err(ConfigError::RejectOutOfRange(reject_percent));
        }
        Ok(Self {
            reject_percent,
            policy,
            mode,
            order: Vec::new(),
        })
    }

    pub fn policy(&self) -> CombinePolicy {
        self.policy
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn reject_percent(&self) -> f64 {
        self.reject_percent
    }

    /// Number of values kept out of `count`, at least one
    pub fn keep_count(&self, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let keep = (count as f64 * (100.0 - self.reject_percent) / 100.0).round() as usize;
        keep.clamp(1, count)
    }

    /// Combine `values`, where `values[current]` is the value being replaced.
    ///
    /// # Panics
    /// If `values` is empty or `current` is out of range.
    pub fn combine<T: CombineValue>(&mut self, values: &[T], current: usize) -> T {
        assert!(
            current < values.len(),
            "current index {} out of range for {} values",
            current,
            values.len()
        );

        let keep = self.keep_count(values.len());
        let by_magnitude = |a: &usize, b: &usize| {
            values[*a]
                .magnitude()
                .total_cmp(&values[*b].magnitude())
                .then(a.cmp(b))
        };

        self.order.clear();
        self.order.extend(0..values.len());
        if keep < values.len() {
            self.order.select_nth_unstable_by(keep - 1, by_magnitude);
        }
        let kept = &mut self.order[..keep];

        let current_value = values[current];
        let combined = if self.policy.swaps() && kept.contains(&current) {
            current_value
        } else if self.policy.uses_median() {
            let middle = keep / 2;
            kept.select_nth_unstable_by(middle, by_magnitude);
            values[kept[middle]]
        } else {
            let sum = kept.iter().fold(T::default(), |acc, &i| acc + values[i]);
            sum.scale(1.0 / keep as f64)
        };

        match self.mode {
            OutputMode::Filtered => combined,
            OutputMode::Noise => current_value - combined,
        }
    }
}
