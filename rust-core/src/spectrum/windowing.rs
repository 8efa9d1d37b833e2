//! Frequency-axis windowing for sliding spectra
//!
//! Smooths every time column of a `[frequency, time]` spectrum with the
//! symmetric taps of a [`WindowType`]. Bins outside the stored range are taken
//! from the symmetric extension of the transform, never zero-padded.

use ndarray::Array2;
use num_complex::Complex64;
use std::ops::{Add, Mul};

use crate::filters::windows::WindowType;

/// Bin `k` of a Fourier half-spectrum extended to all integers through
/// periodicity (period W) and conjugate symmetry of a real input.
#[inline]
pub(crate) fn fourier_bin(column: &[Complex64], window: usize, k: isize) -> Complex64 {
    let k = k.rem_euclid(window as isize) as usize;
    if k < column.len() {
        column[k]
    } else {
        column[window - k].conj()
    }
}

/// Bin `k` of a type-II cosine spectrum extended to all integers.
///
/// The cosine basis is even about bin 0, odd about bin W (bin W itself is
/// zero) and periodic with period 4W.
#[inline]
pub(crate) fn cosine_bin(column: &[f64], k: isize) -> f64 {
    let w = column.len();
    let r = k.unsigned_abs() % (4 * w);
    if r < w {
        column[r]
    } else if r == w || r == 3 * w {
        0.0
    } else if r <= 2 * w {
        -column[2 * w - r]
    } else if r < 3 * w {
        -column[r - 2 * w]
    } else {
        column[4 * w - r]
    }
}

/// Scratch columns reused across calls so smoothing does not allocate per push
#[derive(Debug, Default)]
pub(crate) struct ColumnScratch<C> {
    column: Vec<C>,
    smoothed: Vec<C>,
}

impl<C: Copy + Default> ColumnScratch<C> {
    pub(crate) fn new(num_frequencies: usize) -> Self {
        Self {
            column: vec![C::default(); num_frequencies],
            smoothed: vec![C::default(); num_frequencies],
        }
    }
}

/// Apply the window taps across frequency for every time column in place.
///
/// `step` is the bin distance of one tap (1 for Fourier, 2 for cosine) and
/// `extend` resolves out-of-range bins from the column being smoothed.
pub(crate) fn smooth_frequency_axis<C, F>(
    spectrum: &mut Array2<C>,
    window_type: WindowType,
    step: usize,
    scratch: &mut ColumnScratch<C>,
    extend: F,
) where
    C: Copy + Default + Add<Output = C> + Mul<f64, Output = C>,
    F: Fn(&[C], isize) -> C,
{
    let (a0, a1, a2) = match window_type.spectral_taps() {
        Some(taps) => taps,
        None => return,
    };
    let step = step as isize;

    for mut time_column in spectrum.columns_mut() {
        for (dst, &src) in scratch.column.iter_mut().zip(time_column.iter()) {
            *dst = src;
        }

        let column = &scratch.column;
        for (k, out) in scratch.smoothed.iter_mut().enumerate() {
            let k = k as isize;
            let near = extend(column, k - step) + extend(column, k + step);
            let mut value = column[k as usize] * a0 + near * a1;
            if a2 != 0.0 {
                let far = extend(column, k - 2 * step) + extend(column, k + 2 * step);
                value = value + far * a2;
            }
            *out = value;
        }

        for (dst, &src) in time_column.iter_mut().zip(scratch.smoothed.iter()) {
            *dst = src;
        }
    }
}
