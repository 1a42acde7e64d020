//! In-place radix-2 decimation-in-time FFT.
//!
//! Forward transform only — the core never needs an inverse. Exposed for
//! spectral diagnostics in the synchronization path; [`crate::spectrum`]
//! wraps `rustfft` for the heavier diagnostic power-spectrum computation.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::errors::{FftError, Result};

/// Smallest power of two `>= n`.
pub fn next_power_of_two(n: usize) -> usize {
    if n <= 1 {
        1
    } else {
        n.next_power_of_two()
    }
}

fn bit_reverse_permute(samples: &mut [Complex64]) {
    let n = samples.len();
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = (i as u32).reverse_bits() >> (32 - bits);
        let j = j as usize;
        if j > i {
            samples.swap(i, j);
        }
    }
}

/// In-place radix-2 DIT FFT; `samples.len()` must be a power of two.
pub fn fft_forward(samples: &mut [Complex64]) -> Result<()> {
    let n = samples.len();
    if n == 0 || !n.is_power_of_two() {
        return Err(FftError::NotPowerOfTwo { size: n }.into());
    }
    if n == 1 {
        return Ok(());
    }

    bit_reverse_permute(samples);

    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let angle_step = -2.0 * PI / size as f64;
        for start in (0..n).step_by(size) {
            for k in 0..half {
                let twiddle = Complex64::from_polar(1.0, angle_step * k as f64);
                let even = samples[start + k];
                let odd = samples[start + k + half] * twiddle;
                samples[start + k] = even + odd;
                samples[start + k + half] = even - odd;
            }
        }
        size *= 2;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_power_of_two_length() {
        let mut samples = vec![Complex64::new(1.0, 0.0); 3];
        assert!(fft_forward(&mut samples).is_err());
    }

    #[test]
    fn dc_input_produces_energy_only_in_bin_zero() {
        let mut samples = vec![Complex64::new(1.0, 0.0); 8];
        fft_forward(&mut samples).unwrap();
        assert!((samples[0].re - 8.0).abs() < 1e-9);
        for bin in &samples[1..] {
            assert!(bin.norm() < 1e-9);
        }
    }

    #[test]
    fn single_tone_produces_energy_in_matching_bin() {
        let n = 16;
        let bin = 3;
        let mut samples: Vec<Complex64> = (0..n)
            .map(|k| {
                let angle = 2.0 * PI * bin as f64 * k as f64 / n as f64;
                Complex64::from_polar(1.0, angle)
            })
            .collect();
        fft_forward(&mut samples).unwrap();

        let magnitudes: Vec<f64> = samples.iter().map(|c| c.norm()).collect();
        let (peak_bin, _) = magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap();
        assert_eq!(peak_bin, bin);
    }

    #[test]
    fn next_power_of_two_rounds_up() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(5), 8);
        assert_eq!(next_power_of_two(8), 8);
    }
}
