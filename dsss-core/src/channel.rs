//! Channel modeling and impairment simulation
//!
//! Not part of the transceiver itself — a test-harness collaborator used to
//! build the transmit -> channel -> receive pipeline exercised by the
//! integration tests: AWGN injection and multipath convolution against an
//! arbitrary tap vector.

use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;

use crate::filters::convolve;

/// Apply AWGN noise to real audio samples.
pub fn apply_noise<R: Rng>(samples: &[f64], noise_std: f64, rng: &mut R) -> Vec<f64> {
    samples
        .iter()
        .map(|&s| s + rng.sample::<f64, _>(StandardNormal) * noise_std)
        .collect()
}

/// Apply AWGN noise to complex symbols (independently on I and Q).
pub fn apply_symbol_noise<R: Rng>(
    symbols: &[Complex64],
    noise_std: f64,
    rng: &mut R,
) -> Vec<Complex64> {
    symbols
        .iter()
        .map(|symbol| {
            let noise_i: f64 = rng.sample::<f64, _>(StandardNormal) * noise_std;
            let noise_q: f64 = rng.sample::<f64, _>(StandardNormal) * noise_std;
            symbol + Complex64::new(noise_i, noise_q)
        })
        .collect()
}

/// Apply a multipath channel impulse response to a real sample stream via
/// full linear convolution, then truncate back to the input length so the
/// caller sees a causal, same-length output (matching the convention used
/// by `test_equalizer.py`'s multipath fixtures, e.g. `[1, 0, 0.8, 0, 0.6, 0]`).
pub fn apply_multipath(samples: &[f64], taps: &[f64]) -> Vec<f64> {
    let mut out = convolve(samples, taps);
    out.truncate(samples.len());
    out
}

/// Add AWGN to a real sample stream at a target SNR in dB, computed from the
/// stream's own average power.
pub fn apply_snr<R: Rng>(samples: &[f64], snr_db: f64, rng: &mut R) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }
    let signal_power: f64 = samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64;
    let snr_linear = 10f64.powf(snr_db / 10.0);
    let noise_power = signal_power / snr_linear;
    apply_noise(samples, noise_power.sqrt(), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn noise_is_deterministic_with_seed() {
        let audio = vec![0.1, 0.2, 0.3];
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);

        let noisy1 = apply_noise(&audio, 0.01, &mut rng1);
        let noisy2 = apply_noise(&audio, 0.01, &mut rng2);

        assert_eq!(noisy1, noisy2);
    }

    #[test]
    fn symbol_noise_affects_both_components() {
        let symbols = vec![Complex64::new(1.0, 0.0)];
        let mut rng = StdRng::seed_from_u64(42);

        let noisy = apply_symbol_noise(&symbols, 0.1, &mut rng);

        assert_ne!(noisy[0].re, 1.0);
        assert_ne!(noisy[0].im, 0.0);
    }

    #[test]
    fn zero_noise_std_preserves_signal() {
        let symbols = vec![Complex64::new(1.0, 0.5)];
        let mut rng = StdRng::seed_from_u64(42);

        let noisy = apply_symbol_noise(&symbols, 0.0, &mut rng);

        assert_eq!(noisy[0], symbols[0]);
    }

    #[test]
    fn multipath_impulse_is_identity() {
        let samples = vec![1.0, 2.0, 3.0, 4.0];
        let taps = vec![1.0];
        let out = apply_multipath(&samples, &taps);
        assert_eq!(out, samples);
    }

    #[test]
    fn multipath_echo_adds_delayed_copy() {
        let samples = vec![1.0, 0.0, 0.0, 0.0, 0.0];
        let taps = vec![1.0, 0.0, 0.5];
        let out = apply_multipath(&samples, &taps);
        assert_eq!(out, vec![1.0, 0.0, 0.5, 0.0, 0.0]);
    }
}
