//! `rustfft`-backed power-spectrum diagnostics, carried from the teacher's
//! baseband-spectrum helper for use alongside the synchronizer.

use num_complex::{Complex, Complex32};
use rustfft::FftPlanner;

/// Zero-pad to `fft_size`, Hamming-window, FFT, and return the power
/// spectrum in dB, DC-centered.
pub fn compute_power_spectrum(samples: &[Complex<f64>], fft_size: usize) -> Vec<f32> {
    if samples.is_empty() || fft_size == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);

    let mut buffer = prepare_fft_buffer(samples, fft_size);
    let window_len = samples.len().min(fft_size);
    apply_hamming_window(&mut buffer, window_len);

    fft.process(&mut buffer);

    let spectrum = power_spectrum_db(&buffer, window_len);
    center_spectrum(spectrum)
}

fn prepare_fft_buffer(samples: &[Complex<f64>], fft_size: usize) -> Vec<Complex32> {
    let mut buffer = Vec::with_capacity(fft_size);
    for s in samples.iter().take(fft_size) {
        buffer.push(Complex32::new(s.re as f32, s.im as f32));
    }
    buffer.resize(fft_size, Complex32::new(0.0, 0.0));
    buffer
}

fn apply_hamming_window(buffer: &mut [Complex32], window_len: usize) {
    if window_len < 2 {
        return;
    }
    for (i, sample) in buffer.iter_mut().take(window_len).enumerate() {
        let w = 0.54 - 0.46 * (2.0 * std::f32::consts::PI * i as f32 / (window_len as f32 - 1.0)).cos();
        *sample = *sample * w;
    }
}

const HAMMING_WINDOW_POWER: f32 = 0.397;

fn power_spectrum_db(buffer: &[Complex32], actual_samples: usize) -> Vec<f32> {
    let scale = 1.0 / (actual_samples as f32 * HAMMING_WINDOW_POWER.sqrt());
    buffer
        .iter()
        .map(|c| {
            let power = c.norm_sqr() * scale * scale;
            if power > 1e-10 {
                10.0 * power.log10()
            } else {
                -100.0
            }
        })
        .collect()
}

/// Rearrange FFT bin order `[0..fs/2, -fs/2..0)` to a DC-centered view.
fn center_spectrum(spectrum: Vec<f32>) -> Vec<f32> {
    let half = spectrum.len() / 2;
    let mut centered = Vec::with_capacity(spectrum.len());
    centered.extend_from_slice(&spectrum[half..]);
    centered.extend_from_slice(&spectrum[..half]);
    centered
}
