//! M-PSK constellation, carrier generation, and chip-rate spreading.

use std::f64::consts::PI;

use crate::errors::{ModulationError, Result};

/// An M-ary PSK constellation: `m` evenly spaced phases, offset by
/// `PI/m` for `m >= 4` so that no symbol falls on the I or Q axis for
/// constellations with quadrant ambiguity.
#[derive(Debug, Clone, Copy)]
pub struct Constellation {
    m: u32,
    phase_offset: f64,
}

impl Constellation {
    pub fn new(m: u32) -> Result<Self> {
        if m < 2 || !m.is_power_of_two() {
            return Err(ModulationError::InvalidConstellationSize { m }.into());
        }
        let phase_offset = if m >= 4 { PI / m as f64 } else { 0.0 };
        Ok(Self { m, phase_offset })
    }

    pub fn size(&self) -> u32 {
        self.m
    }

    pub fn symbol_phase(&self, symbol: u32) -> Result<f64> {
        if symbol >= self.m {
            return Err(ModulationError::SymbolOutOfRange { symbol, m: self.m }.into());
        }
        Ok(2.0 * PI * symbol as f64 / self.m as f64 + self.phase_offset)
    }
}

/// `I[n] = amp*cos(theta)*cos(2*pi*fc*n/fr)`, `Q[n] = amp*sin(theta)*sin(2*pi*fc*n/fr)`.
pub fn modulate_symbol(
    constellation: &Constellation,
    symbol: u32,
    sample_rate: f64,
    n_samples: usize,
    amplitude: f64,
    carrier_freq: f64,
) -> Result<(Vec<f64>, Vec<f64>)> {
    if n_samples == 0 {
        return Err(ModulationError::InvalidSampleCount.into());
    }
    if carrier_freq <= 0.0 {
        return Err(ModulationError::InvalidCarrierFreq { freq_hz: carrier_freq }.into());
    }
    if sample_rate <= 0.0 {
        return Err(ModulationError::InvalidSampleRate { rate_hz: sample_rate }.into());
    }

    let theta = constellation.symbol_phase(symbol)?;
    let (sin_theta, cos_theta) = theta.sin_cos();

    let mut i_signal = Vec::with_capacity(n_samples);
    let mut q_signal = Vec::with_capacity(n_samples);
    for n in 0..n_samples {
        let wc = 2.0 * PI * carrier_freq * n as f64 / sample_rate;
        i_signal.push(amplitude * cos_theta * wc.cos());
        q_signal.push(amplitude * sin_theta * wc.sin());
    }
    Ok((i_signal, q_signal))
}

/// One exact period of `(cos, sin)` at `carrier_freq`, sampled at
/// `sample_rate`: the smallest `N` with `N * carrier_freq / sample_rate`
/// integral to within `1e-6`.
pub fn generate_carrier(sample_rate: f64, carrier_freq: f64) -> Result<(Vec<f64>, Vec<f64>)> {
    if carrier_freq <= 0.0 {
        return Err(ModulationError::InvalidCarrierFreq { freq_hz: carrier_freq }.into());
    }
    if sample_rate <= 0.0 {
        return Err(ModulationError::InvalidSampleRate { rate_hz: sample_rate }.into());
    }

    let cycles_per_sample = carrier_freq / sample_rate;
    let mut n = 1usize;
    loop {
        let periods = n as f64 * cycles_per_sample;
        if (periods - periods.round()).abs() < 1e-6 {
            break;
        }
        n += 1;
        if n > 10_000_000 {
            // Irrational or unreachable ratio within a sane search bound;
            // fall back to one full carrier cycle rounded to the nearest sample.
            n = (sample_rate / carrier_freq).round().max(1.0) as usize;
            break;
        }
    }

    let mut cos_signal = Vec::with_capacity(n);
    let mut sin_signal = Vec::with_capacity(n);
    for k in 0..n {
        let wc = 2.0 * PI * carrier_freq * k as f64 / sample_rate;
        cos_signal.push(wc.cos());
        sin_signal.push(wc.sin());
    }
    Ok((cos_signal, sin_signal))
}

/// Multiply `signal[k]` by `chips[k / chip_samples]`, each chip held over
/// `chip_samples` consecutive samples. Chips beyond the covered range leave
/// the remaining signal untouched.
pub fn spread_signal(chips: &[i8], chip_samples: usize, signal: &[f64]) -> Vec<f64> {
    if chip_samples == 0 {
        return signal.to_vec();
    }
    signal
        .iter()
        .enumerate()
        .map(|(k, &s)| {
            let chip_idx = k / chip_samples;
            match chips.get(chip_idx) {
                Some(&chip) => s * chip as f64,
                None => s,
            }
        })
        .collect()
}
