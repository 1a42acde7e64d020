//! Sliding-window correlation-energy pilot synchronizer.
//!
//! Implements the despread -> narrowband filter -> square -> lowpass ->
//! sum energy metric, scanned at a coarse decimation and refined to sample
//! accuracy by an exhaustive local search around the coarse peak.

use crate::errors::{Result, SyncError};
use crate::filters::FirFilter;

pub use crate::config::SyncConfig;

/// Compute the correlation-energy profile at every `decimation`-spaced
/// offset: `x = r[i..i+Np] * p`, `y = narrow(x)`, `z = y*y`, `w = low(z)`,
/// `E[i/d] = sum(w)`. `narrow`/`low` are reset at the top of each offset so
/// one offset's window never convolves with the tail of the previous one.
pub fn correlate_energy(
    pilot: &[f64],
    received: &[f64],
    narrow: &mut FirFilter,
    low: &mut FirFilter,
    decimation: usize,
) -> Result<Vec<f64>> {
    if decimation == 0 {
        return Err(SyncError::InvalidDecimation.into());
    }
    if received.len() < pilot.len() {
        return Err(SyncError::PilotNotFound {
            pilot_len: pilot.len(),
            received_len: received.len(),
        }
        .into());
    }

    let last_offset = received.len() - pilot.len();
    let offsets: Vec<usize> = (0..=last_offset).step_by(decimation).collect();

    let mut energies = Vec::with_capacity(offsets.len());
    for &i in &offsets {
        narrow.reset();
        low.reset();

        let despread: Vec<f64> = received[i..i + pilot.len()]
            .iter()
            .zip(pilot)
            .map(|(&r, &p)| r * p)
            .collect();
        let narrowed = narrow.apply(&despread);
        let squared: Vec<f64> = narrowed.iter().map(|&y| y * y).collect();
        let smoothed = low.apply(&squared);
        energies.push(smoothed.iter().sum());
    }
    Ok(energies)
}

/// Coarse decimated scan via [`correlate_energy`], argmax, then an
/// exhaustive `decimation=1` refinement over `+/- refine_window` samples
/// around the coarse peak. Returns the sample-accurate global offset.
pub fn find_pilot(
    pilot: &[f64],
    received: &[f64],
    narrow: &mut FirFilter,
    low: &mut FirFilter,
    cfg: SyncConfig,
) -> Result<usize> {
    if received.len() < pilot.len() {
        return Err(SyncError::PilotNotFound {
            pilot_len: pilot.len(),
            received_len: received.len(),
        }
        .into());
    }

    let coarse_energies = correlate_energy(pilot, received, narrow, low, cfg.decimation)?;
    let (coarse_idx, _) = coarse_energies
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).expect("energies are finite"))
        .expect("scanned at least one offset");
    let coarse_offset = coarse_idx * cfg.decimation;

    let last_offset = received.len() - pilot.len();
    let lo = coarse_offset.saturating_sub(cfg.refine_window);
    let hi = (coarse_offset + cfg.refine_window).min(last_offset);

    let window = &received[lo..(hi + pilot.len()).min(received.len())];
    let fine_energies = correlate_energy(pilot, window, narrow, low, 1)?;
    let (fine_idx, _) = fine_energies
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).expect("energies are finite"))
        .expect("scanned at least one offset");

    Ok(lo + fine_idx)
}
