//! Decision-feedback equalizer with a normalized-LMS adaptation rule.

use std::collections::VecDeque;

use num_complex::Complex64;

use crate::errors::{DfeError, Result};
use crate::modulation::Constellation;

const EPS: f64 = 1e-12;

/// Outcome of one [`Dfe::step`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DfeDecision {
    /// Raw equalizer output before slicing.
    pub estimate: Complex64,
    /// Nearest constellation point to `estimate`.
    pub decision: Complex64,
    /// Error used to drive the adaptation (training symbol or decision-directed).
    pub error: Complex64,
}

/// Feedforward/feedback tapped-delay-line equalizer, adapted by normalized LMS.
#[derive(Debug, Clone)]
pub struct Dfe {
    wff: Vec<Complex64>,
    wfb: Vec<Complex64>,
    uff: VecDeque<Complex64>,
    ufb: VecDeque<Complex64>,
    mu: f64,
    n_iter: usize,
    constellation: Constellation,
}

impl Dfe {
    /// `wff[0] = 1.0` (identity start for a nominally clean channel), all
    /// other taps start at zero.
    pub fn new(
        n_ff: usize,
        n_fb: usize,
        mu: f64,
        n_iter: usize,
        constellation: Constellation,
    ) -> Result<Self> {
        if n_ff == 0 || n_fb == 0 {
            return Err(DfeError::InvalidTapCount.into());
        }
        if mu <= 0.0 {
            return Err(DfeError::InvalidStepSize.into());
        }

        let mut wff = vec![Complex64::new(0.0, 0.0); n_ff];
        wff[0] = Complex64::new(1.0, 0.0);

        Ok(Self {
            wff,
            wfb: vec![Complex64::new(0.0, 0.0); n_fb],
            uff: VecDeque::from(vec![Complex64::new(0.0, 0.0); n_ff]),
            ufb: VecDeque::from(vec![Complex64::new(0.0, 0.0); n_fb]),
            mu,
            n_iter: n_iter.max(1),
            constellation,
        })
    }

    fn nearest_constellation_point(&self, estimate: Complex64) -> Complex64 {
        (0..self.constellation.size())
            .map(|symbol| {
                let phase = self
                    .constellation
                    .symbol_phase(symbol)
                    .expect("symbol in range by construction");
                Complex64::from_polar(1.0, phase)
            })
            .min_by(|a, b| {
                (estimate - a)
                    .norm()
                    .partial_cmp(&(estimate - b).norm())
                    .expect("norms are finite")
            })
            .expect("constellation has at least two points")
    }

    fn estimate(&self) -> Complex64 {
        let ff: Complex64 = self
            .wff
            .iter()
            .zip(self.uff.iter())
            .map(|(&w, &u)| w * u)
            .sum();
        let fb: Complex64 = self
            .wfb
            .iter()
            .zip(self.ufb.iter())
            .map(|(&w, &u)| w * u)
            .sum();
        ff + fb
    }

    fn nlms_update(weights: &mut [Complex64], taps: &VecDeque<Complex64>, mu: f64, error: Complex64) {
        let energy: f64 = taps.iter().map(|u| u.norm_sqr()).sum();
        let scale = mu / (energy + EPS);
        for (w, &u) in weights.iter_mut().zip(taps.iter()) {
            *w += scale * error * u.conj();
        }
    }

    /// Advance one symbol time: estimate, slice, compute error against
    /// `training_symbol` (or the decision, if `None`), run `n_iter`
    /// normalized-LMS passes on the current tap snapshot, then shift both
    /// rings.
    pub fn step(&mut self, received_sample: Complex64, training_symbol: Option<Complex64>) -> DfeDecision {
        self.uff.push_front(received_sample);
        self.uff.pop_back();

        let estimate = self.estimate();
        let decision = self.nearest_constellation_point(estimate);
        let target = training_symbol.unwrap_or(decision);
        let error = target - estimate;

        for _ in 0..self.n_iter {
            Self::nlms_update(&mut self.wff, &self.uff, self.mu, error);
            Self::nlms_update(&mut self.wfb, &self.ufb, self.mu, error);
        }

        self.ufb.push_front(decision);
        self.ufb.pop_back();

        DfeDecision {
            estimate,
            decision,
            error,
        }
    }

    pub fn feedforward_weights(&self) -> &[Complex64] {
        &self.wff
    }

    pub fn feedback_weights(&self) -> &[Complex64] {
        &self.wfb
    }
}

/// Scored search over candidate sample-phase offsets within one chip
/// duration. For each phase, a cloned equalizer is trained against
/// `training_symbols` sampled at that phase and scored by mean squared
/// training error; the phase with the lowest score is returned alongside
/// its score.
pub fn phase_search(
    samples: &[Complex64],
    training_symbols: &[Complex64],
    chip_samples: usize,
    dfe_template: &Dfe,
) -> (usize, f64) {
    let candidates = chip_samples.max(1);
    let mut best_phase = 0;
    let mut best_score = f64::INFINITY;

    for phase in 0..candidates {
        let mut dfe = dfe_template.clone();
        let mut sum_sqr = 0.0;
        let mut count = 0usize;
        for (i, &training) in training_symbols.iter().enumerate() {
            let idx = phase + i * chip_samples;
            let Some(&sample) = samples.get(idx) else {
                break;
            };
            let out = dfe.step(sample, Some(training));
            sum_sqr += out.error.norm_sqr();
            count += 1;
        }
        if count == 0 {
            continue;
        }
        let score = sum_sqr / count as f64;
        if score < best_score {
            best_score = score;
            best_phase = phase;
        }
    }

    (best_phase, best_score)
}
