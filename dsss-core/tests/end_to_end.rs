//! Cross-module end-to-end scenarios: transmit -> channel -> synchronize ->
//! equalize, and the binary-PAM Monte Carlo error-rate bound.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dsss_core::channel::{apply_multipath, apply_snr};
use dsss_core::chips::GoldCode;
use dsss_core::equalizer::Dfe;
use dsss_core::filters::{design_bandpass, design_lowpass, BandpassEdges, LowpassEdges};
use dsss_core::modulation::{generate_carrier, Constellation};
use dsss_core::sync::{find_pilot, SyncConfig};

const GOLD_DEGREE: u8 = 7;
const GOLD_POLY_A: u32 = 0x1200_0000;
const GOLD_POLY_B: u32 = 0x1E00_0000;
const GOLD_INIT: u32 = 0x4000_0000;

fn gold_pilot(n_chips: usize) -> Vec<f64> {
    let mut gold =
        GoldCode::new(GOLD_DEGREE, GOLD_POLY_A, GOLD_POLY_B, GOLD_INIT, GOLD_INIT).unwrap();
    gold.next_chips(n_chips)
        .into_iter()
        .map(|c| c as f64)
        .collect()
}

fn narrow_low_filters(sample_rate: f64) -> (dsss_core::filters::FirFilter, dsss_core::filters::FirFilter) {
    let narrow = design_bandpass(
        BandpassEdges {
            fs1: 1_000.0,
            fp1: 1_500.0,
            fp2: 2_500.0,
            fs2: 3_000.0,
        },
        0.1,
        60.0,
        sample_rate,
    )
    .unwrap();
    let low = design_lowpass(LowpassEdges { fp: 100.0, fs: 300.0 }, 0.1, 60.0, sample_rate).unwrap();
    (narrow, low)
}

#[test]
fn pilot_detection_survives_awgn_at_20db_snr() {
    let sample_rate = 48_000.0;
    let pilot = gold_pilot(127);

    let k = 200;
    let mut tx = vec![0.0; k];
    tx.extend(&pilot);
    tx.extend(vec![0.0; 400]);

    let mut rng = StdRng::seed_from_u64(7);
    let rx = apply_snr(&tx, 20.0, &mut rng);

    let (mut narrow, mut low) = narrow_low_filters(sample_rate);
    let cfg = SyncConfig {
        decimation: 4,
        refine_window: 16,
    };
    let offset = find_pilot(&pilot, &rx, &mut narrow, &mut low, cfg).unwrap();

    assert!(
        (offset as i64 - k as i64).abs() <= cfg.decimation as i64,
        "offset {offset} too far from true {k}"
    );
}

#[test]
fn synchronizer_peak_is_at_zero_for_clean_pilot() {
    let sample_rate = 48_000.0;
    let pilot = gold_pilot(64);
    let (mut narrow, mut low) = narrow_low_filters(sample_rate);

    let energies =
        dsss_core::sync::correlate_energy(&pilot, &pilot, &mut narrow, &mut low, 1).unwrap();
    let (peak_idx, _) = energies
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .unwrap();
    assert_eq!(peak_idx, 0);
}

#[test]
fn dfe_converges_on_multipath_channel_within_training() {
    let bpsk = Constellation::new(2).unwrap();
    let channel_taps = [1.0, 0.0, 0.8, 0.0, 0.6, 0.0];

    let mut rng = StdRng::seed_from_u64(11);
    let symbols: Vec<f64> = (0..32)
        .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
        .collect();

    let channel_out = apply_multipath(&symbols, &channel_taps);
    let noisy = apply_snr(&channel_out, 20.0, &mut rng);

    let mut dfe = Dfe::new(5, 3, 0.2, 4, bpsk).unwrap();
    for (&sample, &tx_symbol) in noisy.iter().zip(&symbols) {
        dfe.step(Complex64::new(sample, 0.0), Some(Complex64::new(tx_symbol, 0.0)));
    }

    // The feedforward weights, dotted with the channel response, should
    // approximate the leading coefficient of the channel's inverse (i.e.
    // recover something close to an impulse through the combined path).
    let dot: f64 = dfe
        .feedforward_weights()
        .iter()
        .zip(channel_taps.iter())
        .map(|(w, &h)| w.re * h)
        .sum();
    assert!((dot - 1.0).abs() < 0.5, "dot product {dot} not near 1.0");
}

/// Binary-PAM (BPSK on a single real rail) error rate must stay under the
/// empirical bounds from the spec's Monte Carlo table.
#[test]
fn binary_pam_monte_carlo_error_bounds() {
    let cases = [(-20.0, 0.50), (-10.0, 0.30), (0.0, 0.10), (10.0, 0.01), (20.0, 0.01)];
    let n_trials = 2000;

    for &(snr_db, bound) in &cases {
        let mut rng = StdRng::seed_from_u64(snr_db.to_bits());
        let symbols: Vec<f64> = (0..n_trials)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let noisy = apply_snr(&symbols, snr_db, &mut rng);

        let errors = symbols
            .iter()
            .zip(&noisy)
            .filter(|(&tx, &rx)| (rx >= 0.0) != (tx >= 0.0))
            .count();
        let error_rate = errors as f64 / n_trials as f64;

        assert!(
            error_rate <= bound + 0.05,
            "SNR {snr_db} dB: error rate {error_rate} exceeds bound {bound}"
        );
    }
}

#[test]
fn generate_carrier_feeds_cleanly_into_gold_spread_and_despread() {
    let (cos, sin) = generate_carrier(48_000.0, 4_000.0).unwrap();
    assert_eq!(cos.len(), sin.len());

    let mut tx_gold = GoldCode::new(GOLD_DEGREE, GOLD_POLY_A, GOLD_POLY_B, GOLD_INIT, GOLD_INIT).unwrap();
    let mut rx_gold = GoldCode::new(GOLD_DEGREE, GOLD_POLY_A, GOLD_POLY_B, GOLD_INIT, GOLD_INIT).unwrap();

    let chips = tx_gold.next_chips(cos.len());
    let spread = dsss_core::modulation::spread_signal(&chips, 1, &cos);

    let rx_chips = rx_gold.next_chips(cos.len());
    let despread = dsss_core::modulation::spread_signal(&rx_chips, 1, &spread);

    for (a, b) in cos.iter().zip(&despread) {
        assert!((a - b).abs() < 1e-9);
    }
}
