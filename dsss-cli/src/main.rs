mod config;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::SeedableRng;

use config::DemoConfig;
use dsss_core::channel;
use dsss_core::chips::GoldCode;
use dsss_core::config::BitDepth;
use dsss_core::context::DsssContext;
use dsss_core::equalizer::Dfe;
use dsss_core::filters::{design_bandpass, design_lowpass, BandpassEdges, LowpassEdges};
use dsss_core::modulation::{modulate_symbol, Constellation};
use dsss_core::sync::find_pilot;
use dsss_core::utils::bytes_to_bitstream;
use dsss_core::wav::write_wav;

/// Gold-code parameters pinned to the reference PN-sequence test vectors.
const GOLD_DEGREE: u8 = 7;
const GOLD_POLY_A: u32 = 0x1200_0000;
const GOLD_POLY_B: u32 = 0x1E00_0000;
const GOLD_INIT_A: u32 = 0x4000_0000;
const GOLD_INIT_B: u32 = 0x4000_0000;

const CHIPS_PER_SYMBOL: usize = 31;

#[derive(Parser, Debug)]
#[command(author, version, about = "Transmit -> channel -> receive demo for dsss-core", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<String>,

    /// Message to encode, overrides the config file.
    #[arg(short, long)]
    message: Option<String>,

    /// Write the simulated received waveform to this WAV path, overrides the config file.
    #[arg(short = 'w', long)]
    wav_output: Option<PathBuf>,

    /// Print per-stage diagnostics.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    let mut demo_config = match &args.config {
        Some(path) => DemoConfig::from_file(path)?,
        None => DemoConfig::default(),
    };
    if let Some(message) = args.message {
        demo_config.message = message;
    }
    if let Some(wav_output) = args.wav_output {
        demo_config.wav_output = Some(wav_output);
    }

    let mut ctx = DsssContext::init()?;
    ctx.logger_mut().info(
        "MOD",
        format!("encoding message: \"{}\"", demo_config.message),
    );

    let sample_rate = demo_config.system.sample_rate_hz;
    let constellation = Constellation::new(demo_config.constellation_size)?;

    // --- Transmit ---
    let bits = bytes_to_bitstream(demo_config.message.as_bytes());
    let mut data_gold = GoldCode::new(GOLD_DEGREE, GOLD_POLY_A, GOLD_POLY_B, GOLD_INIT_A, GOLD_INIT_B)?;

    let mut tx_signal = Vec::new();
    for &bit in &bits {
        let symbol_samples = CHIPS_PER_SYMBOL * demo_config.chip_samples;
        let (i_sig, q_sig) = modulate_symbol(
            &constellation,
            bit as u32,
            sample_rate,
            symbol_samples,
            1.0,
            demo_config.carrier_freq_hz,
        )?;
        let passband: Vec<f64> = i_sig.iter().zip(&q_sig).map(|(&i, &q)| i + q).collect();
        let chips = data_gold.next_chips(CHIPS_PER_SYMBOL);
        let spread = dsss_core::modulation::spread_signal(&chips, demo_config.chip_samples, &passband);
        tx_signal.extend(spread);
    }

    ctx.logger_mut().info(
        "MOD",
        format!("generated {} bits, {} samples", bits.len(), tx_signal.len()),
    );

    // Pilot preamble: one reference symbol spread with its own chip code,
    // generated independently from the data stream's Gold code instance.
    let mut pilot_gold = GoldCode::new(GOLD_DEGREE, GOLD_POLY_A, GOLD_POLY_B, GOLD_INIT_A, GOLD_INIT_B)?;
    let pilot_samples = CHIPS_PER_SYMBOL * demo_config.chip_samples;
    let (pilot_i, pilot_q) = modulate_symbol(
        &constellation,
        0,
        sample_rate,
        pilot_samples,
        1.0,
        demo_config.carrier_freq_hz,
    )?;
    let pilot_passband: Vec<f64> = pilot_i.iter().zip(&pilot_q).map(|(&i, &q)| i + q).collect();
    let pilot_chips = pilot_gold.next_chips(CHIPS_PER_SYMBOL);
    let pilot = dsss_core::modulation::spread_signal(&pilot_chips, demo_config.chip_samples, &pilot_passband);

    let mut full_tx = pilot.clone();
    full_tx.extend(&tx_signal);

    // --- Channel ---
    let mut rng = StdRng::seed_from_u64(demo_config.seed);
    let rx_signal = channel::apply_snr(&full_tx, demo_config.snr_db, &mut rng);

    ctx.logger_mut().info(
        "SYNC",
        format!("channel applied at {:.1} dB SNR", demo_config.snr_db),
    );

    // --- Receive: synchronize on the pilot ---
    let mut narrow = design_bandpass(
        BandpassEdges {
            fs1: demo_config.carrier_freq_hz * 0.7,
            fp1: demo_config.carrier_freq_hz * 0.85,
            fp2: demo_config.carrier_freq_hz * 1.15,
            fs2: demo_config.carrier_freq_hz * 1.3,
        },
        demo_config.filter_design.passband_ripple_db,
        demo_config.filter_design.stopband_atten_db,
        sample_rate,
    )?;
    let mut low = design_lowpass(
        LowpassEdges {
            fp: 200.0,
            fs: 500.0,
        },
        demo_config.filter_design.passband_ripple_db,
        demo_config.filter_design.stopband_atten_db,
        sample_rate,
    )?;

    let offset = find_pilot(&pilot, &rx_signal, &mut narrow, &mut low, demo_config.sync)?;
    ctx.logger_mut()
        .info("SYNC", format!("pilot located at sample offset {offset}"));

    // --- Receive: despread and slice each data symbol with a DFE ---
    let mut rx_gold = GoldCode::new(GOLD_DEGREE, GOLD_POLY_A, GOLD_POLY_B, GOLD_INIT_A, GOLD_INIT_B)?;
    let symbol_samples = CHIPS_PER_SYMBOL * demo_config.chip_samples;
    let data_start = offset + pilot.len();

    let mut dfe = Dfe::new(
        demo_config.dfe.feedforward_taps,
        demo_config.dfe.feedback_taps,
        demo_config.dfe.step_size,
        demo_config.dfe.retrain_iterations,
        constellation,
    )?;

    let mut recovered_bits = Vec::with_capacity(bits.len());
    for symbol_idx in 0..bits.len() {
        let start = data_start + symbol_idx * symbol_samples;
        let end = (start + symbol_samples).min(rx_signal.len());
        if start >= rx_signal.len() {
            break;
        }
        let chips = rx_gold.next_chips(CHIPS_PER_SYMBOL);
        let despread = dsss_core::modulation::spread_signal(&chips, demo_config.chip_samples, &rx_signal[start..end]);
        let estimate: f64 = despread.iter().sum::<f64>() / despread.len().max(1) as f64;
        let decision = dfe.step(Complex64::new(estimate, 0.0), None).decision;
        recovered_bits.push(if decision.re >= 0.0 { 1u8 } else { 0u8 });
    }

    let errors = bits
        .iter()
        .zip(&recovered_bits)
        .filter(|(tx, rx)| tx != rx)
        .count();
    let ber = errors as f64 / bits.len().max(1) as f64;
    ctx.logger_mut().info(
        "DFE",
        format!("recovered {} bits, {} errors, BER {:.4}", recovered_bits.len(), errors, ber),
    );

    if args.verbose {
        println!("{}", ctx.logger());
    }
    println!(
        "message=\"{}\" bits={} errors={errors} ber={ber:.4}",
        demo_config.message,
        bits.len()
    );

    if let Some(wav_path) = &demo_config.wav_output {
        let samples: Vec<f32> = rx_signal.iter().map(|&s| s as f32).collect();
        write_wav(wav_path, &[samples], sample_rate as u32, BitDepth::Float32)?;
        println!("wrote received waveform to {}", wav_path.display());
    }

    ctx.shutdown()?;
    Ok(())
}
