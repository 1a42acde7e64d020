//! TOML-based configuration for the transmit/channel/receive demo.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use dsss_core::config::{DfeConfig, FilterDesignDefaults, SyncConfig, SystemConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Message to transmit.
    #[serde(default = "default_message")]
    pub message: String,

    /// Constellation size (power of two, >= 2).
    #[serde(default = "default_constellation")]
    pub constellation_size: u32,

    /// Carrier frequency in Hz.
    #[serde(default = "default_carrier_freq")]
    pub carrier_freq_hz: f64,

    /// Samples held per chip.
    #[serde(default = "default_chip_samples")]
    pub chip_samples: usize,

    /// Additive channel noise, expressed as SNR in dB.
    #[serde(default = "default_snr_db")]
    pub snr_db: f64,

    /// Deterministic seed for the channel noise generator.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Path to write the transmitted waveform as a WAV file.
    #[serde(default)]
    pub wav_output: Option<PathBuf>,

    #[serde(default)]
    pub system: SystemConfig,

    #[serde(default)]
    pub filter_design: FilterDesignDefaults,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub dfe: DfeConfig,
}

fn default_message() -> String {
    "hello dsss".to_string()
}

fn default_constellation() -> u32 {
    2
}

fn default_carrier_freq() -> f64 {
    8_000.0
}

fn default_chip_samples() -> usize {
    8
}

fn default_snr_db() -> f64 {
    15.0
}

fn default_seed() -> u64 {
    42
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            message: default_message(),
            constellation_size: default_constellation(),
            carrier_freq_hz: default_carrier_freq(),
            chip_samples: default_chip_samples(),
            snr_db: default_snr_db(),
            seed: default_seed(),
            wav_output: None,
            system: SystemConfig::default(),
            filter_design: FilterDesignDefaults::default(),
            sync: SyncConfig::default(),
            dfe: DfeConfig::default(),
        }
    }
}

impl DemoConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&content).wrap_err("failed to parse TOML configuration")
    }
}
