//! Configuration types for the dsss-core DSP pipeline.
use serde::{Deserialize, Serialize};

/// Output sample format for [`crate::wav::write_wav`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum BitDepth {
    Pcm16,
    Pcm24,
    Pcm32,
    #[default]
    Float32,
}

impl BitDepth {
    pub fn bits_per_sample(&self) -> u16 {
        match self {
            BitDepth::Pcm16 => 16,
            BitDepth::Pcm24 => 24,
            BitDepth::Pcm32 => 32,
            BitDepth::Float32 => 32,
        }
    }

    /// Largest magnitude representable at this depth, used for overflow checks.
    pub fn full_scale(&self) -> f64 {
        match self {
            BitDepth::Pcm16 => i16::MAX as f64,
            BitDepth::Pcm24 => (1i32 << 23) as f64 - 1.0,
            BitDepth::Pcm32 => i32::MAX as f64,
            BitDepth::Float32 => 1.0,
        }
    }
}

/// Fixed system-wide operating parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    pub sample_rate_hz: f64,
}

impl SystemConfig {
    pub const SAMPLE_RATE: usize = 48_000;
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: Self::SAMPLE_RATE as f64,
        }
    }
}

/// Default Kaiser bandpass/lowpass design parameters used by the demo
/// pipeline; callers of the library proper always pass explicit edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterDesignDefaults {
    pub passband_ripple_db: f64,
    pub stopband_atten_db: f64,
}

impl Default for FilterDesignDefaults {
    fn default() -> Self {
        Self {
            passband_ripple_db: 0.1,
            stopband_atten_db: 80.0,
        }
    }
}

/// Default synchronizer search parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Coarse-scan decimation factor in samples.
    pub decimation: usize,
    /// Half-width, in samples, of the local refinement window around the
    /// coarse peak.
    pub refine_window: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            decimation: 12,
            refine_window: 24,
        }
    }
}

/// Default decision-feedback-equalizer training parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DfeConfig {
    pub feedforward_taps: usize,
    pub feedback_taps: usize,
    pub step_size: f64,
    pub retrain_iterations: usize,
}

impl Default for DfeConfig {
    fn default() -> Self {
        Self {
            feedforward_taps: 5,
            feedback_taps: 3,
            step_size: 0.05,
            retrain_iterations: 4,
        }
    }
}
