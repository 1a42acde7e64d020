//! dsss-core error types with granular categories per subsystem.

use thiserror::Error;

/// Top-level error type for all dsss-core operations.
#[derive(Debug, Error)]
pub enum DsssError {
    #[error("bit stream error: {0}")]
    Bits(#[from] BitsError),

    #[error("chip generator error: {0}")]
    Chips(#[from] ChipsError),

    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("modulation error: {0}")]
    Modulation(#[from] ModulationError),

    #[error("synchronization error: {0}")]
    Sync(#[from] SyncError),

    #[error("equalizer error: {0}")]
    Dfe(#[from] DfeError),

    #[error("FFT error: {0}")]
    Fft(#[from] FftError),

    #[error("WAV I/O error: {0}")]
    Wav(#[from] WavError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// BitPacker / BitStream errors.
#[derive(Debug, Error)]
pub enum BitsError {
    #[error("bit width {n_bits} out of range [1,32]")]
    InvalidBitWidth { n_bits: u32 },

    #[error("requested {n} bits exceeds the [1, 2^24] limit")]
    InvalidReadLength { n: u32 },

    #[error("stream constructed over a bit-unaligned packer (bit_len={bit_len})")]
    Unaligned { bit_len: usize },

    #[error("circular read over an empty packer")]
    EmptyCircularSource,
}

/// LFSR / Gold-code errors.
#[derive(Debug, Error)]
pub enum ChipsError {
    #[error("LFSR degree {degree} out of range [2,32]")]
    InvalidDegree { degree: u8 },

    #[error("LFSR polynomial must be non-zero")]
    ZeroPolynomial,

    #[error("LFSR initial state must be non-zero")]
    ZeroInitialState,
}

/// Kaiser FIR design/application errors.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid bandpass edges: require 0 < fs1({fs1}) < fp1({fp1}) < fp2({fp2}) < fs2({fs2}) < fr/2({nyquist})")]
    InvalidBandpassEdges {
        fs1: f64,
        fp1: f64,
        fp2: f64,
        fs2: f64,
        nyquist: f64,
    },

    #[error("invalid lowpass edges: require 0 < fp({fp}) < fs({fs}) < fr/2({nyquist})")]
    InvalidLowpassEdges { fp: f64, fs: f64, nyquist: f64 },

    #[error("stopband attenuation must be positive, got {atten_db}")]
    InvalidAttenuation { atten_db: f64 },
}

/// Modulator / carrier / spreading errors.
#[derive(Debug, Error)]
pub enum ModulationError {
    #[error("constellation size {m} must be a power of two >= 2")]
    InvalidConstellationSize { m: u32 },

    #[error("symbol {symbol} out of range [0,{m})")]
    SymbolOutOfRange { symbol: u32, m: u32 },

    #[error("sample count must be > 0")]
    InvalidSampleCount,

    #[error("carrier frequency must be > 0, got {freq_hz}")]
    InvalidCarrierFreq { freq_hz: f64 },

    #[error("sample rate must be > 0, got {rate_hz}")]
    InvalidSampleRate { rate_hz: f64 },
}

/// Synchronizer errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("received signal ({received_len}) shorter than pilot ({pilot_len})")]
    PilotNotFound {
        pilot_len: usize,
        received_len: usize,
    },

    #[error("decimation factor must be >= 1")]
    InvalidDecimation,
}

/// Decision-feedback equalizer errors.
#[derive(Debug, Error)]
pub enum DfeError {
    #[error("feedforward and feedback tap counts must be non-zero")]
    InvalidTapCount,

    #[error("step size mu must be > 0")]
    InvalidStepSize,
}

/// FFT errors.
#[derive(Debug, Error)]
pub enum FftError {
    #[error("FFT size {size} is not a power of two")]
    NotPowerOfTwo { size: usize },
}

/// WAV output errors.
#[derive(Debug, Error)]
pub enum WavError {
    #[error("channel sample count mismatch: {a} vs {b}")]
    ChannelLengthMismatch { a: usize, b: usize },

    #[error("sample {value} overflows the configured bit depth")]
    SampleOverflow { value: f64 },

    #[error("no output channels provided")]
    NoChannels,

    #[error(transparent)]
    Io(#[from] hound::Error),
}

/// Configuration / lifecycle errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("dsss context already initialized")]
    AlreadyInitialized,

    #[error("dsss context not initialized")]
    NotInitialized,

    #[error("invalid sample rate: {rate_hz} Hz (must be > 0)")]
    InvalidSampleRate { rate_hz: f64 },
}

/// Result type alias for dsss-core operations.
pub type Result<T> = std::result::Result<T, DsssError>;
