//! LPCM / IEEE-float WAV output, backed by `hound`.

use std::path::Path;

use crate::config::BitDepth;
use crate::errors::{Result, WavError};

fn hound_spec(channels: &[Vec<f32>], sample_rate: u32, bit_depth: BitDepth) -> hound::WavSpec {
    let sample_format = match bit_depth {
        BitDepth::Float32 => hound::SampleFormat::Float,
        _ => hound::SampleFormat::Int,
    };
    hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: bit_depth.bits_per_sample(),
        sample_format,
    }
}

fn validate_channels(channels: &[Vec<f32>]) -> Result<usize> {
    if channels.is_empty() {
        return Err(WavError::NoChannels.into());
    }
    let len = channels[0].len();
    for ch in &channels[1..] {
        if ch.len() != len {
            return Err(WavError::ChannelLengthMismatch { a: len, b: ch.len() }.into());
        }
    }
    Ok(len)
}

/// Write an interleaved, sample-major multi-channel WAV file.
///
/// Validates equal-length channel vectors and, for integer bit depths,
/// that every sample fits the configured full-scale range before any data
/// is written.
pub fn write_wav(path: &Path, channels: &[Vec<f32>], sample_rate: u32, bit_depth: BitDepth) -> Result<()> {
    let n_samples = validate_channels(channels)?;

    if bit_depth != BitDepth::Float32 {
        let full_scale = bit_depth.full_scale();
        for ch in channels {
            for &sample in ch {
                if sample.abs() as f64 > full_scale {
                    return Err(WavError::SampleOverflow { value: sample as f64 }.into());
                }
            }
        }
    }

    let spec = hound_spec(channels, sample_rate, bit_depth);
    let mut writer = hound::WavWriter::create(path, spec).map_err(WavError::Io)?;

    for i in 0..n_samples {
        for ch in channels {
            match bit_depth {
                BitDepth::Float32 => writer.write_sample(ch[i]).map_err(WavError::Io)?,
                BitDepth::Pcm16 => writer.write_sample(ch[i] as i16).map_err(WavError::Io)?,
                BitDepth::Pcm24 | BitDepth::Pcm32 => {
                    writer.write_sample(ch[i] as i32).map_err(WavError::Io)?
                }
            }
        }
    }

    writer.finalize().map_err(WavError::Io)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn rejects_empty_channel_list() {
        let path = NamedTempFile::new().unwrap();
        assert!(write_wav(path.path(), &[], 48_000, BitDepth::Float32).is_err());
    }

    #[test]
    fn rejects_mismatched_channel_lengths() {
        let path = NamedTempFile::new().unwrap();
        let channels = vec![vec![0.0f32; 4], vec![0.0f32; 5]];
        assert!(write_wav(path.path(), &channels, 48_000, BitDepth::Float32).is_err());
    }

    #[test]
    fn rejects_overflowing_pcm16_sample() {
        let path = NamedTempFile::new().unwrap();
        let channels = vec![vec![2.0f32; 4]];
        assert!(write_wav(path.path(), &channels, 48_000, BitDepth::Pcm16).is_err());
    }

    #[test]
    fn writes_and_reads_back_float_mono() {
        let path = NamedTempFile::new().unwrap();
        let samples: Vec<f32> = (0..100).map(|n| (n as f32 * 0.1).sin()).collect();
        write_wav(path.path(), &[samples.clone()], 48_000, BitDepth::Float32).unwrap();

        let mut reader = hound::WavReader::open(path.path()).unwrap();
        let read_back: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(read_back.len(), samples.len());
        for (a, b) in samples.iter().zip(read_back.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn writes_stereo_pcm16_interleaved() {
        let path = NamedTempFile::new().unwrap();
        let left = vec![100.0f32, 200.0, 300.0];
        let right = vec![-100.0f32, -200.0, -300.0];
        write_wav(path.path(), &[left, right], 48_000, BitDepth::Pcm16).unwrap();

        let mut reader = hound::WavReader::open(path.path()).unwrap();
        let samples: Vec<i32> = reader.samples::<i32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![100, -100, 200, -200, 300, -300]);
    }
}
