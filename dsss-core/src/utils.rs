//! Utility helpers for bit/byte conversions shared across modules.
use std::fmt;

use num_complex::Complex64;

/// Append-only collector used by test harnesses that want a lightweight
/// textual log without pulling in the full [`crate::logging::SignalLogger`].
#[derive(Debug, Clone, Default)]
pub struct LogCollector {
    entries: Vec<String>,
}

impl LogCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
    }

    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        for line in lines.into_iter() {
            self.log(line);
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl fmt::Display for LogCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.entries {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Convert bytes to an MSB-first bit vector (`0`/`1` per entry).
pub fn bytes_to_bitstream(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |bit| (byte >> bit) & 1))
        .collect()
}

/// Convert the low `bits` bits of `value` to an MSB-first bit vector.
pub fn int_to_bitstream(value: u64, bits: usize) -> Vec<u8> {
    assert!(bits > 0, "bit width must be positive");
    if bits < u64::BITS as usize {
        let limit = 1u64.checked_shl(bits as u32).unwrap_or(u64::MAX);
        assert!(value < limit, "value does not fit in bit width");
    }
    (0..bits)
        .rev()
        .map(|bit| ((value >> bit) & 1) as u8)
        .collect()
}

/// Pack an MSB-first bit vector back into bytes (partial trailing bits are
/// zero-padded on the low end of the last byte).
pub fn pack_bits(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &b| (acc << 1) | (b & 1)))
        .collect()
}

pub fn complex_from_interleaved(data: &[f64]) -> Vec<Complex64> {
    data.chunks(2)
        .map(|chunk| Complex64::new(chunk[0], chunk[1]))
        .collect()
}

pub fn interleaved_from_complex(data: &[Complex64]) -> Vec<f64> {
    data.iter().flat_map(|c| [c.re, c.im]).collect()
}
