//! LFSR-based PN sequence and Gold-code generators used to spread and
//! despread payload chips.
//!
//! Grounded in the feedback/shift/XOR recurrence exercised by
//! `test_csignal.py`'s PN-sequence fixtures in the original implementation:
//! feedback is the parity of `state & polynomial`, the register shifts left
//! by one, the feedback bit fills the vacated LSB, and the chip output is
//! the outgoing MSB, mapped to bipolar `{+1,-1}`.

use crate::errors::{ChipsError, Result};

fn validate_lfsr_params(degree: u8, polynomial: u32, init_state: u32) -> Result<()> {
    if !(2..=32).contains(&degree) {
        return Err(ChipsError::InvalidDegree { degree }.into());
    }
    if polynomial == 0 {
        return Err(ChipsError::ZeroPolynomial.into());
    }
    if init_state == 0 {
        return Err(ChipsError::ZeroInitialState.into());
    }
    Ok(())
}

/// A maximal-length linear feedback shift register over a `degree`-bit state.
#[derive(Debug, Clone)]
pub struct Lfsr {
    state: u32,
    polynomial: u32,
    init_state: u32,
    degree: u8,
}

impl Lfsr {
    /// `degree` bounds the register width to `[2,32]`; `polynomial` and
    /// `init_state` must both be non-zero or the register degenerates to a
    /// constant all-zero sequence.
    pub fn new(degree: u8, polynomial: u32, init_state: u32) -> Result<Self> {
        validate_lfsr_params(degree, polynomial, init_state)?;
        Ok(Self {
            state: init_state,
            polynomial,
            init_state,
            degree,
        })
    }

    /// Advance the register one step and return the outgoing chip as `+1`/`-1`.
    ///
    /// Shift left, OR the feedback bit into the LSB, then output the MSB of
    /// the resulting (post-shift) state.
    pub fn next_chip(&mut self) -> i8 {
        let feedback = (self.state & self.polynomial).count_ones() & 1;
        self.state = ((self.state << 1) | feedback) & self.mask();
        let msb = (self.state >> (self.degree - 1)) & 1;
        if msb == 1 {
            1
        } else {
            -1
        }
    }

    pub fn next_chips(&mut self, n: usize) -> Vec<i8> {
        (0..n).map(|_| self.next_chip()).collect()
    }

    /// Restore the register to its construction-time initial state.
    pub fn reset(&mut self) {
        self.state = self.init_state;
    }

    fn mask(&self) -> u32 {
        if self.degree == 32 {
            u32::MAX
        } else {
            (1u32 << self.degree) - 1
        }
    }
}

/// Two LFSRs combined by XOR-ing their chip outputs, producing a Gold-code
/// family member with better cross-correlation than either sequence alone.
#[derive(Debug, Clone)]
pub struct GoldCode {
    a: Lfsr,
    b: Lfsr,
}

impl GoldCode {
    pub fn new(
        degree: u8,
        poly_a: u32,
        poly_b: u32,
        init_a: u32,
        init_b: u32,
    ) -> Result<Self> {
        Ok(Self {
            a: Lfsr::new(degree, poly_a, init_a)?,
            b: Lfsr::new(degree, poly_b, init_b)?,
        })
    }

    pub fn next_chip(&mut self) -> i8 {
        self.a.next_chip() * self.b.next_chip()
    }

    pub fn next_chips(&mut self, n: usize) -> Vec<i8> {
        (0..n).map(|_| self.next_chip()).collect()
    }

    pub fn reset(&mut self) {
        self.a.reset();
        self.b.reset();
    }
}
