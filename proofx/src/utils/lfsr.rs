//! Deterministic pseudo-random address generation.
//!
//! Benchmarks and tests need large address lists that are reproducible from a
//! seed. A Galois LFSR gives a full-period sequence of distinct states, so
//! consecutive draws never repeat within one run and the generated addresses
//! are pairwise distinct.

// Tap positions from: https://www.physics.otago.ac.nz/reports/electronics/ETR2012-1.pdf

use revm::primitives::Address;

use crate::def::ADDRESS_LENGTH;

/// A Galois Linear Feedback Shift Register.
#[derive(Debug, Clone, Copy)]
pub struct GaloisLfsr {
    state: u64,
    taps: u64,
}

impl GaloisLfsr {
    /// Creates a new Galois LFSR with the specified seed and bit count.
    ///
    /// # Arguments
    /// * `seed` - Initial state (non-zero and less than 2^bit_count - 1)
    /// * `bit_count` - One of 16, 24, 32, 48 or 63
    ///
    /// # Panics
    /// - If the seed is zero or too large for the bit count
    /// - If the bit count has no tap table entry
    pub fn new(seed: u64, bit_count: usize) -> Self {
        let mask = (1u64 << bit_count) - 1;
        if seed == 0 || seed >= mask {
            panic!("Seed {} out of range for {} bits", seed, bit_count);
        }

        let pos = match bit_count {
            16 => (16, 14, 13, 11),
            24 => (24, 23, 21, 20),
            32 => (32, 30, 26, 25),
            48 => (48, 44, 41, 39),
            63 => (63, 62, 59, 58),
            _ => panic!("invalid bit count"),
        };

        let taps = (1u64 << pos.0) | (1u64 << pos.1) | (1u64 << pos.2) | (1u64 << pos.3);

        Self { state: seed, taps }
    }

    /// Advances the LFSR by one step and returns the new state.
    pub fn next(&mut self) -> u64 {
        let taps = if self.state % 2 == 0 { 0 } else { self.taps };
        self.state = (self.state ^ taps) >> 1;
        self.state
    }

    pub fn state(&self) -> u64 {
        self.state
    }
}

/// Produces a reproducible stream of distinct addresses from a seed.
///
/// Each address consumes three LFSR states (24 bytes) and keeps the first 20.
/// Since the 63-bit register never revisits a state within its period, the
/// leading 8 bytes already differ between any two addresses.
#[derive(Debug, Clone)]
pub struct AddressGenerator {
    lfsr: GaloisLfsr,
}

impl AddressGenerator {
    pub fn new(seed: u64) -> Self {
        // spread small seeds apart; nearby raw states are only a few steps
        // from each other on the register's cycle
        let state = (seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) % ((1u64 << 63) - 1)).max(1);
        Self {
            lfsr: GaloisLfsr::new(state, 63),
        }
    }

    pub fn next_address(&mut self) -> Address {
        let mut buf = [0u8; 24];
        for chunk in buf.chunks_mut(8) {
            chunk.copy_from_slice(&self.lfsr.next().to_be_bytes());
        }
        Address::from_slice(&buf[..ADDRESS_LENGTH])
    }

    /// Generates `count` addresses in EIP-55 checksummed form.
    pub fn checksummed(&mut self, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| self.next_address().to_checksum(None))
            .collect()
    }
}
