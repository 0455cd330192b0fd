//! Utility functions for proofx.
//!
//! - Hashing (leaves and sorted pairs)
//! - Hex codec for hashes
//! - Deterministic address generation

pub mod codec;
pub mod hasher;
pub mod lfsr;
