//! Core definitions and constants for proofx.
//!
//! This module collects the fixed widths and tuning knobs used across the
//! engine:
//! - Address and hash widths (raw and hex-encoded)
//! - The hex prefix used for interchange with the ledger
//! - The level size above which node hashing is spread over the rayon pool

/// Length of a raw chain address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

/// Number of hex digits in an address, without the `0x` prefix.
pub const ADDRESS_HEX_LENGTH: usize = ADDRESS_LENGTH * 2;

/// Length of a Keccak-256 digest (leaf, node, root) in bytes.
pub const HASH_LENGTH: usize = 32;

/// Number of hex digits in a hash, without the `0x` prefix.
pub const HASH_HEX_LENGTH: usize = HASH_LENGTH * 2;

/// Prefix for hex strings exchanged with the ledger.
pub const HEX_PREFIX: &str = "0x";

/// Levels with at least this many nodes are hashed in parallel.
/// Below it the rayon scheduling overhead dominates the Keccak work.
pub const PARALLEL_LEVEL_THRESHOLD: usize = 4096;

/// Upper bound on proof length accepted by the binary decoder.
/// A tree of 2^64 leaves would need 64 siblings.
pub const MAX_PROOF_LENGTH: usize = 64;
