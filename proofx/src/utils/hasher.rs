//! Hashing utilities for proofx.
//!
//! This module provides the Keccak-256 based hashing functions for:
//! - Single values
//! - Address leaves
//! - Sorted pairs of values (for Merkle tree nodes)
//! - In-place node hashing

use revm::primitives::{keccak256, Address, B256};

/// Type alias for a 32-byte hash value.
/// Used for leaves, internal nodes and roots.
pub type Hash32 = B256;

/// A constant representing a hash of all zeros.
/// The ledger treats it as "no root".
pub const ZERO_HASH32: Hash32 = B256::ZERO;

/// Computes the Keccak-256 hash of a single value.
///
/// # Arguments
/// * `a` - Value to hash
///
/// # Returns
/// The 32-byte hash of the input
pub fn hash<T: AsRef<[u8]>>(a: T) -> Hash32 {
    keccak256(a)
}

/// Computes the leaf hash of an address.
///
/// The leaf is the Keccak-256 digest of the 20 raw address bytes. Letter case
/// of the textual form has already been erased by parsing, so every spelling of
/// the same address maps to the same leaf.
///
/// # Arguments
/// * `address` - Parsed address
///
/// # Returns
/// The 32-byte leaf hash
pub fn hash_leaf(address: &Address) -> Hash32 {
    keccak256(address.as_slice())
}

/// Computes the hash of two sibling nodes in canonical order.
///
/// The smaller value (bytewise) is hashed first, so `hash2(a, b) == hash2(b, a)`.
/// This makes a parent independent of which child sits on the left.
///
/// # Arguments
/// * `a` - First sibling
/// * `b` - Second sibling
///
/// # Returns
/// The 32-byte hash of `min(a, b) || max(a, b)`
pub fn hash2(a: &Hash32, b: &Hash32) -> Hash32 {
    let mut buf = [0u8; 64];
    node_hash_inplace(&mut buf, a, b);
    keccak256(buf)
}

/// Writes the canonical pair preimage of two siblings into `target`.
///
/// # Arguments
/// * `target` - Buffer of 64 bytes receiving `min(a, b) || max(a, b)`
/// * `a` - First sibling
/// * `b` - Second sibling
///
/// # Panics
/// If `target` is not exactly 64 bytes long
pub fn node_hash_inplace(target: &mut [u8], a: &Hash32, b: &Hash32) {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    target[..32].copy_from_slice(lo.as_slice());
    target[32..].copy_from_slice(hi.as_slice());
}
