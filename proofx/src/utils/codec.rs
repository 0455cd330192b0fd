//! Hex encoding and decoding for hashes exchanged with the ledger.
//!
//! Roots and proof siblings travel as `0x`-prefixed strings of 64 hex digits.
//! Decoding is strict: anything of the wrong length or with non-hex digits is
//! an `InvalidInput` error, never a silently different hash.

use crate::def::{HASH_HEX_LENGTH, HEX_PREFIX};
use crate::error::MerkleError;
use crate::utils::hasher::Hash32;

/// Decodes one hash from its hex form.
///
/// The `0x` prefix is optional on input.
///
/// # Arguments
/// * `s` - Hex string
///
/// # Returns
/// The decoded hash, or `InvalidInput` describing what was wrong
pub fn decode_hash32(s: &str) -> Result<Hash32, MerkleError> {
    let digits = s.strip_prefix(HEX_PREFIX).unwrap_or(s);
    if digits.len() != HASH_HEX_LENGTH {
        return Err(MerkleError::InvalidInput(format!(
            "hash {:?} has {} hex digits, expected {}",
            s,
            digits.len(),
            HASH_HEX_LENGTH
        )));
    }
    let bz = hex::decode(digits)
        .map_err(|e| MerkleError::InvalidInput(format!("hash {:?} is not hex: {}", s, e)))?;
    Ok(Hash32::from_slice(&bz))
}

/// Encodes one hash as `0x` + 64 lower-case hex digits.
pub fn encode_hash32(h: &Hash32) -> String {
    format!("{}{}", HEX_PREFIX, hex::encode(h.as_slice()))
}

/// Decodes a list of hashes, failing on the first malformed element.
pub fn decode_hash_list<S: AsRef<str>>(items: &[S]) -> Result<Vec<Hash32>, MerkleError> {
    items.iter().map(|s| decode_hash32(s.as_ref())).collect()
}

pub fn encode_hash_list(items: &[Hash32]) -> Vec<String> {
    items.iter().map(encode_hash32).collect()
}
