//! Address parsing and normalization.
//!
//! An address is 40 hex digits with an optional `0x` prefix. All-lower and
//! all-upper spellings are accepted as-is; a mixed-case spelling is an EIP-55
//! checksum and must match the checksum of the decoded bytes.

use revm::primitives::Address;

use crate::def::{ADDRESS_HEX_LENGTH, HEX_PREFIX};
use crate::error::MerkleError;

/// Parses and validates one address.
///
/// # Arguments
/// * `input` - Textual address
///
/// # Returns
/// The raw address, or `InvalidInput` for a wrong length, a non-hex digit or
/// a failed checksum
pub fn parse_address(input: &str) -> Result<Address, MerkleError> {
    let digits = input.strip_prefix(HEX_PREFIX).unwrap_or(input);
    if digits.len() != ADDRESS_HEX_LENGTH || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(MerkleError::InvalidInput(format!(
            "malformed address {:?}",
            input
        )));
    }
    let bz = hex::decode(digits)
        .map_err(|e| MerkleError::InvalidInput(format!("malformed address {:?}: {}", input, e)))?;
    let address = Address::from_slice(&bz);

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        let checksummed = address.to_checksum(None);
        if checksummed[HEX_PREFIX.len()..] != *digits {
            return Err(MerkleError::InvalidInput(format!(
                "bad checksum for address {:?}, expected {}",
                input, checksummed
            )));
        }
    }
    Ok(address)
}

/// Returns the canonical lower-case `0x` form of an address.
pub fn normalize_address(input: &str) -> Result<String, MerkleError> {
    let address = parse_address(input)?;
    Ok(format!("{}{}", HEX_PREFIX, hex::encode(address.as_slice())))
}

pub fn is_valid_address(input: &str) -> bool {
    parse_address(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // EIP-55 reference vector.
    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_case_variants_parse_to_same_address() {
        let a = parse_address(CHECKSUMMED).unwrap();
        let lower = parse_address(&CHECKSUMMED.to_lowercase()).unwrap();
        let upper = parse_address(&format!("0x{}", CHECKSUMMED[2..].to_uppercase())).unwrap();
        let bare = parse_address(&CHECKSUMMED[2..]).unwrap();
        assert_eq!(a, lower);
        assert_eq!(a, upper);
        assert_eq!(a, bare);
        assert_eq!(
            normalize_address(CHECKSUMMED).unwrap(),
            CHECKSUMMED.to_lowercase()
        );
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let broken = "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert!(matches!(
            parse_address(broken),
            Err(MerkleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("0x"));
        assert!(!is_valid_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beae"));
        assert!(!is_valid_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaedd"));
        assert!(!is_valid_address("0xgaaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(is_valid_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
    }
}
