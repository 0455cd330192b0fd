//! Inclusion proofs: generation, verification and encoding.
//!
//! A [`Proof`] is the list of sibling hashes met while walking from a leaf to
//! the root. Because parents are computed with sorted-pair hashing, a proof
//! needs no left/right flags: folding `hash2` over the siblings reproduces the
//! root. Verification only needs the root, the proof and the address, never
//! the tree that issued the proof.
//!
//! Binary layout produced by [`Proof::to_bytes`]:
//!
//! ```text
//!   | count (1 byte) | sibling 0 (32 bytes) | ... | sibling count-1 (32 bytes) |
//! ```

use log::debug;
use revm::primitives::Address;
use serde::{Deserialize, Serialize};

use super::tree::MerkleTree;
use crate::address::parse_address;
use crate::def::{HASH_LENGTH, MAX_PROOF_LENGTH};
use crate::error::MerkleError;
use crate::utils::codec;
use crate::utils::hasher::{self, Hash32};

/// Sibling hashes from the leaf level up to the root, at most
/// [`MAX_PROOF_LENGTH`] of them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Hash32>", into = "Vec<Hash32>")]
pub struct Proof {
    siblings: Vec<Hash32>,
}

impl Proof {
    /// Wraps a sibling list, rejecting lists longer than `MAX_PROOF_LENGTH`.
    pub fn new(siblings: Vec<Hash32>) -> Result<Self, MerkleError> {
        if siblings.len() > MAX_PROOF_LENGTH {
            return Err(MerkleError::InvalidInput(format!(
                "proof has {} siblings, at most {} allowed",
                siblings.len(),
                MAX_PROOF_LENGTH
            )));
        }
        Ok(Self { siblings })
    }

    pub fn siblings(&self) -> &[Hash32] {
        &self.siblings
    }

    pub fn into_siblings(self) -> Vec<Hash32> {
        self.siblings
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Recomputes the root implied by this proof for `leaf`.
    pub fn compute_root(&self, leaf: &Hash32) -> Hash32 {
        self.siblings
            .iter()
            .fold(*leaf, |acc, sibling| hasher::hash2(&acc, sibling))
    }

    /// Checks this proof for a pre-hashed leaf.
    pub fn check_leaf(&self, root: &Hash32, leaf: &Hash32) -> bool {
        self.compute_root(leaf) == *root
    }

    /// Encodes every sibling as `0x` + 64 hex digits, leaf level first.
    pub fn to_hex_strings(&self) -> Vec<String> {
        codec::encode_hash_list(&self.siblings)
    }

    pub fn from_hex_strings<S: AsRef<str>>(items: &[S]) -> Result<Self, MerkleError> {
        Self::new(codec::decode_hash_list(items)?)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut res = Vec::with_capacity(1 + self.siblings.len() * HASH_LENGTH);
        // bounded by MAX_PROOF_LENGTH in `new`
        res.push(self.siblings.len() as u8);
        for sibling in &self.siblings {
            res.extend_from_slice(sibling.as_slice());
        }
        res
    }
}

impl TryFrom<Vec<Hash32>> for Proof {
    type Error = MerkleError;

    fn try_from(siblings: Vec<Hash32>) -> Result<Self, Self::Error> {
        Self::new(siblings)
    }
}

impl From<Proof> for Vec<Hash32> {
    fn from(proof: Proof) -> Self {
        proof.siblings
    }
}

/// Decodes a proof from the layout written by [`Proof::to_bytes`].
pub fn bytes_to_proof(bz: &[u8]) -> Result<Proof, MerkleError> {
    let (count, body) = bz
        .split_first()
        .ok_or_else(|| MerkleError::InvalidInput("empty proof encoding".to_owned()))?;
    let count = *count as usize;
    if count > MAX_PROOF_LENGTH || body.len() != count * HASH_LENGTH {
        return Err(MerkleError::InvalidInput(format!(
            "proof encoding of {} bytes does not hold {} siblings",
            bz.len(),
            count
        )));
    }
    let siblings = body.chunks(HASH_LENGTH).map(Hash32::from_slice).collect();
    Proof::new(siblings)
}

/// Produces the inclusion proof for `address`.
///
/// # Errors
/// - `InvalidInput` if the address is malformed
/// - `NotFound` if the address is not a leaf of `tree`
pub fn prove_membership(tree: &MerkleTree, address: &str) -> Result<Proof, MerkleError> {
    let address = parse_address(address)?;
    prove_address(tree, &address)
}

/// Produces the inclusion proof for an already parsed address.
///
/// `NotFound` if the address is not a leaf of `tree`.
pub fn prove_address(tree: &MerkleTree, address: &Address) -> Result<Proof, MerkleError> {
    let leaf = hasher::hash_leaf(address);
    let index = tree
        .leaf_index(&leaf)
        .ok_or(MerkleError::NotFound(*address))?;
    let proof = Proof::new(tree.path_siblings(index))?;
    debug!(
        "proof for {} at leaf {}: {} siblings",
        address,
        index,
        proof.len()
    );
    Ok(proof)
}

/// Checks that `proof` links `address` to `root`.
///
/// Returns `Ok(false)` for a well-formed address that the proof does not
/// connect to the root; only a malformed address is an error.
pub fn verify(root: &Hash32, proof: &Proof, address: &str) -> Result<bool, MerkleError> {
    let address = parse_address(address)?;
    Ok(proof.check_leaf(root, &hasher::hash_leaf(&address)))
}

/// Same as [`verify`], with root and proof given as hex strings.
pub fn verify_hex<S: AsRef<str>>(
    root: &str,
    proof: &[S],
    address: &str,
) -> Result<bool, MerkleError> {
    let root = codec::decode_hash32(root)?;
    let proof = Proof::from_hex_strings(proof)?;
    verify(&root, &proof, address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkletree::helpers::address_list;

    #[test]
    fn test_every_member_verifies() {
        for n in [1usize, 2, 3, 4, 5, 7, 8, 9, 33] {
            let addrs = address_list(n, 11);
            let tree = MerkleTree::from_addresses(&addrs).unwrap();
            for a in &addrs {
                let proof = prove_membership(&tree, a).unwrap();
                assert!(verify(&tree.root(), &proof, a).unwrap(), "n={} a={}", n, a);
                assert!(proof.len() <= tree.depth());
            }
        }
    }

    #[test]
    fn test_non_member() {
        let addrs = address_list(6, 3);
        let tree = MerkleTree::from_addresses(&addrs[..5]).unwrap();
        assert_eq!(
            prove_membership(&tree, &addrs[5]),
            Err(MerkleError::NotFound(parse_address(&addrs[5]).unwrap()))
        );
        let proof = prove_membership(&tree, &addrs[0]).unwrap();
        assert!(!verify(&tree.root(), &proof, &addrs[5]).unwrap());
    }

    #[test]
    fn test_malformed_address_is_error_not_false() {
        let addrs = address_list(4, 5);
        let tree = MerkleTree::from_addresses(&addrs).unwrap();
        let proof = prove_membership(&tree, &addrs[1]).unwrap();
        assert!(matches!(
            verify(&tree.root(), &proof, "0x1234"),
            Err(MerkleError::InvalidInput(_))
        ));
        assert!(matches!(
            prove_membership(&tree, "0x1234"),
            Err(MerkleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bytes_encoding() {
        let addrs = address_list(9, 21);
        let tree = MerkleTree::from_addresses(&addrs).unwrap();
        let proof = prove_membership(&tree, &addrs[4]).unwrap();
        let bz = proof.to_bytes();
        assert_eq!(bz.len(), 1 + proof.len() * HASH_LENGTH);
        assert_eq!(bytes_to_proof(&bz).unwrap(), proof);
        assert!(bytes_to_proof(&bz[..bz.len() - 1]).is_err());
        assert!(bytes_to_proof(&[]).is_err());
    }

    #[test]
    fn test_proof_length_bound() {
        let sibling = Hash32::repeat_byte(1);
        assert!(matches!(
            Proof::new(vec![sibling; MAX_PROOF_LENGTH + 1]),
            Err(MerkleError::InvalidInput(_))
        ));
        assert!(Proof::new(vec![sibling; 256]).is_err());

        let longest = Proof::new(vec![sibling; MAX_PROOF_LENGTH]).unwrap();
        let bz = longest.to_bytes();
        assert_eq!(bz[0] as usize, MAX_PROOF_LENGTH);
        assert_eq!(bytes_to_proof(&bz).unwrap(), longest);

        let too_long = serde_json::to_string(&vec![sibling; 256]).unwrap();
        assert!(serde_json::from_str::<Proof>(&too_long).is_err());
        let json = serde_json::to_string(&longest).unwrap();
        assert_eq!(serde_json::from_str::<Proof>(&json).unwrap(), longest);

        let hex = vec![codec::encode_hash32(&sibling); MAX_PROOF_LENGTH + 1];
        assert!(Proof::from_hex_strings(&hex).is_err());
    }

    #[test]
    fn test_verify_hex() {
        let addrs = address_list(5, 2);
        let tree = MerkleTree::from_addresses(&addrs).unwrap();
        let proof = prove_membership(&tree, &addrs[3]).unwrap();
        let root_hex = codec::encode_hash32(&tree.root());
        assert!(verify_hex(&root_hex, &proof.to_hex_strings(), &addrs[3]).unwrap());
        assert!(!verify_hex(&root_hex, &proof.to_hex_strings(), &addrs[2]).unwrap());
        assert!(verify_hex("0xdead", &proof.to_hex_strings(), &addrs[3]).is_err());
        assert!(verify_hex(&root_hex, &["0xbeef"], &addrs[3]).is_err());
    }
}
