//! proofx commits to a list of chain addresses with a Merkle root and proves
//! membership of single addresses against that root.
//!
//! # Overview
//! - Leaves are Keccak-256 digests of the 20 raw address bytes, so every
//!   letter case spelling of an address is the same leaf
//! - Internal nodes use sorted-pair hashing: `H(min(l, r) || max(l, r))`
//! - Leaves are sorted and de-duplicated before the first level is formed;
//!   the root depends only on the set of addresses
//! - An odd node at any level is promoted unchanged
//!
//! # Example Usage
//! ```no_run
//! use proofx::{build_tree, prove_membership, root_of, verify};
//!
//! let addresses = [
//!     "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
//!     "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
//! ];
//! let tree = build_tree(&addresses).unwrap();
//! let proof = prove_membership(&tree, addresses[1]).unwrap();
//! assert!(verify(&root_of(&tree), &proof, addresses[1]).unwrap());
//! ```
//!
//! Trees are immutable values. Adding or removing an address means building a
//! new tree; proofs issued by the old tree stay valid against the old root
//! only.

pub mod address;
pub mod bundle;
pub mod def;
pub mod error;
pub mod merkletree;
pub mod utils;

pub use address::{is_valid_address, normalize_address, parse_address};
pub use bundle::{AddressProof, ProofRecord, TreeBundle};
pub use error::{BundleError, MerkleError};
pub use merkletree::proof::{bytes_to_proof, prove_membership, verify, verify_hex};
pub use merkletree::{MerkleTree, Proof};
pub use utils::hasher::{Hash32, ZERO_HASH32};

/// Builds the tree committing to `addresses`.
///
/// # Errors
/// - `EmptyInput` for an empty list
/// - `InvalidInput` for the first malformed address
pub fn build_tree<S: AsRef<str>>(addresses: &[S]) -> Result<MerkleTree, MerkleError> {
    MerkleTree::from_addresses(addresses)
}

/// Builds the tree over pre-hashed leaves. Leaves are sorted and
/// de-duplicated the same way as in [`build_tree`].
pub fn build_tree_from_leaves(leaves: Vec<Hash32>) -> Result<MerkleTree, MerkleError> {
    MerkleTree::from_leaves(leaves)
}

pub fn root_of(tree: &MerkleTree) -> Hash32 {
    tree.root()
}
