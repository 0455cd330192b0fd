//! Merkle tree over address allowlists.
//!
//! - [`MerkleTree`]: immutable sorted-pair tree built once from a finalized list
//! - [`proof`]: inclusion proof generation, verification and encoding
//! - [`check`]: tree consistency validation utilities
//! - [`helpers`]: deterministic test trees

pub mod check;
pub mod helpers;
pub mod proof;
pub mod tree;

pub use proof::Proof;
pub use tree::MerkleTree;
