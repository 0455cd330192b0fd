use revm::primitives::{Address, B256};
use thiserror::Error;

/// Errors reported by tree construction, proving and verification.
///
/// Every variant is a deterministic function of the input: the same call
/// always fails the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// Malformed address, hash or proof encoding.
    #[error("InvalidInput: {0}")]
    InvalidInput(String),

    #[error("EmptyInput: cannot build a tree from zero addresses")]
    EmptyInput,

    /// The address hashes to a leaf that is not part of the tree.
    #[error("NotFound: address {0} is not a leaf of this tree")]
    NotFound(Address),
}

/// Errors raised while exporting or loading proof bundles.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Bundle: {0}")]
    Merkle(#[from] MerkleError),

    #[error("Bundle: io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bundle: json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bundle: root mismatch, bundle says {claimed} but addresses give {computed}")]
    RootMismatch { claimed: B256, computed: B256 },
}
