//! Portable proof documents.
//!
//! Two JSON shapes are produced for distribution to list members:
//!
//! - [`ProofRecord`]: one address, its proof and the root it proves against
//! - [`TreeBundle`]: the root, the original address list and one proof per
//!   address
//!
//! Field names are camelCase so the documents can be consumed directly by
//! web front-ends and contract tooling.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BundleError, MerkleError};
use crate::merkletree::proof::{self, Proof};
use crate::merkletree::tree::MerkleTree;
use crate::utils::hasher::Hash32;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRecord {
    pub address: String,
    pub proof: Proof,
    pub merkle_root: Hash32,
}

impl ProofRecord {
    pub fn verify(&self) -> Result<bool, MerkleError> {
        proof::verify(&self.merkle_root, &self.proof, &self.address)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressProof {
    pub address: String,
    pub proof: Proof,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeBundle {
    pub merkle_root: Hash32,
    pub addresses: Vec<String>,
    pub proofs: Vec<AddressProof>,
}

impl TreeBundle {
    /// Builds the tree for `addresses` and a proof for each of them.
    ///
    /// Addresses are kept as given (including repeats) so the bundle mirrors
    /// the operator's input list.
    pub fn build<S: AsRef<str>>(addresses: &[S]) -> Result<Self, MerkleError> {
        let tree = MerkleTree::from_addresses(addresses)?;
        Self::from_tree(&tree, addresses)
    }

    /// Assembles a bundle from an existing tree.
    ///
    /// Fails with `NotFound` if any address is not a leaf of `tree`.
    pub fn from_tree<S: AsRef<str>>(
        tree: &MerkleTree,
        addresses: &[S],
    ) -> Result<Self, MerkleError> {
        let proofs = addresses
            .iter()
            .map(|a| -> Result<AddressProof, MerkleError> {
                Ok(AddressProof {
                    address: a.as_ref().to_owned(),
                    proof: proof::prove_membership(tree, a.as_ref())?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            merkle_root: tree.root(),
            addresses: addresses.iter().map(|a| a.as_ref().to_owned()).collect(),
            proofs,
        })
    }

    pub fn record(&self, address: &str) -> Option<ProofRecord> {
        self.proofs
            .iter()
            .find(|p| p.address == address)
            .map(|p| ProofRecord {
                address: p.address.clone(),
                proof: p.proof.clone(),
                merkle_root: self.merkle_root,
            })
    }

    /// Rebuilds the tree from the bundled addresses and checks its root.
    pub fn check_root(&self) -> Result<(), BundleError> {
        let computed = MerkleTree::from_addresses(&self.addresses)?.root();
        if computed != self.merkle_root {
            return Err(BundleError::RootMismatch {
                claimed: self.merkle_root,
                computed,
            });
        }
        Ok(())
    }

    /// Verifies every bundled proof against the bundled root.
    ///
    /// Returns the addresses whose proofs do not verify.
    pub fn verify_all(&self) -> Result<Vec<String>, MerkleError> {
        let mut failed = Vec::new();
        for p in &self.proofs {
            if !proof::verify(&self.merkle_root, &p.proof, &p.address)? {
                failed.push(p.address.clone());
            }
        }
        Ok(failed)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), BundleError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self, BundleError> {
        let bz = fs::read(path)?;
        Ok(serde_json::from_slice(&bz)?)
    }
}
