//! Immutable sorted-pair Merkle tree over address leaves.
//!
//! The tree is stored as a list of levels. Level 0 holds the leaves, sorted
//! ascending and de-duplicated; the last level holds the root alone. Building
//! level `k + 1` from level `k`:
//!
//! ```text
//!   level k:    n0   n1   n2   n3   n4
//!                 \  /      \  /     |
//!   level k+1:  H(n0,n1)  H(n2,n3)   n4      (odd node promoted unchanged)
//! ```
//!
//! where `H` is [`hasher::hash2`], which orders its two inputs before hashing.
//! Sorting the leaves first is what makes the root a function of the address
//! *set*: any permutation of the input, and any repetition of an address,
//! yields the same tree.

use log::debug;
use rayon::prelude::*;
use revm::primitives::Address;

use crate::address::parse_address;
use crate::def::PARALLEL_LEVEL_THRESHOLD;
use crate::error::MerkleError;
use crate::utils::hasher::{self, Hash32};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Hash32>>,
}

impl MerkleTree {
    /// Builds a tree from textual addresses.
    ///
    /// Every address is validated first; the first malformed one aborts the
    /// build with `InvalidInput` naming its position.
    pub fn from_addresses<S: AsRef<str>>(addresses: &[S]) -> Result<Self, MerkleError> {
        let leaves = addresses
            .iter()
            .enumerate()
            .map(|(i, a)| {
                parse_address(a.as_ref())
                    .map(|address| hasher::hash_leaf(&address))
                    .map_err(|e| match e {
                        MerkleError::InvalidInput(msg) => {
                            MerkleError::InvalidInput(format!("entry {}: {}", i, msg))
                        }
                        other => other,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_leaves(leaves)
    }

    /// Builds a tree from already hashed leaves.
    pub fn from_leaves(mut leaves: Vec<Hash32>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyInput);
        }
        let input_count = leaves.len();
        leaves.par_sort_unstable();
        leaves.dedup();

        let mut levels = vec![leaves];
        while let Some(last) = levels.last().filter(|l| l.len() > 1) {
            let next = next_level(last);
            levels.push(next);
        }
        let tree = Self { levels };
        debug!(
            "built merkle tree: {} inputs, {} leaves, depth {}, root {}",
            input_count,
            tree.leaf_count(),
            tree.depth(),
            tree.root()
        );
        Ok(tree)
    }

    pub fn root(&self) -> Hash32 {
        // from_leaves never produces an empty level
        self.levels[self.levels.len() - 1][0]
    }

    /// Number of distinct leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of levels above the leaves; 0 for a single-leaf tree.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Sorted, de-duplicated leaves.
    pub fn leaves(&self) -> &[Hash32] {
        &self.levels[0]
    }

    pub fn levels(&self) -> &[Vec<Hash32>] {
        &self.levels
    }

    pub fn leaf_index(&self, leaf: &Hash32) -> Option<usize> {
        self.levels[0].binary_search(leaf).ok()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.leaf_index(&hasher::hash_leaf(address)).is_some()
    }

    /// Collects the siblings on the path from leaf `index` to the root.
    ///
    /// Levels where the node is the promoted odd one contribute nothing.
    pub fn path_siblings(&self, mut index: usize) -> Vec<Hash32> {
        let mut siblings = Vec::with_capacity(self.depth());
        for level in &self.levels[..self.depth()] {
            let peer = index ^ 1;
            if peer < level.len() {
                siblings.push(level[peer]);
            }
            index /= 2;
        }
        siblings
    }
}

fn pair_or_promote(chunk: &[Hash32]) -> Hash32 {
    match chunk {
        [a, b] => hasher::hash2(a, b),
        [a] => *a,
        _ => unreachable!("chunks(2) yields one or two nodes"),
    }
}

/// Hashes one level into the next, in parallel for large levels.
fn next_level(level: &[Hash32]) -> Vec<Hash32> {
    if level.len() >= PARALLEL_LEVEL_THRESHOLD {
        level.par_chunks(2).map(pair_or_promote).collect()
    } else {
        level.chunks(2).map(pair_or_promote).collect()
    }
}
