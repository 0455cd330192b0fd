//! Verification utilities for Merkle tree consistency checking.
//!
//! The checks ensure that:
//! 1. Leaves are strictly ascending (sorted and de-duplicated)
//! 2. Each level has `ceil(n / 2)` nodes for a level of `n`
//! 3. Every parent is the sorted-pair hash of its children, or the promoted
//!    odd child
//! 4. The top level holds exactly one node

use super::tree::MerkleTree;
use crate::utils::hasher;

/// Verifies the hash consistency of a whole tree.
///
/// # Panics
/// Panics naming the first level and node that violates an invariant
pub fn check_hash_consistency(tree: &MerkleTree) {
    let levels = tree.levels();
    for (i, w) in tree.leaves().windows(2).enumerate() {
        if w[0] >= w[1] {
            panic!("Leaves not strictly ascending at {}", i);
        }
    }
    for (level, pair) in levels.windows(2).enumerate() {
        let (children, parents) = (&pair[0], &pair[1]);
        if parents.len() != children.len().div_ceil(2) {
            panic!(
                "Level {} has {} nodes for {} children",
                level + 1,
                parents.len(),
                children.len()
            );
        }
        for (n, parent) in parents.iter().enumerate() {
            let expected = match &children[2 * n..children.len().min(2 * n + 2)] {
                [a, b] => hasher::hash2(a, b),
                [a] => *a,
                _ => unreachable!(),
            };
            if *parent != expected {
                panic!("Mismatch at {}-{}", level + 1, n);
            }
        }
    }
    if levels[levels.len() - 1].len() != 1 {
        panic!("Top level holds {} nodes", levels[levels.len() - 1].len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkletree::helpers::build_test_tree;

    #[test]
    fn test_check_built_trees() {
        for n in [1usize, 2, 3, 17, 64, 100] {
            let (tree, _) = build_test_tree(n, 9);
            check_hash_consistency(&tree);
        }
    }
}
