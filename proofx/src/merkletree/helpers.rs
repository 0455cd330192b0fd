use crate::utils::lfsr::AddressGenerator;

use super::tree::MerkleTree;

/// Generates `count` distinct checksummed addresses from `seed`.
pub fn address_list(count: usize, seed: u64) -> Vec<String> {
    AddressGenerator::new(seed).checksummed(count)
}

/// Builds a tree over `count` generated addresses and returns both.
pub fn build_test_tree(count: usize, seed: u64) -> (MerkleTree, Vec<String>) {
    let addresses = address_list(count, seed);
    let tree = MerkleTree::from_addresses(&addresses).expect("generated addresses are valid");
    (tree, addresses)
}
