use proofx::{
    build_tree, bytes_to_proof,
    merkletree::{check, helpers::build_test_tree},
    prove_membership, root_of,
    utils::{codec, hasher},
    verify, verify_hex, MerkleError, Proof, TreeBundle,
};
use revm::primitives::keccak256;

const A1: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
const A2: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
const A3: &str = "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB";
const A4: &str = "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb";

fn permutations(items: &[&'static str]) -> Vec<Vec<&'static str>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut res = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            res.push(tail);
        }
    }
    res
}

#[test]
fn test_order_independence() {
    let base = [A1, A2, A3, A4];
    let root = root_of(&build_tree(&base).unwrap());
    for perm in permutations(&base) {
        assert_eq!(root_of(&build_tree(&perm).unwrap()), root, "{:?}", perm);
    }

    let (tree, mut addrs) = build_test_tree(257, 42);
    addrs.reverse();
    addrs.rotate_left(100);
    assert_eq!(build_tree(&addrs).unwrap().root(), tree.root());
}

#[test]
fn test_case_normalization() {
    let checksummed = build_tree(&[A1]).unwrap();
    let lower = build_tree(&[A1.to_lowercase()]).unwrap();
    let upper = build_tree(&[format!("0x{}", A1[2..].to_uppercase())]).unwrap();
    assert_eq!(checksummed.root(), lower.root());
    assert_eq!(checksummed.root(), upper.root());

    let mixed = build_tree(&[A1.to_string(), A1.to_lowercase(), A2.to_string()]).unwrap();
    assert_eq!(mixed.leaf_count(), 2);
    assert_eq!(mixed.root(), build_tree(&[A1, A2]).unwrap().root());

    let proof = prove_membership(&mixed, &A2.to_lowercase()).unwrap();
    assert!(verify(&mixed.root(), &proof, A2).unwrap());
}

#[test]
fn test_proof_soundness() {
    for n in [1usize, 2, 3, 6, 31, 32, 100, 513] {
        let (tree, addrs) = build_test_tree(n, n as u64);
        check::check_hash_consistency(&tree);
        for a in &addrs {
            let proof = prove_membership(&tree, a).unwrap();
            assert!(verify(&tree.root(), &proof, a).unwrap());
        }
    }
}

#[test]
fn test_proof_rejection_single_bit_mutations() {
    let (tree, addrs) = build_test_tree(13, 77);
    let root = tree.root();
    let proof = prove_membership(&tree, &addrs[6]).unwrap();
    assert!(!proof.is_empty());
    for i in 0..proof.len() {
        for byte in [0usize, 17, 31] {
            for bit in 0..8 {
                let mut siblings = proof.siblings().to_vec();
                siblings[i].0[byte] ^= 1 << bit;
                let mutated = Proof::new(siblings).unwrap();
                assert!(!verify(&root, &mutated, &addrs[6]).unwrap());
            }
        }
    }

    let mut siblings = proof.clone().into_siblings();
    siblings.pop();
    let truncated = Proof::new(siblings).unwrap();
    assert!(!verify(&root, &truncated, &addrs[6]).unwrap());
    assert!(!verify(&root, &Proof::default(), &addrs[6]).unwrap());

    let (_, outsiders) = build_test_tree(5, 78);
    for a in &outsiders {
        assert_eq!(
            prove_membership(&tree, a).unwrap_err(),
            MerkleError::NotFound(proofx::parse_address(a).unwrap())
        );
        assert!(!verify(&root, &proof, a).unwrap());
    }
}

#[test]
fn test_empty_and_single() {
    let none: Vec<String> = vec![];
    assert_eq!(build_tree(&none).unwrap_err(), MerkleError::EmptyInput);

    let tree = build_tree(&[A3]).unwrap();
    let raw = proofx::parse_address(A3).unwrap();
    assert_eq!(tree.root(), keccak256(raw.as_slice()));
    assert_eq!(tree.root(), hasher::hash_leaf(&raw));
    let proof = prove_membership(&tree, A3).unwrap();
    assert!(proof.is_empty());
    assert!(verify(&tree.root(), &proof, A3).unwrap());
}

#[test]
fn test_two_leaves_root() {
    let tree = build_tree(&[A1, A2]).unwrap();
    let l1 = hasher::hash_leaf(&proofx::parse_address(A1).unwrap());
    let l2 = hasher::hash_leaf(&proofx::parse_address(A2).unwrap());
    let (lo, hi) = if l1 < l2 { (l1, l2) } else { (l2, l1) };
    assert_eq!(tree.root(), keccak256([lo.as_slice(), hi.as_slice()].concat()));
    assert_eq!(prove_membership(&tree, A1).unwrap().siblings(), [l2]);
}

#[test]
fn test_prehashed_leaves_match_addresses() {
    let addrs = [A1, A2, A3, A4];
    let leaves: Vec<_> = addrs
        .iter()
        .rev()
        .map(|a| hasher::hash_leaf(&proofx::parse_address(a).unwrap()))
        .collect();
    let from_leaves = proofx::build_tree_from_leaves(leaves).unwrap();
    assert_eq!(root_of(&from_leaves), root_of(&build_tree(&addrs).unwrap()));
    assert_eq!(from_leaves.leaf_count(), 4);
    assert_eq!(from_leaves.depth(), 2);
}

#[test]
fn test_invalid_input() {
    assert!(matches!(
        build_tree(&[A1, "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"]),
        Err(MerkleError::InvalidInput(_))
    ));
    assert!(matches!(
        build_tree(&["0xzz"]),
        Err(MerkleError::InvalidInput(_))
    ));
}

#[test]
fn test_portable_proof_interchange() {
    let tree = build_tree(&[A1, A2, A3]).unwrap();
    let proof = prove_membership(&tree, A2).unwrap();

    // a verifier that only ever sees strings
    let root_hex = codec::encode_hash32(&tree.root());
    let proof_hex = proof.to_hex_strings();
    drop(tree);
    assert!(verify_hex(&root_hex, &proof_hex, A2).unwrap());
    assert!(!verify_hex(&root_hex, &proof_hex, A4).unwrap());

    let decoded = bytes_to_proof(&proof.to_bytes()).unwrap();
    assert_eq!(decoded, proof);
}

#[test]
fn test_bundle_file_round_trip() {
    let temp_dir = ::tempfile::Builder::new()
        .prefix("proofx-bundle")
        .tempdir()
        .unwrap();
    let path = temp_dir.path().join("out").join("bundle.json");

    let bundle = TreeBundle::build(&[A1, A2, A3, A4]).unwrap();
    bundle.write_to(&path).unwrap();
    let loaded = TreeBundle::read_from(&path).unwrap();
    assert_eq!(loaded, bundle);
    loaded.check_root().unwrap();
    assert!(loaded.verify_all().unwrap().is_empty());
}
