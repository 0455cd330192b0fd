//! End-to-end registry walk-through against an in-memory ledger.

use std::time::Instant;

use anyhow::{bail, ensure};
use log::info;
use proofx::utils::lfsr::AddressGenerator;
use proofx::{build_tree, prove_membership, root_of, verify};
use proofx_registry::{
    LedgerStore, MemStore, RegistryConfig, RegistryError, SystemClock, TreasuryBook,
    TreeRegistry,
};
use revm::primitives::{B256, U256};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct ScenarioReport {
    pub root: B256,
    pub second_root: B256,
    pub proof_len: usize,
    pub fee_collected: U256,
    pub ledger_height: u64,
    pub final_revision: u32,
}

/// Publishes `addresses`, proves a member, exercises creator checks and
/// soft delete, then lets a second publisher take the root over.
pub fn run_registry_scenario(
    addresses: &[String],
    seed: u64,
    config: &RegistryConfig,
) -> anyhow::Result<ScenarioReport> {
    ensure!(addresses.len() >= 2, "scenario needs at least 2 addresses");
    let mut actors = AddressGenerator::new(seed.wrapping_add(1));
    let x = actors.next_address();
    let y = actors.next_address();
    let outsider = actors.next_address().to_checksum(None);

    let book = TreasuryBook::new();
    let registry = TreeRegistry::new(MemStore::new(), &book, SystemClock, config)?;

    let start = Instant::now();
    let tree = build_tree(addresses)?;
    let root = root_of(&tree);
    metrics::histogram!("bench-proofx.scenario.build_us")
        .record(start.elapsed().as_micros() as f64);
    info!("[1] built tree over {} addresses: root {}", tree.leaf_count(), root);

    registry.register(root, "phase 1", addresses.len() as u64, x, U256::ZERO)?;
    info!("[2] {} registered {} for free", x, root);

    let member = &addresses[1];
    let proof = prove_membership(&tree, member)?;
    ensure!(verify(&root, &proof, member)?, "member proof rejected");
    ensure!(!verify(&root, &proof, &outsider)?, "outsider accepted");
    info!(
        "[3] proof for {} has {} siblings; outsider {} rejected",
        member,
        proof.len(),
        outsider
    );

    match registry.update_description(root, "hijacked", y) {
        Err(RegistryError::Unauthorized { .. }) => {
            info!("[4] {} could not edit {}", y, root)
        }
        other => bail!("non-creator edit returned {:?}", other),
    }

    let half = &addresses[..addresses.len() / 2];
    let second = build_tree(half)?;
    let second_root = root_of(&second);
    let fee = registry.required_fee(&x)?;
    registry.register(second_root, "phase 2", half.len() as u64, x, fee)?;
    info!("[5] {} registered {} paying {} wei", x, second_root, fee);

    registry.remove(root, x)?;
    ensure!(!registry.is_registered(&root)?, "removed root still active");
    ensure!(
        verify(&root, &proof, member)?,
        "proof must stay valid after removal"
    );
    info!("[6] {} removed {}", x, root);

    let id = registry.register(
        root,
        "phase 1 (reissued)",
        addresses.len() as u64,
        y,
        U256::ZERO,
    )?;
    let entry = registry.get_entry(&root)?;
    ensure!(entry.creator == y, "re-registration kept old creator");
    info!("[7] {} re-registered {}", y, id);

    let treasury = registry.treasury()?;
    let fee_collected = book.balance_of(&treasury);
    metrics::gauge!("bench-proofx.scenario.fee_collected_wei")
        .set(fee_collected.saturating_to::<u64>() as f64);
    Ok(ScenarioReport {
        root,
        second_root,
        proof_len: proof.len(),
        fee_collected,
        ledger_height: registry.store().height(),
        final_revision: id.revision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofx::merkletree::helpers::address_list;
    use revm::primitives::Address;

    #[test]
    fn test_scenario_runs() {
        let addrs = address_list(9, 3);
        let config =
            RegistryConfig::new(Address::repeat_byte(0xEE)).with_platform_fee(U256::from(42));
        let report = run_registry_scenario(&addrs, 3, &config).unwrap();
        assert_eq!(report.fee_collected, U256::from(42));
        assert_eq!(report.final_revision, 2);
        assert_ne!(report.root, report.second_root);
        assert!((1..=4).contains(&report.proof_len));
        // genesis, two registrations, one removal, one re-registration
        assert_eq!(report.ledger_height, 5);
    }

    #[test]
    fn test_scenario_needs_two_addresses() {
        let addrs = address_list(1, 3);
        let config = RegistryConfig::new(Address::repeat_byte(0xEE));
        assert!(run_registry_scenario(&addrs, 3, &config).is_err());
    }
}
