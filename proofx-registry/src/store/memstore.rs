use std::collections::HashMap;

use log::debug;
use parking_lot::RwLock;

use super::{ChangeSet, LedgerStore, OpKind, StoreKey};
use crate::error::StoreError;

#[derive(Default)]
struct MemState {
    values: HashMap<StoreKey, Vec<u8>>,
    height: u64,
}

/// In-process ledger used by tests, simulations and the bench tool.
///
/// Commits hold the write lock for validation and application, so every
/// reader sees either all of a change set or none of it.
#[derive(Default)]
pub struct MemStore {
    state: RwLock<MemState>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.read().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LedgerStore for MemStore {
    fn get(&self, key: &StoreKey) -> Option<Vec<u8>> {
        self.state.read().values.get(key).cloned()
    }

    fn commit(&self, change_set: &ChangeSet) -> Result<u64, StoreError> {
        let mut state = self.state.write();
        for op in change_set.ops() {
            let current = state.values.get(&op.key).map(|v| v.as_slice());
            if current != op.old_value.as_deref() {
                debug!("commit rejected: {} {} changed", op.kind, op.key);
                return Err(StoreError::Conflict {
                    key: op.key.clone(),
                });
            }
        }
        for op in change_set.ops() {
            if op.kind != OpKind::Read {
                state.values.insert(op.key.clone(), op.value.clone());
            }
        }
        state.height += 1;
        Ok(state.height)
    }

    fn height(&self) -> u64 {
        self.state.read().height
    }
}
