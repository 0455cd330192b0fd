//! Ledger storage abstraction.
//!
//! The registry never mutates storage directly. It reads the values it needs,
//! decides, and hands the ledger a [`ChangeSet`]: a batch of operations that
//! each carry the value the registry saw (`old_value`). The ledger applies the
//! whole batch atomically if every `old_value` still matches, or rejects it
//! with [`StoreError::Conflict`]. Values that influenced a decision without
//! being written are included as `Read` guards.
//!
//! Key layout:
//!
//! | key                      | value                          |
//! |--------------------------|--------------------------------|
//! | `Entry(root)`            | bincode `RegistryEntry`        |
//! | `Archived(root, rev)`    | bincode `RegistryEntry`        |
//! | `FreeTreeUsed(address)`  | `[1]`, absent until first use  |
//! | `PlatformFee`            | 32-byte big-endian wei         |
//! | `Treasury`, `Owner`      | 20-byte address                |

pub mod memstore;

use std::fmt;

use auto_impl::auto_impl;
use revm::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{RegistryError, StoreError};

pub use memstore::MemStore;

/// Value stored under `FreeTreeUsed` once an address has registered.
pub const FLAG_SET: [u8; 1] = [1];

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreKey {
    Entry(B256),
    Archived(B256, u32),
    FreeTreeUsed(Address),
    PlatformFee,
    Treasury,
    Owner,
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKey::Entry(root) => write!(f, "entry/{}", root),
            StoreKey::Archived(root, rev) => write!(f, "archived/{}/{}", root, rev),
            StoreKey::FreeTreeUsed(a) => write!(f, "free_tree_used/{}", a),
            StoreKey::PlatformFee => write!(f, "platform_fee"),
            StoreKey::Treasury => write!(f, "treasury"),
            StoreKey::Owner => write!(f, "owner"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum OpKind {
    /// Guard only: the key must still hold `old_value`.
    Read,
    /// The key must be absent; it is set to `value`.
    Create,
    /// The key must hold `old_value`; it is replaced by `value`.
    Write,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreOp {
    pub kind: OpKind,
    pub key: StoreKey,
    pub old_value: Option<Vec<u8>>,
    pub value: Vec<u8>,
}

/// An atomic batch of guarded operations. Each key appears at most once.
#[derive(Clone, Debug, Default)]
pub struct ChangeSet {
    ops: Vec<StoreOp>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    pub fn add_read(&mut self, key: StoreKey, old_value: Option<Vec<u8>>) -> &mut Self {
        self.push(OpKind::Read, key, old_value, Vec::new())
    }

    pub fn add_create(&mut self, key: StoreKey, value: Vec<u8>) -> &mut Self {
        self.push(OpKind::Create, key, None, value)
    }

    pub fn add_write(&mut self, key: StoreKey, old_value: Vec<u8>, value: Vec<u8>) -> &mut Self {
        self.push(OpKind::Write, key, Some(old_value), value)
    }

    fn push(
        &mut self,
        kind: OpKind,
        key: StoreKey,
        old_value: Option<Vec<u8>>,
        value: Vec<u8>,
    ) -> &mut Self {
        debug_assert!(
            self.ops.iter().all(|op| op.key != key),
            "duplicate key {} in change set",
            key
        );
        self.ops.push(StoreOp {
            kind,
            key,
            old_value,
            value,
        });
        self
    }

    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// The ledger collaborator: a linearizable key-value store.
///
/// Implementations must apply a change set all-or-nothing and order commits
/// totally; readers must never see part of a change set.
#[auto_impl(&, Arc)]
pub trait LedgerStore: Send + Sync {
    fn get(&self, key: &StoreKey) -> Option<Vec<u8>>;

    /// Applies `change_set` atomically and returns the new ledger height.
    fn commit(&self, change_set: &ChangeSet) -> Result<u64, StoreError>;

    /// Number of change sets committed so far.
    fn height(&self) -> u64;

    /// Replaces the value at `key` if it still equals `expected`
    /// (`None` meaning absent).
    fn compare_and_swap(
        &self,
        key: StoreKey,
        expected: Option<Vec<u8>>,
        value: Vec<u8>,
    ) -> Result<u64, StoreError> {
        let mut cs = ChangeSet::new();
        match expected {
            Some(old) => cs.add_write(key, old, value),
            None => cs.add_create(key, value),
        };
        self.commit(&cs)
    }
}

pub fn encode_u256(v: &U256) -> Vec<u8> {
    v.to_be_bytes::<32>().to_vec()
}

pub fn decode_u256(key: &StoreKey, bz: Option<&[u8]>) -> Result<U256, RegistryError> {
    match bz {
        Some(bz) if bz.len() == 32 => Ok(U256::from_be_slice(bz)),
        Some(bz) => Err(corrupt(key, format!("{} bytes for a 256-bit integer", bz.len()))),
        None => Err(corrupt(key, "missing".to_owned())),
    }
}

pub fn encode_address(a: &Address) -> Vec<u8> {
    a.to_vec()
}

pub fn decode_address(key: &StoreKey, bz: Option<&[u8]>) -> Result<Address, RegistryError> {
    match bz {
        Some(bz) if bz.len() == 20 => Ok(Address::from_slice(bz)),
        Some(bz) => Err(corrupt(key, format!("{} bytes for an address", bz.len()))),
        None => Err(corrupt(key, "missing".to_owned())),
    }
}

fn corrupt(key: &StoreKey, reason: String) -> RegistryError {
    RegistryError::Corrupt {
        key: key.clone(),
        reason,
    }
}
