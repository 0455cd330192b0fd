use std::fmt;

use revm::primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use strum::Display;

/// The registry's record for one Merkle root.
///
/// `creator`, `list_size`, `timestamp` and `revision` are fixed when the
/// record is created; only `description` and `is_active` ever change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub description: String,
    pub creator: Address,
    pub list_size: u64,
    /// Registration time, unix seconds.
    pub timestamp: u64,
    pub is_active: bool,
    /// 1 for the first registration of the root, +1 for every
    /// re-registration after a removal.
    pub revision: u32,
}

impl RegistryEntry {
    pub fn encode(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn decode(bz: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bz)
    }
}

/// Identifies one registration of a root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryId {
    pub root: B256,
    pub revision: u32,
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.root, self.revision)
    }
}

/// Lifecycle of a root: `Unregistered -> Active -> Inactive -> Active ...`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum EntryState {
    Unregistered,
    Active,
    Inactive,
}

impl EntryState {
    pub fn of(entry: Option<&RegistryEntry>) -> Self {
        match entry {
            None => EntryState::Unregistered,
            Some(e) if e.is_active => EntryState::Active,
            Some(_) => EntryState::Inactive,
        }
    }
}
