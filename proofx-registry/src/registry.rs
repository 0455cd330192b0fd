//! The Merkle root registry.
//!
//! Every mutating operation follows the same shape: read the keys it depends
//! on, validate against them, then commit one [`ChangeSet`] guarded by exactly
//! the values that were read. If the ledger moved in between, the commit is
//! rejected as a whole and the caller sees
//! [`crate::error::StoreError::Conflict`]. No operation retries on its own.
//!
//! Fee rule: an address's first successful registration is free; every later
//! one must pay at least the platform fee in force at that moment. The
//! newcomer flag is consumed by the first registration even when that
//! registration paid.
//!
//! Re-registration: once a root is removed, any caller may register it again.
//! The new registration gets the next revision and the caller becomes its
//! creator. The superseded record is archived under `(root, revision)` first,
//! so the previous creator stays on the ledger.

use log::{info, warn};
use revm::primitives::{Address, B256, U256};
use std::str::FromStr;

use crate::clock::Clock;
use crate::config::RegistryConfig;
use crate::def::FIRST_REVISION;
use crate::entry::{EntryId, EntryState, RegistryEntry};
use crate::error::RegistryError;
use crate::fee::FeeSink;
use crate::store::{
    decode_address, decode_u256, encode_address, encode_u256, ChangeSet, LedgerStore, StoreKey,
    FLAG_SET,
};

pub struct TreeRegistry<S, F, C> {
    store: S,
    sink: F,
    clock: C,
}

/// Rejects roots that cannot come out of tree construction.
pub fn validate_root(root: &B256) -> Result<(), RegistryError> {
    if root.is_zero() {
        return Err(RegistryError::InvalidInput("zero merkle root".to_owned()));
    }
    Ok(())
}

/// Parses a root given as `0x` + 64 hex digits.
pub fn parse_root(s: &str) -> Result<B256, RegistryError> {
    let root = B256::from_str(s)
        .map_err(|e| RegistryError::InvalidInput(format!("merkle root {:?}: {}", s, e)))?;
    validate_root(&root)?;
    Ok(root)
}

impl<S: LedgerStore, F: FeeSink, C: Clock> TreeRegistry<S, F, C> {
    /// Attaches a registry to `store`, initialising fee configuration on an
    /// empty ledger.
    ///
    /// On a ledger that already carries an owner, `config` is ignored and the
    /// stored configuration stays in force.
    pub fn new(
        store: S,
        sink: F,
        clock: C,
        config: &RegistryConfig,
    ) -> Result<Self, RegistryError> {
        config.validate()?;
        if store.get(&StoreKey::Owner).is_none() {
            let mut cs = ChangeSet::new();
            cs.add_create(StoreKey::Owner, encode_address(&config.owner))
                .add_create(StoreKey::Treasury, encode_address(&config.treasury))
                .add_create(StoreKey::PlatformFee, encode_u256(&config.platform_fee));
            store.commit(&cs)?;
            info!(
                "registry initialised: owner={} treasury={} platform_fee={}",
                config.owner, config.treasury, config.platform_fee
            );
        } else {
            info!("registry attached to existing ledger at height {}", store.height());
        }
        Ok(Self { store, sink, clock })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_entry(&self, root: &B256) -> Result<Option<(Vec<u8>, RegistryEntry)>, RegistryError> {
        match self.store.get(&StoreKey::Entry(*root)) {
            Some(bz) => {
                let entry = RegistryEntry::decode(&bz)?;
                Ok(Some((bz, entry)))
            }
            None => Ok(None),
        }
    }

    /// Loads an existing entry and checks that `caller` created it.
    fn load_owned_entry(
        &self,
        root: &B256,
        caller: &Address,
    ) -> Result<(Vec<u8>, RegistryEntry), RegistryError> {
        let (bz, entry) = self
            .load_entry(root)?
            .ok_or(RegistryError::NotFound(*root))?;
        if entry.creator != *caller {
            warn!("{} is not the creator of {}", caller, root);
            return Err(RegistryError::Unauthorized {
                caller: *caller,
                expected: entry.creator,
            });
        }
        if !entry.is_active {
            return Err(RegistryError::Inactive(*root));
        }
        Ok((bz, entry))
    }

    /// True iff `root` has an entry and it is active.
    pub fn is_registered(&self, root: &B256) -> Result<bool, RegistryError> {
        Ok(self.entry_state(root)? == EntryState::Active)
    }

    pub fn entry_state(&self, root: &B256) -> Result<EntryState, RegistryError> {
        let entry = self.load_entry(root)?;
        Ok(EntryState::of(entry.as_ref().map(|(_, e)| e)))
    }

    /// Returns the current record for `root`, active or not.
    pub fn get_entry(&self, root: &B256) -> Result<RegistryEntry, RegistryError> {
        self.load_entry(root)?
            .map(|(_, e)| e)
            .ok_or(RegistryError::NotFound(*root))
    }

    /// Returns a record superseded by a later re-registration.
    pub fn get_archived_entry(
        &self,
        root: &B256,
        revision: u32,
    ) -> Result<RegistryEntry, RegistryError> {
        let bz = self
            .store
            .get(&StoreKey::Archived(*root, revision))
            .ok_or(RegistryError::NotFound(*root))?;
        Ok(RegistryEntry::decode(&bz)?)
    }

    pub fn platform_fee(&self) -> Result<U256, RegistryError> {
        let key = StoreKey::PlatformFee;
        decode_u256(&key, self.store.get(&key).as_deref())
    }

    pub fn treasury(&self) -> Result<Address, RegistryError> {
        let key = StoreKey::Treasury;
        decode_address(&key, self.store.get(&key).as_deref())
    }

    pub fn owner(&self) -> Result<Address, RegistryError> {
        let key = StoreKey::Owner;
        decode_address(&key, self.store.get(&key).as_deref())
    }

    /// True until `address` has completed a registration.
    pub fn is_newcomer(&self, address: &Address) -> bool {
        self.store
            .get(&StoreKey::FreeTreeUsed(*address))
            .is_none()
    }

    /// Fee `caller` would have to pay to register right now.
    pub fn required_fee(&self, caller: &Address) -> Result<U256, RegistryError> {
        if self.is_newcomer(caller) {
            Ok(U256::ZERO)
        } else {
            self.platform_fee()
        }
    }

    /// Publishes `root` with its metadata on behalf of `caller`.
    ///
    /// # Errors
    /// - `InvalidInput` for a zero root, an empty description or a zero list size
    /// - `AlreadyActive` if the root is currently registered
    /// - `InsufficientFee` if `fee_paid` is below the fee owed by `caller`
    /// - `Store` if a concurrent commit touched the same keys
    pub fn register(
        &self,
        root: B256,
        description: &str,
        list_size: u64,
        caller: Address,
        fee_paid: U256,
    ) -> Result<EntryId, RegistryError> {
        validate_root(&root)?;
        if description.trim().is_empty() {
            return Err(RegistryError::InvalidInput("empty description".to_owned()));
        }
        if list_size == 0 {
            return Err(RegistryError::InvalidInput("list size is zero".to_owned()));
        }

        let previous = self.load_entry(&root)?;
        if let Some((_, e)) = &previous {
            if e.is_active {
                warn!("register {} by {}: already active", root, caller);
                return Err(RegistryError::AlreadyActive(root));
            }
        }

        let flag_key = StoreKey::FreeTreeUsed(caller);
        let flag = self.store.get(&flag_key);
        let newcomer = flag.is_none();
        let fee_key = StoreKey::PlatformFee;
        let fee_bz = self.store.get(&fee_key);
        let required = if newcomer {
            U256::ZERO
        } else {
            decode_u256(&fee_key, fee_bz.as_deref())?
        };
        if fee_paid < required {
            warn!(
                "register {} by {}: paid {} < required {}",
                root, caller, fee_paid, required
            );
            return Err(RegistryError::InsufficientFee {
                paid: fee_paid,
                required,
            });
        }

        let revision = previous
            .as_ref()
            .map_or(FIRST_REVISION, |(_, e)| e.revision + 1);
        let entry = RegistryEntry {
            description: description.to_owned(),
            creator: caller,
            list_size,
            timestamp: self.clock.now(),
            is_active: true,
            revision,
        };

        let entry_key = StoreKey::Entry(root);
        let mut cs = ChangeSet::new();
        match previous {
            Some((old_bz, old)) => {
                cs.add_create(StoreKey::Archived(root, old.revision), old_bz.clone())
                    .add_write(entry_key, old_bz, entry.encode()?);
            }
            None => {
                cs.add_create(entry_key, entry.encode()?);
            }
        }
        match flag {
            None => cs.add_create(flag_key, FLAG_SET.to_vec()),
            Some(bz) => cs.add_read(flag_key, Some(bz)),
        };
        // a returning caller's fee must still be the one in force at commit
        if !newcomer {
            cs.add_read(fee_key, fee_bz);
        }
        let treasury = if fee_paid.is_zero() {
            None
        } else {
            let key = StoreKey::Treasury;
            let bz = self.store.get(&key);
            let treasury = decode_address(&key, bz.as_deref())?;
            cs.add_read(key, bz);
            Some(treasury)
        };

        let height = self.store.commit(&cs).inspect_err(|e| {
            warn!("register {} by {}: {}", root, caller, e);
        })?;

        if let Some(treasury) = treasury {
            self.sink.deposit(treasury, caller, fee_paid);
            metrics::counter!("registry.fee_collected_wei")
                .increment(fee_paid.saturating_to::<u64>());
        }
        metrics::counter!("registry.registered").increment(1);
        info!(
            "registered {} rev {} by {} (list_size={}, fee={}, newcomer={}) at height {}",
            root, revision, caller, list_size, fee_paid, newcomer, height
        );
        Ok(EntryId { root, revision })
    }

    /// Replaces the description of an active entry. Creator only.
    pub fn update_description(
        &self,
        root: B256,
        new_description: &str,
        caller: Address,
    ) -> Result<(), RegistryError> {
        validate_root(&root)?;
        let (old_bz, mut entry) = self.load_owned_entry(&root, &caller)?;
        if new_description.trim().is_empty() {
            return Err(RegistryError::InvalidInput("empty description".to_owned()));
        }
        entry.description = new_description.to_owned();
        let mut cs = ChangeSet::new();
        cs.add_write(StoreKey::Entry(root), old_bz, entry.encode()?);
        self.store.commit(&cs)?;
        info!("updated description of {} by {}", root, caller);
        Ok(())
    }

    /// Soft-deletes an active entry. Creator only; all other fields are kept.
    pub fn remove(&self, root: B256, caller: Address) -> Result<(), RegistryError> {
        validate_root(&root)?;
        let (old_bz, mut entry) = self.load_owned_entry(&root, &caller)?;
        entry.is_active = false;
        let mut cs = ChangeSet::new();
        cs.add_write(StoreKey::Entry(root), old_bz, entry.encode()?);
        self.store.commit(&cs)?;
        metrics::counter!("registry.removed").increment(1);
        info!("removed {} rev {} by {}", root, entry.revision, caller);
        Ok(())
    }

    /// Builds a change set that only commits while `caller` is the owner.
    fn owner_guard(&self, caller: &Address) -> Result<ChangeSet, RegistryError> {
        let key = StoreKey::Owner;
        let bz = self.store.get(&key);
        let owner = decode_address(&key, bz.as_deref())?;
        if owner != *caller {
            warn!("{} is not the registry owner", caller);
            return Err(RegistryError::Unauthorized {
                caller: *caller,
                expected: owner,
            });
        }
        let mut cs = ChangeSet::new();
        cs.add_read(key, bz);
        Ok(cs)
    }

    fn write_config_value(
        &self,
        caller: &Address,
        key: StoreKey,
        value: Vec<u8>,
    ) -> Result<(), RegistryError> {
        let mut cs = self.owner_guard(caller)?;
        let old = self.store.get(&key).ok_or_else(|| RegistryError::Corrupt {
            key: key.clone(),
            reason: "missing".to_owned(),
        })?;
        cs.add_write(key, old, value);
        self.store.commit(&cs)?;
        Ok(())
    }

    /// Changes the fee charged to returning registrants. Owner only.
    pub fn set_platform_fee(&self, caller: Address, fee: U256) -> Result<(), RegistryError> {
        self.write_config_value(&caller, StoreKey::PlatformFee, encode_u256(&fee))?;
        info!("platform fee set to {} by {}", fee, caller);
        Ok(())
    }

    /// Redirects future fees to `treasury`. Owner only.
    pub fn set_treasury(&self, caller: Address, treasury: Address) -> Result<(), RegistryError> {
        if treasury.is_zero() {
            return Err(RegistryError::InvalidInput(
                "treasury is the zero address".to_owned(),
            ));
        }
        self.write_config_value(&caller, StoreKey::Treasury, encode_address(&treasury))?;
        info!("treasury set to {} by {}", treasury, caller);
        Ok(())
    }
}
