//! On-ledger registry of Merkle allowlist roots.
//!
//! A [`TreeRegistry`] records who published which root, when, and for how
//! many addresses. Publishers pay nothing for their first root and the
//! platform fee for every later one; only the creator may edit or remove an
//! entry, and removal is a soft delete.
//!
//! Storage, fee transfer and time are supplied by the embedder through the
//! [`LedgerStore`], [`FeeSink`] and [`Clock`] traits. [`MemStore`],
//! [`TreasuryBook`] and [`SystemClock`] are in-process implementations.
//!
//! # Usage Examples
//! ```no_run
//! use proofx_registry::{MemStore, RegistryConfig, SystemClock, TreasuryBook, TreeRegistry};
//! use revm::primitives::{Address, B256, U256};
//!
//! let owner = Address::repeat_byte(1);
//! let registry = TreeRegistry::new(
//!     MemStore::new(),
//!     TreasuryBook::new(),
//!     SystemClock,
//!     &RegistryConfig::new(owner),
//! )
//! .unwrap();
//!
//! let root = B256::repeat_byte(7);
//! registry
//!     .register(root, "phase 1", 3, Address::repeat_byte(2), U256::ZERO)
//!     .unwrap();
//! assert!(registry.is_registered(&root).unwrap());
//! ```

pub mod clock;
pub mod config;
pub mod def;
pub mod entry;
pub mod error;
pub mod fee;
pub mod registry;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::RegistryConfig;
pub use entry::{EntryId, EntryState, RegistryEntry};
pub use error::{RegistryError, StoreError};
pub use fee::{FeeSink, TreasuryBook};
pub use registry::{parse_root, validate_root, TreeRegistry};
pub use store::{ChangeSet, LedgerStore, MemStore, StoreKey};
