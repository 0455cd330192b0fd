use revm::primitives::{Address, B256, U256};

use crate::store::StoreKey;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A guarded value changed between read and commit; nothing was written.
    #[error("StoreError: conflicting write on {key}")]
    Conflict { key: StoreKey },
}

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("Registry: invalid input: {0}")]
    InvalidInput(String),

    #[error("Registry: root {0} is not registered")]
    NotFound(B256),

    #[error("Registry: root {0} already has an active entry")]
    AlreadyActive(B256),

    #[error("Registry: insufficient fee, paid/required = {paid}/{required}")]
    InsufficientFee { paid: U256, required: U256 },

    #[error("Registry: caller {caller} is not {expected}")]
    Unauthorized { caller: Address, expected: Address },

    #[error("Registry: root {0} has been removed")]
    Inactive(B256),

    #[error("Registry: ledger error: {0}")]
    Store(#[from] StoreError),

    #[error("Registry: corrupt ledger value: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Registry: corrupt ledger value at {key}: {reason}")]
    Corrupt { key: StoreKey, reason: String },
}

impl RegistryError {
    /// True for errors that depend on ledger state at call time and may
    /// resolve differently if the caller re-reads and tries again.
    pub fn is_state_dependent(&self) -> bool {
        matches!(
            self,
            RegistryError::AlreadyActive(_)
                | RegistryError::Unauthorized { .. }
                | RegistryError::Inactive(_)
                | RegistryError::InsufficientFee { .. }
                | RegistryError::Store(StoreError::Conflict { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_dependent_errors() {
        let root = B256::repeat_byte(1);
        let a = Address::repeat_byte(2);
        let conflict = StoreError::Conflict {
            key: StoreKey::Entry(root),
        };
        let retryable = [
            RegistryError::AlreadyActive(root),
            RegistryError::Unauthorized {
                caller: a,
                expected: Address::ZERO,
            },
            RegistryError::Inactive(root),
            RegistryError::InsufficientFee {
                paid: U256::ZERO,
                required: U256::from(1),
            },
            RegistryError::Store(conflict),
        ];
        for e in &retryable {
            assert!(e.is_state_dependent(), "{}", e);
        }

        let permanent = [
            RegistryError::InvalidInput("empty description".to_owned()),
            RegistryError::NotFound(root),
            RegistryError::Codec(Box::new(bincode::ErrorKind::SizeLimit)),
            RegistryError::Corrupt {
                key: StoreKey::Owner,
                reason: "missing".to_owned(),
            },
        ];
        for e in &permanent {
            assert!(!e.is_state_dependent(), "{}", e);
        }
    }
}
