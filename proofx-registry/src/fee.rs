//! Fee forwarding.
//!
//! The registry decides how much is owed; moving value is the job of a
//! [`FeeSink`] supplied by the embedding ledger. [`TreasuryBook`] is the
//! in-memory sink that simply credits balances.

use auto_impl::auto_impl;
use dashmap::DashMap;
use log::debug;
use revm::primitives::{Address, U256};

#[auto_impl(&, Arc)]
pub trait FeeSink: Send + Sync {
    /// Credits `amount` paid by `payer` to `treasury`.
    fn deposit(&self, treasury: Address, payer: Address, amount: U256);
}

#[derive(Default)]
pub struct TreasuryBook {
    balances: DashMap<Address, U256>,
    paid_by: DashMap<Address, U256>,
}

impl TreasuryBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, treasury: &Address) -> U256 {
        self.balances.get(treasury).map(|v| *v).unwrap_or_default()
    }

    pub fn paid_by(&self, payer: &Address) -> U256 {
        self.paid_by.get(payer).map(|v| *v).unwrap_or_default()
    }

    pub fn total(&self) -> U256 {
        self.balances
            .iter()
            .fold(U256::ZERO, |acc, kv| acc + *kv.value())
    }
}

impl FeeSink for TreasuryBook {
    fn deposit(&self, treasury: Address, payer: Address, amount: U256) {
        debug!("fee {} from {} to treasury {}", amount, payer, treasury);
        *self.balances.entry(treasury).or_default() += amount;
        *self.paid_by.entry(payer).or_default() += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposits_accumulate() {
        let book = TreasuryBook::new();
        let t = Address::repeat_byte(1);
        let p = Address::repeat_byte(2);
        book.deposit(t, p, U256::from(5));
        book.deposit(t, p, U256::from(7));
        assert_eq!(book.balance_of(&t), U256::from(12));
        assert_eq!(book.paid_by(&p), U256::from(12));
        assert_eq!(book.balance_of(&p), U256::ZERO);
        assert_eq!(book.total(), U256::from(12));
    }
}
