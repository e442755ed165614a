//! Credit ledger — balance, spin debits and payouts

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Player balance in whole credits
///
/// The balance never goes negative: a debit that would overdraw is refused
/// without touching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLedger {
    balance: u64,
}

impl CreditLedger {
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn can_afford(&self, cost: u64) -> bool {
        self.balance >= cost
    }

    /// Take `cost` from the balance, returning the new balance
    pub fn debit(&mut self, cost: u64) -> SlotResult<u64> {
        if !self.can_afford(cost) {
            return Err(SlotError::InsufficientCredit {
                balance: self.balance,
                cost,
            });
        }
        self.balance -= cost;
        Ok(self.balance)
    }

    /// Add a payout, returning the new balance
    pub fn credit(&mut self, amount: u64) -> u64 {
        self.balance = self.balance.saturating_add(amount);
        self.balance
    }

    /// Overwrite the balance (recharge)
    pub fn reset(&mut self, balance: u64) {
        self.balance = balance;
    }
}

impl Default for CreditLedger {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_and_credit() {
        let mut ledger = CreditLedger::new(10);
        assert_eq!(ledger.debit(2).unwrap(), 8);
        assert_eq!(ledger.credit(5), 13);
        assert_eq!(ledger.balance(), 13);
    }

    #[test]
    fn test_overdraw_is_refused_without_mutation() {
        let mut ledger = CreditLedger::new(1);
        assert!(!ledger.can_afford(2));
        assert_eq!(
            ledger.debit(2),
            Err(SlotError::InsufficientCredit {
                balance: 1,
                cost: 2
            })
        );
        assert_eq!(ledger.balance(), 1);
    }

    #[test]
    fn test_exact_balance_can_spin() {
        let mut ledger = CreditLedger::new(2);
        assert!(ledger.can_afford(2));
        assert_eq!(ledger.debit(2).unwrap(), 0);
        assert!(ledger.debit(2).is_err());
    }

    #[test]
    fn test_credit_saturates() {
        let mut ledger = CreditLedger::new(u64::MAX - 1);
        assert_eq!(ledger.credit(10), u64::MAX);
    }

    #[test]
    fn test_reset() {
        let mut ledger = CreditLedger::default();
        assert_eq!(ledger.balance(), 50);
        ledger.reset(7);
        assert_eq!(ledger.balance(), 7);
    }
}
