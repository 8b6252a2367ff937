//! Per-(user, coin) custodied balances

use custodia_types::{Address, Amount, CoinId, CustodiaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Balance state for one account across all coins
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountState {
    pub balances: HashMap<CoinId, Amount>,
}

impl AccountState {
    pub fn balance(&self, coin_id: CoinId) -> Amount {
        self.balances.get(&coin_id).copied().unwrap_or_default()
    }
}

/// The custodied balance ledger
///
/// Holds, per (user, coin), the amount the vault custodies on the user's
/// behalf. Mutated only through `credit` and `debit`; every debit happens
/// under the vault's signature-and-nonce authorization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceLedger {
    accounts: HashMap<Address, AccountState>,
}

impl BalanceLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the balance of an account for a coin
    pub fn balance(&self, user: &Address, coin_id: CoinId) -> Amount {
        self.accounts
            .get(user)
            .map(|a| a.balance(coin_id))
            .unwrap_or_default()
    }

    /// Increase an account's balance
    ///
    /// Returns the new balance. Overflow is an explicit error.
    pub fn credit(&mut self, user: &Address, coin_id: CoinId, amount: Amount) -> Result<Amount> {
        let account = self.accounts.entry(*user).or_default();
        let current = account.balance(coin_id);
        let new_balance = current.checked_add(amount)?;
        account.balances.insert(coin_id, new_balance);
        Ok(new_balance)
    }

    /// Decrease an account's balance
    ///
    /// Returns the new balance. Fails with `InsufficientBalance` if the
    /// account cannot cover the amount (invariant: no negative balances).
    pub fn debit(&mut self, user: &Address, coin_id: CoinId, amount: Amount) -> Result<Amount> {
        let current = self.balance(user, coin_id);
        if amount > current {
            return Err(CustodiaError::InsufficientBalance {
                user: user.to_string(),
                coin_id: coin_id.0,
                requested: amount.raw(),
                available: current.raw(),
            });
        }

        let new_balance = current.checked_sub(amount)?;
        self.accounts
            .entry(*user)
            .or_default()
            .balances
            .insert(coin_id, new_balance);
        Ok(new_balance)
    }

    /// Sum of all custodied balances for a coin
    ///
    /// Conservation check: this never exceeds total deposits minus total
    /// withdrawals for the coin.
    pub fn total_custodied(&self, coin_id: CoinId) -> Amount {
        self.accounts
            .values()
            .fold(Amount::zero(), |acc, a| acc + a.balance(coin_id))
    }

    /// All accounts with any recorded balance state
    pub fn accounts(&self) -> impl Iterator<Item = &Address> {
        self.accounts.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Address {
        Address::from_bytes([1; 20])
    }

    #[test]
    fn test_credit_and_balance() {
        let mut ledger = BalanceLedger::new();
        let coin = CoinId::new(1);

        assert_eq!(ledger.balance(&user(), coin), Amount::zero());

        let balance = ledger.credit(&user(), coin, Amount::new(1000)).unwrap();
        assert_eq!(balance, Amount::new(1000));
        assert_eq!(ledger.balance(&user(), coin), Amount::new(1000));
    }

    #[test]
    fn test_debit() {
        let mut ledger = BalanceLedger::new();
        let coin = CoinId::new(1);

        ledger.credit(&user(), coin, Amount::new(1000)).unwrap();
        let balance = ledger.debit(&user(), coin, Amount::new(400)).unwrap();
        assert_eq!(balance, Amount::new(600));
    }

    #[test]
    fn test_no_negative_balance() {
        let mut ledger = BalanceLedger::new();
        let coin = CoinId::new(1);

        ledger.credit(&user(), coin, Amount::new(100)).unwrap();
        let result = ledger.debit(&user(), coin, Amount::new(200));

        assert!(matches!(
            result,
            Err(CustodiaError::InsufficientBalance { .. })
        ));
        // Failed debit leaves the balance untouched
        assert_eq!(ledger.balance(&user(), coin), Amount::new(100));
    }

    #[test]
    fn test_debit_unknown_account_rejected() {
        let mut ledger = BalanceLedger::new();
        let result = ledger.debit(&user(), CoinId::new(1), Amount::new(1));
        assert!(matches!(
            result,
            Err(CustodiaError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_balances_are_coin_scoped() {
        let mut ledger = BalanceLedger::new();
        ledger.credit(&user(), CoinId::new(1), Amount::new(10)).unwrap();

        assert_eq!(ledger.balance(&user(), CoinId::new(2)), Amount::zero());
    }

    #[test]
    fn test_total_custodied() {
        let mut ledger = BalanceLedger::new();
        let coin = CoinId::new(1);
        let other = Address::from_bytes([2; 20]);

        ledger.credit(&user(), coin, Amount::new(10)).unwrap();
        ledger.credit(&other, coin, Amount::new(5)).unwrap();

        assert_eq!(ledger.total_custodied(coin), Amount::new(15));
    }
}
