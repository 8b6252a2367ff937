//! The external token boundary
//!
//! Token transfer mechanics are an external collaborator: the vault only
//! needs `transfer`/`transferFrom`/`balanceOf` semantics per token contract,
//! expressed here as the [`TokenConnector`] trait. A production connector
//! submits the calls as the vault's own identity; [`InMemoryTokens`] models
//! the same semantics in memory for demos and tests.

use async_trait::async_trait;
use custodia_types::{Address, Amount, CustodiaError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Fungible-token operations the vault issues against external contracts
///
/// `transfer` spends from the connector's own identity (the vault custody
/// address); `transfer_from` pulls previously approved funds from a holder.
#[async_trait]
pub trait TokenConnector: Send + Sync {
    /// Transfer `amount` of `token` from the vault's holdings to `to`
    async fn transfer(&self, token: Address, to: Address, amount: Amount) -> Result<()>;

    /// Pull `amount` of `token` from `from` into the vault's holdings
    async fn transfer_from(&self, token: Address, from: Address, amount: Amount) -> Result<()>;

    /// The holder's balance of `token`
    async fn balance_of(&self, token: Address, holder: Address) -> Amount;
}

#[derive(Debug, Clone, Default)]
struct TokenBook {
    balances: HashMap<Address, Amount>,
    /// Approvals granted to the custody address, per holder
    allowances: HashMap<Address, Amount>,
}

/// In-memory token contracts for demos and tests
///
/// Keyed by token address, with ERC-20-shaped balance and allowance
/// bookkeeping. The custody address plays the role the vault contract plays
/// on chain: `transfer` spends from it, `transfer_from` deposits into it.
pub struct InMemoryTokens {
    custody: Address,
    books: Arc<RwLock<HashMap<Address, TokenBook>>>,
}

impl InMemoryTokens {
    /// Create a token bank whose connector identity is `custody`
    pub fn new(custody: Address) -> Self {
        Self {
            custody,
            books: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Mint fresh tokens to a holder (test/demo setup)
    pub async fn mint(&self, token: Address, to: Address, amount: Amount) {
        let mut books = self.books.write().await;
        let book = books.entry(token).or_default();
        let balance = book.balances.entry(to).or_default();
        *balance = balance.checked_add(amount).expect("mint overflow");
    }

    /// Approve the custody address to pull up to `amount` from `holder`
    pub async fn approve(&self, token: Address, holder: Address, amount: Amount) {
        let mut books = self.books.write().await;
        books.entry(token).or_default().allowances.insert(holder, amount);
    }
}

#[async_trait]
impl TokenConnector for InMemoryTokens {
    async fn transfer(&self, token: Address, to: Address, amount: Amount) -> Result<()> {
        let mut books = self.books.write().await;
        let book = books.entry(token).or_default();

        let custody_balance = book.balances.get(&self.custody).copied().unwrap_or_default();
        if amount > custody_balance {
            return Err(CustodiaError::ExternalTransferFailed {
                token: token.to_string(),
                reason: format!(
                    "custody holds {}, transfer needs {}",
                    custody_balance, amount
                ),
            });
        }

        let to_balance = book.balances.get(&to).copied().unwrap_or_default();
        let new_to_balance =
            to_balance
                .checked_add(amount)
                .map_err(|_| CustodiaError::ExternalTransferFailed {
                    token: token.to_string(),
                    reason: "recipient balance overflow".to_string(),
                })?;

        book.balances.insert(self.custody, custody_balance - amount);
        book.balances.insert(to, new_to_balance);
        Ok(())
    }

    async fn transfer_from(&self, token: Address, from: Address, amount: Amount) -> Result<()> {
        let mut books = self.books.write().await;
        let book = books.entry(token).or_default();

        let allowance = book.allowances.get(&from).copied().unwrap_or_default();
        if amount > allowance {
            return Err(CustodiaError::ExternalTransferFailed {
                token: token.to_string(),
                reason: format!("allowance {} below requested {}", allowance, amount),
            });
        }

        let from_balance = book.balances.get(&from).copied().unwrap_or_default();
        if amount > from_balance {
            return Err(CustodiaError::ExternalTransferFailed {
                token: token.to_string(),
                reason: format!("holder balance {} below requested {}", from_balance, amount),
            });
        }

        let custody_balance = book.balances.get(&self.custody).copied().unwrap_or_default();
        let new_custody_balance = custody_balance.checked_add(amount).map_err(|_| {
            CustodiaError::ExternalTransferFailed {
                token: token.to_string(),
                reason: "custody balance overflow".to_string(),
            }
        })?;

        book.allowances.insert(from, allowance - amount);
        book.balances.insert(from, from_balance - amount);
        book.balances.insert(self.custody, new_custody_balance);
        Ok(())
    }

    async fn balance_of(&self, token: Address, holder: Address) -> Amount {
        self.books
            .read()
            .await
            .get(&token)
            .and_then(|book| book.balances.get(&holder))
            .copied()
            .unwrap_or_default()
    }
}
