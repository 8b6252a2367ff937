//! Coin registry: coin id to token contract mappings

use custodia_types::{Address, Coin, CoinId, CustodiaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps application coin ids to the external token contracts they represent
///
/// Re-registering an existing id overwrites the mapping (the vault logs a
/// warning when this happens); the registry itself carries no admin gating,
/// that lives at the vault boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoinRegistry {
    coins: HashMap<CoinId, Address>,
}

impl CoinRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or overwrite) a coin mapping
    ///
    /// Returns the previous token address when an existing id is overwritten.
    pub fn register(&mut self, coin_id: CoinId, token: Address) -> Option<Address> {
        self.coins.insert(coin_id, token)
    }

    /// Resolve a coin id to its token contract
    pub fn resolve(&self, coin_id: CoinId) -> Result<Address> {
        self.coins
            .get(&coin_id)
            .copied()
            .ok_or(CustodiaError::UnknownCoin { coin_id: coin_id.0 })
    }

    /// The token address for a coin id, if registered
    pub fn get(&self, coin_id: CoinId) -> Option<Address> {
        self.coins.get(&coin_id).copied()
    }

    /// All registered coins
    pub fn coins(&self) -> impl Iterator<Item = Coin> + '_ {
        self.coins
            .iter()
            .map(|(&coin_id, &token)| Coin { coin_id, token })
    }
}
