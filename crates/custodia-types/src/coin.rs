//! Coin identifiers and registrations

use crate::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application-defined identifier for a supported coin
///
/// The typed-data scheme encodes this as uint32, matching the original wire
/// format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CoinId(pub u32);

impl CoinId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "coin_{}", self.0)
    }
}

impl From<u32> for CoinId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A registered coin: the mapping from a coin id to the external token
/// contract it represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub coin_id: CoinId,
    pub token: Address,
}
