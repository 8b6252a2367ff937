//! Per-user nonce counters for replay protection
//!
//! Each user has a monotonically increasing counter starting at 0. A signed
//! authorization names the nonce it expects; consumption succeeds only when
//! that matches, then advances the counter by exactly 1. A given
//! `(user, nonce)` pair is therefore consumable at most once for the lifetime
//! of the tracker - this is the replay-protection invariant.

use custodia_types::{Address, CustodiaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tracks the current nonce of every user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NonceTracker {
    counters: HashMap<Address, u64>,
}

impl NonceTracker {
    /// Create a tracker with all counters at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's current nonce (the next one a signed request must carry)
    pub fn current(&self, user: &Address) -> u64 {
        self.counters.get(user).copied().unwrap_or(0)
    }

    /// Consume `expected` for the user
    ///
    /// Fails with `NonceMismatch` unless `expected` equals the current
    /// counter; on success the counter advances by exactly 1.
    pub fn consume(&mut self, user: &Address, expected: u64) -> Result<()> {
        let current = self.current(user);
        if expected != current {
            return Err(CustodiaError::NonceMismatch {
                user: user.to_string(),
                expected: current,
                provided: expected,
            });
        }

        self.counters.insert(*user, current + 1);
        Ok(())
    }
}
