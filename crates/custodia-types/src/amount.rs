//! Unsigned amounts in smallest token units
//!
//! Custodia tracks custodied balances as raw smallest-unit values (wei-style).
//! `u128` covers every value the original uint256 scheme produces in practice;
//! the typed-data encoding left-pads to 32 bytes so digests stay compatible.
//! All arithmetic is checked - overflow is an explicit error, never a wrap.

use crate::{CustodiaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// An unsigned token amount in smallest units
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(pub u128);

impl Amount {
    /// Create a new amount
    pub fn new(value: u128) -> Self {
        Self(value)
    }

    /// The zero amount
    pub fn zero() -> Self {
        Self(0)
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Get the raw value
    pub fn raw(&self) -> u128 {
        self.0
    }

    /// Checked addition
    pub fn checked_add(self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(CustodiaError::AmountOverflow)
    }

    /// Checked subtraction
    ///
    /// The caller is expected to have verified coverage; an underflow here
    /// still surfaces as an explicit error rather than a wrap.
    pub fn checked_sub(self, other: Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(CustodiaError::AmountOverflow)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

// Convenience operators for test code and display math (panic on overflow)
impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        self.checked_add(other).expect("Amount addition overflow")
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        self.checked_sub(other).expect("Amount subtraction underflow")
    }
}
