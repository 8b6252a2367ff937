//! Custodia Types - Canonical domain types for the custodial balance ledger
//!
//! This crate contains all foundational types for Custodia with zero
//! dependencies on other custodia crates. It defines:
//!
//! - Identity types (Address, CoinId)
//! - Unsigned amounts with checked arithmetic
//! - Withdrawal requests and their embedded task batches
//! - The shared error enum
//!
//! # Architectural Invariants
//!
//! These types support the core Custodia security invariants:
//!
//! 1. Balances never go negative
//! 2. Every withdrawal requires a valid agent signature over the full request
//! 3. Each (user, nonce) pair is consumed at most once
//! 4. Atomic operations only - a failed call leaves no observable state change

pub mod address;
pub mod amount;
pub mod coin;
pub mod error;
pub mod request;

pub use address::*;
pub use amount::*;
pub use coin::*;
pub use error::*;
pub use request::*;

/// Version of the Custodia types schema
pub const TYPES_VERSION: &str = "0.1.0";
