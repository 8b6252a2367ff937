//! Custodia Ledger - Custodied balance state
//!
//! The state layer is:
//! - Coin-scoped (balances keyed by user, then coin id)
//! - Strictly non-negative (debits that exceed the balance are rejected)
//! - Replay-protected (per-user nonces, each consumable exactly once)
//!
//! These structs are plain `Clone` state with no interior locking: the vault
//! holds them inside one lock and commits mutations by staging a clone, which
//! is what makes a failed batch leave no observable state change.
//!
//! # Invariants
//!
//! 1. No negative balances
//! 2. `credit` and `debit` are the only balance mutators
//! 3. A nonce, once consumed, can never be consumed again

pub mod balances;
pub mod nonces;
pub mod registry;

pub use balances::*;
pub use nonces::*;
pub use registry::*;
