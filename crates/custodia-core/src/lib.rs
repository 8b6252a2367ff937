//! Custodia Core - The vault boundary
//!
//! The vault is the system boundary of the custodial ledger:
//!
//! - `deposit` pulls tokens from the caller into custody and credits them
//! - `withdraw` executes an agent-signed request and its ordered task batch,
//!   all-or-nothing
//! - admin operations register coins and rotate the agent key
//!
//! External token contracts sit behind the [`TokenConnector`] trait; the
//! vault's own state lives behind one lock, and every mutation is staged on a
//! clone and committed by assignment, so a failed call leaves no observable
//! state change.

pub mod config;
pub mod token;
pub mod vault;

pub use config::*;
pub use token::*;
pub use vault::*;
