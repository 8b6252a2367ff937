//! Custodia Crypto - Cryptographic primitives for the custodial ledger
//!
//! This crate provides:
//! - Keccak-256 hashing
//! - Agent key generation and management (secp256k1)
//! - The typed-data digest construction for withdrawal requests
//! - 65-byte recoverable signatures and signer recovery
//!
//! # Security Invariant
//!
//! **Verification fails closed.** Malformed signatures, wrong lengths, and
//! recovery failures all yield rejection - never a panic a caller could
//! observe partial state through.

pub mod hash;
pub mod keys;
pub mod signature;
pub mod typed_data;

pub use hash::*;
pub use keys::*;
pub use signature::*;
pub use typed_data::*;

use thiserror::Error;

/// Cryptographic errors
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
