//! Error types for Custodia
//!
//! Every rejection is an all-or-nothing abort surfaced to the caller; there is
//! no soft-failure mode and no local recovery.

use thiserror::Error;

/// Result type for Custodia operations
pub type Result<T> = std::result::Result<T, CustodiaError>;

/// Custodia error types
#[derive(Debug, Clone, Error)]
pub enum CustodiaError {
    /// Admin-gated call from a non-admin caller
    #[error("Unauthorized: caller {caller} is not the admin")]
    Unauthorized { caller: String },

    /// Coin id has no registered token contract
    #[error("Unknown coin: {coin_id} is not registered")]
    UnknownCoin { coin_id: u32 },

    /// Debit exceeds the custodied balance
    #[error("Insufficient balance for {user} on coin {coin_id}: requested {requested}, available {available}")]
    InsufficientBalance {
        user: String,
        coin_id: u32,
        requested: u128,
        available: u128,
    },

    /// Stale or already-consumed nonce
    #[error("Nonce mismatch for {user}: expected {expected}, got {provided}")]
    NonceMismatch {
        user: String,
        expected: u64,
        provided: u64,
    },

    /// Digest/signer mismatch or malformed signature
    #[error("Invalid signature: {reason}")]
    InvalidSignature { reason: String },

    /// The underlying token contract declined the transfer
    #[error("External transfer failed on token {token}: {reason}")]
    ExternalTransferFailed { token: String, reason: String },

    /// Amount arithmetic overflow or underflow
    #[error("Amount overflow during arithmetic operation")]
    AmountOverflow,

    /// Malformed address input
    #[error("Invalid address {input}: {reason}")]
    InvalidAddress { input: String, reason: String },
}

impl CustodiaError {
    /// Create an invalid-signature error
    pub fn invalid_signature(reason: impl Into<String>) -> Self {
        Self::InvalidSignature {
            reason: reason.into(),
        }
    }

    /// Get an error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::UnknownCoin { .. } => "UNKNOWN_COIN",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::NonceMismatch { .. } => "NONCE_MISMATCH",
            Self::InvalidSignature { .. } => "INVALID_SIGNATURE",
            Self::ExternalTransferFailed { .. } => "EXTERNAL_TRANSFER_FAILED",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::InvalidAddress { .. } => "INVALID_ADDRESS",
        }
    }
}
