//! Agent key management for Custodia
//!
//! The agent key is a secp256k1 keypair. Its address is derived the Ethereum
//! way - the low 20 bytes of the Keccak-256 of the uncompressed public point -
//! so signer recovery over a typed-data digest yields a value directly
//! comparable to the stored agent address.

use crate::{keccak256, CryptoError, CryptoResult};
use custodia_types::Address;
use k256::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;

/// A secp256k1 keypair for signing withdrawal authorizations
#[derive(Clone)]
pub struct AgentKeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl AgentKeyPair {
    /// Generate a new random keypair
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = *signing_key.verifying_key();

        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Create from existing secret key bytes
    pub fn from_bytes(bytes: &[u8; 32]) -> CryptoResult<Self> {
        let signing_key = SigningKey::from_bytes(bytes.into())
            .map_err(|e| CryptoError::InvalidKeyFormat(e.to_string()))?;
        let verifying_key = *signing_key.verifying_key();

        Ok(Self {
            signing_key,
            verifying_key,
        })
    }

    /// Get the signing key (private - never expose!)
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Get the verifying key (public)
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// The address this key signs as
    pub fn address(&self) -> Address {
        address_from_verifying_key(&self.verifying_key)
    }

    /// Get the secret key bytes (for secure storage only!)
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }
}

/// Derive the 20-byte address of a secp256k1 verifying key
pub fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let encoded = key.to_encoded_point(false);
    // Skip the 0x04 uncompressed-point tag, hash the 64 coordinate bytes
    let digest = keccak256(&encoded.as_bytes()[1..]);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);
    Address::from_bytes(out)
}
