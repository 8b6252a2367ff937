//! Recoverable signatures over withdrawal request digests
//!
//! Signatures are 65 bytes: `r ‖ s ‖ v`, with `v` accepted as 0/1 or 27/28.
//! Recovery yields the signer address, which the vault compares against the
//! current agent address. Every malformed input path returns an error so
//! verification fails closed.

use crate::{
    address_from_verifying_key, request_digest, AgentKeyPair, CryptoError, CryptoResult,
    SigningDomain,
};
use custodia_types::{Address, WithdrawalRequest};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};

/// Length of a serialized recoverable signature
pub const SIGNATURE_LEN: usize = 65;

/// Sign a 32-byte digest, returning the 65-byte `r ‖ s ‖ v` form
pub fn sign_digest(keypair: &AgentKeyPair, digest: &[u8; 32]) -> CryptoResult<Vec<u8>> {
    let (signature, recovery_id) = keypair
        .signing_key()
        .sign_prehash_recoverable(digest)
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

    let mut out = Vec::with_capacity(SIGNATURE_LEN);
    out.extend_from_slice(&signature.to_bytes());
    out.push(27 + recovery_id.to_byte());
    Ok(out)
}

/// Recover the signer address from a 65-byte signature over a digest
pub fn recover_signer(digest: &[u8; 32], signature: &[u8]) -> CryptoResult<Address> {
    if signature.len() != SIGNATURE_LEN {
        return Err(CryptoError::VerificationFailed(format!(
            "signature must be {} bytes, got {}",
            SIGNATURE_LEN,
            signature.len()
        )));
    }

    let sig = EcdsaSignature::try_from(&signature[..64])
        .map_err(|e| CryptoError::VerificationFailed(e.to_string()))?;
    let recovery_id = normalize_recovery_id(signature[64])?;

    let verifying_key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|e| CryptoError::VerificationFailed(e.to_string()))?;

    Ok(address_from_verifying_key(&verifying_key))
}

/// Sign a withdrawal request under a domain
pub fn sign_request(
    keypair: &AgentKeyPair,
    domain: &SigningDomain,
    request: &WithdrawalRequest,
) -> CryptoResult<Vec<u8>> {
    sign_digest(keypair, &request_digest(domain, request))
}

/// Verify that `signature` over `request` recovers to `expected_signer`
///
/// Fails closed: malformed signatures, wrong lengths, and unrecoverable
/// points all return `false` rather than an error a caller could ignore.
pub fn verify_request(
    domain: &SigningDomain,
    request: &WithdrawalRequest,
    signature: &[u8],
    expected_signer: &Address,
) -> bool {
    let digest = request_digest(domain, request);
    match recover_signer(&digest, signature) {
        Ok(recovered) => &recovered == expected_signer,
        Err(_) => false,
    }
}

fn normalize_recovery_id(raw: u8) -> CryptoResult<RecoveryId> {
    let id = match raw {
        27 | 28 => raw - 27,
        0 | 1 => raw,
        _ => {
            return Err(CryptoError::VerificationFailed(
                "recovery id must be 0/1 or 27/28".to_string(),
            ))
        }
    };
    RecoveryId::try_from(id)
        .map_err(|_| CryptoError::VerificationFailed("invalid recovery id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use custodia_types::{Amount, CoinId};

    fn test_domain() -> SigningDomain {
        SigningDomain::new("Crash", "1.0", 31337, Address::from_bytes([0x42; 20]))
    }

    fn test_request() -> WithdrawalRequest {
        WithdrawalRequest::simple(Address::from_bytes([1; 20]), CoinId::new(1), Amount::new(5), 0)
    }

    #[test]
    fn test_sign_and_recover() {
        let keypair = AgentKeyPair::generate();
        let digest = request_digest(&test_domain(), &test_request());

        let signature = sign_digest(&keypair, &digest).unwrap();
        assert_eq!(signature.len(), SIGNATURE_LEN);

        let recovered = recover_signer(&digest, &signature).unwrap();
        assert_eq!(recovered, keypair.address());
    }

    #[test]
    fn test_verify_request() {
        let keypair = AgentKeyPair::generate();
        let request = test_request();

        let signature = sign_request(&keypair, &test_domain(), &request).unwrap();
        assert!(verify_request(
            &test_domain(),
            &request,
            &signature,
            &keypair.address()
        ));
    }

    #[test]
    fn test_wrong_signer_rejected() {
        let keypair = AgentKeyPair::generate();
        let other = AgentKeyPair::generate();
        let request = test_request();

        let signature = sign_request(&keypair, &test_domain(), &request).unwrap();
        assert!(!verify_request(
            &test_domain(),
            &request,
            &signature,
            &other.address()
        ));
    }

    #[test]
    fn test_tampered_request_rejected() {
        let keypair = AgentKeyPair::generate();
        let request = test_request();

        let signature = sign_request(&keypair, &test_domain(), &request).unwrap();

        let mut tampered = request;
        tampered.amount = Amount::new(500);
        assert!(!verify_request(
            &test_domain(),
            &tampered,
            &signature,
            &keypair.address()
        ));
    }

    #[test]
    fn test_malformed_signature_fails_closed() {
        let keypair = AgentKeyPair::generate();
        let request = test_request();
        let agent = keypair.address();

        // Wrong lengths
        assert!(!verify_request(&test_domain(), &request, &[], &agent));
        assert!(!verify_request(&test_domain(), &request, &[0u8; 64], &agent));
        assert!(!verify_request(&test_domain(), &request, &[0u8; 66], &agent));

        // Garbage content of the right length
        assert!(!verify_request(&test_domain(), &request, &[0u8; 65], &agent));

        // Valid signature with a corrupted recovery byte
        let mut signature = sign_request(&keypair, &test_domain(), &request).unwrap();
        signature[64] = 99;
        assert!(!verify_request(&test_domain(), &request, &signature, &agent));
    }

    #[test]
    fn test_recovery_id_normalization() {
        let keypair = AgentKeyPair::generate();
        let digest = request_digest(&test_domain(), &test_request());
        let mut signature = sign_digest(&keypair, &digest).unwrap();

        // The 0/1 form recovers the same signer as the 27/28 form
        signature[64] -= 27;
        let recovered = recover_signer(&digest, &signature).unwrap();
        assert_eq!(recovered, keypair.address());
    }
}
