//! Vault configuration

use custodia_crypto::SigningDomain;
use custodia_types::Address;
use serde::{Deserialize, Serialize};

/// Configuration for a vault instance
///
/// The signing domain fixes the contract and chain identity that every
/// authorization digest is bound to; the admin address gates coin
/// registration and agent key rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// The single admin identity for management operations
    pub admin: Address,
    /// Typed-data signing domain (name, version, chain id, vault address)
    pub domain: SigningDomain,
}

impl VaultConfig {
    pub fn new(admin: Address, domain: SigningDomain) -> Self {
        Self { admin, domain }
    }

    /// The vault's own custody address (the domain's verifying contract)
    pub fn vault_address(&self) -> Address {
        self.domain.verifying_contract
    }

    /// Load a config from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_json_roundtrip() {
        let config = VaultConfig::new(
            Address::from_bytes([1; 20]),
            SigningDomain::new("Crash", "1.0", 31337, Address::from_bytes([2; 20])),
        );

        let json = serde_json::to_string(&config).unwrap();
        let back = VaultConfig::from_json(&json).unwrap();

        assert_eq!(back.admin, config.admin);
        assert_eq!(back.domain, config.domain);
        assert_eq!(back.vault_address(), Address::from_bytes([2; 20]));
    }

    #[test]
    fn test_config_from_literal_json() {
        let json = format!(
            r#"{{
                "admin": "0x{admin}",
                "domain": {{
                    "name": "Crash",
                    "version": "1.0",
                    "chain_id": 31337,
                    "verifying_contract": "0x{vault}"
                }}
            }}"#,
            admin = "11".repeat(20),
            vault = "22".repeat(20),
        );

        let config = VaultConfig::from_json(&json).unwrap();
        assert_eq!(config.domain.chain_id, 31337);
        assert_eq!(config.vault_address(), Address::from_bytes([0x22; 20]));
    }
}
