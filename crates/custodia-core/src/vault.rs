//! The vault: custody boundary and task processor
//!
//! All state-mutating operations serialize on one write lock, which doubles
//! as the reentrancy guard: a token connector cannot re-enter the vault and
//! observe balances mid-mutation. Mutations are staged on a clone of the
//! state and committed by assignment only after every check and every
//! external transfer has succeeded, so any failure - signature, nonce,
//! balance, or token - aborts with the published state untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use custodia_crypto::{request_digest, verify_request};
use custodia_ledger::{BalanceLedger, CoinRegistry, NonceTracker};
use custodia_types::{
    Address, Amount, Coin, CoinId, CustodiaError, Result, Task, TaskKind, WithdrawalRequest,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{TokenConnector, VaultConfig};

/// Unique identifier for a withdrawal receipt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptId(pub String);

impl ReceiptId {
    pub fn new() -> Self {
        Self(format!("wdr_{}", Uuid::new_v4()))
    }
}

impl Default for ReceiptId {
    fn default() -> Self {
        Self::new()
    }
}

/// One external token transfer issued by an authorized withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub token: Address,
    pub to: Address,
    pub amount: Amount,
}

/// Result of a successfully executed withdrawal request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    pub receipt_id: ReceiptId,
    /// Hex form of the typed-data digest the agent signed
    pub digest: String,
    /// External transfers issued, in order
    pub transfers: Vec<TransferRecord>,
    pub executed_at: DateTime<Utc>,
}

/// The complete mutable state of a vault
///
/// Kept as one `Clone` value so a withdrawal can stage every effect and
/// commit atomically.
#[derive(Debug, Clone, Default)]
struct VaultState {
    registry: CoinRegistry,
    balances: BalanceLedger,
    nonces: NonceTracker,
    agent: Address,
}

/// The custodial vault
///
/// Owns all entity state exclusively; external collaborators reach it only
/// through the deposit/withdraw/admin boundary calls.
pub struct Vault {
    config: VaultConfig,
    state: RwLock<VaultState>,
    tokens: Arc<dyn TokenConnector>,
}

impl Vault {
    /// Create a vault with no registered coins and the agent address unset
    ///
    /// The agent starts at the zero address; no signature verifies until the
    /// admin calls [`Vault::set_agent_address`].
    pub fn new(config: VaultConfig, tokens: Arc<dyn TokenConnector>) -> Self {
        Self {
            config,
            state: RwLock::new(VaultState::default()),
            tokens,
        }
    }

    /// The vault's custody address
    pub fn address(&self) -> Address {
        self.config.vault_address()
    }

    // ------------------------------------------------------------------
    // Admin operations
    // ------------------------------------------------------------------

    /// Register (or overwrite) a coin mapping. Admin only.
    pub async fn add_coin(&self, caller: Address, coin_id: CoinId, token: Address) -> Result<()> {
        self.require_admin(caller)?;

        let mut state = self.state.write().await;
        if let Some(previous) = state.registry.register(coin_id, token) {
            if previous != token {
                warn!("Coin {} remapped from {} to {}", coin_id, previous, token);
            }
        } else {
            info!("Coin {} registered as {}", coin_id, token);
        }
        Ok(())
    }

    /// Replace the trusted agent key. Admin only.
    ///
    /// Takes effect immediately: requests signed by the previous key become
    /// permanently unusable, consumed or not.
    pub async fn set_agent_address(&self, caller: Address, agent: Address) -> Result<()> {
        self.require_admin(caller)?;

        let mut state = self.state.write().await;
        let previous = state.agent;
        state.agent = agent;
        info!("Agent address rotated from {} to {}", previous, agent);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read-only queries
    // ------------------------------------------------------------------

    /// The token contract registered for a coin id, if any
    pub async fn supported_coin(&self, coin_id: CoinId) -> Option<Address> {
        self.state.read().await.registry.get(coin_id)
    }

    /// All registered coins
    pub async fn supported_coins(&self) -> Vec<Coin> {
        self.state.read().await.registry.coins().collect()
    }

    /// A user's custodied balance for a coin
    pub async fn user_balance(&self, user: Address, coin_id: CoinId) -> Amount {
        self.state.read().await.balances.balance(&user, coin_id)
    }

    /// The current trusted agent address
    pub async fn agent_address(&self) -> Address {
        self.state.read().await.agent
    }

    /// The nonce a user's next signed request must carry
    pub async fn current_nonce(&self, user: Address) -> u64 {
        self.state.read().await.nonces.current(&user)
    }

    // ------------------------------------------------------------------
    // Boundary operations
    // ------------------------------------------------------------------

    /// Deposit tokens into custody
    ///
    /// Pulls `amount` of the registered token from the caller (who must have
    /// approved the vault) and credits the caller's balance. Returns the new
    /// balance. No signature needed: the external token transfer is the
    /// trust boundary.
    pub async fn deposit(&self, caller: Address, coin_id: CoinId, amount: Amount) -> Result<Amount> {
        let mut state = self.state.write().await;
        let token = state.registry.resolve(coin_id)?;

        let mut staged = state.clone();
        let new_balance = staged.balances.credit(&caller, coin_id, amount)?;

        // Pull the tokens while the staged credit is still uncommitted; a
        // declined transfer leaves the ledger untouched.
        self.tokens.transfer_from(token, caller, amount).await?;

        *state = staged;
        info!("Deposit: {} credited {} of {}", caller, amount, coin_id);
        Ok(new_balance)
    }

    /// Execute an agent-signed withdrawal request and its task batch
    ///
    /// Callable by anyone holding a valid signature; the caller is not
    /// assumed to be `request.user`. All-or-nothing: the primary withdrawal
    /// and every auxiliary task apply together or not at all.
    pub async fn withdraw(
        &self,
        request: &WithdrawalRequest,
        signature: &[u8],
    ) -> Result<WithdrawalReceipt> {
        let mut state = self.state.write().await;

        if !verify_request(&self.config.domain, request, signature, &state.agent) {
            warn!("Withdrawal rejected for {}: invalid signature", request.user);
            return Err(CustodiaError::invalid_signature(
                "signer does not match agent address",
            ));
        }

        let mut staged = state.clone();
        let mut transfers = Vec::new();

        // Primary withdrawal
        staged.nonces.consume(&request.user, request.nonce)?;
        let token = staged.registry.resolve(request.coin_id)?;
        staged
            .balances
            .debit(&request.user, request.coin_id, request.amount)?;
        transfers.push(TransferRecord {
            token,
            to: request.user,
            amount: request.amount,
        });

        // Auxiliary tasks, in order; any failure aborts the whole batch
        for task in &request.tasks {
            Self::apply_task(&mut staged, task, &mut transfers)?;
        }

        // Ledger effects are final in the staged state; issue the external
        // transfers under the same lock, then commit. A declined transfer
        // aborts with nothing published.
        for transfer in &transfers {
            self.tokens
                .transfer(transfer.token, transfer.to, transfer.amount)
                .await?;
        }

        *state = staged;

        let receipt = WithdrawalReceipt {
            receipt_id: ReceiptId::new(),
            digest: hex::encode(request_digest(&self.config.domain, request)),
            transfers,
            executed_at: Utc::now(),
        };
        info!(
            "Withdrawal executed for {}: {} of {} plus {} task(s)",
            request.user,
            request.amount,
            request.coin_id,
            request.tasks.len()
        );
        Ok(receipt)
    }

    /// Consume a task's own nonce, then apply its kind-dependent effect
    fn apply_task(
        staged: &mut VaultState,
        task: &Task,
        transfers: &mut Vec<TransferRecord>,
    ) -> Result<()> {
        staged.nonces.consume(&task.user, task.nonce)?;

        match task.kind {
            TaskKind::Withdraw => {
                let token = staged.registry.resolve(task.coin_id)?;
                staged.balances.debit(&task.user, task.coin_id, task.amount)?;
                transfers.push(TransferRecord {
                    token,
                    to: task.user,
                    amount: task.amount,
                });
            }
            TaskKind::Debit => {
                staged.balances.debit(&task.user, task.coin_id, task.amount)?;
            }
            TaskKind::Credit => {
                staged.balances.credit(&task.user, task.coin_id, task.amount)?;
            }
        }
        Ok(())
    }

    fn require_admin(&self, caller: Address) -> Result<()> {
        if caller != self.config.admin {
            return Err(CustodiaError::Unauthorized {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }
}
