//! Withdrawal requests and their embedded task batches
//!
//! A `WithdrawalRequest` is the unit the agent signs: the primary withdrawal
//! plus an ordered sequence of auxiliary tasks, bound together into one
//! typed-data digest. No task can be added, removed, or reordered without
//! invalidating the signature.

use crate::{Address, Amount, CoinId};
use serde::{Deserialize, Serialize};

/// The kind of effect an auxiliary task applies
///
/// Discriminants are fixed - they are encoded as uint8 in the typed-data
/// digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TaskKind {
    /// Debit the task user and transfer the amount out to their wallet
    Withdraw = 0,
    /// Debit the task user's custodied balance (internal settlement leg)
    Debit = 1,
    /// Credit the task user's custodied balance (internal settlement leg)
    Credit = 2,
}

impl TaskKind {
    /// Wire discriminant for the typed-data encoding
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

/// An auxiliary balance operation bundled into a withdrawal request
///
/// Tasks may target users other than the request's primary user - this is the
/// mechanism for agent-authorized batched settlement across accounts. Each
/// task carries its own nonce, consumed against its own user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub kind: TaskKind,
    pub user: Address,
    pub coin_id: CoinId,
    pub amount: Amount,
    pub nonce: u64,
}

/// An agent-signed authorization to move custodied funds
///
/// Consumed exactly once: the signature and nonce checks are atomic with the
/// balance mutations they authorize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Account whose balance the primary withdrawal debits
    pub user: Address,
    pub coin_id: CoinId,
    pub amount: Amount,
    /// Must equal the user's current nonce at execution time
    pub nonce: u64,
    /// Ordered auxiliary tasks, applied after the primary withdrawal
    pub tasks: Vec<Task>,
}

impl WithdrawalRequest {
    /// Create a request with no auxiliary tasks
    pub fn simple(user: Address, coin_id: CoinId, amount: Amount, nonce: u64) -> Self {
        Self {
            user,
            coin_id,
            amount,
            nonce,
            tasks: vec![],
        }
    }

    /// Append a task, preserving order
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_kind_discriminants() {
        assert_eq!(TaskKind::Withdraw.as_u8(), 0);
        assert_eq!(TaskKind::Debit.as_u8(), 1);
        assert_eq!(TaskKind::Credit.as_u8(), 2);
    }

    #[test]
    fn test_request_builder() {
        let user = Address::from_bytes([1; 20]);
        let other = Address::from_bytes([2; 20]);

        let request = WithdrawalRequest::simple(user, CoinId::new(1), Amount::new(5), 0)
            .with_task(Task {
                kind: TaskKind::Debit,
                user: other,
                coin_id: CoinId::new(1),
                amount: Amount::new(3),
                nonce: 0,
            });

        assert_eq!(request.tasks.len(), 1);
        assert_eq!(request.tasks[0].user, other);
    }
}
