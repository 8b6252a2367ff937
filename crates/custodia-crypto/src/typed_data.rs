//! Typed-data digest construction for withdrawal requests
//!
//! The digest binds contract identity (domain separator), chain identity, and
//! the full structure of a request - including the nested ordered task batch -
//! into a single 32-byte message for the agent to sign. Each task is hashed
//! individually, the sequence is hashed as an ordered list, and the request
//! struct hash folds that in, so no task can be added, removed, or reordered
//! without invalidating the signature.
//!
//! The construction follows the EIP-712 scheme the original signer uses;
//! digests are bit-compatible for amounts and nonces below 2^128.

use crate::{keccak256, keccak256_all};
use custodia_types::{Address, Task, WithdrawalRequest};
use serde::{Deserialize, Serialize};

/// Type string for the domain separator
const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Type string for a task (referenced by the request type)
const TASK_TYPE: &str = "Task(uint8 taskType,address user,uint32 coinId,uint256 amount,uint256 nonce)";

/// Type string for a withdrawal request, with the nested Task type appended
const REQUEST_TYPE: &str = "WithdrawalRequest(address user,uint32 coinId,uint256 amount,uint256 nonce,Task[] tasks)Task(uint8 taskType,address user,uint32 coinId,uint256 amount,uint256 nonce)";

/// The signing domain: contract and chain identity mixed into every digest
///
/// Rotating any field (a redeploy, a different chain) invalidates all
/// previously signed requests, independent of nonce state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningDomain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl SigningDomain {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    /// The domain separator hash
    pub fn separator(&self) -> [u8; 32] {
        keccak256_all(&[
            &keccak256(DOMAIN_TYPE.as_bytes()),
            &keccak256(self.name.as_bytes()),
            &keccak256(self.version.as_bytes()),
            &word_u64(self.chain_id),
            &word_address(&self.verifying_contract),
        ])
    }
}

/// Hash a single task struct
pub fn task_struct_hash(task: &Task) -> [u8; 32] {
    keccak256_all(&[
        &keccak256(TASK_TYPE.as_bytes()),
        &word_u8(task.kind.as_u8()),
        &word_address(&task.user),
        &word_u32(task.coin_id.0),
        &word_u128(task.amount.raw()),
        &word_u64(task.nonce),
    ])
}

/// Hash the ordered task sequence: the Keccak of the concatenated per-task
/// struct hashes
pub fn tasks_hash(tasks: &[Task]) -> [u8; 32] {
    let hashes: Vec<[u8; 32]> = tasks.iter().map(task_struct_hash).collect();
    let slices: Vec<&[u8]> = hashes.iter().map(|h| h.as_slice()).collect();
    keccak256_all(&slices)
}

/// Hash the full request struct, task batch included
pub fn request_struct_hash(request: &WithdrawalRequest) -> [u8; 32] {
    keccak256_all(&[
        &keccak256(REQUEST_TYPE.as_bytes()),
        &word_address(&request.user),
        &word_u32(request.coin_id.0),
        &word_u128(request.amount.raw()),
        &word_u64(request.nonce),
        &tasks_hash(&request.tasks),
    ])
}

/// The final digest the agent signs: `keccak256(0x1901 ‖ domain ‖ struct)`
pub fn request_digest(domain: &SigningDomain, request: &WithdrawalRequest) -> [u8; 32] {
    keccak256_all(&[
        &[0x19, 0x01],
        &domain.separator(),
        &request_struct_hash(request),
    ])
}

// 32-byte big-endian words for the struct encoding

fn word_u8(value: u8) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[31] = value;
    word
}

fn word_u32(value: u32) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[28..].copy_from_slice(&value.to_be_bytes());
    word
}

fn word_u64(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

fn word_u128(value: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

fn word_address(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}
