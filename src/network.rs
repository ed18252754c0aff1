use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256};

use crate::config::FeeOverride;
use crate::error::StepError;
use crate::types::Network;

pub mod ethers_client;
#[cfg(test)]
pub mod mock;

pub use self::ethers_client::EthersClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Contract creation, data is creation bytecode plus constructor args
    Deploy,
    /// State mutating call against an existing contract
    Call { to: Address },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub kind: TransactionKind,
    pub data: Bytes,
    pub fee: Option<FeeOverride>,
}

/// A submitted transaction that has not reached a terminal state yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub network: Network,
    pub transaction_hash: H256,
    pub kind: TransactionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Success,
    Reverted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub transaction_hash: H256,
    pub contract_address: Option<Address>,
    pub status: TransactionStatus,
}

/// A signing identity bound to exactly one network.
///
/// Timeouts are the implementation's business, callers wait for as long as
/// `await_confirmation` takes.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    fn network(&self) -> Network;

    async fn submit(
        &self,
        request: TransactionRequest,
    ) -> Result<PendingTransaction, StepError>;

    async fn await_confirmation(
        &self,
        pending: &PendingTransaction,
    ) -> Result<Confirmation, StepError>;
}
