//! In-memory networks for exercising the orchestrator without a node.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ethers::types::{Address, H256};
use ethers::utils::keccak256;

use super::{
    Confirmation, NetworkClient, PendingTransaction, TransactionKind,
    TransactionRequest, TransactionStatus,
};
use crate::error::StepError;
use crate::types::Network;

/// Every mock chain gets its own address space so two fresh runs never
/// hand out the same contract address.
static CHAIN_SEED: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Reject,
    Revert,
    Disconnect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub network: Network,
    pub request: TransactionRequest,
}

#[derive(Debug, Default)]
struct Chain {
    seed: u64,
    nonce: u64,
    initialized: HashSet<Address>,
    outcomes: HashMap<H256, Confirmation>,
}

#[derive(Debug, Default)]
struct Shared {
    journal: Vec<Submission>,
    confirmations: Vec<H256>,
    /// Failure injected at the given 1-based submission index across both networks
    failure: Option<(usize, Failure)>,
}

#[derive(Debug, Clone)]
pub struct MockClient {
    network: Network,
    chain: Arc<Mutex<Chain>>,
    shared: Arc<Mutex<Shared>>,
}

/// A source and a destination chain sharing one submission journal.
#[derive(Debug, Clone)]
pub struct MockNetwork {
    pub source: MockClient,
    pub destination: MockClient,
    shared: Arc<Mutex<Shared>>,
}

impl MockNetwork {
    pub fn new() -> Self {
        let shared = Arc::new(Mutex::new(Shared::default()));

        let chain = |network| MockClient {
            network,
            chain: Arc::new(Mutex::new(Chain {
                seed: CHAIN_SEED.fetch_add(1, Ordering::SeqCst),
                ..Default::default()
            })),
            shared: shared.clone(),
        };

        Self {
            source: chain(Network::Source),
            destination: chain(Network::Destination),
            shared: shared.clone(),
        }
    }

    pub fn failing_at(self, submission: usize, failure: Failure) -> Self {
        self.shared.lock().unwrap().failure = Some((submission, failure));
        self
    }

    pub fn journal(&self) -> Vec<Submission> {
        self.shared.lock().unwrap().journal.clone()
    }

    pub fn confirmed(&self) -> usize {
        self.shared.lock().unwrap().confirmations.len()
    }
}

impl MockClient {
    fn next_hash(chain: &mut Chain, network: Network) -> H256 {
        chain.nonce += 1;

        let mut preimage = Vec::new();
        preimage.extend_from_slice(&chain.seed.to_be_bytes());
        preimage.extend_from_slice(&chain.nonce.to_be_bytes());
        preimage.extend_from_slice(network.to_string().as_bytes());

        H256(keccak256(preimage))
    }
}

#[async_trait]
impl NetworkClient for MockClient {
    fn network(&self) -> Network {
        self.network
    }

    async fn submit(
        &self,
        request: TransactionRequest,
    ) -> Result<PendingTransaction, StepError> {
        let failure = {
            let mut shared = self.shared.lock().unwrap();
            shared.journal.push(Submission {
                network: self.network,
                request: request.clone(),
            });

            let index = shared.journal.len();
            shared
                .failure
                .filter(|(at, _)| *at == index)
                .map(|(_, failure)| failure)
        };

        if failure == Some(Failure::Reject) {
            return Err(StepError::SubmissionRejected(
                "insufficient funds for gas * price + value".to_string(),
            ));
        }

        let mut chain = self.chain.lock().unwrap();
        let transaction_hash = Self::next_hash(&mut chain, self.network);

        let confirmation = match (failure, request.kind) {
            (Some(Failure::Revert), _) => Confirmation {
                transaction_hash,
                contract_address: None,
                status: TransactionStatus::Reverted,
            },
            (Some(Failure::Disconnect), _) => {
                // Accepted, but the outcome is never observed
                return Ok(PendingTransaction {
                    network: self.network,
                    transaction_hash,
                    kind: request.kind,
                });
            }
            (_, TransactionKind::Deploy) => Confirmation {
                transaction_hash,
                contract_address: Some(Address::from(transaction_hash)),
                status: TransactionStatus::Success,
            },
            // Contracts accept exactly one initialization
            (_, TransactionKind::Call { to }) => Confirmation {
                transaction_hash,
                contract_address: None,
                status: if chain.initialized.insert(to) {
                    TransactionStatus::Success
                } else {
                    TransactionStatus::Reverted
                },
            },
        };

        chain.outcomes.insert(transaction_hash, confirmation);

        Ok(PendingTransaction {
            network: self.network,
            transaction_hash,
            kind: request.kind,
        })
    }

    async fn await_confirmation(
        &self,
        pending: &PendingTransaction,
    ) -> Result<Confirmation, StepError> {
        let confirmation = self
            .chain
            .lock()
            .unwrap()
            .outcomes
            .get(&pending.transaction_hash)
            .cloned()
            .ok_or_else(|| {
                StepError::ConfirmationFailed("connection lost".to_string())
            })?;

        self.shared
            .lock()
            .unwrap()
            .confirmations
            .push(confirmation.transaction_hash);

        Ok(confirmation)
    }
}
