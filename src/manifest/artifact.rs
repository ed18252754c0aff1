use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};

use crate::network::Confirmation;
use crate::types::Network;

/// A contract that exists on chain. Only ever built from a successful
/// confirmation.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct DeployedArtifact {
    pub network: Network,
    pub address: Address,
    pub transaction_hash: H256,
}

/// Acknowledgment of a confirmed state mutating call.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CallReceipt {
    pub network: Network,
    pub target: Address,
    pub transaction_hash: H256,
}

impl DeployedArtifact {
    pub fn new(network: Network, address: Address, confirmation: &Confirmation) -> Self {
        Self {
            network,
            address,
            transaction_hash: confirmation.transaction_hash,
        }
    }
}
