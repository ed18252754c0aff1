use std::path::PathBuf;

use ethers::types::{Address, H160, U256};
use hex_literal::hex;
use serde::{Deserialize, Serialize};

use crate::serde_utils::decimal_u256;

/// Messenger address of the source network for the default local deployment.
/// Depends on the deployment.
const LOCAL_SOURCE_MESSENGER: Address =
    H160(hex!("59b670e9fA9D0A427751Af201D676719a970857b"));

/// Predeployed on every destination network.
const DESTINATION_MESSENGER: Address =
    H160(hex!("4200000000000000000000000000000000000007"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_source_network")]
    pub source: NetworkConfig,
    #[serde(default = "default_destination_network")]
    pub destination: NetworkConfig,

    #[serde(default = "default_source_messenger")]
    pub source_messenger_address: Address,
    #[serde(default = "default_destination_messenger")]
    pub destination_messenger_address: Address,

    /// Applied to every transaction on the destination network.
    #[serde(default = "default_fee_override")]
    pub fee_override: Option<FeeOverride>,

    #[serde(default)]
    pub source_asset: SourceAssetConfig,
    #[serde(default)]
    pub destination_asset: DestinationAssetConfig,
    #[serde(default)]
    pub artifacts: ArtifactPaths,

    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeOverride {
    #[serde(with = "decimal_u256")]
    pub gas_price: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceAssetConfig {
    #[serde(with = "decimal_u256")]
    pub initial_supply: U256,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationAssetConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    pub source_asset: PathBuf,
    pub destination_asset: PathBuf,
    pub gateway: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: default_source_network(),
            destination: default_destination_network(),
            source_messenger_address: default_source_messenger(),
            destination_messenger_address: default_destination_messenger(),
            fee_override: default_fee_override(),
            source_asset: SourceAssetConfig::default(),
            destination_asset: DestinationAssetConfig::default(),
            artifacts: ArtifactPaths::default(),
            confirmations: default_confirmations(),
        }
    }
}

impl Default for SourceAssetConfig {
    fn default() -> Self {
        Self {
            initial_supply: U256::from(10000),
            name: "L1 ERC20".to_string(),
        }
    }
}

impl Default for DestinationAssetConfig {
    fn default() -> Self {
        Self {
            name: "L2 ERC20".to_string(),
        }
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            source_asset: PathBuf::from("artifacts/contracts/ERC20.sol/ERC20.json"),
            destination_asset: PathBuf::from(
                "artifacts-ovm/contracts/L2DepositedERC20.sol/L2DepositedERC20.json",
            ),
            gateway: PathBuf::from(
                "artifacts/contracts/OVM_L1ERC20Gateway.sol/OVM_L1ERC20Gateway.json",
            ),
        }
    }
}

fn default_source_network() -> NetworkConfig {
    NetworkConfig {
        rpc_url: "http://localhost:9545".to_string(),
    }
}

fn default_destination_network() -> NetworkConfig {
    NetworkConfig {
        rpc_url: "http://localhost:8545".to_string(),
    }
}

fn default_source_messenger() -> Address {
    LOCAL_SOURCE_MESSENGER
}

fn default_destination_messenger() -> Address {
    DESTINATION_MESSENGER
}

fn default_fee_override() -> Option<FeeOverride> {
    Some(FeeOverride {
        gas_price: U256::zero(),
    })
}

fn default_confirmations() -> usize {
    1
}
