use std::fmt;
use std::path::{Path, PathBuf};

use ethers::abi::{Abi, Token};
use ethers::types::Bytes;
use eyre::Context;
use serde::Deserialize;
use tracing::info;

use crate::config::ArtifactPaths;
use crate::types::TemplateKind;

/// A deployable contract: its interface and creation bytecode.
#[derive(Debug, Clone)]
pub struct ContractTemplate {
    pub name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

/// Compiler output as written by hardhat into `artifacts/`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompiledArtifact {
    #[serde(default)]
    contract_name: Option<String>,
    abi: Abi,
    bytecode: Bytes,
}

impl ContractTemplate {
    pub fn new(name: impl ToString, abi: Abi, bytecode: Bytes) -> Self {
        Self {
            name: name.to_string(),
            abi,
            bytecode,
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Reading artifact {}", path.display()))?;

        let artifact: CompiledArtifact = serde_json::from_str(&content)
            .with_context(|| format!("Parsing artifact {}", path.display()))?;

        if artifact.bytecode.is_empty() {
            eyre::bail!(
                "Artifact {} has no creation bytecode (abstract contract or interface?)",
                path.display()
            );
        }

        let name = artifact.contract_name.unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        Ok(Self::new(name, artifact.abi, artifact.bytecode))
    }

    /// Creation bytecode followed by the ABI encoded constructor arguments.
    pub fn encode_deploy(&self, args: &[Token]) -> Result<Bytes, ethers::abi::Error> {
        let code = self.bytecode.to_vec();

        let data = match self.abi.constructor() {
            Some(constructor) => constructor.encode_input(code, args)?,
            None if args.is_empty() => code,
            None => return Err(ethers::abi::Error::InvalidData),
        };

        Ok(data.into())
    }

    pub fn encode_call(
        &self,
        function_name: &str,
        args: &[Token],
    ) -> Result<Bytes, ethers::abi::Error> {
        let function = self.abi.function(function_name)?;

        Ok(function.encode_input(args)?.into())
    }
}

impl fmt::Display for ContractTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct Templates {
    pub source_asset: ContractTemplate,
    pub destination_asset: ContractTemplate,
    pub gateway: ContractTemplate,
}

impl Templates {
    pub async fn load(
        paths: &ArtifactPaths,
        base_dir: impl AsRef<Path>,
    ) -> eyre::Result<Self> {
        let base_dir = base_dir.as_ref();
        let resolve = |path: &PathBuf| base_dir.join(path);

        let templates = Self {
            source_asset: ContractTemplate::load(resolve(&paths.source_asset))
                .await?,
            destination_asset: ContractTemplate::load(resolve(
                &paths.destination_asset,
            ))
            .await?,
            gateway: ContractTemplate::load(resolve(&paths.gateway)).await?,
        };

        info!(
            source_asset = %templates.source_asset,
            destination_asset = %templates.destination_asset,
            gateway = %templates.gateway,
            "Loaded contract templates"
        );

        Ok(templates)
    }

    pub fn get(&self, kind: TemplateKind) -> &ContractTemplate {
        match kind {
            TemplateKind::SourceAsset => &self.source_asset,
            TemplateKind::DestinationAsset => &self.destination_asset,
            TemplateKind::Gateway => &self.gateway,
        }
    }
}

#[cfg(test)]
pub mod fixtures {
    use ethers::abi::parse_abi;

    use super::*;

    fn template(name: &str, abi: &[&str], code: &[u8]) -> ContractTemplate {
        ContractTemplate::new(
            name,
            parse_abi(abi).unwrap(),
            Bytes::from(code.to_vec()),
        )
    }

    /// Interfaces of the three bridge contracts with stand-in bytecode.
    pub fn bridge_templates() -> Templates {
        Templates {
            source_asset: template(
                "ERC20",
                &["constructor(uint256 _initialSupply, string _name)"],
                &[0x60, 0x80, 0x01],
            ),
            destination_asset: template(
                "L2DepositedERC20",
                &[
                    "constructor(address _l2CrossDomainMessenger, string _name)",
                    "function init(address _l1TokenGateway)",
                ],
                &[0x60, 0x80, 0x02],
            ),
            gateway: template(
                "OVM_L1ERC20Gateway",
                &["constructor(address _l1ERC20, address _l2DepositedERC20, address _l1messenger)"],
                &[0x60, 0x80, 0x03],
            ),
        }
    }
}
