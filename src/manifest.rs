use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::deployment::StepOutput;
use crate::serde_utils;
use crate::types::StepId;

pub mod artifact;

pub use self::artifact::{CallReceipt, DeployedArtifact};

pub const MANIFEST_PATH: &str = "manifest.yml";

/// Everything a later process needs to find the bridge contracts.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    #[serde(default)]
    pub source_asset: Option<DeployedArtifact>,

    #[serde(default)]
    pub destination_asset: Option<DeployedArtifact>,

    #[serde(default)]
    pub gateway: Option<DeployedArtifact>,

    #[serde(default)]
    pub destination_initialization: Option<CallReceipt>,
}

/// The manifest together with the configuration that produced it.
#[derive(Clone, Debug, Serialize)]
pub struct ManifestFile<'a> {
    pub config: &'a Config,
    #[serde(flatten)]
    pub manifest: &'a Manifest,
}

/// Writes the manifest file of one deployment directory.
#[derive(Debug, Clone)]
pub struct ManifestRecorder {
    path: PathBuf,
    config: Config,
}

impl ManifestRecorder {
    pub fn new(deployment_dir: impl AsRef<Path>, config: Config) -> Self {
        Self {
            path: deployment_dir.as_ref().join(MANIFEST_PATH),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, manifest: &Manifest) -> eyre::Result<()> {
        serde_utils::write_serialize(
            &self.path,
            ManifestFile {
                config: &self.config,
                manifest,
            },
        )
        .await?;

        debug!(path = %self.path.display(), "Manifest written");

        Ok(())
    }
}

impl Manifest {
    pub fn record(&mut self, step: StepId, output: StepOutput) {
        match (step, output) {
            (StepId::SourceAsset, StepOutput::Deployed(artifact)) => {
                self.source_asset = Some(artifact)
            }
            (StepId::DestinationAsset, StepOutput::Deployed(artifact)) => {
                self.destination_asset = Some(artifact)
            }
            (StepId::Gateway, StepOutput::Deployed(artifact)) => {
                self.gateway = Some(artifact)
            }
            (StepId::InitializeDestination, StepOutput::Called(receipt)) => {
                self.destination_initialization = Some(receipt)
            }
            (step, output) => {
                tracing::warn!(%step, ?output, "Step output has no manifest slot")
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.source_asset.is_some()
            && self.destination_asset.is_some()
            && self.gateway.is_some()
            && self.destination_initialization.is_some()
    }
}

#[cfg(test)]
mod tests {
    use ethers::types::{Address, H256};

    use super::*;
    use crate::types::Network;

    fn artifact(n: u64) -> DeployedArtifact {
        DeployedArtifact {
            network: Network::Source,
            address: Address::from_low_u64_be(n),
            transaction_hash: H256::from_low_u64_be(n),
        }
    }

    #[test]
    fn records_outputs_into_their_slots() {
        let mut manifest = Manifest::default();

        manifest.record(StepId::SourceAsset, StepOutput::Deployed(artifact(1)));
        manifest.record(StepId::Gateway, StepOutput::Deployed(artifact(3)));

        assert_eq!(manifest.source_asset, Some(artifact(1)));
        assert_eq!(manifest.destination_asset, None);
        assert_eq!(manifest.gateway, Some(artifact(3)));
        assert!(!manifest.is_complete());
    }

    #[test]
    fn mismatched_output_is_ignored() {
        let mut manifest = Manifest::default();

        manifest.record(
            StepId::InitializeDestination,
            StepOutput::Deployed(artifact(4)),
        );

        assert_eq!(manifest, Manifest::default());
    }

    #[test]
    fn file_flattens_artifacts_next_to_config() {
        let config = Config::default();
        let mut manifest = Manifest::default();
        manifest.record(StepId::SourceAsset, StepOutput::Deployed(artifact(1)));

        let yaml = serde_yaml::to_string(&ManifestFile {
            config: &config,
            manifest: &manifest,
        })
        .unwrap();

        assert!(yaml.contains("config:"));
        assert!(yaml.contains("source_asset:"));
        assert!(yaml.contains("network: source"));

        let read: Manifest = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(read, manifest);
    }

    #[tokio::test]
    async fn recorder_overwrites_with_latest_state() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let recorder = ManifestRecorder::new(dir.path(), Config::default());

        let mut manifest = Manifest::default();
        manifest.record(StepId::SourceAsset, StepOutput::Deployed(artifact(1)));
        recorder.write(&manifest).await?;

        manifest.record(StepId::Gateway, StepOutput::Deployed(artifact(3)));
        recorder.write(&manifest).await?;

        let read: Manifest =
            serde_utils::read_deserialize(recorder.path()).await?;
        assert_eq!(read, manifest);
        assert_eq!(recorder.path(), dir.path().join(MANIFEST_PATH));

        Ok(())
    }
}
