use ethers::types::Address;
use tracing::instrument;

use crate::deployment::orchestrator::Orchestrator;
use crate::deployment::plan::{DeploymentStep, StepAction, StepArg};
use crate::error::DeploymentFailed;
use crate::manifest::DeployedArtifact;
use crate::network::NetworkClient;
use crate::types::{Network, StepId, TemplateKind};

/// Both assets must be confirmed before the gateway is submitted, even when
/// their addresses are passed in directly.
pub fn step(
    source_asset: impl Into<StepArg>,
    destination_asset: impl Into<StepArg>,
    source_messenger: Address,
) -> DeploymentStep {
    DeploymentStep {
        id: StepId::Gateway,
        name: "gateway".to_string(),
        network: Network::Source,
        template: TemplateKind::Gateway,
        action: StepAction::Deploy,
        args: vec![
            source_asset.into(),
            destination_asset.into(),
            StepArg::Address(source_messenger),
        ],
        requires: vec![StepId::SourceAsset, StepId::DestinationAsset],
        fee: None,
    }
}

#[instrument(name = "gateway", skip(orchestrator))]
pub async fn deploy<C: NetworkClient>(
    orchestrator: &mut Orchestrator<C>,
    source_asset: Address,
    destination_asset: Address,
    source_messenger: Address,
) -> Result<DeployedArtifact, DeploymentFailed> {
    let step = step(
        StepArg::bound(StepId::SourceAsset, source_asset),
        StepArg::bound(StepId::DestinationAsset, destination_asset),
        source_messenger,
    );

    orchestrator
        .execute_step(&step)
        .await?
        .into_artifact(StepId::Gateway)
}
