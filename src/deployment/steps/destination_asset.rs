use ethers::types::Address;
use tracing::instrument;

use crate::config::FeeOverride;
use crate::deployment::orchestrator::Orchestrator;
use crate::deployment::plan::{DeploymentStep, StepAction, StepArg};
use crate::error::DeploymentFailed;
use crate::manifest::DeployedArtifact;
use crate::network::NetworkClient;
use crate::types::{Network, StepId, TemplateKind};

/// The destination asset only knows the messenger at construction, the
/// gateway is linked later by [`super::initialize_destination`].
pub fn step(
    messenger: Address,
    name: &str,
    fee: Option<FeeOverride>,
) -> DeploymentStep {
    DeploymentStep {
        id: StepId::DestinationAsset,
        name: name.to_string(),
        network: Network::Destination,
        template: TemplateKind::DestinationAsset,
        action: StepAction::Deploy,
        args: vec![
            StepArg::Address(messenger),
            StepArg::String(name.to_string()),
        ],
        requires: vec![],
        fee,
    }
}

#[instrument(name = "destination_asset", skip(orchestrator))]
pub async fn deploy<C: NetworkClient>(
    orchestrator: &mut Orchestrator<C>,
    messenger: Address,
    name: &str,
    fee: Option<FeeOverride>,
) -> Result<DeployedArtifact, DeploymentFailed> {
    orchestrator
        .execute_step(&step(messenger, name, fee))
        .await?
        .into_artifact(StepId::DestinationAsset)
}
