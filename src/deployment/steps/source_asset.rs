use ethers::types::U256;
use tracing::instrument;

use crate::deployment::orchestrator::Orchestrator;
use crate::deployment::plan::{DeploymentStep, StepAction, StepArg};
use crate::error::DeploymentFailed;
use crate::manifest::DeployedArtifact;
use crate::network::NetworkClient;
use crate::types::{Network, StepId, TemplateKind};

pub fn step(initial_supply: U256, name: &str) -> DeploymentStep {
    DeploymentStep {
        id: StepId::SourceAsset,
        name: name.to_string(),
        network: Network::Source,
        template: TemplateKind::SourceAsset,
        action: StepAction::Deploy,
        args: vec![
            StepArg::Uint(initial_supply),
            StepArg::String(name.to_string()),
        ],
        requires: vec![],
        fee: None,
    }
}

/// Deploys the original asset on the source network.
#[instrument(name = "source_asset", skip(orchestrator))]
pub async fn deploy<C: NetworkClient>(
    orchestrator: &mut Orchestrator<C>,
    initial_supply: U256,
    name: &str,
) -> Result<DeployedArtifact, DeploymentFailed> {
    orchestrator
        .execute_step(&step(initial_supply, name))
        .await?
        .into_artifact(StepId::SourceAsset)
}
