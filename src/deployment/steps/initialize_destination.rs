use ethers::types::Address;
use tracing::instrument;

use crate::config::FeeOverride;
use crate::deployment::orchestrator::Orchestrator;
use crate::deployment::plan::{DeploymentStep, StepAction, StepArg};
use crate::error::{DeploymentFailed, StepError};
use crate::manifest::{CallReceipt, DeployedArtifact};
use crate::network::NetworkClient;
use crate::types::{Network, StepId, TemplateKind};

pub const INIT_FUNCTION: &str = "init";

/// Links the deployed destination asset to its gateway. One-time, a second
/// call is reverted by the contract.
pub fn step(
    destination_asset: impl Into<StepArg>,
    gateway: impl Into<StepArg>,
    fee: Option<FeeOverride>,
) -> DeploymentStep {
    DeploymentStep {
        id: StepId::InitializeDestination,
        name: "destination asset".to_string(),
        network: Network::Destination,
        template: TemplateKind::DestinationAsset,
        action: StepAction::Call {
            target: destination_asset.into(),
            function: INIT_FUNCTION.to_string(),
        },
        args: vec![gateway.into()],
        requires: vec![StepId::DestinationAsset, StepId::Gateway],
        fee,
    }
}

#[instrument(name = "initialize_destination", skip(orchestrator))]
pub async fn initialize<C: NetworkClient>(
    orchestrator: &mut Orchestrator<C>,
    destination_asset: &DeployedArtifact,
    gateway: Address,
    fee: Option<FeeOverride>,
) -> Result<CallReceipt, DeploymentFailed> {
    if destination_asset.network != Network::Destination {
        return Err(orchestrator.abort(
            StepId::InitializeDestination,
            StepError::PreconditionUnmet(format!(
                "destination asset {:?} lives on the {} network",
                destination_asset.address, destination_asset.network
            )),
        ));
    }

    let step = step(
        StepArg::bound(StepId::DestinationAsset, destination_asset.address),
        StepArg::bound(StepId::Gateway, gateway),
        fee,
    );

    orchestrator
        .execute_step(&step)
        .await?
        .into_receipt(StepId::InitializeDestination)
}
