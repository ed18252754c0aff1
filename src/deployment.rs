use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::cli::Args;
use crate::config::Config;
use crate::manifest::{Manifest, ManifestRecorder, MANIFEST_PATH};
use crate::network::EthersClient;
use crate::serde_utils;
use crate::template::Templates;
use crate::types::Network;

pub mod orchestrator;
pub mod plan;
pub mod steps;

pub use self::orchestrator::{
    Orchestrator, PipelineState, StepOutput, StepState,
};
pub use self::plan::{DeploymentPlan, DeploymentStep, StepAction, StepArg};

pub async fn load_config(args: &Args) -> eyre::Result<Config> {
    let mut config: Config = serde_utils::read_deserialize(&args.config).await?;

    if let Some(rpc_url) = args.source_rpc_url.as_ref() {
        config.source.rpc_url = rpc_url.to_string();
    }

    if let Some(rpc_url) = args.destination_rpc_url.as_ref() {
        config.destination.rpc_url = rpc_url.to_string();
    }

    Ok(config)
}

/// Artifact paths in the config are relative to the config file.
fn config_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

#[instrument(skip_all, fields(deployment = %args.deployment_name))]
pub async fn run_deployment(args: Args) -> eyre::Result<()> {
    let config = load_config(&args).await?;

    let templates =
        Templates::load(&config.artifacts, config_dir(&args.config)).await?;

    let plan = DeploymentPlan::bridge(&config)?;

    if args.dry_run {
        print_plan(&plan, &templates);
        return Ok(());
    }

    let deployment_dir = PathBuf::from(&args.deployment_name);
    let manifest_path = deployment_dir.join(MANIFEST_PATH);

    // Every run deploys fresh contracts, an existing manifest means this
    // deployment already happened (or partially happened)
    if manifest_path.exists() {
        eyre::bail!(
            "Deployment {} already has a manifest at {}, choose a new deployment name",
            args.deployment_name,
            manifest_path.display()
        );
    }

    tokio::fs::create_dir_all(&deployment_dir).await?;

    let source = EthersClient::connect(
        Network::Source,
        &config.source.rpc_url,
        &args.private_key,
        config.confirmations,
    )
    .await?;
    let destination = EthersClient::connect(
        Network::Destination,
        &config.destination.rpc_url,
        &args.private_key,
        config.confirmations,
    )
    .await?;

    let mut orchestrator = Orchestrator::new(source, destination, templates)
        .with_recorder(ManifestRecorder::new(&deployment_dir, config));

    let manifest = orchestrator.run_plan(&plan).await?;

    info!(path = %manifest_path.display(), "Manifest written");
    print_summary(&manifest);

    Ok(())
}

fn print_plan(plan: &DeploymentPlan, templates: &Templates) {
    println!("Deployment plan:");
    for (ordinal, step) in plan.steps().iter().enumerate() {
        println!(
            "  {}. {} [{}]",
            ordinal + 1,
            step,
            templates.get(step.template)
        );
    }
}

fn print_summary(manifest: &Manifest) {
    println!("Bridge deployed:");
    if let Some(artifact) = manifest.source_asset.as_ref() {
        println!("  Source asset:      {:?}", artifact.address);
    }
    if let Some(artifact) = manifest.destination_asset.as_ref() {
        println!("  Destination asset: {:?}", artifact.address);
    }
    if let Some(artifact) = manifest.gateway.as_ref() {
        println!("  Gateway:           {:?}", artifact.address);
    }
    if let Some(receipt) = manifest.destination_initialization.as_ref() {
        println!("  Initialization tx: {:?}", receipt.transaction_hash);
    }
}
