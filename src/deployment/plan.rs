use std::collections::{BTreeSet, HashMap};
use std::fmt;

use ethers::types::{Address, U256};

use super::steps::{
    destination_asset, gateway, initialize_destination, source_asset,
};
use crate::config::{Config, FeeOverride};
use crate::error::{DeploymentFailed, StepError};
use crate::types::{Network, StepId, TemplateKind};

/// A constructor or call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepArg {
    Uint(U256),
    String(String),
    Address(Address),
    /// Address of the contract deployed by an earlier step
    Output(StepId),
    /// Address handed in by the caller, which must be the one the given
    /// earlier step deployed
    Bound(StepId, Address),
}

impl StepArg {
    pub fn bound(step: StepId, address: Address) -> Self {
        Self::Bound(step, address)
    }
}

impl From<Address> for StepArg {
    fn from(value: Address) -> Self {
        Self::Address(value)
    }
}

impl From<StepId> for StepArg {
    fn from(value: StepId) -> Self {
        Self::Output(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    Deploy,
    Call { target: StepArg, function: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentStep {
    pub id: StepId,
    pub name: String,
    pub network: Network,
    pub template: TemplateKind,
    pub action: StepAction,
    pub args: Vec<StepArg>,
    /// Steps that must be confirmed before this one is submitted, on top of
    /// the ones referenced through [`StepArg::Output`] and [`StepArg::Bound`]
    pub requires: Vec<StepId>,
    pub fee: Option<FeeOverride>,
}

impl DeploymentStep {
    pub fn named(mut self, name: impl ToString) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn dependencies(&self) -> BTreeSet<StepId> {
        let target = match &self.action {
            StepAction::Deploy => None,
            StepAction::Call { target, .. } => Some(target),
        };

        let outputs = self.args.iter().chain(target).filter_map(|arg| match arg {
            StepArg::Output(id) | StepArg::Bound(id, _) => Some(*id),
            _ => None,
        });

        self.requires.iter().copied().chain(outputs).collect()
    }

    pub fn progress_line(&self) -> String {
        match &self.action {
            StepAction::Deploy => format!("Deploying {}...", self.name),
            StepAction::Call { function, .. } if function == "init" => {
                format!("Initializing {}...", self.name)
            }
            StepAction::Call { function, .. } => {
                format!("Calling {function} on {}...", self.name)
            }
        }
    }
}

impl fmt::Display for DeploymentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            StepAction::Deploy => write!(
                f,
                "{}: deploy {} ({}) on {}",
                self.id, self.name, self.template, self.network
            )?,
            StepAction::Call { function, .. } => write!(
                f,
                "{}: call {function} on {} ({}) on {}",
                self.id, self.name, self.template, self.network
            )?,
        }

        let dependencies = self.dependencies();
        if !dependencies.is_empty() {
            let names: Vec<_> =
                dependencies.iter().map(ToString::to_string).collect();
            write!(f, ", after {}", names.join(", "))?;
        }

        Ok(())
    }
}

/// Steps in execution order. Every dependency of a step is scheduled
/// strictly before it.
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    steps: Vec<DeploymentStep>,
}

impl DeploymentPlan {
    pub fn new(steps: Vec<DeploymentStep>) -> Result<Self, DeploymentFailed> {
        let mut position = HashMap::new();

        for (index, step) in steps.iter().enumerate() {
            if position.insert(step.id, index).is_some() {
                return Err(DeploymentFailed::new(
                    step.id,
                    StepError::PreconditionUnmet(format!(
                        "{} is scheduled more than once",
                        step.id
                    )),
                ));
            }
        }

        for (index, step) in steps.iter().enumerate() {
            for dependency in step.dependencies() {
                let scheduled_before = position
                    .get(&dependency)
                    .is_some_and(|&at| at < index);

                if !scheduled_before {
                    return Err(DeploymentFailed::new(
                        step.id,
                        StepError::PreconditionUnmet(format!(
                            "{} depends on {dependency}, which is not scheduled before it",
                            step.id
                        )),
                    ));
                }
            }
        }

        Ok(Self { steps })
    }

    /// The standard four step bridge deployment.
    pub fn bridge(config: &Config) -> Result<Self, DeploymentFailed> {
        Self::new(vec![
            source_asset::step(
                config.source_asset.initial_supply,
                &config.source_asset.name,
            ),
            destination_asset::step(
                config.destination_messenger_address,
                &config.destination_asset.name,
                config.fee_override,
            ),
            gateway::step(
                StepId::SourceAsset,
                StepId::DestinationAsset,
                config.source_messenger_address,
            )
            .named(format!("{} Gateway", config.source_asset.name)),
            initialize_destination::step(
                StepId::DestinationAsset,
                StepId::Gateway,
                config.fee_override,
            )
            .named(&config.destination_asset.name),
        ])
    }

    pub fn steps(&self) -> &[DeploymentStep] {
        &self.steps
    }
}
