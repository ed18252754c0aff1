use std::collections::BTreeMap;

use ethers::abi::Token;
use ethers::types::{Address, H256};
use tracing::{debug, info, instrument};

use super::plan::{DeploymentPlan, DeploymentStep, StepAction, StepArg};
use crate::error::{DeploymentFailed, StepError};
use crate::manifest::{
    CallReceipt, DeployedArtifact, Manifest, ManifestRecorder,
};
use crate::network::{
    NetworkClient, TransactionKind, TransactionRequest, TransactionStatus,
};
use crate::template::Templates;
use crate::types::{Network, StepId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutput {
    Deployed(DeployedArtifact),
    Called(CallReceipt),
}

impl StepOutput {
    /// The deployed contract, or the contract a call went to.
    pub fn address(&self) -> Address {
        match self {
            Self::Deployed(artifact) => artifact.address,
            Self::Called(receipt) => receipt.target,
        }
    }

    pub fn into_artifact(
        self,
        step: StepId,
    ) -> Result<DeployedArtifact, DeploymentFailed> {
        match self {
            Self::Deployed(artifact) => Ok(artifact),
            Self::Called(_) => Err(DeploymentFailed::new(
                step,
                StepError::ConfirmationFailed(
                    "step confirmed a call, not a deployment".to_string(),
                ),
            )),
        }
    }

    pub fn into_receipt(
        self,
        step: StepId,
    ) -> Result<CallReceipt, DeploymentFailed> {
        match self {
            Self::Called(receipt) => Ok(receipt),
            Self::Deployed(_) => Err(DeploymentFailed::new(
                step,
                StepError::ConfirmationFailed(
                    "step confirmed a deployment, not a call".to_string(),
                ),
            )),
        }
    }
}

/// The line logged once `step` is confirmed.
pub fn completion_line(step: &DeploymentStep, output: &StepOutput) -> String {
    match output {
        StepOutput::Deployed(artifact) => {
            format!("{} contract address: {:?}", step.name, artifact.address)
        }
        StepOutput::Called(receipt) => format!(
            "{} initialized in transaction {:?}",
            step.name, receipt.transaction_hash
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepState {
    #[default]
    Unsubmitted,
    Submitted(H256),
    Confirmed,
    Failed,
}

/// Confirmed is terminal, nothing moves a step out of it.
fn transition(
    states: &mut BTreeMap<StepId, StepState>,
    step: StepId,
    next: StepState,
) {
    let state = states.entry(step).or_default();

    if *state != StepState::Confirmed {
        *state = next;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Running,
    Completed,
    Aborted(StepId),
}

/// Runs deployment steps one at a time against the source and destination
/// networks. The first failure aborts the pipeline for good.
#[derive(Debug)]
pub struct Orchestrator<C> {
    source: C,
    destination: C,
    templates: Templates,
    outputs: BTreeMap<StepId, StepOutput>,
    states: BTreeMap<StepId, StepState>,
    pipeline: PipelineState,
    manifest: Manifest,
    recorder: Option<ManifestRecorder>,
}

impl<C: NetworkClient> Orchestrator<C> {
    pub fn new(source: C, destination: C, templates: Templates) -> Self {
        Self {
            source,
            destination,
            templates,
            outputs: BTreeMap::new(),
            states: BTreeMap::new(),
            pipeline: PipelineState::default(),
            manifest: Manifest::default(),
            recorder: None,
        }
    }

    /// Persist the manifest after every confirmed step.
    pub fn with_recorder(mut self, recorder: ManifestRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn state(&self, step: StepId) -> StepState {
        self.states.get(&step).copied().unwrap_or_default()
    }

    pub fn pipeline_state(&self) -> PipelineState {
        self.pipeline
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub async fn run_plan(
        &mut self,
        plan: &DeploymentPlan,
    ) -> Result<Manifest, DeploymentFailed> {
        for step in plan.steps() {
            self.execute_step(step).await?;
        }

        self.pipeline = PipelineState::Completed;
        info!("Deployment complete");

        Ok(self.manifest.clone())
    }

    #[instrument(name = "step", skip_all, fields(step = %step.id))]
    pub async fn execute_step(
        &mut self,
        step: &DeploymentStep,
    ) -> Result<StepOutput, DeploymentFailed> {
        if let PipelineState::Aborted(failed) = self.pipeline {
            return Err(DeploymentFailed::new(
                step.id,
                StepError::PreconditionUnmet(format!(
                    "pipeline was aborted at {failed}"
                )),
            ));
        }

        // Calls are sent again so the contract decides, deployments are not
        if step.action == StepAction::Deploy
            && self.state(step.id) == StepState::Confirmed
        {
            return Err(DeploymentFailed::new(
                step.id,
                StepError::PreconditionUnmet(format!(
                    "{} is already deployed",
                    step.id
                )),
            ));
        }

        info!("{}", step.progress_line());

        match self.submit_and_confirm(step).await {
            Ok(output) => {
                transition(&mut self.states, step.id, StepState::Confirmed);
                self.outputs.insert(step.id, output);
                self.manifest.record(step.id, output);

                info!(
                    address = ?output.address(),
                    "{}",
                    completion_line(step, &output)
                );

                if let Some(recorder) = self.recorder.as_ref() {
                    if let Err(err) = recorder.write(&self.manifest).await {
                        return Err(self.abort(
                            step.id,
                            StepError::Persistence(format!("{err:#}")),
                        ));
                    }
                }

                Ok(output)
            }
            Err(err) => Err(self.abort(step.id, err)),
        }
    }

    /// Stops the pipeline at `step`. A step only fails once it reached the
    /// network, confirmed steps stay confirmed.
    pub(crate) fn abort(
        &mut self,
        step: StepId,
        err: StepError,
    ) -> DeploymentFailed {
        debug!(%step, error = %err, "Aborting pipeline");

        if let StepState::Submitted(_) = self.state(step) {
            transition(&mut self.states, step, StepState::Failed);
        }

        if !matches!(self.pipeline, PipelineState::Aborted(_)) {
            self.pipeline = PipelineState::Aborted(step);
        }

        DeploymentFailed::new(step, err)
    }

    async fn submit_and_confirm(
        &mut self,
        step: &DeploymentStep,
    ) -> Result<StepOutput, StepError> {
        for dependency in step.dependencies() {
            if !self.outputs.contains_key(&dependency) {
                return Err(StepError::PreconditionUnmet(format!(
                    "{} requires {dependency} to be confirmed first",
                    step.id
                )));
            }
        }

        let args = step
            .args
            .iter()
            .map(|arg| self.resolve(arg))
            .collect::<Result<Vec<_>, _>>()?;

        let template = self.templates.get(step.template);

        let (kind, data) = match &step.action {
            StepAction::Deploy => {
                let data = template.encode_deploy(&args).map_err(|err| {
                    StepError::SubmissionRejected(format!(
                        "encoding constructor arguments for {template}: {err}"
                    ))
                })?;
                (TransactionKind::Deploy, data)
            }
            StepAction::Call { target, function } => {
                let to = self.resolve_address(target)?;
                let data =
                    template.encode_call(function, &args).map_err(|err| {
                        StepError::SubmissionRejected(format!(
                            "encoding {template}.{function} arguments: {err}"
                        ))
                    })?;
                (TransactionKind::Call { to }, data)
            }
        };

        let client = match step.network {
            Network::Source => &self.source,
            Network::Destination => &self.destination,
        };

        if client.network() != step.network {
            return Err(StepError::PreconditionUnmet(format!(
                "{} targets the {} network but its client is bound to {}",
                step.id,
                step.network,
                client.network()
            )));
        }

        let submitted = client
            .submit(TransactionRequest {
                kind,
                data,
                fee: step.fee,
            })
            .await;

        let pending = match submitted {
            Ok(pending) => pending,
            Err(err) => {
                // Rejected by the network, the step was attempted
                transition(&mut self.states, step.id, StepState::Failed);
                return Err(err);
            }
        };

        transition(
            &mut self.states,
            step.id,
            StepState::Submitted(pending.transaction_hash),
        );
        debug!(transaction_hash = ?pending.transaction_hash, "Awaiting confirmation");

        let confirmation = client.await_confirmation(&pending).await?;

        if confirmation.status != TransactionStatus::Success {
            return Err(StepError::ConfirmationFailed(format!(
                "transaction {:?} reverted",
                confirmation.transaction_hash
            )));
        }

        let output = match pending.kind {
            TransactionKind::Deploy => {
                let address = confirmation.contract_address.ok_or_else(|| {
                    StepError::ConfirmationFailed(format!(
                        "receipt of {:?} carries no contract address",
                        confirmation.transaction_hash
                    ))
                })?;

                StepOutput::Deployed(DeployedArtifact::new(
                    pending.network,
                    address,
                    &confirmation,
                ))
            }
            TransactionKind::Call { to } => StepOutput::Called(CallReceipt {
                network: pending.network,
                target: to,
                transaction_hash: confirmation.transaction_hash,
            }),
        };

        Ok(output)
    }

    fn artifact(&self, step: StepId) -> Result<&DeployedArtifact, StepError> {
        match self.outputs.get(&step) {
            Some(StepOutput::Deployed(artifact)) => Ok(artifact),
            Some(StepOutput::Called(_)) => Err(StepError::PreconditionUnmet(
                format!("{step} did not deploy a contract"),
            )),
            None => Err(StepError::PreconditionUnmet(format!(
                "{step} has not been confirmed yet"
            ))),
        }
    }

    fn resolve_address(&self, arg: &StepArg) -> Result<Address, StepError> {
        match arg {
            StepArg::Address(address) => Ok(*address),
            StepArg::Output(step) => Ok(self.artifact(*step)?.address),
            StepArg::Bound(step, address) => {
                let deployed = self.artifact(*step)?.address;
                if deployed != *address {
                    return Err(StepError::PreconditionUnmet(format!(
                        "{address:?} is not the contract {step} deployed ({deployed:?})"
                    )));
                }
                Ok(deployed)
            }
            other => Err(StepError::SubmissionRejected(format!(
                "{other:?} is not an address"
            ))),
        }
    }

    fn resolve(&self, arg: &StepArg) -> Result<Token, StepError> {
        let token = match arg {
            StepArg::Uint(value) => Token::Uint(*value),
            StepArg::String(value) => Token::String(value.clone()),
            StepArg::Address(_) | StepArg::Output(_) | StepArg::Bound(..) => {
                Token::Address(self.resolve_address(arg)?)
            }
        };

        Ok(token)
    }
}
