use thiserror::Error;

use crate::types::StepId;

/// Why a single step did not reach a confirmed state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepError {
    /// The network refused the transaction (malformed request, insufficient balance, ...)
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    /// The transaction was accepted but reverted or its confirmation could not be observed
    #[error("confirmation failed: {0}")]
    ConfirmationFailed(String),

    /// The step was invoked before an artifact it depends on existed
    #[error("precondition unmet: {0}")]
    PreconditionUnmet(String),

    /// The step was confirmed on chain but could not be recorded in the manifest
    #[error("recording manifest: {0}")]
    Persistence(String),
}

/// Terminal failure of the pipeline. Nothing past `step` is attempted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("deployment failed at step {step}")]
pub struct DeploymentFailed {
    pub step: StepId,
    #[source]
    pub source: StepError,
}

impl DeploymentFailed {
    pub fn new(step: StepId, source: StepError) -> Self {
        Self { step, source }
    }
}
