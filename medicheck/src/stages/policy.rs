//! Policy stage: does the summary meet the insurance approval criteria?
//!
//! Reads `input_document`; writes `policy_approved`, `failed_criteria`, and
//! always overwrites `message` — this is the last stage on the main path and
//! has no router.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::collab::{CollabError, PolicyEvaluator, PolicyVerdict};
use crate::graph::{Stage, StageId};
use crate::state::FlowState;

use super::DEFAULT_STAGE_TIMEOUT;

const FAILURE_MESSAGE: &str =
    "Sorry, we could not determine insurance eligibility. Please check your data and try again.";

/// Stage wrapping the policy-evaluation collaborator.
pub struct PolicyStage {
    policy: Arc<dyn PolicyEvaluator>,
    timeout: Duration,
}

impl PolicyStage {
    pub fn new(policy: Arc<dyn PolicyEvaluator>) -> Self {
        Self {
            policy,
            timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }

    /// Overrides the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn call(&self, state: &FlowState) -> Result<PolicyVerdict, CollabError> {
        let document = state
            .input_document
            .as_ref()
            .ok_or_else(|| CollabError::Malformed("no document to evaluate".to_string()))?;
        tokio::time::timeout(self.timeout, self.policy.evaluate(document))
            .await
            .unwrap_or(Err(CollabError::Timeout))
    }
}

#[async_trait]
impl Stage<FlowState> for PolicyStage {
    fn id(&self) -> StageId {
        StageId::Policy
    }

    async fn run(&self, mut state: FlowState) -> FlowState {
        match self.call(&state).await {
            Ok(verdict) => {
                state.policy_approved = verdict.approved;
                state.failed_criteria = verdict.failed_criteria;
                state.message = verdict.explanation;
            }
            Err(error) => {
                warn!(stage = %self.id(), %error, "collaborator call failed");
                state.policy_approved = false;
                state.message = FAILURE_MESSAGE.to_string();
            }
        }
        state
    }
}
