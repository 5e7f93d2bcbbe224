//! Guardrail stage: is this document an insurance clinical summary at all?
//!
//! Reads `input_document`; writes `passed_guardrail`, and `message` on
//! rejection or failure. The post-guardrail router short-circuits the run
//! when the flag is false.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::collab::{CollabError, GuardrailCheck, GuardrailVerdict};
use crate::graph::{Stage, StageId};
use crate::state::FlowState;

use super::DEFAULT_STAGE_TIMEOUT;

const FAILURE_MESSAGE: &str = "Sorry, we could not determine if your document is a clinical summary for insurance. Please check your file and try again.";

/// Stage wrapping the guardrail collaborator.
pub struct GuardrailStage {
    guardrail: Arc<dyn GuardrailCheck>,
    timeout: Duration,
}

impl GuardrailStage {
    pub fn new(guardrail: Arc<dyn GuardrailCheck>) -> Self {
        Self {
            guardrail,
            timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }

    /// Overrides the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn call(&self, state: &FlowState) -> Result<GuardrailVerdict, CollabError> {
        let document = state
            .input_document
            .as_ref()
            .ok_or_else(|| CollabError::Malformed("no document to check".to_string()))?;
        tokio::time::timeout(self.timeout, self.guardrail.check(document))
            .await
            .unwrap_or(Err(CollabError::Timeout))
    }
}

#[async_trait]
impl Stage<FlowState> for GuardrailStage {
    fn id(&self) -> StageId {
        StageId::Guardrail
    }

    async fn run(&self, mut state: FlowState) -> FlowState {
        match self.call(&state).await {
            Ok(verdict) => {
                state.passed_guardrail = verdict.is_in_domain;
                if !verdict.is_in_domain {
                    state.message = verdict.explanation;
                }
            }
            Err(error) => {
                warn!(stage = %self.id(), %error, "collaborator call failed");
                state.passed_guardrail = false;
                state.message = FAILURE_MESSAGE.to_string();
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::mock::MockGuardrail;
    use serde_json::json;

    /// **Scenario**: In-domain verdict sets the flag and leaves message alone.
    #[tokio::test]
    async fn pass_sets_flag_without_message() {
        let stage = GuardrailStage::new(Arc::new(MockGuardrail::approve()));
        let state = stage
            .run(FlowState::from_document(json!({"hpi": {}})))
            .await;
        assert!(state.passed_guardrail);
        assert!(state.message.is_empty());
    }

    /// **Scenario**: Rejection carries the collaborator's explanation as the message.
    #[tokio::test]
    async fn reject_sets_explanation_message() {
        let stage = GuardrailStage::new(Arc::new(MockGuardrail::reject(
            "This looks like a shopping list, not a clinical summary.",
        )));
        let state = stage.run(FlowState::from_document(json!({}))).await;
        assert!(!state.passed_guardrail);
        assert_eq!(
            state.message,
            "This looks like a shopping list, not a clinical summary."
        );
    }

    /// **Scenario**: Collaborator failure takes the failure default plus apology.
    #[tokio::test]
    async fn failure_sets_defaults_and_apology() {
        let stage = GuardrailStage::new(Arc::new(MockGuardrail::failing()));
        let state = stage.run(FlowState::from_document(json!({}))).await;
        assert!(!state.passed_guardrail);
        assert_eq!(state.message, FAILURE_MESSAGE);
    }

    /// **Scenario**: A hanging collaborator is cut off by the stage deadline
    /// and behaves exactly like any other failure.
    #[tokio::test]
    async fn timeout_behaves_like_failure() {
        let stage = GuardrailStage::new(Arc::new(MockGuardrail::hanging()))
            .with_timeout(Duration::from_millis(10));
        let state = stage.run(FlowState::from_document(json!({}))).await;
        assert!(!state.passed_guardrail);
        assert_eq!(state.message, FAILURE_MESSAGE);
    }
}
