//! Validation stage: are the required clinical-summary fields present?
//!
//! Reads `input_document`; writes `is_structurally_valid`, `missing_fields`,
//! `suggestions`, and `message` when invalid or failed. The post-validation
//! router stops the run before policy evaluation when the flag is false.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::collab::{CollabError, FieldValidator, ValidationVerdict};
use crate::graph::{Stage, StageId};
use crate::state::FlowState;

use super::DEFAULT_STAGE_TIMEOUT;

const FAILURE_MESSAGE: &str =
    "Sorry, we could not validate your clinical summary. Please check your file and try again.";
const INVALID_FALLBACK_MESSAGE: &str = "Clinical summary is missing required fields.";

/// Stage wrapping the field-validation collaborator.
pub struct ValidationStage {
    validator: Arc<dyn FieldValidator>,
    timeout: Duration,
}

impl ValidationStage {
    pub fn new(validator: Arc<dyn FieldValidator>) -> Self {
        Self {
            validator,
            timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }

    /// Overrides the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn call(&self, state: &FlowState) -> Result<ValidationVerdict, CollabError> {
        let document = state
            .input_document
            .as_ref()
            .ok_or_else(|| CollabError::Malformed("no document to validate".to_string()))?;
        tokio::time::timeout(self.timeout, self.validator.validate(document))
            .await
            .unwrap_or(Err(CollabError::Timeout))
    }
}

#[async_trait]
impl Stage<FlowState> for ValidationStage {
    fn id(&self) -> StageId {
        StageId::Validation
    }

    async fn run(&self, mut state: FlowState) -> FlowState {
        match self.call(&state).await {
            Ok(verdict) => {
                state.is_structurally_valid = verdict.is_valid;
                state.missing_fields = verdict.missing_fields;
                state.suggestions = verdict.suggestions;
                if !state.is_structurally_valid {
                    state.message = if state.suggestions.is_empty() {
                        INVALID_FALLBACK_MESSAGE.to_string()
                    } else {
                        state.suggestions.join(" ")
                    };
                }
            }
            Err(error) => {
                warn!(stage = %self.id(), %error, "collaborator call failed");
                state.is_structurally_valid = false;
                state.message = FAILURE_MESSAGE.to_string();
            }
        }
        state
    }
}
