//! Extraction stage: turn an unprocessed source reference into a document.
//!
//! Reads `input_source_ref`; on success moves the extracted document into
//! `input_document` and clears the source ref, so exactly one input field is
//! set afterwards. On rejection or failure it sets `passed_guardrail = false`
//! and a terminal `message`: the run ends immediately instead of running the
//! guardrail against absent data.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::collab::{CollabError, DocumentExtractor, Extraction};
use crate::graph::{Stage, StageId};
use crate::state::FlowState;

use super::DEFAULT_STAGE_TIMEOUT;

const FAILURE_MESSAGE: &str = "Sorry, we could not extract a valid clinical summary from your document. Please check your file and try again.";

/// Stage wrapping the extraction collaborator.
pub struct ExtractionStage {
    extractor: Arc<dyn DocumentExtractor>,
    timeout: Duration,
}

impl ExtractionStage {
    pub fn new(extractor: Arc<dyn DocumentExtractor>) -> Self {
        Self {
            extractor,
            timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }

    /// Overrides the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn call(&self, state: &FlowState) -> Result<Extraction, CollabError> {
        let source_ref = state
            .input_source_ref
            .as_deref()
            .ok_or_else(|| CollabError::Malformed("no source reference to extract".to_string()))?;
        tokio::time::timeout(self.timeout, self.extractor.extract(source_ref))
            .await
            .unwrap_or(Err(CollabError::Timeout))
    }
}

#[async_trait]
impl Stage<FlowState> for ExtractionStage {
    fn id(&self) -> StageId {
        StageId::Extraction
    }

    async fn run(&self, mut state: FlowState) -> FlowState {
        match self.call(&state).await {
            Ok(Extraction::Document(document)) => {
                state.input_document = Some(document);
                state.input_source_ref = None;
            }
            Ok(Extraction::Rejected { explanation }) => {
                state.passed_guardrail = false;
                state.message = explanation;
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
    use crate::collab::mock::MockExtractor;
    use serde_json::json;

    /// **Scenario**: Success moves the document in and clears the source ref,
    /// keeping the exactly-one-input invariant.
    #[tokio::test]
    async fn success_swaps_source_for_document() {
        let stage = ExtractionStage::new(Arc::new(MockExtractor::document(
            json!({"hpi": {"chief_complaint": "Chest pain"}}),
        )));
        let state = stage.run(FlowState::from_source_ref("/tmp/upload.txt")).await;
        assert!(state.input_document.is_some());
        assert!(state.input_source_ref.is_none());
        assert!(state.message.is_empty());
    }

    /// **Scenario**: Rejection ends the run with the rejection message and
    /// the guardrail flag at its failure default.
    #[tokio::test]
    async fn rejection_sets_terminal_message() {
        let stage = ExtractionStage::new(Arc::new(MockExtractor::reject(
            "The document does not appear to contain a clinical summary.",
        )));
        let state = stage.run(FlowState::from_source_ref("/tmp/notes.txt")).await;
        assert!(state.input_document.is_none());
        assert!(!state.passed_guardrail);
        assert_eq!(
            state.message,
            "The document does not appear to contain a clinical summary."
        );
    }

    /// **Scenario**: Collaborator failure behaves like rejection with apology.
    #[tokio::test]
    async fn failure_sets_defaults_and_apology() {
        let stage = ExtractionStage::new(Arc::new(MockExtractor::failing()));
        let state = stage.run(FlowState::from_source_ref("/tmp/upload.txt")).await;
        assert!(state.input_document.is_none());
        assert!(!state.passed_guardrail);
        assert_eq!(state.message, FAILURE_MESSAGE);
    }
}
