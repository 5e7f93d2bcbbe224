//! Summary stage: generate free prose for a document, outside the main run.
//!
//! The only stage of the secondary summary flow. Reads `input_document`;
//! writes `summary` and a terminal `message`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::collab::{CollabError, SummaryWriter};
use crate::graph::{Stage, StageId};
use crate::state::FlowState;

use super::DEFAULT_STAGE_TIMEOUT;

const SUCCESS_MESSAGE: &str = "Summary generated.";
const FAILURE_MESSAGE: &str =
    "Sorry, we could not generate a summary for your document. Please try again.";

/// Stage wrapping the summary collaborator.
pub struct SummaryStage {
    summarizer: Arc<dyn SummaryWriter>,
    timeout: Duration,
}

impl SummaryStage {
    pub fn new(summarizer: Arc<dyn SummaryWriter>) -> Self {
        Self {
            summarizer,
            timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }

    /// Overrides the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn call(&self, state: &FlowState) -> Result<String, CollabError> {
        let document = state
            .input_document
            .as_ref()
            .ok_or_else(|| CollabError::Malformed("no document to summarize".to_string()))?;
        tokio::time::timeout(self.timeout, self.summarizer.summarize(document))
            .await
            .unwrap_or(Err(CollabError::Timeout))
    }
}

#[async_trait]
impl Stage<FlowState> for SummaryStage {
    fn id(&self) -> StageId {
        StageId::Summary
    }

    async fn run(&self, mut state: FlowState) -> FlowState {
        match self.call(&state).await {
            Ok(summary) => {
                state.summary = Some(summary);
                state.message = SUCCESS_MESSAGE.to_string();
            }
            Err(error) => {
                warn!(stage = %self.id(), %error, "collaborator call failed");
                state.summary = None;
                state.message = FAILURE_MESSAGE.to_string();
            }
        }
        state
    }
}
