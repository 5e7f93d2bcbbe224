//! The two prebuilt flows and the [`Pipeline`] facade.
//!
//! Main validation flow (entry picks the branch by input shape):
//!
//! ```text
//! entry ──source ref──► extraction ──document──► guardrail ──passed──► validation ──valid──► policy ──► end
//!   │                       │                        │                     │
//!   └──document────────────►│                        └──► end              └──► end
//!                           └──► end
//! ```
//!
//! The secondary summary flow is a single stage, invoked independently and
//! sharing only the state shape. Both graphs are built once at process start
//! and shared immutably across concurrent runs.

use std::sync::Arc;

use serde_json::Value;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use crate::collab::{
    DocumentExtractor, FieldValidator, GuardrailCheck, PolicyEvaluator, SummaryWriter,
};
use crate::error::FlowError;
use crate::graph::{BuildError, CompiledFlow, FlowGraph, Next, StageId};
use crate::stages::{
    ExtractionStage, GuardrailStage, PolicyStage, SummaryStage, ValidationStage,
};
use crate::state::FlowState;
use crate::stream::FlowEvent;

/// The five external services the stages call.
pub struct Collaborators {
    pub guardrail: Arc<dyn GuardrailCheck>,
    pub validator: Arc<dyn FieldValidator>,
    pub policy: Arc<dyn PolicyEvaluator>,
    pub extractor: Arc<dyn DocumentExtractor>,
    pub summarizer: Arc<dyn SummaryWriter>,
}

/// Entry: a pending source ref goes through extraction first; an
/// already-structured document goes straight to the guardrail.
fn entry_router(state: &FlowState) -> Next {
    if state.input_source_ref.is_some() {
        Next::Stage(StageId::Extraction)
    } else {
        Next::Stage(StageId::Guardrail)
    }
}

/// After extraction: a document means success, continue to the guardrail;
/// otherwise extraction already wrote the terminal rejection.
fn extraction_router(state: &FlowState) -> Next {
    if state.input_document.is_some() {
        Next::Stage(StageId::Guardrail)
    } else {
        Next::End
    }
}

/// After the guardrail: a rejected document short-circuits the run.
fn guardrail_router(state: &FlowState) -> Next {
    if state.passed_guardrail {
        Next::Stage(StageId::Validation)
    } else {
        Next::End
    }
}

/// After validation: policy is only evaluated against complete data.
fn validation_router(state: &FlowState) -> Next {
    if state.is_structurally_valid {
        Next::Stage(StageId::Policy)
    } else {
        Next::End
    }
}

/// Builds the main validation flow. The policy stage has no router: it is
/// the terminal of the main path.
pub fn validation_flow(collabs: &Collaborators) -> Result<CompiledFlow<FlowState>, BuildError> {
    let mut graph = FlowGraph::new();
    graph
        .add_stage(Arc::new(ExtractionStage::new(Arc::clone(&collabs.extractor))))
        .add_stage(Arc::new(GuardrailStage::new(Arc::clone(&collabs.guardrail))))
        .add_stage(Arc::new(ValidationStage::new(Arc::clone(&collabs.validator))))
        .add_stage(Arc::new(PolicyStage::new(Arc::clone(&collabs.policy))))
        .set_entry(
            entry_router,
            [
                Next::Stage(StageId::Extraction),
                Next::Stage(StageId::Guardrail),
            ],
        )
        .add_router(
            StageId::Extraction,
            extraction_router,
            [Next::Stage(StageId::Guardrail), Next::End],
        )
        .add_router(
            StageId::Guardrail,
            guardrail_router,
            [Next::Stage(StageId::Validation), Next::End],
        )
        .add_router(
            StageId::Validation,
            validation_router,
            [Next::Stage(StageId::Policy), Next::End],
        );
    graph.build()
}

/// Builds the secondary, single-stage summary flow.
pub fn summary_flow(
    summarizer: Arc<dyn SummaryWriter>,
) -> Result<CompiledFlow<FlowState>, BuildError> {
    let mut graph = FlowGraph::new();
    graph
        .add_stage(Arc::new(SummaryStage::new(summarizer)))
        .set_entry(
            |_: &FlowState| Next::Stage(StageId::Summary),
            [Next::Stage(StageId::Summary)],
        );
    graph.build()
}

/// Both compiled flows, built once and reused for every request.
pub struct Pipeline {
    validation: CompiledFlow<FlowState>,
    summary: CompiledFlow<FlowState>,
}

impl Pipeline {
    /// Builds both flows; fails fast on any graph misconfiguration.
    pub fn new(collabs: &Collaborators) -> Result<Self, BuildError> {
        Ok(Self {
            validation: validation_flow(collabs)?,
            summary: summary_flow(Arc::clone(&collabs.summarizer))?,
        })
    }

    /// Runs the validation flow to its terminal.
    ///
    /// Refuses the run before any stage when neither `input_document` nor
    /// `input_source_ref` is set.
    pub async fn validate(&self, state: FlowState) -> Result<FlowState, FlowError> {
        if state.is_empty_input() {
            return Err(FlowError::MissingInput);
        }
        info!("validation run started");
        let final_state = self.validation.execute(state).await;
        info!(
            passed_guardrail = final_state.passed_guardrail,
            is_structurally_valid = final_state.is_structurally_valid,
            policy_approved = final_state.policy_approved,
            "validation run finished"
        );
        Ok(final_state)
    }

    /// Runs the validation flow on a spawned task, emitting a snapshot after
    /// each stage. Same input-shape refusal as [`Pipeline::validate`].
    pub fn validate_stream(
        &self,
        state: FlowState,
    ) -> Result<ReceiverStream<FlowEvent<FlowState>>, FlowError> {
        if state.is_empty_input() {
            return Err(FlowError::MissingInput);
        }
        info!("streaming validation run started");
        Ok(self.validation.stream(state))
    }

    /// Runs the independent summary flow for a document.
    pub async fn summarize(&self, document: Value) -> FlowState {
        self.summary.execute(FlowState::from_document(document)).await
    }
}
