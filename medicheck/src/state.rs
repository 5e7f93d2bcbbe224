//! Shared run state: one struct flows through every stage of a run.
//!
//! Every field is declared and defaulted up front; stages mutate the state
//! they receive and hand it back. Which stage sets which field is part of
//! each stage's documented contract (see `stages`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State threaded through a single validation or summary run.
///
/// Created per request via [`FlowState::from_document`] or
/// [`FlowState::from_source_ref`], mutated in place by each visited stage,
/// and discarded after the derived [`ValidationReport`] is produced.
///
/// Exactly one of `input_document` / `input_source_ref` is set at entry;
/// once extraction completes, the document side holds the value and the
/// source ref is cleared.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FlowState {
    /// The structured document under validation, when already extracted.
    pub input_document: Option<Value>,
    /// Opaque reference (e.g. a file path) to an unprocessed source awaiting extraction.
    pub input_source_ref: Option<String>,
    /// Set by the guardrail stage: the document is an in-domain clinical summary.
    pub passed_guardrail: bool,
    /// Set by the validation stage: all required fields are present.
    pub is_structurally_valid: bool,
    /// Set by the policy stage: the summary meets the insurance policy criteria.
    pub policy_approved: bool,
    /// Set by the validation stage: dotted paths of absent required fields.
    pub missing_fields: Vec<String>,
    /// Set by the validation stage: user-facing suggestions for completing the summary.
    pub suggestions: Vec<String>,
    /// Set by the policy stage: criteria the summary failed against the policy.
    pub failed_criteria: Vec<String>,
    /// Human-readable terminal explanation; overwritten by the last stage that
    /// sets it and non-empty once a run terminates.
    pub message: String,
    /// Generated summary text; populated only by the summary stage.
    pub summary: Option<String>,
}

impl FlowState {
    /// Entry shape for an already-structured document: goes straight to the guardrail.
    pub fn from_document(document: Value) -> Self {
        Self {
            input_document: Some(document),
            ..Self::default()
        }
    }

    /// Entry shape for an unprocessed source: visits the extraction stage first.
    pub fn from_source_ref(source_ref: impl Into<String>) -> Self {
        Self {
            input_source_ref: Some(source_ref.into()),
            ..Self::default()
        }
    }

    /// True when neither entry field is set; such a run is refused before any stage.
    pub fn is_empty_input(&self) -> bool {
        self.input_document.is_none() && self.input_source_ref.is_none()
    }
}

/// Terminal view of a validation run, returned to API callers.
///
/// Field names match the response contract consumed by the frontend:
/// `rejection_reason` carries the failed policy criteria.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub insurance_summary: bool,
    pub valid_summary: bool,
    pub missing_fields: Vec<String>,
    pub suggestions: Vec<String>,
    pub approved: bool,
    pub rejection_reason: Vec<String>,
    pub message: String,
}

impl From<FlowState> for ValidationReport {
    fn from(state: FlowState) -> Self {
        Self {
            insurance_summary: state.passed_guardrail,
            valid_summary: state.is_structurally_valid,
            missing_fields: state.missing_fields,
            suggestions: state.suggestions,
            approved: state.policy_approved,
            rejection_reason: state.failed_criteria,
            message: state.message,
        }
    }
}
