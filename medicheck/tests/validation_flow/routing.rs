//! Routing guarantees: entry selection, short-circuits, idempotence.

use std::sync::Arc;

use medicheck::collab::mock::MockGuardrail;
use medicheck::{FlowState, ValidationReport};

use crate::common::{approving, sample_document, Fixture};

/// **Property**: A state entering with only a source ref always visits the
/// extraction stage first.
#[tokio::test]
async fn source_ref_entry_visits_extraction() {
    let fixture = approving();
    let pipeline = fixture.pipeline();

    pipeline
        .validate(FlowState::from_source_ref("/tmp/upload.txt"))
        .await
        .unwrap();

    assert_eq!(fixture.extractor.calls(), 1);
    assert_eq!(fixture.guardrail.calls(), 1, "extracted document continues to guardrail");
}

/// **Property**: A state entering with a document never visits extraction.
#[tokio::test]
async fn document_entry_skips_extraction() {
    let fixture = approving();
    let pipeline = fixture.pipeline();

    pipeline
        .validate(FlowState::from_document(sample_document()))
        .await
        .unwrap();

    assert_eq!(fixture.extractor.calls(), 0);
    assert_eq!(fixture.guardrail.calls(), 1);
}

/// **Property**: When the guardrail rejects, the validation and policy stages
/// never run and their flags keep the failure default.
#[tokio::test]
async fn guardrail_reject_short_circuits_downstream() {
    let fixture = Fixture {
        guardrail: Arc::new(MockGuardrail::reject("Not an insurance summary.")),
        ..approving()
    };
    let pipeline = fixture.pipeline();

    let state = pipeline
        .validate(FlowState::from_document(sample_document()))
        .await
        .unwrap();

    assert!(!state.is_structurally_valid);
    assert!(!state.policy_approved);
    assert_eq!(fixture.validator.calls(), 0);
    assert_eq!(fixture.policy.calls(), 0);
}

/// **Property**: No stage runs twice within one run.
#[tokio::test]
async fn no_stage_runs_twice() {
    let fixture = approving();
    let pipeline = fixture.pipeline();

    pipeline
        .validate(FlowState::from_source_ref("/tmp/upload.txt"))
        .await
        .unwrap();

    assert_eq!(fixture.extractor.calls(), 1);
    assert_eq!(fixture.guardrail.calls(), 1);
    assert_eq!(fixture.validator.calls(), 1);
    assert_eq!(fixture.policy.calls(), 1);
}

/// **Property**: Two independently constructed runs over the same input and
/// deterministic collaborators produce identical final reports.
#[tokio::test]
async fn identical_inputs_yield_identical_finals() {
    let first = approving().pipeline();
    let second = approving().pipeline();

    let a = first
        .validate(FlowState::from_document(sample_document()))
        .await
        .unwrap();
    let b = second
        .validate(FlowState::from_document(sample_document()))
        .await
        .unwrap();

    assert_eq!(ValidationReport::from(a), ValidationReport::from(b));
}

/// **Property**: The summary flow never touches the validation collaborators.
#[tokio::test]
async fn summary_flow_shares_only_state_shape() {
    let fixture = approving();
    let pipeline = fixture.pipeline();

    let state = pipeline.summarize(sample_document()).await;

    assert_eq!(state.summary.as_deref(), Some("Prose summary."));
    assert_eq!(fixture.guardrail.calls(), 0);
    assert_eq!(fixture.validator.calls(), 0);
    assert_eq!(fixture.policy.calls(), 0);
    assert_eq!(fixture.summarizer.calls(), 1);
}
