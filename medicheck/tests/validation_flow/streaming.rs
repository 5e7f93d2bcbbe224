//! Streaming runs: per-stage snapshots arrive in execution order.

use std::sync::Arc;

use tokio_stream::StreamExt;

use medicheck::collab::mock::MockGuardrail;
use medicheck::{FlowEvent, FlowState, StageId};

use crate::common::{approving, sample_document, Fixture};

/// **Scenario**: A fully approving run streams guardrail, validation, and
/// policy snapshots in order, then Finished with the terminal state.
#[tokio::test]
async fn stream_emits_stages_in_order() {
    let pipeline = approving().pipeline();

    let events: Vec<_> = pipeline
        .validate_stream(FlowState::from_document(sample_document()))
        .unwrap()
        .collect()
        .await;

    let stages: Vec<StageId> = events
        .iter()
        .filter_map(|e| match e {
            FlowEvent::StageCompleted { stage, .. } => Some(*stage),
            FlowEvent::Finished(_) => None,
        })
        .collect();
    assert_eq!(
        stages,
        vec![StageId::Guardrail, StageId::Validation, StageId::Policy]
    );

    match events.last() {
        Some(FlowEvent::Finished(state)) => {
            assert!(state.policy_approved);
            assert_eq!(state.message, "Approved: all criteria are met.");
        }
        other => panic!("last event should be Finished, got {:?}", other),
    }
}

/// **Scenario**: A guardrail rejection streams a single stage snapshot whose
/// state already carries the rejection, then Finished.
#[tokio::test]
async fn stream_short_circuit_emits_single_stage() {
    let fixture = Fixture {
        guardrail: Arc::new(MockGuardrail::reject("Not an insurance summary.")),
        ..approving()
    };
    let pipeline = fixture.pipeline();

    let events: Vec<_> = pipeline
        .validate_stream(FlowState::from_document(sample_document()))
        .unwrap()
        .collect()
        .await;

    assert_eq!(events.len(), 2, "one StageCompleted + Finished");
    match &events[0] {
        FlowEvent::StageCompleted { stage, state } => {
            assert_eq!(*stage, StageId::Guardrail);
            assert!(!state.passed_guardrail);
            assert_eq!(state.message, "Not an insurance summary.");
        }
        other => panic!("events[0] should be StageCompleted(guardrail), got {:?}", other),
    }
}
