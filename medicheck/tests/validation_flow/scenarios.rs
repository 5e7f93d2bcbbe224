//! End-to-end scenarios over the full validation flow.

use std::sync::Arc;

use serde_json::json;

use medicheck::collab::mock::{MockExtractor, MockGuardrail, MockPolicy, MockValidator};
use medicheck::{FlowState, ValidationReport};

use crate::common::{approving, sample_document, Fixture};

/// **Scenario A**: Guardrail rejects an empty document; the run ends with the
/// guardrail explanation and no diagnostics populated.
#[tokio::test]
async fn guardrail_reject_ends_run_with_explanation() {
    let fixture = Fixture {
        guardrail: Arc::new(MockGuardrail::reject(
            "This document is not a clinical summary for insurance.",
        )),
        ..approving()
    };
    let pipeline = fixture.pipeline();

    let state = pipeline
        .validate(FlowState::from_document(json!({})))
        .await
        .unwrap();

    assert!(!state.passed_guardrail);
    assert_eq!(
        state.message,
        "This document is not a clinical summary for insurance."
    );
    assert!(state.missing_fields.is_empty());
}

/// **Scenario B**: Validation finds a missing field; the policy collaborator
/// is never invoked and the report carries the missing field.
#[tokio::test]
async fn validation_reject_skips_policy() {
    let fixture = Fixture {
        validator: Arc::new(MockValidator::missing(
            vec!["diagnosis".into()],
            vec!["Add the final diagnosis.".into()],
        )),
        ..approving()
    };
    let pipeline = fixture.pipeline();

    let state = pipeline
        .validate(FlowState::from_document(sample_document()))
        .await
        .unwrap();

    assert!(state.passed_guardrail);
    assert!(!state.is_structurally_valid);
    assert_eq!(state.missing_fields, vec!["diagnosis".to_string()]);
    assert_eq!(fixture.policy.calls(), 0, "policy must not run on invalid data");
}

/// **Scenario C**: Full approval; the terminal message is the policy
/// collaborator's explanation.
#[tokio::test]
async fn full_approval_carries_policy_message() {
    let fixture = approving();
    let pipeline = fixture.pipeline();

    let state = pipeline
        .validate(FlowState::from_document(sample_document()))
        .await
        .unwrap();

    assert!(state.passed_guardrail);
    assert!(state.is_structurally_valid);
    assert!(state.policy_approved);
    assert_eq!(state.message, "Approved: all criteria are met.");

    let report = ValidationReport::from(state);
    assert!(report.approved);
    assert!(report.rejection_reason.is_empty());
}

/// **Scenario D**: Extraction rejects the source; the run terminates without
/// ever invoking the guardrail collaborator.
#[tokio::test]
async fn extraction_failure_terminates_without_guardrail() {
    let fixture = Fixture {
        extractor: Arc::new(MockExtractor::reject(
            "No clinical summary could be extracted from the document.",
        )),
        ..approving()
    };
    let pipeline = fixture.pipeline();

    let state = pipeline
        .validate(FlowState::from_source_ref("/tmp/upload.txt"))
        .await
        .unwrap();

    assert!(!state.passed_guardrail);
    assert_eq!(
        state.message,
        "No clinical summary could be extracted from the document."
    );
    assert_eq!(fixture.guardrail.calls(), 0, "guardrail must not see absent data");
    assert_eq!(fixture.validator.calls(), 0);
    assert_eq!(fixture.policy.calls(), 0);
}

/// **Scenario**: Policy denial surfaces the failed criteria as the rejection reason.
#[tokio::test]
async fn policy_denial_reports_failed_criteria() {
    let fixture = Fixture {
        policy: Arc::new(MockPolicy::deny(
            vec!["Weight is less than 80 kg.".into()],
            "Denied: the patient does not meet the weight criterion.",
        )),
        ..approving()
    };
    let pipeline = fixture.pipeline();

    let state = pipeline
        .validate(FlowState::from_document(sample_document()))
        .await
        .unwrap();
    let report = ValidationReport::from(state);

    assert!(report.insurance_summary);
    assert!(report.valid_summary);
    assert!(!report.approved);
    assert_eq!(
        report.rejection_reason,
        vec!["Weight is less than 80 kg.".to_string()]
    );
    assert_eq!(
        report.message,
        "Denied: the patient does not meet the weight criterion."
    );
}

/// **Scenario**: Every terminal state carries a non-empty message, whichever
/// stage ended the run.
#[tokio::test]
async fn terminal_message_is_always_non_empty() {
    let cases: Vec<Fixture> = vec![
        Fixture {
            guardrail: Arc::new(MockGuardrail::failing()),
            ..approving()
        },
        Fixture {
            validator: Arc::new(MockValidator::failing()),
            ..approving()
        },
        Fixture {
            policy: Arc::new(MockPolicy::failing()),
            ..approving()
        },
        Fixture {
            extractor: Arc::new(MockExtractor::failing()),
            ..approving()
        },
        approving(),
    ];
    for (i, fixture) in cases.iter().enumerate() {
        let pipeline = fixture.pipeline();
        let entry = if i == 3 {
            FlowState::from_source_ref("/tmp/upload.txt")
        } else {
            FlowState::from_document(sample_document())
        };
        let state = pipeline.validate(entry).await.unwrap();
        assert!(!state.message.is_empty(), "case {} ended with empty message", i);
    }
}
