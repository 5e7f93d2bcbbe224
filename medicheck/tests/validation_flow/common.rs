//! Shared fixture: mock collaborators whose call counts the tests can read
//! after a run, plus a small in-domain sample document.

use std::sync::Arc;

use serde_json::{json, Value};

use medicheck::collab::mock::{
    MockExtractor, MockGuardrail, MockPolicy, MockSummarizer, MockValidator,
};
use medicheck::{Collaborators, Pipeline};

/// Concrete mock handles; `collaborators()` lends them out as trait objects
/// so the test can still read `calls()` afterwards.
pub struct Fixture {
    pub guardrail: Arc<MockGuardrail>,
    pub validator: Arc<MockValidator>,
    pub policy: Arc<MockPolicy>,
    pub extractor: Arc<MockExtractor>,
    pub summarizer: Arc<MockSummarizer>,
}

impl Fixture {
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            guardrail: self.guardrail.clone(),
            validator: self.validator.clone(),
            policy: self.policy.clone(),
            extractor: self.extractor.clone(),
            summarizer: self.summarizer.clone(),
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(&self.collaborators()).expect("flows build")
    }
}

/// Every collaborator succeeds and approves.
pub fn approving() -> Fixture {
    Fixture {
        guardrail: Arc::new(MockGuardrail::approve()),
        validator: Arc::new(MockValidator::valid()),
        policy: Arc::new(MockPolicy::approve("Approved: all criteria are met.")),
        extractor: Arc::new(MockExtractor::document(sample_document())),
        summarizer: Arc::new(MockSummarizer::text("Prose summary.")),
    }
}

pub fn sample_document() -> Value {
    json!({
        "patient_demographics": {"full_name": "Jane Doe", "age": 62},
        "hpi": {"chief_complaint": "Chest pain"},
        "diagnosis_discharge_summary": {"final_diagnosis": "NSTEMI"}
    })
}
