//! Scripted collaborators for tests, demos, and offline runs.
//!
//! Each mock returns a fixed outcome and counts its calls, so tests can
//! assert which stages ran (short-circuit guarantees) without real services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{
    CollabError, DocumentExtractor, Extraction, FieldValidator, GuardrailCheck, GuardrailVerdict,
    PolicyEvaluator, PolicyVerdict, SummaryWriter, ValidationVerdict,
};

/// What a mock does when called.
enum Script<T> {
    Ok(T),
    Err(fn() -> CollabError),
    /// Sleep longer than any reasonable stage deadline, to exercise timeouts.
    Hang,
}

fn transport_error() -> CollabError {
    CollabError::Transport("mock transport failure".into())
}

/// Guardrail mock: fixed verdict plus call counter.
pub struct MockGuardrail {
    script: Script<GuardrailVerdict>,
    calls: AtomicUsize,
}

impl MockGuardrail {
    /// Always classifies the document as in-domain.
    pub fn approve() -> Self {
        Self::with_verdict(GuardrailVerdict {
            is_in_domain: true,
            explanation: "This is a clinical summary for insurance approval.".into(),
        })
    }

    /// Always rejects, with the given polite explanation.
    pub fn reject(explanation: impl Into<String>) -> Self {
        Self::with_verdict(GuardrailVerdict {
            is_in_domain: false,
            explanation: explanation.into(),
        })
    }

    /// Returns the given verdict on every call.
    pub fn with_verdict(verdict: GuardrailVerdict) -> Self {
        Self {
            script: Script::Ok(verdict),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call with a transport error.
    pub fn failing() -> Self {
        Self {
            script: Script::Err(transport_error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Never answers; only a stage timeout ends the call.
    pub fn hanging() -> Self {
        Self {
            script: Script::Hang,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `check` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GuardrailCheck for MockGuardrail {
    async fn check(&self, _document: &Value) -> Result<GuardrailVerdict, CollabError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Ok(v) => Ok(v.clone()),
            Script::Err(make) => Err(make()),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(transport_error())
            }
        }
    }
}

/// Validator mock: fixed verdict plus call counter.
pub struct MockValidator {
    script: Script<ValidationVerdict>,
    calls: AtomicUsize,
}

impl MockValidator {
    /// Reports the summary complete.
    pub fn valid() -> Self {
        Self::with_verdict(ValidationVerdict {
            is_valid: true,
            missing_fields: Vec::new(),
            suggestions: Vec::new(),
        })
    }

    /// Reports the given fields missing, with optional suggestions.
    pub fn missing(fields: Vec<String>, suggestions: Vec<String>) -> Self {
        Self::with_verdict(ValidationVerdict {
            is_valid: false,
            missing_fields: fields,
            suggestions,
        })
    }

    /// Returns the given verdict on every call.
    pub fn with_verdict(verdict: ValidationVerdict) -> Self {
        Self {
            script: Script::Ok(verdict),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call with a transport error.
    pub fn failing() -> Self {
        Self {
            script: Script::Err(transport_error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `validate` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FieldValidator for MockValidator {
    async fn validate(&self, _document: &Value) -> Result<ValidationVerdict, CollabError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Ok(v) => Ok(v.clone()),
            Script::Err(make) => Err(make()),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(transport_error())
            }
        }
    }
}

/// Policy mock: fixed verdict plus call counter.
pub struct MockPolicy {
    script: Script<PolicyVerdict>,
    calls: AtomicUsize,
}

impl MockPolicy {
    /// Approves, with the given user-facing message.
    pub fn approve(explanation: impl Into<String>) -> Self {
        Self::with_verdict(PolicyVerdict {
            approved: true,
            failed_criteria: Vec::new(),
            explanation: explanation.into(),
        })
    }

    /// Denies with the given failed criteria and message.
    pub fn deny(failed_criteria: Vec<String>, explanation: impl Into<String>) -> Self {
        Self::with_verdict(PolicyVerdict {
            approved: false,
            failed_criteria,
            explanation: explanation.into(),
        })
    }

    /// Returns the given verdict on every call.
    pub fn with_verdict(verdict: PolicyVerdict) -> Self {
        Self {
            script: Script::Ok(verdict),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call with a transport error.
    pub fn failing() -> Self {
        Self {
            script: Script::Err(transport_error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `evaluate` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PolicyEvaluator for MockPolicy {
    async fn evaluate(&self, _document: &Value) -> Result<PolicyVerdict, CollabError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Ok(v) => Ok(v.clone()),
            Script::Err(make) => Err(make()),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(transport_error())
            }
        }
    }
}

/// Extractor mock: fixed outcome plus call counter.
pub struct MockExtractor {
    script: Script<Extraction>,
    calls: AtomicUsize,
}

impl MockExtractor {
    /// Produces the given document from any source ref.
    pub fn document(document: Value) -> Self {
        Self {
            script: Script::Ok(Extraction::Document(document)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Rejects every source with the given explanation.
    pub fn reject(explanation: impl Into<String>) -> Self {
        Self {
            script: Script::Ok(Extraction::Rejected {
                explanation: explanation.into(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call with a transport error.
    pub fn failing() -> Self {
        Self {
            script: Script::Err(transport_error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `extract` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentExtractor for MockExtractor {
    async fn extract(&self, _source_ref: &str) -> Result<Extraction, CollabError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Ok(v) => Ok(v.clone()),
            Script::Err(make) => Err(make()),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(transport_error())
            }
        }
    }
}

/// Summarizer mock: fixed text plus call counter.
pub struct MockSummarizer {
    script: Script<String>,
    calls: AtomicUsize,
}

impl MockSummarizer {
    /// Returns the given summary text on every call.
    pub fn text(summary: impl Into<String>) -> Self {
        Self {
            script: Script::Ok(summary.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call with a transport error.
    pub fn failing() -> Self {
        Self {
            script: Script::Err(transport_error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `summarize` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SummaryWriter for MockSummarizer {
    async fn summarize(&self, _document: &Value) -> Result<String, CollabError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Ok(v) => Ok(v.clone()),
            Script::Err(make) => Err(make()),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(transport_error())
            }
        }
    }
}
