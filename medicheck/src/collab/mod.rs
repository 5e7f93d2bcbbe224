//! Collaborator contracts: the external services stages call.
//!
//! The graph and executor never talk to these directly; each stage wraps
//! exactly one collaborator behind a narrow async trait. Collaborator
//! failures are typed ([`CollabError`]) so a stage can fold them into the
//! state instead of letting anything unstructured escape.
//!
//! Implementations: scripted mocks in [`mock`] for tests and demos, and
//! LLM-backed collaborators (feature `openai`).

pub mod mock;

#[cfg(feature = "openai")]
mod llm;
#[cfg(feature = "openai")]
mod prompts;

#[cfg(feature = "openai")]
pub use llm::{LlmChat, LlmExtractor, LlmGuardrail, LlmPolicy, LlmSummarizer, LlmValidator};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Error from a collaborator call. Stages map any variant to their
/// failure-default flags plus a user-facing message.
#[derive(Debug, Error)]
pub enum CollabError {
    /// The call did not complete within the stage's deadline.
    #[error("collaborator call timed out")]
    Timeout,

    /// The call could not be made or the transport failed mid-flight.
    #[error("collaborator transport error: {0}")]
    Transport(String),

    /// The collaborator answered, but the response could not be understood.
    #[error("collaborator returned malformed output: {0}")]
    Malformed(String),
}

/// Verdict from the guardrail collaborator.
#[derive(Clone, Debug, Deserialize)]
pub struct GuardrailVerdict {
    /// The document is an in-domain clinical summary for insurance approval.
    pub is_in_domain: bool,
    /// User-facing explanation, polite on rejection.
    pub explanation: String,
}

/// Verdict from the field-validation collaborator.
#[derive(Clone, Debug, Deserialize)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    /// Dotted paths of required fields that are absent or empty.
    pub missing_fields: Vec<String>,
    /// User-facing suggestions for completing the summary.
    pub suggestions: Vec<String>,
}

/// Verdict from the policy-evaluation collaborator.
#[derive(Clone, Debug, Deserialize)]
pub struct PolicyVerdict {
    pub approved: bool,
    /// Policy criteria the summary failed.
    pub failed_criteria: Vec<String>,
    /// User-facing approval or denial message.
    pub explanation: String,
}

/// Outcome of extracting a document from a source reference.
#[derive(Clone, Debug)]
pub enum Extraction {
    /// A structured document was produced.
    Document(Value),
    /// The source was readable but no valid document could be extracted.
    Rejected { explanation: String },
}

/// Decides whether a document is an in-domain clinical summary.
#[async_trait]
pub trait GuardrailCheck: Send + Sync {
    async fn check(&self, document: &Value) -> Result<GuardrailVerdict, CollabError>;
}

/// Checks required fields and produces completion suggestions.
#[async_trait]
pub trait FieldValidator: Send + Sync {
    async fn validate(&self, document: &Value) -> Result<ValidationVerdict, CollabError>;
}

/// Evaluates a clinical summary against the insurance policy.
#[async_trait]
pub trait PolicyEvaluator: Send + Sync {
    async fn evaluate(&self, document: &Value) -> Result<PolicyVerdict, CollabError>;
}

/// Extracts a structured document from an opaque source reference.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, source_ref: &str) -> Result<Extraction, CollabError>;
}

/// Generates free-text summaries of a document.
#[async_trait]
pub trait SummaryWriter: Send + Sync {
    async fn summarize(&self, document: &Value) -> Result<String, CollabError>;
}
