//! Stage identifiers and the stage contract.
//!
//! `StageId` is a closed enum: the set of stages is fixed at compile time,
//! so a router can never name a stage that does not exist as a value —
//! only one that was not registered, which the builder rejects.

use std::fmt;

use async_trait::async_trait;

/// Identifier of a stage in the validation pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Extracts a structured document from an unprocessed source reference.
    Extraction,
    /// Checks the document is an in-domain clinical summary for insurance.
    Guardrail,
    /// Checks required fields are present and suggests completions.
    Validation,
    /// Evaluates the summary against the insurance policy.
    Policy,
    /// Generates a free-text summary of the document.
    Summary,
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageId::Extraction => "extraction",
            StageId::Guardrail => "guardrail",
            StageId::Validation => "validation",
            StageId::Policy => "policy",
            StageId::Summary => "summary",
        };
        f.write_str(name)
    }
}

/// A unit of work in the flow: read the state, possibly call a collaborator,
/// return the updated state.
///
/// Stages evaluate; routers route. A stage never decides the next stage, and
/// never returns an error: a failed collaborator call is folded into the
/// state as failure-default flags plus a user-facing `message`, so the run
/// reaches a terminal through normal routing.
#[async_trait]
pub trait Stage<S>: Send + Sync {
    /// Identifier this stage is registered under.
    fn id(&self) -> StageId;

    /// Runs one step: state in, state out.
    async fn run(&self, state: S) -> S;
}
