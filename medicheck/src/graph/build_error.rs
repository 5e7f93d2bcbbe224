//! Graph construction error.
//!
//! Returned by `FlowGraph::build` when routers reference unregistered stages,
//! no entry router is set, or a cycle is reachable from the entry. These are
//! configuration mistakes and fail fast at process start, never at dispatch.

use thiserror::Error;

use super::stage::StageId;

/// Error when building a flow graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// A router target names a stage that was not registered via `add_stage`.
    #[error("router targets unregistered stage: {0}")]
    UnknownStage(StageId),

    /// A router was attached to a stage that was not registered.
    #[error("router attached to unregistered stage: {0}")]
    RouterWithoutStage(StageId),

    /// No entry router was set; the graph has no way to pick a first stage.
    #[error("flow graph has no entry router")]
    MissingEntry,

    /// Following declared router targets from the entry can revisit a stage.
    #[error("cycle reachable from entry at stage: {0}")]
    CycleDetected(StageId),
}
