//! Streaming events emitted while a flow runs.

use crate::graph::StageId;

/// Event emitted by `CompiledFlow::stream`: a state snapshot after each
/// stage, then the terminal state.
#[derive(Clone, Debug)]
pub enum FlowEvent<S> {
    /// A stage finished; `state` is the snapshot after its mutations.
    StageCompleted { stage: StageId, state: S },
    /// The run reached its terminal; no further events follow.
    Finished(S),
}
