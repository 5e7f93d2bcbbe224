//! Routing decision returned by a router after its stage completes.

use super::stage::StageId;

/// Where the run goes after a stage: another stage, or the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Next {
    /// Continue with the named stage.
    Stage(StageId),
    /// Stop the run; the current state is final.
    End,
}
