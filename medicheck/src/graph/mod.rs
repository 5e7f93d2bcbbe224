//! Stage graph: named stages plus conditional routers, build and execute.
//!
//! Register stages and routers on a [`FlowGraph`], `build()` once at process
//! start, then `execute()` or `stream()` the immutable [`CompiledFlow`] for
//! each run.

mod build_error;
mod compiled;
mod flow_graph;
mod next;
mod stage;

pub use build_error::BuildError;
pub use compiled::CompiledFlow;
pub use flow_graph::{FlowGraph, Router};
pub use next::Next;
pub use stage::{Stage, StageId};
