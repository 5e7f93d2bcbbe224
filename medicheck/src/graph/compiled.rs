//! Compiled flow: immutable, supports execute and stream.
//!
//! Built by `FlowGraph::build`. Holds the stage table, per-stage routers,
//! and the entry router. Safe to share across concurrent runs: definitions
//! are immutable and each run owns its own state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::stream::FlowEvent;

use super::flow_graph::RouterEntry;
use super::next::Next;
use super::stage::{Stage, StageId};

/// Executable flow graph: one active path per run, no fan-out.
///
/// Exactly one stage runs at a time; after each stage its router (if any) is
/// evaluated against the post-stage state. A stage with no router is
/// terminal. Build-time validation guarantees every declared router target
/// exists and no cycle is reachable, so the run loop needs at most one pass
/// over the stages.
pub struct CompiledFlow<S> {
    pub(super) stages: HashMap<StageId, Arc<dyn Stage<S>>>,
    pub(super) routers: HashMap<StageId, RouterEntry<S>>,
    pub(super) entry: RouterEntry<S>,
}

impl<S> Clone for CompiledFlow<S> {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
            routers: self.routers.clone(),
            entry: self.entry.clone(),
        }
    }
}

impl<S> CompiledFlow<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Shared run loop for execute() and stream(): entry router, then
    /// stage/router steps until a terminal decision.
    async fn run_inner(&self, mut state: S, events: Option<&mpsc::Sender<FlowEvent<S>>>) -> S {
        let mut decision = (self.entry.decide)(&state);
        debug_assert!(
            self.entry.targets.contains(&decision),
            "entry router returned undeclared target {:?}",
            decision
        );
        debug!(?decision, "flow start");

        while let Next::Stage(id) = decision {
            let stage = self
                .stages
                .get(&id)
                .expect("build validated all router targets");
            debug!(stage = %id, "stage start");
            state = stage.run(state).await;
            debug!(stage = %id, "stage complete");

            if let Some(tx) = events {
                let _ = tx
                    .send(FlowEvent::StageCompleted {
                        stage: id,
                        state: state.clone(),
                    })
                    .await;
            }

            decision = match self.routers.get(&id) {
                Some(router) => {
                    let next = (router.decide)(&state);
                    debug_assert!(
                        router.targets.contains(&next),
                        "router after {} returned undeclared target {:?}",
                        id,
                        next
                    );
                    next
                }
                None => Next::End,
            };
        }

        debug!("flow complete");
        state
    }

    /// Runs the flow to its terminal and returns the final state.
    pub async fn execute(&self, state: S) -> S {
        self.run_inner(state, None).await
    }

    /// Runs the flow on a spawned task, emitting a [`FlowEvent::StageCompleted`]
    /// after each stage and a final [`FlowEvent::Finished`] with the terminal state.
    pub fn stream(&self, state: S) -> ReceiverStream<FlowEvent<S>> {
        let (tx, rx) = mpsc::channel(16);
        let flow = self.clone();
        tokio::spawn(async move {
            let final_state = flow.run_inner(state, Some(&tx)).await;
            let _ = tx.send(FlowEvent::Finished(final_state)).await;
        });
        ReceiverStream::new(rx)
    }
}
