//! Flow graph builder: stages plus conditional routers.
//!
//! Register stages with `add_stage`, attach a router to a stage with
//! `add_router`, set the entry router with `set_entry`, then `build` to get
//! an immutable [`CompiledFlow`]. Routers are registered together with the
//! set of targets they may return, so existence and acyclicity are checked
//! once at construction instead of at dispatch time.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::build_error::BuildError;
use super::compiled::CompiledFlow;
use super::next::Next;
use super::stage::{Stage, StageId};

/// Routing decision function: pure over the post-stage state.
pub type Router<S> = Arc<dyn Fn(&S) -> Next + Send + Sync>;

/// A router plus the targets it declared; build validation works on `targets`.
pub(super) struct RouterEntry<S> {
    pub(super) decide: Router<S>,
    pub(super) targets: Vec<Next>,
}

impl<S> Clone for RouterEntry<S> {
    fn clone(&self) -> Self {
        Self {
            decide: Arc::clone(&self.decide),
            targets: self.targets.clone(),
        }
    }
}

/// Mutable graph under construction. Build once at process start; the
/// compiled result is immutable and shared across concurrent runs.
pub struct FlowGraph<S> {
    stages: HashMap<StageId, Arc<dyn Stage<S>>>,
    routers: HashMap<StageId, RouterEntry<S>>,
    entry: Option<RouterEntry<S>>,
}

impl<S> Default for FlowGraph<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> FlowGraph<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            stages: HashMap::new(),
            routers: HashMap::new(),
            entry: None,
        }
    }

    /// Registers a stage under its own id. Replaces any stage with the same id.
    pub fn add_stage(&mut self, stage: Arc<dyn Stage<S>>) -> &mut Self {
        self.stages.insert(stage.id(), stage);
        self
    }

    /// Sets the entry router, evaluated against the initial state before any
    /// stage runs. `targets` declares every value the router may return.
    pub fn set_entry(
        &mut self,
        router: impl Fn(&S) -> Next + Send + Sync + 'static,
        targets: impl Into<Vec<Next>>,
    ) -> &mut Self {
        self.entry = Some(RouterEntry {
            decide: Arc::new(router),
            targets: targets.into(),
        });
        self
    }

    /// Attaches a router to `from`, evaluated strictly after that stage
    /// completes. A stage with no router is terminal.
    pub fn add_router(
        &mut self,
        from: StageId,
        router: impl Fn(&S) -> Next + Send + Sync + 'static,
        targets: impl Into<Vec<Next>>,
    ) -> &mut Self {
        self.routers.insert(
            from,
            RouterEntry {
                decide: Arc::new(router),
                targets: targets.into(),
            },
        );
        self
    }

    /// Validates the graph and produces an immutable, executable flow.
    ///
    /// Checks that an entry router exists, every declared router target is a
    /// registered stage, every router is attached to a registered stage, and
    /// no cycle is reachable from the entry along declared targets.
    pub fn build(mut self) -> Result<CompiledFlow<S>, BuildError> {
        let entry = self.entry.take().ok_or(BuildError::MissingEntry)?;

        for (from, router) in &self.routers {
            if !self.stages.contains_key(from) {
                return Err(BuildError::RouterWithoutStage(*from));
            }
            for target in &router.targets {
                if let Next::Stage(id) = target {
                    if !self.stages.contains_key(id) {
                        return Err(BuildError::UnknownStage(*id));
                    }
                }
            }
        }
        for target in &entry.targets {
            if let Next::Stage(id) = target {
                if !self.stages.contains_key(id) {
                    return Err(BuildError::UnknownStage(*id));
                }
            }
        }

        // Depth-first walk over declared targets from each entry target; a
        // stage on the current path seen again is a reachable cycle.
        let mut visited = HashSet::new();
        for target in &entry.targets {
            if let Next::Stage(id) = target {
                let mut path = Vec::new();
                self.check_acyclic(*id, &mut path, &mut visited)?;
            }
        }

        Ok(CompiledFlow {
            stages: self.stages,
            routers: self.routers,
            entry,
        })
    }

    fn check_acyclic(
        &self,
        id: StageId,
        path: &mut Vec<StageId>,
        visited: &mut HashSet<StageId>,
    ) -> Result<(), BuildError> {
        if path.contains(&id) {
            return Err(BuildError::CycleDetected(id));
        }
        if visited.contains(&id) {
            return Ok(());
        }
        path.push(id);
        if let Some(router) = self.routers.get(&id) {
            for target in &router.targets {
                if let Next::Stage(next_id) = target {
                    self.check_acyclic(*next_id, path, visited)?;
                }
            }
        }
        path.pop();
        visited.insert(id);
        Ok(())
    }
}
