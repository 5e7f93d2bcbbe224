//! Concrete stages: each wraps one collaborator behind the [`Stage`] contract.
//!
//! A stage evaluates and records; it never routes and never fails. Every
//! collaborator call runs under the stage's own deadline, and any error
//! (timeout included) is folded into the state as failure-default flags plus
//! a user-facing message, so the run reaches its terminal through routing.
//!
//! [`Stage`]: crate::graph::Stage

mod extraction;
mod guardrail;
mod policy;
mod summary;
mod validation;

pub use extraction::ExtractionStage;
pub use guardrail::GuardrailStage;
pub use policy::PolicyStage;
pub use summary::SummaryStage;
pub use validation::ValidationStage;

use std::time::Duration;

/// Deadline applied to each collaborator call unless overridden per stage.
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(30);
