//! # MediCheck
//!
//! Clinical-summary validation for insurance approval, driven by a small
//! conditional stage-graph engine: one shared **state-in, state-out** struct
//! flows through named stages connected by routers, one active path per run.
//!
//! ## Design principles
//!
//! - **Single state type**: every run threads one [`FlowState`] through the
//!   stages it visits; fields are declared up front, no ad hoc keys.
//! - **Stages evaluate, routers route**: a [`Stage`] mutates the state
//!   (usually via one collaborator call) and never picks its successor; a
//!   router is a pure function of the post-stage state.
//! - **Build once, run many**: [`FlowGraph::build`] validates stage
//!   references and acyclicity at construction; the resulting
//!   [`CompiledFlow`] is immutable and shared across concurrent runs.
//! - **Failures stay in the state**: a collaborator error (timeout included)
//!   becomes failure-default flags plus a user-facing message, never a
//!   propagated error.
//!
//! ## Main modules
//!
//! - [`graph`]: `FlowGraph`, `CompiledFlow`, `Stage`, `StageId`, `Next`.
//! - [`state`]: `FlowState` and the derived `ValidationReport`.
//! - [`stages`]: extraction, guardrail, validation, policy, and summary stages.
//! - [`collab`]: collaborator traits, scripted mocks, and (feature `openai`)
//!   LLM-backed implementations.
//! - [`flows`]: the prebuilt validation and summary flows behind [`Pipeline`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use medicheck::collab::mock::{
//!     MockExtractor, MockGuardrail, MockPolicy, MockSummarizer, MockValidator,
//! };
//! use medicheck::{Collaborators, FlowState, Pipeline, ValidationReport};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let collabs = Collaborators {
//!     guardrail: Arc::new(MockGuardrail::approve()),
//!     validator: Arc::new(MockValidator::valid()),
//!     policy: Arc::new(MockPolicy::approve("Approved.")),
//!     extractor: Arc::new(MockExtractor::document(serde_json::json!({}))),
//!     summarizer: Arc::new(MockSummarizer::text("Prose summary.")),
//! };
//! let pipeline = Pipeline::new(&collabs).expect("flows build");
//! let state = FlowState::from_document(serde_json::json!({"hpi": {}}));
//! let report = ValidationReport::from(pipeline.validate(state).await.unwrap());
//! assert!(report.approved);
//! # }
//! ```

pub mod collab;
pub mod error;
pub mod flows;
pub mod graph;
pub mod stages;
pub mod state;
pub mod stream;

pub use error::FlowError;
pub use flows::{summary_flow, validation_flow, Collaborators, Pipeline};
pub use graph::{BuildError, CompiledFlow, FlowGraph, Next, Router, Stage, StageId};
pub use state::{FlowState, ValidationReport};
pub use stream::FlowEvent;
