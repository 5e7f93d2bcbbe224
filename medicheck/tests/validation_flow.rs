//! Integration tests for the validation pipeline: entry routing,
//! short-circuiting, end-to-end scenarios, and streaming.
//!
//! Tests are split into modules under `validation_flow/`:
//! - `common`: mock collaborator fixture with call counters
//! - `scenarios`: end-to-end guardrail/validation/policy/extraction outcomes
//! - `routing`: entry routing, short-circuit guarantees, idempotence
//! - `streaming`: per-stage event order

#[path = "validation_flow/common.rs"]
mod common;

#[path = "validation_flow/scenarios.rs"]
mod scenarios;

#[path = "validation_flow/routing.rs"]
mod routing;

#[path = "validation_flow/streaming.rs"]
mod streaming;
