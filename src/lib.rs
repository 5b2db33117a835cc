//! hsp — hybrid index/graph pushdown planner.
//!
//! Given a structured filter expression over a typed entity schema, decides
//! which predicates are cheap enough to push into a full-text/secondary
//! index engine and which residual predicates must be re-checked against a
//! graph query engine, then emits the corresponding index query string,
//! graph query builder program, and an alternate Gremlin traversal
//! fragment.
//!
//! This crate plans and emits queries; it does not execute them.

pub mod ast;
pub mod chain;
pub mod classifier;
pub mod config;
pub mod context;
pub mod error;
pub mod graph_emitter;
pub mod gremlin_emitter;
pub mod index_emitter;
pub mod planner;
pub mod ports;

#[cfg(test)]
mod test_support;

pub use ast::{Combinator, FilterNode, Operator};
pub use error::{PlannerError, PlannerResult};
pub use planner::{plan, Plan};
