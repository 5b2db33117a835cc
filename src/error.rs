//! Error and diagnostic types.
//!
//! Splits recoverable issues from structural ones: a side-channel, per-leaf
//! [`Diagnostic`] (recovered locally, logged, leaf dropped) versus a
//! [`PlannerError`] that fails the plan outright.

use thiserror::Error;

use crate::ast::Operator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single recoverable planning diagnostic, collected on the [`crate::context::SearchContext`].
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn warning(message: impl Into<String>, attribute: Option<&str>) -> Self {
        let diagnostic = Self {
            severity: Severity::Warning,
            message: message.into(),
            attribute: attribute.map(str::to_owned),
        };
        log::warn!("{}", diagnostic.message);
        diagnostic
    }
}

/// Structural/invariant errors that fail the plan.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlannerError {
    #[error("attribute '{attribute}' could not be resolved against type '{type_name}'")]
    SchemaResolution { attribute: String, type_name: String },

    #[error("operator {operator:?} is not supported by the {emitter} emitter")]
    UnsupportedOperator { operator: Operator, emitter: &'static str },

    #[error("emission produced a malformed fragment: {detail}")]
    MalformedEmission { detail: String },

    #[error("{clause} clause length {actual} exceeds configured maximum {max}")]
    LimitsExceeded {
        clause: &'static str,
        actual: usize,
        max: usize,
    },
}

pub type PlannerResult<T> = Result<T, PlannerError>;
