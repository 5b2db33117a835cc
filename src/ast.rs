//! Filter AST
//!
//! The structured filter expression planned by this crate: trees of AND/OR
//! nodes over leaf predicates `(attributeName, operator, value)`.
//!
//! # Example
//!
//! ```
//! use hsp::ast::{Combinator, FilterNode, Operator};
//!
//! let ast = FilterNode::group(
//!     Combinator::And,
//!     vec![
//!         FilterNode::leaf("name", Operator::Eq, "foo"),
//!         FilterNode::leaf("owner", Operator::Eq, "bob"),
//!     ],
//! );
//! assert!(matches!(ast, FilterNode::Group { .. }));
//! ```

use serde::{Deserialize, Serialize};

/// Attribute comparison operator. Closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Lt,
    Gt,
    Lte,
    Gte,
    Eq,
    Neq,
    In,
    Like,
    StartsWith,
    EndsWith,
    Contains,
}

impl Operator {
    /// True for operators that compare a scalar value (`<`, `>`, `=`, ...).
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Operator::Lt
                | Operator::Gt
                | Operator::Lte
                | Operator::Gte
                | Operator::Eq
                | Operator::Neq
        )
    }
}

/// Boolean combinator for a Group node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Combinator {
    And,
    Or,
}

impl std::fmt::Display for Combinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Combinator::And => write!(f, "AND"),
            Combinator::Or => write!(f, "OR"),
        }
    }
}

/// A node in the Filter AST: either a leaf predicate or a combinator group.
///
/// Children order is preserved and affects emitted query text but not
/// semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FilterNode {
    Leaf {
        #[serde(rename = "attributeName")]
        attribute_name: String,
        operator: Operator,
        value: String,
    },
    Group {
        combinator: Combinator,
        children: Vec<FilterNode>,
    },
}

impl FilterNode {
    pub fn leaf(attribute_name: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        FilterNode::Leaf {
            attribute_name: attribute_name.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn group(combinator: Combinator, children: Vec<FilterNode>) -> Self {
        FilterNode::Group { combinator, children }
    }

    pub fn and(children: Vec<FilterNode>) -> Self {
        Self::group(Combinator::And, children)
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        Self::group(Combinator::Or, children)
    }

    /// True for a Group with no children — contributes nothing to emission.
    pub fn is_empty_group(&self) -> bool {
        matches!(self, FilterNode::Group { children, .. } if children.is_empty())
    }
}
