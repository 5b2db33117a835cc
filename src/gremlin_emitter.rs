//! Gremlin Emitter.
//!
//! Alternate full-AST backend: renders every leaf into a Gremlin traversal
//! step with its value lifted into a synthetic binding (`__bind_<N>`),
//! independent of the index/graph split performed by the classifier. Group
//! handling mirrors [`crate::graph_emitter`]: AND concatenates steps, OR
//! opens one sub-traversal per child seeded with an identity step.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::ast::{Combinator, FilterNode, Operator};
use crate::context::SearchContext;
use crate::error::Diagnostic;
use crate::ports::ValueType;

/// The emitted Gremlin artifact: a traversal fragment plus its bindings map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GremlinFragment {
    pub traversal: String,
    pub bindings: BTreeMap<String, Value>,
}

fn predicate_name(operator: Operator) -> &'static str {
    match operator {
        Operator::Lt => "lt",
        Operator::Gt => "gt",
        Operator::Lte => "lte",
        Operator::Gte => "gte",
        Operator::Eq => "eq",
        Operator::Neq => "neq",
        Operator::In => "within",
        Operator::Like | Operator::Contains => "containing",
        Operator::StartsWith => "startingWith",
        Operator::EndsWith => "endingWith",
    }
}

fn bind(bindings: &mut BTreeMap<String, Value>, value_type: Option<ValueType>, schema_normalized: String) -> String {
    let name = format!("__bind_{}", bindings.len());
    let value = match value_type {
        Some(ValueType::Date) => schema_normalized
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or(Value::String(schema_normalized)),
        _ => Value::String(schema_normalized),
    };
    bindings.insert(name.clone(), value);
    name
}

fn render_leaf(
    ctx: &SearchContext<'_>,
    bindings: &mut BTreeMap<String, Value>,
    diagnostics: &mut Vec<Diagnostic>,
    attribute_name: &str,
    operator: Operator,
    value: &str,
) -> String {
    let Some(qn) = ctx.schema.qualify(&ctx.root_type, attribute_name) else {
        diagnostics.push(Diagnostic::warning(
            format!(
                "attribute '{}' could not be resolved against type '{}'; leaf dropped",
                attribute_name, ctx.root_type
            ),
            Some(attribute_name),
        ));
        return String::new();
    };

    let value_type = ctx.schema.attribute_value_type(&ctx.root_type, attribute_name);
    let normalized = match value_type {
        Some(vt) => ctx.schema.normalize(vt, value),
        None => value.to_string(),
    };
    let binding_name = bind(bindings, value_type, normalized);

    format!(".has('{qn}', P.{}({binding_name}))", predicate_name(operator))
}

fn render_node(
    ctx: &SearchContext<'_>,
    node: &FilterNode,
    bindings: &mut BTreeMap<String, Value>,
    diagnostics: &mut Vec<Diagnostic>,
) -> String {
    match node {
        FilterNode::Leaf {
            attribute_name,
            operator,
            value,
        } => render_leaf(ctx, bindings, diagnostics, attribute_name, *operator, value),
        FilterNode::Group { combinator, children } => {
            if children.is_empty() {
                return String::new();
            }
            match combinator {
                Combinator::And => children
                    .iter()
                    .map(|child| render_node(ctx, child, bindings, diagnostics))
                    .collect::<Vec<_>>()
                    .join(""),
                Combinator::Or => {
                    let branches: Vec<String> = children
                        .iter()
                        .map(|child| {
                            let inner = render_node(ctx, child, bindings, diagnostics);
                            format!("__.identity(){inner}")
                        })
                        .filter(|branch| branch != "__.identity()")
                        .collect();
                    if branches.is_empty() {
                        String::new()
                    } else {
                        format!(".or({})", branches.join(", "))
                    }
                }
            }
        }
    }
}

/// Render `ast` into a Gremlin traversal fragment plus its bindings map.
/// Re-running on identical inputs produces a byte-identical fragment and
/// bindings: the only source of non-determinism a naive implementation
/// could introduce — unordered map iteration — is avoided by keying
/// bindings on their insertion-order index.
pub fn emit(ctx: &mut SearchContext<'_>, ast: &FilterNode) -> GremlinFragment {
    let mut bindings = BTreeMap::new();
    let mut diagnostics = Vec::new();
    let traversal = render_node(ctx, ast, &mut bindings, &mut diagnostics);
    ctx.diagnostics.extend(diagnostics);
    GremlinFragment { traversal, bindings }
}
