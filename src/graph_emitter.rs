//! Graph Query Emitter.
//!
//! Builds a graph query program by invoking the [`GraphQueryBuilder`] port
//! with typed predicates. `GraphQueryProgram` is the crate's own concrete
//! builder — a small textual stand-in for a real graph query DSL, assembled
//! bottom-up from typed nodes the same way a generated query tree is built
//! up from its leaves before rendering.

use crate::ast::{Combinator, FilterNode, Operator};
use crate::context::{OrderedSet, SearchContext};
use crate::error::{Diagnostic, PlannerError};
use crate::ports::{GraphMatchKind, GraphQueryBuilder};

/// Concrete [`GraphQueryBuilder`]: accumulates predicates as strings and
/// composes them with `and(...)`/`or(...)` wrappers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphQueryProgram {
    conditions: Vec<String>,
}

impl GraphQueryProgram {
    /// Render the accumulated conditions of this scope as a single fragment.
    /// A scope with one condition renders bare; more than one is wrapped in
    /// `and(...)`. An empty scope renders to the empty string.
    pub fn render(&self) -> String {
        match self.conditions.as_slice() {
            [] => String::new(),
            [only] => only.clone(),
            many => format!("and({})", many.join(", ")),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl GraphQueryBuilder for GraphQueryProgram {
    fn has_comparison(&mut self, qualified_name: &str, operator: Operator, value: &str) {
        self.conditions
            .push(format!("has({qualified_name},{operator:?},{value})"));
    }

    fn has_match(&mut self, qualified_name: &str, pattern: GraphMatchKind, value: &str) {
        let tag = match pattern {
            GraphMatchKind::Regex => "REGEX",
            GraphMatchKind::Prefix => "PREFIX",
        };
        self.conditions
            .push(format!("has({qualified_name},{tag},\"{value}\")"));
    }

    fn create_child_query(&self) -> Self {
        Self::default()
    }

    fn add_conditions_from(&mut self, other: Self) {
        self.conditions.extend(other.conditions);
    }

    fn or(&mut self, children: Vec<Self>) {
        let rendered: Vec<String> = children
            .into_iter()
            .map(|child| child.render())
            .filter(|s| !s.is_empty())
            .collect();
        if rendered.is_empty() {
            return;
        }
        self.conditions.push(format!("or({})", rendered.join(", ")));
    }
}

/// Emit the graph query program for `ast` into a fresh builder of type `B`.
///
/// `graph_attributes` names the attribute set this call should render — the
/// caller's choice. [`crate::planner`] passes `ctx.graph_filtered` (the
/// residual) when pushdown succeeded and `ctx.all_attributes` (the whole
/// AST) when it didn't, since a failed pushdown means the full filter has
/// to be re-checked by the graph engine rather than just its residual.
/// Leaves outside that set are silently skipped. `IN` is unsupported and is
/// dropped with a diagnostic regardless of membership.
pub fn emit<B: GraphQueryBuilder>(ctx: &mut SearchContext<'_>, ast: &FilterNode, graph_attributes: &OrderedSet) -> B {
    let mut builder = B::default();
    emit_node(ctx, ast, graph_attributes, &mut builder);
    builder
}

fn emit_node<B: GraphQueryBuilder>(
    ctx: &mut SearchContext<'_>,
    node: &FilterNode,
    graph_attributes: &OrderedSet,
    builder: &mut B,
) {
    match node {
        FilterNode::Leaf {
            attribute_name,
            operator,
            value,
        } => emit_leaf(ctx, attribute_name, *operator, value, graph_attributes, builder),
        FilterNode::Group { combinator, children } => {
            if children.is_empty() {
                return;
            }
            match combinator {
                Combinator::And => {
                    for child in children {
                        let mut child_query = builder.create_child_query();
                        emit_node(ctx, child, graph_attributes, &mut child_query);
                        builder.add_conditions_from(child_query);
                    }
                }
                Combinator::Or => {
                    let mut compiled = Vec::with_capacity(children.len());
                    for child in children {
                        let mut child_query = builder.create_child_query();
                        emit_node(ctx, child, graph_attributes, &mut child_query);
                        compiled.push(child_query);
                    }
                    builder.or(compiled);
                }
            }
        }
    }
}

fn emit_leaf<B: GraphQueryBuilder>(
    ctx: &mut SearchContext<'_>,
    attribute_name: &str,
    operator: Operator,
    value: &str,
    graph_attributes: &OrderedSet,
    builder: &mut B,
) {
    if !graph_attributes.contains(attribute_name) {
        return;
    }
    let Some(qn) = ctx.qualified_names.get(attribute_name).cloned() else {
        return;
    };

    match operator {
        Operator::Lt | Operator::Gt | Operator::Lte | Operator::Gte | Operator::Eq | Operator::Neq => {
            builder.has_comparison(&qn, operator, value);
        }
        Operator::Like | Operator::Contains => {
            builder.has_match(&qn, GraphMatchKind::Regex, &format!(".*{value}.*"));
        }
        Operator::EndsWith => {
            builder.has_match(&qn, GraphMatchKind::Regex, &format!(".*{value}"));
        }
        Operator::StartsWith => {
            builder.has_match(&qn, GraphMatchKind::Prefix, value);
        }
        Operator::In => {
            ctx.diagnostics.push(Diagnostic::warning(
                PlannerError::UnsupportedOperator {
                    operator,
                    emitter: "graph",
                }
                .to_string(),
                Some(attribute_name),
            ));
        }
    }
}

/// A hand-rolled recording builder used only in tests, to assert the exact
/// sequence of port calls the emitter makes rather than just the rendered
/// text. Each call appends one line to `log`; child scopes carry their own
/// log forward through `add_conditions_from`/`or` so a parent can see calls
/// made while compiling its children.
#[cfg(test)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingGraphQueryBuilder {
    pub log: Vec<String>,
}

#[cfg(test)]
impl GraphQueryBuilder for RecordingGraphQueryBuilder {
    fn has_comparison(&mut self, qualified_name: &str, operator: Operator, value: &str) {
        self.log
            .push(format!("has_comparison({qualified_name}, {operator:?}, {value})"));
    }

    fn has_match(&mut self, qualified_name: &str, pattern: GraphMatchKind, value: &str) {
        self.log
            .push(format!("has_match({qualified_name}, {pattern:?}, {value})"));
    }

    fn create_child_query(&self) -> Self {
        Self::default()
    }

    fn add_conditions_from(&mut self, other: Self) {
        self.log.push("add_conditions_from(child)".to_string());
        self.log.extend(other.log);
    }

    fn or(&mut self, children: Vec<Self>) {
        self.log.push(format!("or({} children)", children.len()));
        for child in children {
            self.log.extend(child.log);
        }
    }
}
