//! Index Query Emitter.
//!
//! Renders the index-eligible projection of the Filter AST into the
//! engine's Lucene-like textual query language, driven by a fixed
//! operator-to-template table rather than a branching renderer.

use crate::ast::{Combinator, FilterNode, Operator};
use crate::config::PlannerConfig;
use crate::context::SearchContext;
use crate::error::{PlannerError, PlannerResult};

/// Reserved characters in the engine's query syntax that must be escaped
/// before a raw value is substituted into a template.
const RESERVED_CHARS: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\', '/',
];

/// Escape engine-reserved characters in a raw value.
/// Wraps the escaped value in double quotes when it contains whitespace, so a
/// multi-word value survives the engine's tokenizer as a single phrase.
pub fn escape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if RESERVED_CHARS.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    if out.contains(char::is_whitespace) {
        format!("\"{out}\"")
    } else {
        out
    }
}

/// Render one leaf's operator/value pair per the fixed template table.
fn render_template(operator: Operator, qn: &str, escaped_value: &str) -> String {
    match operator {
        Operator::Lt => format!("v.\"{qn}\": [* TO {escaped_value}}}"),
        Operator::Gt => format!("v.\"{qn}\": {{{escaped_value} TO *]"),
        Operator::Lte => format!("v.\"{qn}\": [* TO {escaped_value}]"),
        Operator::Gte => format!("v.\"{qn}\": [{escaped_value} TO *]"),
        Operator::Eq => format!("v.\"{qn}\": {escaped_value}"),
        Operator::Neq => format!("-v.\"{qn}\": {escaped_value}"),
        Operator::In => format!("v.\"{qn}\": ({escaped_value})"),
        Operator::Like => format!("v.\"{qn}\": ({escaped_value})"),
        Operator::StartsWith => format!("v.\"{qn}\": ({escaped_value}*)"),
        Operator::EndsWith => format!("v.\"{qn}\": (*{escaped_value})"),
        Operator::Contains => format!("v.\"{qn}\": (*{escaped_value}*)"),
    }
}

/// Post-emission check for stray connector patterns: `(AND  )`, `(OR  )`,
/// `(  )` for any run of whitespace. A cheap linear scan over
/// whitespace-collapsed text, rather than a regex dependency — the emitter
/// already guarantees it never joins an empty child, so this is a
/// double-check, not the primary mechanism.
fn check_no_stray_connectors(query: &str) -> PlannerResult<()> {
    let collapsed = query.split_whitespace().collect::<Vec<_>>().join(" ");
    for stray in ["( )", "(AND )", "(OR )"] {
        if collapsed.contains(stray) {
            return Err(PlannerError::MalformedEmission {
                detail: format!("query contains a stray `{stray}` connector"),
            });
        }
    }
    Ok(())
}

/// Result of rendering one AST node: the fragment text, and whether its
/// leftmost rendered leaf is a `NEQ` (needed by the parent Group to detect
/// a NEQ leaf at the start of a nested expression, which the index engine's
/// parser cannot accept).
struct Rendered {
    text: String,
    starts_with_neq: bool,
}

impl Rendered {
    fn empty() -> Self {
        Self {
            text: String::new(),
            starts_with_neq: false,
        }
    }
}

/// Render a single AST node to its index-query fragment. Returns the empty
/// string for empty groups and for leaves whose attribute is not in
/// `ctx.index_filtered`. Rejects — rather than silently emitting — a nested
/// Group whose leftmost rendered predicate is `NEQ`, since the index
/// engine's parser cannot accept a negated clause opening a nested
/// expression.
fn render_node(ctx: &SearchContext<'_>, node: &FilterNode, depth: usize) -> PlannerResult<Rendered> {
    match node {
        FilterNode::Leaf {
            attribute_name,
            operator,
            value,
        } => {
            if !ctx.index_filtered.contains(attribute_name) {
                return Ok(Rendered::empty());
            }
            let Some(qn) = ctx.qualified_names.get(attribute_name) else {
                return Ok(Rendered::empty());
            };
            Ok(Rendered {
                text: render_template(*operator, qn, &escape_value(value)),
                starts_with_neq: *operator == Operator::Neq,
            })
        }
        FilterNode::Group { combinator, children } => {
            if children.is_empty() {
                return Ok(Rendered::empty());
            }
            let mut rendered = Vec::with_capacity(children.len());
            for child in children {
                let fragment = render_node(ctx, child, depth + 1)?;
                if !fragment.text.is_empty() {
                    rendered.push(fragment);
                }
            }
            if rendered.is_empty() {
                return Ok(Rendered::empty());
            }

            if depth > 0 && rendered[0].starts_with_neq {
                return Err(PlannerError::MalformedEmission {
                    detail: format!(
                        "a NEQ leaf at the start of a nested `{combinator}` expression would be rejected by the index engine's parser"
                    ),
                });
            }

            let joined = rendered
                .iter()
                .map(|r| r.text.as_str())
                .collect::<Vec<_>>()
                .join(&format!(" {combinator} "));

            let text = if depth == 0 { joined } else { format!("({joined})") };
            Ok(Rendered {
                text,
                starts_with_neq: rendered[0].starts_with_neq,
            })
        }
    }
}

fn type_clause(ctx: &SearchContext<'_>, config: &PlannerConfig) -> PlannerResult<String> {
    let closure = ctx.schema.subtype_closure(&ctx.root_type);
    let clause = format!("v.\"__typeName\":({closure})");
    if clause.len() > config.max_query_str_length_types {
        return Err(PlannerError::LimitsExceeded {
            clause: "type",
            actual: clause.len(),
            max: config.max_query_str_length_types,
        });
    }
    Ok(clause)
}

fn state_clause(ctx: &SearchContext<'_>) -> Option<String> {
    if !ctx.schema.is_entity_type(&ctx.root_type) {
        return None;
    }
    let qn = ctx
        .schema
        .qualify(&ctx.root_type, "state")
        .unwrap_or_else(|| "Asset.state".to_string());
    Some(format!("v.\"{qn}\":ACTIVE"))
}

/// Emit the full index query string for `ast`.
///
/// Assembled as `typeClause [AND stateClause] [AND filterClause]`; each
/// clause is appended only if non-empty. Callers should only invoke this
/// after confirming [`crate::classifier::can_pushdown`] returned `true` —
/// when pushdown fails, this emitter should never be invoked at all.
pub fn emit(ctx: &mut SearchContext<'_>, ast: &FilterNode, config: &PlannerConfig) -> PlannerResult<String> {
    let type_clause = type_clause(ctx, config)?;
    let state_clause = state_clause(ctx);
    let filter_clause = render_node(ctx, ast, 0)?.text;

    if filter_clause.len() > config.max_query_str_length_tags {
        return Err(PlannerError::LimitsExceeded {
            clause: "tags",
            actual: filter_clause.len(),
            max: config.max_query_str_length_tags,
        });
    }

    let mut clauses = vec![type_clause];
    if let Some(state) = state_clause {
        clauses.push(state);
    }
    if !filter_clause.is_empty() {
        clauses.push(filter_clause);
    }
    let query = clauses.join(" AND ");

    check_no_stray_connectors(&query)?;
    Ok(query)
}
