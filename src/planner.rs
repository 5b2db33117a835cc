//! Top-level planning entry point: ties the classifier, pushdown analyzer,
//! and three emitters together into the one artifact a caller actually
//! wants.
//!
//! This is the orchestration the [`crate::chain::ProcessorChain`]'s
//! index-then-graph / graph-only stages are built from; most callers only
//! need [`plan`] directly and never touch the chain.

use crate::ast::FilterNode;
use crate::classifier;
use crate::config::PlannerConfig;
use crate::context::SearchContext;
use crate::error::PlannerResult;
use crate::gremlin_emitter::{self, GremlinFragment};
use crate::index_emitter;
use crate::ports::GraphQueryBuilder;
use crate::{graph_emitter, graph_emitter::GraphQueryProgram};

/// The three emitted artifacts for one filter AST, plus the pushdown
/// verdict that decided whether the index query was produced at all.
pub struct Plan<B: GraphQueryBuilder = GraphQueryProgram> {
    /// Whether the AST could be split into an index pass plus a graph pass.
    /// `false` means `index_query` is `None` and `graph_query` covers the
    /// full AST rather than just the non-indexed residual.
    pub can_pushdown: bool,
    /// `Some` iff `can_pushdown`; the index engine's native query string.
    pub index_query: Option<String>,
    /// The graph query builder program: the residual when `can_pushdown`,
    /// the full AST otherwise.
    pub graph_query: B,
    /// The alternate full-AST Gremlin traversal fragment, always produced
    /// regardless of the pushdown verdict — it is a standalone backend, not
    /// conditioned on the split.
    pub gremlin: GremlinFragment,
}

/// Classify `ast` against `ctx`'s ports, decide pushdown, and emit all
/// three artifacts.
///
/// When pushdown fails, the index emitter is never invoked and the graph
/// emitter receives the full AST (via `ctx.all_attributes`); when it
/// succeeds, the graph emitter receives only the non-indexed residual
/// (`ctx.graph_filtered`).
pub fn plan<B: GraphQueryBuilder>(ctx: &mut SearchContext<'_>, ast: &FilterNode, config: &PlannerConfig) -> PlannerResult<Plan<B>> {
    let can_pushdown = classifier::classify_and_analyze(ctx, ast);

    let index_query = if can_pushdown {
        Some(index_emitter::emit(ctx, ast, config)?)
    } else {
        None
    };

    let graph_attributes = if can_pushdown {
        ctx.graph_filtered.clone()
    } else {
        ctx.all_attributes.clone()
    };
    let graph_query: B = graph_emitter::emit(ctx, ast, &graph_attributes);

    let gremlin = gremlin_emitter::emit(ctx, ast);

    Ok(Plan {
        can_pushdown,
        index_query,
        graph_query,
        gremlin,
    })
}
