//! Attribute Classifier + Pushdown Analyzer.
//!
//! Classification (resolving each leaf's attribute against the schema and
//! index catalog) and pushdown analysis (deciding whether the AST can be
//! split into an index pass plus a graph pass) are folded into a single
//! pre-order traversal (`classify_and_analyze`) that populates the
//! [`SearchContext`]'s attribute sets AND returns the pushdown boolean in
//! one pass. `classify` and `can_pushdown` are thin wrappers kept for API
//! clarity (and for the property tests in the test suite) — each runs the
//! same traversal; callers that need both should call
//! [`classify_and_analyze`] directly rather than both wrappers, since the
//! traversal mutates `ctx.diagnostics` on every run.

use crate::ast::{Combinator, FilterNode};
use crate::context::SearchContext;
use crate::error::Diagnostic;

/// Classify every leaf's attribute in `ast` against `ctx`'s ports and decide
/// whether the AST can be split into an index pass plus a graph pass.
///
/// Rule: the AST can be split **iff** no Leaf whose qualified attribute is
/// not in the index catalog appears anywhere under an OR node.
pub fn classify_and_analyze(ctx: &mut SearchContext<'_>, ast: &FilterNode) -> bool {
    walk(ctx, ast, false)
}

/// Thin wrapper: classify attribute sets only, discarding the pushdown
/// verdict. See module docs for why this isn't free to combine with
/// [`can_pushdown`] in the same planning session.
pub fn classify(ctx: &mut SearchContext<'_>, ast: &FilterNode) {
    let _ = classify_and_analyze(ctx, ast);
}

/// Thin wrapper: run the combined walk and return only the pushdown verdict.
pub fn can_pushdown(ctx: &mut SearchContext<'_>, ast: &FilterNode) -> bool {
    classify_and_analyze(ctx, ast)
}

fn walk(ctx: &mut SearchContext<'_>, node: &FilterNode, inside_or: bool) -> bool {
    match node {
        FilterNode::Leaf {
            attribute_name,
            value: _,
            operator: _,
        } => walk_leaf(ctx, attribute_name, inside_or),
        FilterNode::Group {
            combinator,
            children,
        } => {
            let child_inside_or = inside_or || *combinator == Combinator::Or;
            let mut splittable = true;
            for child in children {
                if !walk(ctx, child, child_inside_or) {
                    splittable = false;
                }
            }
            splittable
        }
    }
}

fn walk_leaf(ctx: &mut SearchContext<'_>, attribute_name: &str, inside_or: bool) -> bool {
    let Some(qualified) = ctx.schema.qualify(&ctx.root_type, attribute_name) else {
        ctx.diagnostics.push(Diagnostic::warning(
            format!(
                "attribute '{}' could not be resolved against type '{}'; leaf dropped",
                attribute_name, ctx.root_type
            ),
            Some(attribute_name),
        ));
        return true;
    };

    if let Some(value_type) = ctx.schema.attribute_value_type(&ctx.root_type, attribute_name) {
        ctx.attribute_types.insert(attribute_name.to_string(), value_type);
    }
    ctx.qualified_names
        .insert(attribute_name.to_string(), qualified.clone());

    if ctx.schema.is_entity_type(&ctx.root_type) {
        ctx.record_entity_attribute(attribute_name);
    }

    if ctx.index_catalog.is_indexed(&qualified) {
        ctx.record_indexed(attribute_name);
        true
    } else {
        ctx.record_graph_only(attribute_name);
        if inside_or {
            ctx.diagnostics.push(Diagnostic::warning(
                format!(
                    "attribute '{}' is not indexed and appears under OR — plan will not be split",
                    attribute_name
                ),
                Some(attribute_name),
            ));
            false
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operator;
    use crate::test_support::{FixtureIndexCatalog, FixtureSchema};

    fn ctx<'a>(schema: &'a FixtureSchema, catalog: &'a FixtureIndexCatalog) -> SearchContext<'a> {
        SearchContext::new(schema, catalog, "Table")
    }

    #[test]
    fn and_of_indexed_leaves_is_splittable() {
        let schema = FixtureSchema::asset_like();
        let catalog = FixtureIndexCatalog::with_indexed(["Asset.name", "Asset.owner"]);
        let mut c = ctx(&schema, &catalog);
        let ast = FilterNode::and(vec![
            FilterNode::leaf("name", Operator::Eq, "foo"),
            FilterNode::leaf("owner", Operator::Eq, "bob"),
        ]);
        assert!(classify_and_analyze(&mut c, &ast));
        assert_eq!(c.index_filtered.iter().collect::<Vec<_>>(), vec!["name", "owner"]);
        assert!(c.graph_filtered.is_empty());
    }

    #[test]
    fn or_with_non_indexed_leaf_blocks_pushdown() {
        let schema = FixtureSchema::asset_like();
        let catalog = FixtureIndexCatalog::with_indexed(["Asset.name"]);
        let mut c = ctx(&schema, &catalog);
        let ast = FilterNode::or(vec![
            FilterNode::leaf("name", Operator::Eq, "foo"),
            FilterNode::leaf("comment", Operator::Contains, "bar"),
        ]);
        assert!(!classify_and_analyze(&mut c, &ast));
        assert!(c.graph_filtered.contains("comment"));
    }

    #[test]
    fn non_indexed_leaf_on_and_path_under_sibling_or_still_splittable() {
        // size GT 100 AND (owner EQ a OR owner EQ b), all indexed -> splittable.
        let schema = FixtureSchema::asset_like();
        let catalog = FixtureIndexCatalog::with_indexed(["Asset.size", "Asset.owner"]);
        let mut c = ctx(&schema, &catalog);
        let ast = FilterNode::and(vec![
            FilterNode::leaf("size", Operator::Gt, "100"),
            FilterNode::or(vec![
                FilterNode::leaf("owner", Operator::Eq, "a"),
                FilterNode::leaf("owner", Operator::Eq, "b"),
            ]),
        ]);
        assert!(classify_and_analyze(&mut c, &ast));
    }

    #[test]
    fn unknown_attribute_is_dropped_with_diagnostic() {
        let schema = FixtureSchema::asset_like();
        let catalog = FixtureIndexCatalog::with_indexed(["Asset.name"]);
        let mut c = ctx(&schema, &catalog);
        let ast = FilterNode::leaf("nope", Operator::Eq, "x");
        assert!(classify_and_analyze(&mut c, &ast));
        assert!(c.all_attributes.is_empty());
        assert_eq!(c.diagnostics.len(), 1);
    }

    #[test]
    fn classification_is_idempotent_for_attribute_sets() {
        let schema = FixtureSchema::asset_like();
        let catalog = FixtureIndexCatalog::with_indexed(["Asset.name"]);
        let mut c = ctx(&schema, &catalog);
        let ast = FilterNode::leaf("name", Operator::Eq, "foo");
        classify(&mut c, &ast);
        let first: Vec<_> = c.index_filtered.iter().map(str::to_owned).collect();
        classify(&mut c, &ast);
        let second: Vec<_> = c.index_filtered.iter().map(str::to_owned).collect();
        assert_eq!(first, second);
    }
}
