//! End-to-end coverage of `hsp::plan` against a toy schema, exercised the
//! way a real caller would: build a context, hand it an AST, read off all
//! three emitted artifacts.

use std::collections::{BTreeSet, HashMap, HashSet};

use hsp::ast::{FilterNode, Operator};
use hsp::config::PlannerConfig;
use hsp::context::SearchContext;
use hsp::graph_emitter::GraphQueryProgram;
use hsp::gremlin_emitter;
use hsp::planner::{self, Plan};
use hsp::ports::{IndexCatalogPort, SchemaPort, ValueType};

struct AssetSchema {
    entity_types: HashSet<&'static str>,
    attributes: HashMap<&'static str, ValueType>,
}

impl AssetSchema {
    fn new() -> Self {
        let mut entity_types = HashSet::new();
        entity_types.insert("Table");
        entity_types.insert("View");
        entity_types.insert("Asset");

        let mut attributes = HashMap::new();
        attributes.insert("name", ValueType::Text);
        attributes.insert("owner", ValueType::Text);
        attributes.insert("comment", ValueType::Text);
        attributes.insert("size", ValueType::Integer);
        attributes.insert("createdAt", ValueType::Date);

        Self {
            entity_types,
            attributes,
        }
    }
}

impl SchemaPort for AssetSchema {
    fn qualify(&self, _type_name: &str, attr_name: &str) -> Option<String> {
        self.attributes.contains_key(attr_name).then(|| format!("Asset.{attr_name}"))
    }

    fn is_entity_type(&self, type_name: &str) -> bool {
        self.entity_types.contains(type_name)
    }

    fn subtype_closure(&self, type_name: &str) -> String {
        match type_name {
            "Table" => "Table OR View".to_string(),
            other => other.to_string(),
        }
    }

    fn attribute_value_type(&self, _type_name: &str, attr_name: &str) -> Option<ValueType> {
        self.attributes.get(attr_name).copied()
    }

    fn normalize(&self, value_type: ValueType, raw: &str) -> String {
        match value_type {
            ValueType::Date => chrono::DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.timestamp_millis().to_string())
                .unwrap_or_else(|_| raw.to_string()),
            _ => raw.to_string(),
        }
    }
}

struct IndexedAttributes(BTreeSet<String>);

impl IndexCatalogPort for IndexedAttributes {
    fn is_indexed(&self, qualified_name: &str) -> bool {
        self.0.contains(qualified_name)
    }

    fn snapshot_keys(&self) -> BTreeSet<String> {
        self.0.clone()
    }
}

fn indexed(names: &[&str]) -> IndexedAttributes {
    IndexedAttributes(names.iter().map(|s| s.to_string()).collect())
}

#[test]
fn fully_indexed_and_expression_splits_with_empty_graph_residual() {
    let schema = AssetSchema::new();
    let catalog = indexed(&["Asset.name", "Asset.owner"]);
    let mut ctx = SearchContext::new(&schema, &catalog, "Table");
    let ast = FilterNode::and(vec![
        FilterNode::leaf("name", Operator::Eq, "foo"),
        FilterNode::leaf("owner", Operator::Eq, "bob"),
    ]);
    let config = PlannerConfig::default();

    let result: Plan<GraphQueryProgram> = planner::plan(&mut ctx, &ast, &config).expect("plan succeeds");

    assert!(result.can_pushdown);
    let index_query = result.index_query.expect("index query produced");
    assert!(index_query.contains(r#"v."Asset.name": foo"#));
    assert!(index_query.contains(r#"v."Asset.owner": bob"#));
    assert!(result.graph_query.is_empty());
    assert!(ctx.diagnostics.is_empty());
}

#[test]
fn or_with_non_indexed_leaf_falls_back_to_full_graph_pass() {
    let schema = AssetSchema::new();
    let catalog = indexed(&["Asset.name"]);
    let mut ctx = SearchContext::new(&schema, &catalog, "Table");
    let ast = FilterNode::or(vec![
        FilterNode::leaf("name", Operator::Eq, "foo"),
        FilterNode::leaf("comment", Operator::Contains, "bar"),
    ]);
    let config = PlannerConfig::default();

    let result: Plan<GraphQueryProgram> = planner::plan(&mut ctx, &ast, &config).expect("plan succeeds");

    assert!(!result.can_pushdown);
    assert!(result.index_query.is_none());
    assert_eq!(
        result.graph_query.render(),
        r#"or(has(Asset.name,Eq,foo), has(Asset.comment,REGEX,".*bar.*"))"#
    );
    assert!(ctx.diagnostics.iter().any(|d| d.message.contains("not indexed")));
}

#[test]
fn gremlin_fragment_is_produced_regardless_of_pushdown_outcome() {
    let schema = AssetSchema::new();
    let catalog = indexed(&["Asset.name"]);
    let mut ctx = SearchContext::new(&schema, &catalog, "Table");
    let ast = FilterNode::and(vec![
        FilterNode::leaf("name", Operator::Eq, "foo"),
        FilterNode::leaf("createdAt", Operator::Gte, "2024-01-01"),
    ]);
    let config = PlannerConfig::default();

    let result: Plan<GraphQueryProgram> = planner::plan(&mut ctx, &ast, &config).expect("plan succeeds");
    assert!(result.can_pushdown);

    assert_eq!(
        result.gremlin.traversal,
        ".has('Asset.name', P.eq(__bind_0)).has('Asset.createdAt', P.gte(__bind_1))"
    );
    assert_eq!(result.gremlin.bindings.len(), 2);
}

#[test]
fn unknown_root_type_yields_no_entity_attributes() {
    let schema = AssetSchema::new();
    let catalog = indexed(&["Asset.name"]);
    let mut ctx = SearchContext::new(&schema, &catalog, "Classification");
    let ast = FilterNode::leaf("name", Operator::Eq, "foo");
    let config = PlannerConfig::default();

    let _result: Plan<GraphQueryProgram> = planner::plan(&mut ctx, &ast, &config).expect("plan succeeds");
    assert!(ctx.entity_attributes.is_empty());
    assert!(ctx.index_filtered.contains("name"));
}

#[test]
fn rerunning_gremlin_emit_on_identical_ast_is_deterministic() {
    let schema = AssetSchema::new();
    let catalog = indexed(&[]);
    let ast = FilterNode::and(vec![
        FilterNode::leaf("name", Operator::Eq, "foo"),
        FilterNode::leaf("size", Operator::Gt, "10"),
    ]);

    let mut ctx1 = SearchContext::new(&schema, &catalog, "Table");
    let fragment1 = gremlin_emitter::emit(&mut ctx1, &ast);
    let mut ctx2 = SearchContext::new(&schema, &catalog, "Table");
    let fragment2 = gremlin_emitter::emit(&mut ctx2, &ast);

    assert_eq!(fragment1, fragment2);
}
