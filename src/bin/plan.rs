//! CLI demo binary: reads a JSON filter AST plus a toy schema/index-catalog
//! fixture and prints the three emitted artifacts, for manual exercise of
//! the planner from the command line.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hsp::ast::FilterNode;
use hsp::config::PlannerConfig;
use hsp::context::SearchContext;
use hsp::graph_emitter::GraphQueryProgram;
use hsp::planner::{self, Plan};
use hsp::ports::{IndexCatalogPort, SchemaPort, ValueType};
use serde::Deserialize;

#[derive(Parser)]
#[command(author, version, about = "Plan a filter AST against a toy schema/index fixture")]
struct Cli {
    /// Path to a JSON fixture describing the schema and index catalog.
    #[arg(long)]
    fixture: PathBuf,

    /// Path to a JSON-encoded [`FilterNode`] AST.
    #[arg(long)]
    filter: PathBuf,

    /// Root type to plan against (must appear in the fixture's entity/
    /// classification type lists).
    #[arg(long)]
    root_type: String,
}

#[derive(Deserialize)]
struct Fixture {
    entity_types: HashSet<String>,
    #[serde(default)]
    subtype_closures: HashMap<String, String>,
    attributes: HashMap<String, String>,
    qualify_prefix: String,
    indexed: BTreeSet<String>,
}

struct JsonSchema {
    fixture: Fixture,
}

fn parse_value_type(raw: &str) -> ValueType {
    match raw {
        "Integer" => ValueType::Integer,
        "Float" => ValueType::Float,
        "Boolean" => ValueType::Boolean,
        "Date" => ValueType::Date,
        "Keyword" => ValueType::Keyword,
        _ => ValueType::Text,
    }
}

impl SchemaPort for JsonSchema {
    fn qualify(&self, _type_name: &str, attr_name: &str) -> Option<String> {
        if self.fixture.attributes.contains_key(attr_name) {
            Some(format!("{}.{attr_name}", self.fixture.qualify_prefix))
        } else {
            None
        }
    }

    fn is_entity_type(&self, type_name: &str) -> bool {
        self.fixture.entity_types.contains(type_name)
    }

    fn subtype_closure(&self, type_name: &str) -> String {
        self.fixture
            .subtype_closures
            .get(type_name)
            .cloned()
            .unwrap_or_else(|| type_name.to_string())
    }

    fn attribute_value_type(&self, _type_name: &str, attr_name: &str) -> Option<ValueType> {
        self.fixture.attributes.get(attr_name).map(|s| parse_value_type(s))
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

struct JsonIndexCatalog {
    indexed: BTreeSet<String>,
}

impl IndexCatalogPort for JsonIndexCatalog {
    fn is_indexed(&self, qualified_name: &str) -> bool {
        self.indexed.contains(qualified_name)
    }

    fn snapshot_keys(&self) -> BTreeSet<String> {
        self.indexed.clone()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let fixture_raw = fs::read_to_string(&cli.fixture)
        .with_context(|| format!("reading fixture file {}", cli.fixture.display()))?;
    let fixture: Fixture = serde_json::from_str(&fixture_raw).context("parsing fixture JSON")?;

    let filter_raw =
        fs::read_to_string(&cli.filter).with_context(|| format!("reading filter file {}", cli.filter.display()))?;
    let ast: FilterNode = serde_json::from_str(&filter_raw).context("parsing filter AST JSON")?;

    let catalog = JsonIndexCatalog {
        indexed: fixture.indexed.clone(),
    };
    let schema = JsonSchema { fixture };
    let config = PlannerConfig::default();

    let mut ctx = SearchContext::new(&schema, &catalog, cli.root_type);
    let result: Plan<GraphQueryProgram> = planner::plan(&mut ctx, &ast, &config)?;

    println!("can_pushdown: {}", result.can_pushdown);
    match &result.index_query {
        Some(q) => println!("index_query: {q}"),
        None => println!("index_query: <skipped>"),
    }
    println!("graph_query: {}", result.graph_query.render());

    println!("gremlin_traversal: {}", result.gremlin.traversal);
    println!("gremlin_bindings: {:?}", result.gremlin.bindings);

    if !ctx.diagnostics.is_empty() {
        eprintln!("diagnostics:");
        for diagnostic in &ctx.diagnostics {
            eprintln!("  [{}] {}", diagnostic.severity, diagnostic.message);
        }
    }

    Ok(())
}
