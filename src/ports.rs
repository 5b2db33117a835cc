//! Abstract collaborators the planner consumes but does not own.
//!
//! Plain `dyn`-compatible traits: the planner is generic over its schema and
//! index-catalog collaborators rather than owning them, so a caller can wire
//! in whatever schema registry and index snapshot its deployment has.

use std::collections::BTreeSet;

/// Normalized value type of an attribute, as resolved by the [`SchemaPort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    Keyword,
}

/// Schema Port — abstract view of entity and classification types.
pub trait SchemaPort {
    /// Qualify an attribute name to its fully-qualified form, e.g. `Asset.owner`.
    fn qualify(&self, type_name: &str, attr_name: &str) -> Option<String>;

    /// Whether `type_name` is an entity type (as opposed to a classification type).
    fn is_entity_type(&self, type_name: &str) -> bool;

    /// A pre-rendered `typeName` + all-subtypes clause body, e.g. `Table OR View`.
    fn subtype_closure(&self, type_name: &str) -> String;

    /// The normalized value type of an attribute.
    fn attribute_value_type(&self, type_name: &str, attr_name: &str) -> Option<ValueType>;

    /// Normalize a raw string value into its canonical form for `value_type`.
    /// Used only by the Gremlin emitter.
    fn normalize(&self, value_type: ValueType, raw: &str) -> String;
}

/// Index Catalog Port — the set of fully-qualified attribute names backed by
/// the index engine.
pub trait IndexCatalogPort {
    fn is_indexed(&self, qualified_name: &str) -> bool;

    /// Deterministic iteration order over the indexed key set.
    fn snapshot_keys(&self) -> BTreeSet<String>;
}

/// Graph Query Builder Port consumed by the Graph Query Emitter.
/// Implementations accumulate typed predicates into a query program.
/// `Default` gives the emitter a fresh top-level builder without depending
/// on a concrete type.
pub trait GraphQueryBuilder: Default {
    /// Render `attr op value` as a comparison predicate.
    fn has_comparison(&mut self, qualified_name: &str, operator: crate::ast::Operator, value: &str);

    /// Render `attr ~= pattern` as a regex/prefix match predicate.
    fn has_match(&mut self, qualified_name: &str, pattern: GraphMatchKind, value: &str);

    /// Start a fresh child query scope (used to compile one OR branch).
    fn create_child_query(&self) -> Self
    where
        Self: Sized;

    /// Merge `other`'s accumulated predicates into `self` under AND semantics.
    fn add_conditions_from(&mut self, other: Self)
    where
        Self: Sized;

    /// Combine a list of previously-compiled child queries with OR semantics.
    fn or(&mut self, children: Vec<Self>)
    where
        Self: Sized;
}

/// Match-style predicate kinds the graph emitter can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphMatchKind {
    Regex,
    Prefix,
}
