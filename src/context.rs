//! The planning session state threaded through the classifier and emitters.

use std::collections::HashSet;

use crate::error::Diagnostic;
use crate::ports::{IndexCatalogPort, SchemaPort, ValueType};

/// An order-preserving set: insertion order is significant because it drives
/// the order predicates are emitted in downstream query text.
#[derive(Debug, Clone, Default)]
pub struct OrderedSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    pub fn insert(&mut self, value: impl Into<String>) {
        let value = value.into();
        if self.seen.insert(value.clone()) {
            self.order.push(value);
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Constructed once per request from `(root type, filter AST, index catalog
/// snapshot, schema snapshot)`. Mutated only by the classifier.
pub struct SearchContext<'a> {
    pub schema: &'a dyn SchemaPort,
    pub index_catalog: &'a dyn IndexCatalogPort,
    pub root_type: String,

    /// Attributes whose qualified form is present in the index catalog.
    pub index_filtered: OrderedSet,
    /// Attributes referenced but not indexed.
    pub graph_filtered: OrderedSet,
    /// Attributes referenced that belong to the entity (non-classification) type.
    pub entity_attributes: OrderedSet,
    /// Union of `index_filtered` and `graph_filtered`.
    pub all_attributes: OrderedSet,

    /// Resolved value type per (unqualified) attribute name, populated by the
    /// classifier for later use by the Gremlin emitter.
    pub attribute_types: std::collections::HashMap<String, ValueType>,

    /// Unqualified attribute name -> schema-resolved qualified name, populated
    /// by the classifier so emitters never need to re-resolve through the
    /// Schema Port.
    pub qualified_names: std::collections::HashMap<String, String>,

    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> SearchContext<'a> {
    pub fn new(schema: &'a dyn SchemaPort, index_catalog: &'a dyn IndexCatalogPort, root_type: impl Into<String>) -> Self {
        Self {
            schema,
            index_catalog,
            root_type: root_type.into(),
            index_filtered: OrderedSet::default(),
            graph_filtered: OrderedSet::default(),
            entity_attributes: OrderedSet::default(),
            all_attributes: OrderedSet::default(),
            attribute_types: std::collections::HashMap::new(),
            qualified_names: std::collections::HashMap::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn record_indexed(&mut self, attribute_name: &str) {
        self.index_filtered.insert(attribute_name);
        self.all_attributes.insert(attribute_name);
    }

    pub fn record_graph_only(&mut self, attribute_name: &str) {
        self.graph_filtered.insert(attribute_name);
        self.all_attributes.insert(attribute_name);
    }

    pub fn record_entity_attribute(&mut self, attribute_name: &str) {
        self.entity_attributes.insert(attribute_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_set_preserves_first_reference_order() {
        let mut set = OrderedSet::default();
        set.insert("b");
        set.insert("a");
        set.insert("b");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(set.len(), 2);
    }
}
