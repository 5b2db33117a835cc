//! Shared test fixtures for the port traits.
//!
//! Lightweight stand-ins for a real schema registry / index-key catalog.

#![cfg(test)]

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::ports::{IndexCatalogPort, SchemaPort, ValueType};

/// A toy schema over an `Asset` entity type (with subtypes `Table`, `View`)
/// and a `Tag` classification type.
pub struct FixtureSchema {
    entity_types: HashSet<&'static str>,
    attributes: HashMap<&'static str, ValueType>,
}

impl FixtureSchema {
    pub fn asset_like() -> Self {
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
        attributes.insert("tag", ValueType::Keyword);

        Self {
            entity_types,
            attributes,
        }
    }
}

impl SchemaPort for FixtureSchema {
    fn qualify(&self, _type_name: &str, attr_name: &str) -> Option<String> {
        if self.attributes.contains_key(attr_name) {
            Some(format!("Asset.{attr_name}"))
        } else {
            None
        }
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
            ValueType::Date => {
                let millis = chrono::DateTime::parse_from_rfc3339(raw)
                    .map(|dt| dt.timestamp_millis())
                    .or_else(|_| {
                        chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| {
                            d.and_hms_opt(0, 0, 0)
                                .expect("midnight is always valid")
                                .and_utc()
                                .timestamp_millis()
                        })
                    })
                    .unwrap_or(0);
                millis.to_string()
            }
            _ => raw.to_string(),
        }
    }
}

/// An index catalog where only the given qualified names are indexed.
pub struct FixtureIndexCatalog {
    indexed: BTreeSet<String>,
}

impl FixtureIndexCatalog {
    pub fn with_indexed<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            indexed: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl IndexCatalogPort for FixtureIndexCatalog {
    fn is_indexed(&self, qualified_name: &str) -> bool {
        self.indexed.contains(qualified_name)
    }

    fn snapshot_keys(&self) -> BTreeSet<String> {
        self.indexed.clone()
    }
}
