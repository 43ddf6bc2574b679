use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{ColumnName, ModelError, SchemaRegistry};

/// Assignment of source columns to schema fields.
///
/// A complete mapping has exactly one entry per schema field; an unmapped
/// field is stored as `None`, never omitted. The same column may appear
/// under several fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Option<String>>",
    into = "BTreeMap<String, Option<String>>"
)]
pub struct Mapping {
    entries: BTreeMap<String, Option<ColumnName>>,
}

impl Mapping {
    /// A mapping with every registry field present and unmapped.
    pub fn unmapped(registry: &SchemaRegistry) -> Self {
        Self {
            entries: registry
                .field_names()
                .map(|name| (name.to_string(), None))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&ColumnName> {
        self.entries.get(field).and_then(Option::as_ref)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    /// Sets or clears the column for `field`, inserting the key if absent.
    pub fn set(&mut self, field: impl Into<String>, column: Option<ColumnName>) {
        self.entries.insert(field.into(), column);
    }

    /// Like [`Mapping::set`], but refuses fields the registry does not declare.
    pub fn assign(
        &mut self,
        registry: &SchemaRegistry,
        field: &str,
        column: Option<ColumnName>,
    ) -> Result<(), ModelError> {
        if !registry.contains(field) {
            return Err(ModelError::UnknownField(field.to_string()));
        }
        self.set(field, column);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ColumnName>)> {
        self.entries
            .iter()
            .map(|(field, column)| (field.as_str(), column.as_ref()))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Distinct columns referenced by at least one field.
    pub fn mapped_columns(&self) -> BTreeSet<&ColumnName> {
        self.entries.values().flatten().collect()
    }

    pub fn mapped_count(&self) -> usize {
        self.entries.values().filter(|column| column.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Only the mapped entries, as plain strings.
    pub fn to_assigned(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(field, column)| {
                column
                    .as_ref()
                    .map(|column| (field.clone(), column.as_str().to_string()))
            })
            .collect()
    }
}

impl TryFrom<BTreeMap<String, Option<String>>> for Mapping {
    type Error = ModelError;

    /// Blank column strings are read as "unmapped".
    fn try_from(raw: BTreeMap<String, Option<String>>) -> Result<Self, Self::Error> {
        let mut entries = BTreeMap::new();
        for (field, column) in raw {
            let column = match column {
                Some(value) if !value.trim().is_empty() => Some(ColumnName::new(value)?),
                _ => None,
            };
            entries.insert(field, column);
        }
        Ok(Self { entries })
    }
}

impl From<Mapping> for BTreeMap<String, Option<String>> {
    fn from(mapping: Mapping) -> Self {
        mapping
            .entries
            .into_iter()
            .map(|(field, column)| (field, column.map(String::from)))
            .collect()
    }
}
