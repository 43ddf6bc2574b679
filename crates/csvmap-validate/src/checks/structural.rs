//! Structural checks: does the mapping fit the schema and the file?

use std::collections::BTreeMap;

use csvmap_model::{ColumnName, Mapping, SchemaRegistry};
use serde::{Deserialize, Serialize};

/// Tier 1 findings. Any error here blocks the content checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl StructuralReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks required coverage and column existence in registry order, then
/// warns about columns shared by several fields.
pub fn validate_structure(
    mapping: &Mapping,
    table_columns: &[ColumnName],
    registry: &SchemaRegistry,
) -> StructuralReport {
    let mut report = StructuralReport::default();
    let mut fields_by_column: BTreeMap<&ColumnName, Vec<&str>> = BTreeMap::new();

    for field in registry.fields() {
        match mapping.get(&field.name) {
            None => {
                if field.required {
                    report
                        .errors
                        .push(format!("required field '{}' is not mapped.", field.name));
                }
            }
            Some(column) => {
                if !table_columns.contains(column) {
                    report
                        .errors
                        .push(format!("mapped column '{column}' does not exist in file."));
                }
                fields_by_column
                    .entry(column)
                    .or_default()
                    .push(field.name.as_str());
            }
        }
    }

    for (column, mut fields) in fields_by_column {
        if fields.len() < 2 {
            continue;
        }
        fields.sort_unstable();
        report.warnings.push(format!(
            "column '{column}' is mapped to multiple fields: [{}].",
            fields.join(", ")
        ));
    }
    report
}

#[cfg(test)]
mod tests {
    use csvmap_model::{SchemaField, TypeTag};

    use super::*;

    fn column(name: &str) -> ColumnName {
        ColumnName::new(name).expect("column")
    }

    #[test]
    fn shared_column_warning_lists_sorted_fields() {
        let registry = SchemaRegistry::new(vec![
            SchemaField::new("zeta", TypeTag::String),
            SchemaField::new("alpha", TypeTag::String),
        ])
        .expect("registry");
        let mut mapping = Mapping::unmapped(&registry);
        mapping.set("zeta", Some(column("shared")));
        mapping.set("alpha", Some(column("shared")));

        let report = validate_structure(&mapping, &[column("shared")], &registry);
        assert!(report.is_ok());
        assert_eq!(
            report.warnings,
            vec!["column 'shared' is mapped to multiple fields: [alpha, zeta].".to_string()]
        );
    }

    #[test]
    fn missing_column_is_reported_per_field() {
        let registry = SchemaRegistry::new(vec![
            SchemaField::new("a", TypeTag::String),
            SchemaField::new("b", TypeTag::String),
        ])
        .expect("registry");
        let mut mapping = Mapping::unmapped(&registry);
        mapping.set("a", Some(column("ghost")));
        mapping.set("b", Some(column("ghost")));

        let report = validate_structure(&mapping, &[column("real")], &registry);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.warnings.len(), 1);
    }
}
