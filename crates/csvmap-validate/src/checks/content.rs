//! Content checks for a single row.

use csvmap_ingest::is_missing_value;
use csvmap_model::{CellValue, Mapping, Row, SchemaField, SchemaRegistry};

use crate::coerce::coerce;
use crate::rules::evaluate;

/// All content errors for one row, in registry field order.
pub fn check_row(row: &Row, mapping: &Mapping, registry: &SchemaRegistry) -> Vec<String> {
    registry
        .fields()
        .iter()
        .filter_map(|field| {
            let column = mapping.get(&field.name)?;
            check_cell(field, row.get(column.as_str()))
        })
        .collect()
}

/// The error for one mapped cell, if any.
pub fn check_cell(field: &SchemaField, cell: Option<&CellValue>) -> Option<String> {
    let raw = cell
        .and_then(CellValue::as_text)
        .filter(|raw| !is_missing_value(raw));
    let Some(raw) = raw else {
        return field
            .required
            .then(|| format!("missing value for '{}'", field.name));
    };
    let Some(value) = coerce(raw, field.type_tag) else {
        return Some(format!(
            "invalid {} for '{}': '{raw}'",
            field.type_tag, field.name
        ));
    };
    let rule = field.rule.as_ref()?;
    evaluate(rule, raw, &value).map(str::to_string)
}
