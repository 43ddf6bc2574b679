//! Validation entry point.

use csvmap_model::{Mapping, ParsedTable, RowErrors, SchemaRegistry, ValidationReport};
use tracing::debug;

use crate::checks::content::check_row;
use crate::checks::structural::validate_structure;
use crate::error::ValidateError;

/// Rows sampled for content checks when the caller has no preference.
pub const DEFAULT_MAX_ERROR_ROWS: usize = 5;

/// Fails unless the mapping keys are exactly the registry field names.
pub fn check_mapping_keys(
    mapping: &Mapping,
    registry: &SchemaRegistry,
) -> Result<(), ValidateError> {
    let missing: Vec<String> = registry
        .field_names()
        .filter(|name| !mapping.contains_field(name))
        .map(str::to_string)
        .collect();
    let extra: Vec<String> = mapping
        .field_names()
        .filter(|name| !registry.contains(name))
        .map(str::to_string)
        .collect();
    if missing.is_empty() && extra.is_empty() {
        Ok(())
    } else {
        Err(ValidateError::MappingKeys { missing, extra })
    }
}

/// Validates `mapping` against `table` in two tiers.
///
/// Structural errors end validation with `valid = false` and no row errors.
/// Otherwise the first `max_error_rows` rows are checked field by field and
/// every row with at least one problem is reported by its 0-based index.
/// A zero cap runs the structural tier only.
pub fn validate(
    mapping: &Mapping,
    table: &ParsedTable,
    registry: &SchemaRegistry,
    max_error_rows: usize,
) -> Result<ValidationReport, ValidateError> {
    check_mapping_keys(mapping, registry)?;

    let structural = validate_structure(mapping, &table.columns, registry);
    if !structural.is_ok() {
        debug!(
            errors = structural.errors.len(),
            "structural errors found; content checks skipped"
        );
        return Ok(ValidationReport {
            valid: false,
            errors: structural.errors,
            warnings: structural.warnings,
            row_errors: Vec::new(),
        });
    }

    let sample = table.preview(max_error_rows);
    let row_errors: Vec<RowErrors> = sample
        .iter()
        .enumerate()
        .filter_map(|(row_index, row)| {
            let errors = check_row(row, mapping, registry);
            (!errors.is_empty()).then_some(RowErrors { row_index, errors })
        })
        .collect();
    debug!(
        sampled = sample.len(),
        failing_rows = row_errors.len(),
        "content checks finished"
    );

    Ok(ValidationReport {
        valid: row_errors.is_empty(),
        errors: Vec::new(),
        warnings: structural.warnings,
        row_errors,
    })
}
