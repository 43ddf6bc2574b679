pub mod error;
pub mod ids;
pub mod mapping;
pub mod report;
pub mod schema;
pub mod table;

pub use error::{ModelError, Result};
pub use ids::ColumnName;
pub use mapping::Mapping;
pub use report::{RowErrors, ValidationReport};
pub use schema::{ContentHint, ContentRule, Pattern, SchemaField, SchemaRegistry, TypeTag};
pub use table::{CellValue, ParsedTable, Row};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts() {
        let report = ValidationReport {
            valid: false,
            errors: vec!["required field 'email' is not mapped.".to_string()],
            warnings: vec![],
            row_errors: vec![RowErrors {
                row_index: 2,
                errors: vec!["a".to_string(), "b".to_string()],
            }],
        };
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 0);
        assert_eq!(report.row_error_count(), 2);
        assert!(report.has_structural_errors());
    }

    #[test]
    fn report_serializes() {
        let report = ValidationReport {
            valid: true,
            ..ValidationReport::default()
        };
        let json = serde_json::to_string(&report).expect("serialize report");
        let round: ValidationReport = serde_json::from_str(&json).expect("deserialize report");
        assert!(round.valid);
        assert!(round.row_errors.is_empty());
    }
}
