//! Diagnostic column profiles for previews.
//!
//! Nothing here feeds back into classification, mapping or validation.

use std::fmt;

use csvmap_model::{CellValue, ParsedTable};
use serde::{Deserialize, Serialize};

use crate::values::{is_missing_value, parse_bool, parse_date, parse_f64};

/// Number of sample values kept per column profile.
pub const PROFILE_SAMPLE_VALUES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    String,
    Number,
    Boolean,
    Date,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnKind::String => "string",
            ColumnKind::Number => "number",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Date => "date",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub non_null_count: usize,
    pub null_count: usize,
    pub sample_values: Vec<String>,
}

/// Infers a coarse kind from the present values of a column.
///
/// Every present value must agree for a kind other than `String`; a column
/// with no present values is `String`. Numbers win over booleans so that a
/// `0`/`1` column reads as numeric.
pub fn infer_column_kind<'a, I>(values: I) -> ColumnKind
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = 0usize;
    let mut numeric = true;
    let mut boolean = true;
    let mut date = true;
    for value in values {
        if is_missing_value(value) {
            continue;
        }
        seen += 1;
        numeric &= parse_f64(value).is_some();
        boolean &= parse_bool(value).is_some();
        date &= parse_date(value).is_some();
        if !(numeric || boolean || date) {
            return ColumnKind::String;
        }
    }
    if seen == 0 {
        ColumnKind::String
    } else if numeric {
        ColumnKind::Number
    } else if boolean {
        ColumnKind::Boolean
    } else if date {
        ColumnKind::Date
    } else {
        ColumnKind::String
    }
}

/// One profile per column, in column order.
pub fn profile_columns(table: &ParsedTable) -> Vec<ColumnProfile> {
    table
        .columns
        .iter()
        .map(|column| {
            let present: Vec<&str> = table
                .rows
                .iter()
                .filter_map(|row| row.get(column.as_str()).and_then(CellValue::as_text))
                .filter(|value| !is_missing_value(value))
                .collect();
            ColumnProfile {
                name: column.as_str().to_string(),
                kind: infer_column_kind(present.iter().copied()),
                non_null_count: present.len(),
                null_count: table.row_count() - present.len(),
                sample_values: present
                    .iter()
                    .take(PROFILE_SAMPLE_VALUES)
                    .map(|value| (*value).to_string())
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_kinds() {
        assert_eq!(infer_column_kind(["1", "2.5", ""]), ColumnKind::Number);
        assert_eq!(infer_column_kind(["0", "1"]), ColumnKind::Number);
        assert_eq!(infer_column_kind(["yes", "No"]), ColumnKind::Boolean);
        assert_eq!(
            infer_column_kind(["2024-01-01", "02/03/2024"]),
            ColumnKind::Date
        );
        assert_eq!(infer_column_kind(["1", "abc"]), ColumnKind::String);
        assert_eq!(infer_column_kind(["NA", ""]), ColumnKind::String);
    }
}
