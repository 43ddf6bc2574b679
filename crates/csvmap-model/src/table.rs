#![deny(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ColumnName;

/// Raw cell content. Coercion happens at validation time, never at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Missing,
}

impl CellValue {
    /// Builds a cell from raw text; blank input becomes [`CellValue::Missing`].
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim().trim_matches('\u{feff}');
        if trimmed.is_empty() {
            Self::Missing
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: BTreeMap<ColumnName, CellValue>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }
}

/// A classified upload: ordered, unique column names plus one cell per column per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTable {
    pub columns: Vec<ColumnName>,
    pub rows: Vec<Row>,
    pub has_header: bool,
}

impl ParsedTable {
    pub fn new(columns: Vec<ColumnName>, has_header: bool) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            has_header,
        }
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.as_str() == column)
    }

    pub fn cell(&self, row_index: usize, column: &str) -> Option<&CellValue> {
        self.rows.get(row_index).and_then(|row| row.get(column))
    }

    /// First `count` rows, for display.
    pub fn preview(&self, count: usize) -> &[Row] {
        self.window(0, count)
    }

    /// Up to `count` rows starting at `skip`; empty when `skip` is past the end.
    pub fn window(&self, skip: usize, count: usize) -> &[Row] {
        let start = skip.min(self.rows.len());
        let end = start.saturating_add(count).min(self.rows.len());
        &self.rows[start..end]
    }

    /// Cells of one column in row order. Returns `None` for an unknown column.
    pub fn column_values(&self, column: &str) -> Option<Vec<&CellValue>> {
        if !self.has_column(column) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(column))
                .collect(),
        )
    }
}
