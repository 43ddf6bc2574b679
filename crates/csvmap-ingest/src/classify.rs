//! Header detection and column naming for raw CSV grids.

use std::collections::BTreeMap;

use csvmap_model::{CellValue, ColumnName, ParsedTable, Row};
use tracing::{debug, warn};

use crate::error::ClassifyError;
use crate::values::{looks_like_email, looks_like_phone, parse_date, parse_f64, parse_i64};

/// Number of rows after the first one compared against it during header detection.
pub const HEADER_SAMPLE_ROWS: usize = 20;

/// Coarse shape of a single cell, used to tell label rows from data rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValuePattern {
    Blank,
    Integer,
    Decimal,
    Boolean,
    Date,
    Email,
    Phone,
    /// A single token mixing letters and digits, e.g. `USR001`.
    Code,
    /// Every letter lowercase, e.g. `first_name` or `oslo`.
    LowerText,
    /// Every letter uppercase, e.g. `US`.
    UpperText,
    /// Each word capitalized, e.g. `John` or `New York`.
    TitleText,
    /// Any other text, including text without letters.
    Text,
}

impl ValuePattern {
    pub fn of(raw: &str) -> Self {
        let trimmed = raw.trim().trim_matches('\u{feff}');
        if trimmed.is_empty() {
            return Self::Blank;
        }
        if parse_i64(trimmed).is_some() {
            return Self::Integer;
        }
        if parse_f64(trimmed).is_some() {
            return Self::Decimal;
        }
        // Dates first: an ISO date also fits the phone shape.
        if parse_date(trimmed).is_some() {
            return Self::Date;
        }
        if looks_like_email(trimmed) {
            return Self::Email;
        }
        if looks_like_phone(trimmed) {
            return Self::Phone;
        }
        if ["true", "false", "yes", "no"]
            .iter()
            .any(|token| trimmed.eq_ignore_ascii_case(token))
        {
            return Self::Boolean;
        }
        if is_code_like(trimmed) {
            return Self::Code;
        }
        text_pattern(trimmed)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }
}

fn text_pattern(value: &str) -> ValuePattern {
    let mut letters = value.chars().filter(|ch| ch.is_alphabetic()).peekable();
    if letters.peek().is_none() {
        return ValuePattern::Text;
    }
    let (mut lower, mut upper) = (true, true);
    for ch in letters {
        lower &= ch.is_lowercase();
        upper &= ch.is_uppercase();
    }
    if lower {
        ValuePattern::LowerText
    } else if upper {
        ValuePattern::UpperText
    } else if value.split_whitespace().all(is_capitalized) {
        ValuePattern::TitleText
    } else {
        ValuePattern::Text
    }
}

fn is_capitalized(word: &str) -> bool {
    let mut letters = word.chars().filter(|ch| ch.is_alphabetic());
    letters.next().is_none_or(char::is_uppercase) && letters.all(char::is_lowercase)
}

fn is_code_like(value: &str) -> bool {
    !value.chars().any(char::is_whitespace)
        && value.chars().any(|ch| ch.is_alphabetic())
        && value.chars().any(|ch| ch.is_ascii_digit())
}

/// Builds a [`ParsedTable`] from raw rows of strings.
///
/// Rows made only of blank cells are ignored. The first remaining row is
/// used as the header when it looks categorically different from the rows
/// below it; otherwise columns are named `Column_0 .. Column_{k-1}`.
pub fn classify(raw_rows: &[Vec<String>]) -> Result<ParsedTable, ClassifyError> {
    let rows: Vec<&Vec<String>> = raw_rows
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();
    if rows.is_empty() {
        return Err(ClassifyError::Empty);
    }

    let has_header = detect_header(&rows);
    let (columns, data_rows) = if has_header {
        (header_columns(rows[0])?, &rows[1..])
    } else {
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        let columns = (0..width).map(ColumnName::synthesized).collect();
        (columns, &rows[..])
    };

    let mut table = ParsedTable::new(columns, has_header);
    let mut dropped_cells = 0usize;
    for raw in data_rows {
        if raw.len() > table.columns.len() {
            dropped_cells += raw.len() - table.columns.len();
        }
        let mut cells = BTreeMap::new();
        for (idx, column) in table.columns.iter().enumerate() {
            let cell = raw
                .get(idx)
                .map_or(CellValue::Missing, |value| CellValue::from_raw(value));
            cells.insert(column.clone(), cell);
        }
        table.push_row(Row { cells });
    }
    if dropped_cells > 0 {
        warn!(
            dropped_cells,
            columns = table.columns.len(),
            "rows wider than the header; extra cells dropped"
        );
    }
    debug!(
        has_header,
        columns = table.columns.len(),
        rows = table.row_count(),
        "classified table"
    );
    Ok(table)
}

/// Decides whether the first row is a header.
///
/// A first-row cell is label-like when it is non-blank, non-numeric and its
/// [`ValuePattern`] differs from the dominant pattern of the same column in
/// the following rows. Text patterns carry letter case, so `first_name`
/// over `John` counts as label-like. The row is a header when at least half
/// of its cells, and at least one, are label-like. Tables with fewer than
/// two rows never have a header.
pub fn detect_header<R: AsRef<[String]>>(rows: &[R]) -> bool {
    let Some((first, rest)) = rows.split_first() else {
        return false;
    };
    let first = first.as_ref();
    if rest.is_empty() || first.is_empty() {
        return false;
    }
    let sample = &rest[..rest.len().min(HEADER_SAMPLE_ROWS)];
    let label_like = first
        .iter()
        .enumerate()
        .filter(|(idx, cell)| is_label_cell(cell, dominant_pattern(sample, *idx)))
        .count();
    label_like > 0 && label_like * 2 >= first.len()
}

fn is_label_cell(cell: &str, dominant: Option<ValuePattern>) -> bool {
    let pattern = ValuePattern::of(cell);
    if pattern == ValuePattern::Blank || pattern.is_numeric() {
        return false;
    }
    dominant.is_none_or(|dominant| dominant != pattern)
}

/// Most frequent non-blank pattern at `column` in `sample`; ties go to the one seen first.
fn dominant_pattern<R: AsRef<[String]>>(sample: &[R], column: usize) -> Option<ValuePattern> {
    let mut counts: Vec<(ValuePattern, usize)> = Vec::new();
    for row in sample {
        let Some(cell) = row.as_ref().get(column) else {
            continue;
        };
        let pattern = ValuePattern::of(cell);
        if pattern == ValuePattern::Blank {
            continue;
        }
        match counts.iter_mut().find(|(seen, _)| *seen == pattern) {
            Some((_, count)) => *count += 1,
            None => counts.push((pattern, 1)),
        }
    }
    let mut best: Option<(ValuePattern, usize)> = None;
    for (pattern, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((pattern, count));
        }
    }
    best.map(|(pattern, _)| pattern)
}

fn header_columns(row: &[String]) -> Result<Vec<ColumnName>, ClassifyError> {
    let mut columns: Vec<ColumnName> = Vec::with_capacity(row.len());
    for (position, raw) in row.iter().enumerate() {
        let cleaned = raw.trim().trim_matches('\u{feff}').trim();
        let column =
            ColumnName::new(cleaned).map_err(|_| ClassifyError::BlankHeader { position })?;
        if let Some(first) = columns.iter().position(|existing| existing == &column) {
            return Err(ClassifyError::DuplicateColumn {
                name: column.as_str().to_string(),
                first,
                second: position,
            });
        }
        columns.push(column);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect()
    }

    #[test]
    fn value_patterns() {
        assert_eq!(ValuePattern::of(""), ValuePattern::Blank);
        assert_eq!(ValuePattern::of("42"), ValuePattern::Integer);
        assert_eq!(ValuePattern::of("4.2"), ValuePattern::Decimal);
        assert_eq!(ValuePattern::of("2024-01-01"), ValuePattern::Date);
        assert_eq!(ValuePattern::of("a@b.io"), ValuePattern::Email);
        assert_eq!(ValuePattern::of("+1-555-0123"), ValuePattern::Phone);
        assert_eq!(ValuePattern::of("TRUE"), ValuePattern::Boolean);
        assert_eq!(ValuePattern::of("USR001"), ValuePattern::Code);
        assert_eq!(ValuePattern::of("first_name"), ValuePattern::LowerText);
        assert_eq!(ValuePattern::of("US"), ValuePattern::UpperText);
        assert_eq!(ValuePattern::of("John"), ValuePattern::TitleText);
        assert_eq!(ValuePattern::of("New York"), ValuePattern::TitleText);
        assert_eq!(ValuePattern::of("McDonald"), ValuePattern::Text);
        assert_eq!(ValuePattern::of("--"), ValuePattern::Text);
    }

    #[test]
    fn dominant_pattern_prefers_first_seen_on_tie() {
        let sample = grid(&[&["x"], &["1"]]);
        assert_eq!(dominant_pattern(&sample, 0), Some(ValuePattern::LowerText));
        let blank = grid(&[&[""], &[""]]);
        assert_eq!(dominant_pattern(&blank, 0), None);
    }

    #[test]
    fn single_row_never_has_header() {
        let rows = grid(&[&["name", "email"]]);
        assert!(!detect_header(&rows));
    }

    #[test]
    fn same_shaped_text_rows_are_not_a_header() {
        let rows = grid(&[&["a", "b", "c"], &["d", "e", "f"]]);
        assert!(!detect_header(&rows));
        let names = grid(&[&["John", "Doe"], &["Jane", "Smith"]]);
        assert!(!detect_header(&names));
    }

    #[test]
    fn half_label_like_is_a_header() {
        let rows = grid(&[&["Name", "Email"], &["John", "john@example.com"]]);
        assert!(detect_header(&rows));
        let numbers = grid(&[&["1", "2"], &["3", "4"]]);
        assert!(!detect_header(&numbers));
    }

    #[test]
    fn blank_header_cell_is_rejected() {
        let rows = grid(&[&["id", "", "age"], &["1", "x@y.com", "30"]]);
        assert_eq!(
            classify(&rows).unwrap_err(),
            ClassifyError::BlankHeader { position: 1 }
        );
    }
}
