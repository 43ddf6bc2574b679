use serde::{Deserialize, Serialize};

/// Errors found in one sampled row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowErrors {
    /// 0-based position of the row in the parsed table.
    pub row_index: usize,
    pub errors: Vec<String>,
}

/// Outcome of validating a mapping against a parsed table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub row_errors: Vec<RowErrors>,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn row_error_count(&self) -> usize {
        self.row_errors.iter().map(|row| row.errors.len()).sum()
    }

    pub fn has_structural_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
