#![deny(unsafe_code)]

use std::borrow::Borrow;
use std::fmt;

use crate::ModelError;

/// Name of a source column, trimmed and never blank.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnName(String);

impl ColumnName {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::BlankColumnName(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Name given to the column at `index` when the file has no header row.
    pub fn synthesized(index: usize) -> Self {
        Self(format!("Column_{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ColumnName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ColumnName {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ColumnName> for String {
    fn from(value: ColumnName) -> Self {
        value.0
    }
}
