use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("column name must not be blank: {0:?}")]
    BlankColumnName(String),
    #[error("schema field name must not be blank")]
    BlankFieldName,
    #[error("duplicate schema field: {0}")]
    DuplicateField(String),
    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("mapping references unknown field '{0}'")]
    UnknownField(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
