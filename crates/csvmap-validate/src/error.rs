use thiserror::Error;

/// Misuse of the validation API, as opposed to findings about the data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidateError {
    /// The mapping does not carry exactly one key per schema field.
    #[error(
        "mapping keys do not match schema fields (missing: [{}], extra: [{}])",
        .missing.join(", "),
        .extra.join(", ")
    )]
    MappingKeys {
        missing: Vec<String>,
        extra: Vec<String>,
    },
}
