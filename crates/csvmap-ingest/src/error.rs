use std::path::PathBuf;

use thiserror::Error;

/// Hard failures while turning a raw grid into a [`csvmap_model::ParsedTable`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("input contains no rows")]
    Empty,
    #[error("duplicate column name '{name}' at positions {first} and {second}")]
    DuplicateColumn {
        name: String,
        first: usize,
        second: usize,
    },
    #[error("header cell at position {position} is blank")]
    BlankHeader { position: usize },
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("file {path} is {size} bytes, above the {limit} byte limit")]
    TooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}
