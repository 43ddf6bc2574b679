//! Turning raw CSV input into classified tables.
//!
//! [`classify`] is pure and performs no I/O; [`reader`] is the thin file
//! shell around it.

pub mod classify;
pub mod error;
pub mod profile;
pub mod reader;
pub mod values;

pub use classify::{HEADER_SAMPLE_ROWS, ValuePattern, classify, detect_header};
pub use error::{ClassifyError, IngestError};
pub use profile::{ColumnKind, ColumnProfile, infer_column_kind, profile_columns};
pub use reader::{DEFAULT_MAX_FILE_BYTES, IngestOptions, read_csv_grid, read_csv_table};
pub use values::{
    MISSING_SENTINELS, is_missing_value, looks_like_email, looks_like_phone, parse_bool,
    parse_date, parse_f64, parse_i64,
};
