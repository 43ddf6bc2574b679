#![deny(unsafe_code)]

//! Validation of a mapping against a parsed table.
//!
//! Tier 1 checks the mapping itself: required fields are covered and every
//! mapped column exists. Tier 2 coerces and rule-checks a bounded sample of
//! rows, and runs only when tier 1 is clean.

pub mod checks;
pub mod coerce;
pub mod engine;
pub mod error;
pub mod rules;

pub use checks::content::{check_cell, check_row};
pub use checks::structural::{StructuralReport, validate_structure};
pub use coerce::{TypedValue, coerce};
pub use engine::{DEFAULT_MAX_ERROR_ROWS, check_mapping_keys, validate};
pub use error::ValidateError;
pub use rules::{evaluate, passes};
