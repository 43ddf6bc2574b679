#![deny(unsafe_code)]

//! Schema registry sources: the built-in user schema and JSON definitions.

pub mod builtin;
pub mod error;
pub mod loader;

pub use builtin::builtin_user_schema;
pub use error::StandardsError;
pub use loader::{load_registry, parse_registry_json};
