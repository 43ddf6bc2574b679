//! Loading a schema registry from a JSON definition.
//!
//! The file holds an array of field objects:
//!
//! ```json
//! [
//!   {"name": "email", "type": "string", "required": true,
//!    "aliases": ["mail"],
//!    "rule": {"kind": "contains", "needle": "@", "message": "invalid email format"}}
//! ]
//! ```

use std::fs;
use std::path::Path;

use csvmap_model::{SchemaField, SchemaRegistry};
use tracing::debug;

use crate::error::StandardsError;

/// Reads and validates a registry definition from `path`.
pub fn load_registry(path: &Path) -> Result<SchemaRegistry, StandardsError> {
    let contents = fs::read_to_string(path).map_err(|source| StandardsError::io(path, source))?;
    let fields: Vec<SchemaField> =
        serde_json::from_str(&contents).map_err(|source| StandardsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    let registry = build_registry(fields)?;
    debug!(
        path = %path.display(),
        fields = registry.len(),
        "loaded schema registry"
    );
    Ok(registry)
}

/// Parses a registry definition held in memory.
pub fn parse_registry_json(text: &str) -> Result<SchemaRegistry, StandardsError> {
    let fields: Vec<SchemaField> =
        serde_json::from_str(text).map_err(|source| StandardsError::Json {
            path: "<inline>".into(),
            source,
        })?;
    build_registry(fields)
}

fn build_registry(fields: Vec<SchemaField>) -> Result<SchemaRegistry, StandardsError> {
    if fields.is_empty() {
        return Err(StandardsError::Empty);
    }
    Ok(SchemaRegistry::new(fields)?)
}
