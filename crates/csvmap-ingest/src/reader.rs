//! Reading CSV files into raw grids.

use std::fs;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use csvmap_model::ParsedTable;
use tracing::{debug, warn};

use crate::classify::classify;
use crate::error::IngestError;

/// Default upper bound on input file size (100 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 100 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    /// Files larger than this are rejected before parsing.
    pub max_file_bytes: u64,
    pub delimiter: u8,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            delimiter: b',',
        }
    }
}

/// Reads every record of `path` as a row of strings, without header handling.
///
/// Records are decoded as UTF-8; invalid sequences fall back to lossy
/// decoding with U+FFFD replacement characters.
pub fn read_csv_grid(
    path: &Path,
    options: &IngestOptions,
) -> Result<Vec<Vec<String>>, IngestError> {
    let size = fs::metadata(path)
        .map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    if size > options.max_file_bytes {
        return Err(IngestError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: options.max_file_bytes,
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    let mut lossy_records = 0usize;
    let mut record = ByteRecord::new();
    loop {
        let more = reader
            .read_byte_record(&mut record)
            .map_err(|source| IngestError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        if !more {
            break;
        }
        let mut row = Vec::with_capacity(record.len());
        for field in record.iter() {
            match std::str::from_utf8(field) {
                Ok(text) => row.push(text.to_string()),
                Err(_) => {
                    lossy_records += 1;
                    row.push(String::from_utf8_lossy(field).into_owned());
                }
            }
        }
        rows.push(row);
    }
    if lossy_records > 0 {
        warn!(
            path = %path.display(),
            lossy_records,
            "invalid UTF-8 replaced during decoding"
        );
    }
    debug!(path = %path.display(), rows = rows.len(), "read csv grid");
    Ok(rows)
}

/// Reads and classifies `path` in one step.
pub fn read_csv_table(path: &Path, options: &IngestOptions) -> Result<ParsedTable, IngestError> {
    let grid = read_csv_grid(path, options)?;
    Ok(classify(&grid)?)
}
