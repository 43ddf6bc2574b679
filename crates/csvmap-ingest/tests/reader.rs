use std::fs;
use std::path::PathBuf;

use csvmap_ingest::{IngestError, IngestOptions, read_csv_grid, read_csv_table};
use tempfile::TempDir;

fn temp_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn reads_flexible_grid_without_header_handling() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "grid.csv", b"a,b,c\n1,2\n3,4,5,6\n");
    let grid = read_csv_grid(&path, &IngestOptions::default()).expect("read grid");
    assert_eq!(grid.len(), 3);
    assert_eq!(grid[0], vec!["a", "b", "c"]);
    assert_eq!(grid[1].len(), 2);
    assert_eq!(grid[2].len(), 4);
}

#[test]
fn honors_custom_delimiter() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "semi.csv", b"id;email\n1;a@b.io\n");
    let options = IngestOptions {
        delimiter: b';',
        ..IngestOptions::default()
    };
    let table = read_csv_table(&path, &options).expect("read table");
    assert!(table.has_header);
    assert!(table.has_column("email"));
}

#[test]
fn invalid_utf8_is_decoded_lossily() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "latin1.csv", b"name\ncaf\xe9\n");
    let grid = read_csv_grid(&path, &IngestOptions::default()).expect("read grid");
    assert_eq!(grid[1][0], "caf\u{fffd}");
}

#[test]
fn oversized_file_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "big.csv", b"id\n1\n2\n3\n");
    let options = IngestOptions {
        max_file_bytes: 4,
        ..IngestOptions::default()
    };
    let err = read_csv_grid(&path, &options).unwrap_err();
    assert!(matches!(err, IngestError::TooLarge { limit: 4, .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().expect("temp dir");
    let err = read_csv_grid(&dir.path().join("absent.csv"), &IngestOptions::default())
        .unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
}

#[test]
fn empty_file_fails_classification() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "empty.csv", b"\n\n");
    let err = read_csv_table(&path, &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::Classify(_)));
}
