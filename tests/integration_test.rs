// Matrix text files on disk

mod common;

use std::fs;
use std::io::Write;

use common::{patterned, Workspace};
use row_block_matmul::{matrix_io, Error, Matrix};
use tempfile::NamedTempFile;

#[test]
fn test_matrix_file_roundtrip() {
    let ws = Workspace::new();
    let original = patterned(3, 4, 9);
    let path = ws.write_matrix("m.txt", &original);

    let (loaded, ok) = matrix_io::read(&path);
    assert!(ok);
    assert_eq!(loaded, original);
}

#[test]
fn test_written_layout() {
    let ws = Workspace::new();
    let m = Matrix::from_vec(vec![1.0, 2.5, -3.0, 4.0, 5.0, 6.25], 2, 3).unwrap();
    let path = ws.write_matrix("m.txt", &m);
    assert_eq!(fs::read_to_string(path).unwrap(), "2 3\n1 2.5 -3\n4 5 6.25\n");
}

#[test]
fn test_roundtrip_narrows_to_single_precision() {
    let ws = Workspace::new();
    let data = vec![0.1, 1.0 / 3.0, std::f64::consts::PI, 123456.789012345];
    let original = Matrix::from_vec(data.clone(), 2, 2).unwrap();
    let path = ws.write_matrix("m.txt", &original);

    let loaded = matrix_io::try_read(&path).unwrap();
    let narrowed: Vec<f64> = data.iter().map(|&v| f64::from(v as f32)).collect();
    assert_eq!(loaded.data(), narrowed.as_slice());
    assert_ne!(loaded, original);
}

#[test]
fn test_read_missing_file() {
    let ws = Workspace::new();
    let (m, ok) = matrix_io::read(ws.path("absent.txt"));
    assert!(!ok);
    assert!(!m.is_valid());
    assert!(matches!(
        matrix_io::try_read(ws.path("absent.txt")),
        Err(Error::Open { .. })
    ));
}

#[test]
fn test_read_malformed_header() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "two 2").unwrap();
    writeln!(file, "1 2").unwrap();
    writeln!(file, "3 4").unwrap();
    file.flush().unwrap();

    let (m, ok) = matrix_io::read(file.path());
    assert!(!ok);
    assert!(!m.is_valid());
}

#[test]
fn test_read_truncated_data() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "2 2").unwrap();
    writeln!(file, "1 2").unwrap();
    writeln!(file, "3").unwrap();
    file.flush().unwrap();

    let (m, ok) = matrix_io::read(file.path());
    assert!(!ok);
    assert_eq!(m, Matrix::invalid());
}

#[test]
fn test_read_ignores_extra_tokens() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "1 2\n7 8 9 10\n").unwrap();
    file.flush().unwrap();

    let m = matrix_io::try_read(file.path()).unwrap();
    assert_eq!(m.data(), &[7.0, 8.0]);
}

#[test]
fn test_read_empty_file() {
    let file = NamedTempFile::new().unwrap();
    assert!(matches!(matrix_io::try_read(file.path()), Err(Error::Header(_))));
}
