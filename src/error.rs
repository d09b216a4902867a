//! Error types for row-block multiplication.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("matrix header must hold two positive integers, found {0:?}")]
    Header(String),

    #[error("matrix data truncated: expected {expected} values, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("invalid matrix operand: {0}")]
    InvalidMatrix(&'static str),

    #[error("matrix dimension mismatch: A is {0}x{1}, B is {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),

    #[error("index out of bounds: ({row}, {col}) for matrix {rows}x{cols}")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("problem size {n} is not divisible by {processes} processes")]
    UnevenPartition { n: usize, processes: usize },

    #[error("cannot open log file {path:?}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("rank {0} disconnected")]
    Disconnected(usize),
}
