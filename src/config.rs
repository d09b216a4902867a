//! Run configuration.

use std::path::PathBuf;

/// How the coordinator treats unreadable or ill-shaped operands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Degrade silently: a failed read becomes an invalid operand, an
    /// unusable problem runs with size 0, and rows beyond
    /// `group_size * block_size` stay zero.
    #[default]
    Compat,
    /// Report read failures, shape mismatches and uneven partitions as errors.
    Strict,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub matrix_a: PathBuf,
    pub matrix_b: PathBuf,
    /// Timing log; created (truncated) by the coordinator.
    pub log_path: PathBuf,
    pub mode: FailureMode,
    /// Print A, B and C to stdout after the run.
    pub print_matrices: bool,
    /// Append C as a table to the log after the timing line.
    pub dump_result: bool,
    /// Save C in the matrix text format.
    pub result_path: Option<PathBuf>,
}

impl RunConfig {
    /// Compat mode with every optional output off.
    pub fn new(
        matrix_a: impl Into<PathBuf>,
        matrix_b: impl Into<PathBuf>,
        log_path: impl Into<PathBuf>,
    ) -> Self {
        RunConfig {
            matrix_a: matrix_a.into(),
            matrix_b: matrix_b.into(),
            log_path: log_path.into(),
            mode: FailureMode::default(),
            print_matrices: false,
            dump_result: false,
            result_path: None,
        }
    }

    /// Set the failure mode.
    pub fn with_mode(mut self, mode: FailureMode) -> Self {
        self.mode = mode;
        self
    }

    /// Print A, B and C to stdout after a successful run.
    pub fn with_print_matrices(mut self, enabled: bool) -> Self {
        self.print_matrices = enabled;
        self
    }

    /// Append C to the timing log.
    pub fn with_dump_result(mut self, enabled: bool) -> Self {
        self.dump_result = enabled;
        self
    }

    /// Save C to `path` when set.
    pub fn with_result_path(mut self, path: Option<PathBuf>) -> Self {
        self.result_path = path;
        self
    }
}
