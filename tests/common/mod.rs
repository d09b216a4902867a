#![allow(dead_code)]

use std::path::PathBuf;

use row_block_matmul::{matrix_io, Error, LocalGroup, Matrix, RunConfig, RunReport};
use tempfile::TempDir;

/// Scratch directory holding operand files and logs for one test.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_matrix(&self, name: &str, matrix: &Matrix) -> PathBuf {
        let path = self.path(name);
        matrix_io::write(&path, matrix).unwrap();
        path
    }

    pub fn config(&self, a: &Matrix, b: &Matrix) -> RunConfig {
        let a_path = self.write_matrix("a.txt", a);
        let b_path = self.write_matrix("b.txt", b);
        RunConfig::new(a_path, b_path, self.path("timing.log"))
    }
}

/// Deterministic values that survive the single-precision text format.
pub fn patterned(rows: usize, cols: usize, seed: usize) -> Matrix {
    let data = (0..rows * cols)
        .map(|i| ((i * 7 + seed * 3) % 23) as f64 * 0.25 - 2.0)
        .collect();
    Matrix::from_vec(data, rows, cols).unwrap()
}

/// Textbook triple loop, same summation order as the kernel.
pub fn reference_product(a: &Matrix, b: &Matrix) -> Matrix {
    let mut c = Matrix::create(a.rows(), b.cols());
    for i in 0..a.rows() {
        for j in 0..b.cols() {
            let mut sum = 0.0;
            for k in 0..a.cols() {
                sum += a.get(i, k).unwrap() * b.get(k, j).unwrap();
            }
            c.set(i, j, sum).unwrap();
        }
    }
    c
}

pub type RankOutcome = Result<Option<RunReport>, Error>;

/// Run every rank of a `size`-rank group; outcomes in rank order.
pub fn run_group(size: usize, config: &RunConfig) -> Vec<RankOutcome> {
    LocalGroup::spawn(size, |group| row_block_matmul::run(&group, config))
}

/// Coordinator report, asserting every rank succeeded.
pub fn coordinator_report(outcomes: Vec<RankOutcome>) -> RunReport {
    let mut outcomes = outcomes.into_iter();
    let report = outcomes
        .next()
        .expect("empty group")
        .expect("coordinator failed")
        .expect("coordinator returned no report");
    for (rank, outcome) in outcomes.enumerate() {
        assert!(
            matches!(outcome, Ok(None)),
            "worker {} ended with {:?}",
            rank + 1,
            outcome
        );
    }
    report
}
