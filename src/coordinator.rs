use std::fs::File;
use std::io::Write;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::group::{Group, ROOT_RANK, TAG_MATRIX_PARTITION};
use crate::kernel::multiply_block_into;
use crate::matrix_io;
use crate::orchestrator::{block_size, RunReport};
use crate::{Error, FailureMode, Matrix, RunConfig};

pub struct Coordinator<'a, G: Group> {
    group: &'a G,
    config: &'a RunConfig,
}

impl<'a, G: Group> Coordinator<'a, G> {
    pub fn new(group: &'a G, config: &'a RunConfig) -> Self {
        Coordinator { group, config }
    }

    /// Get the number of workers
    pub fn worker_count(&self) -> usize {
        self.group.size().saturating_sub(1)
    }

    /// Multiply `A * B` across the group and report the elapsed time.
    ///
    /// An unopenable log file fails before any collective call. In strict
    /// mode, operand errors are returned only after the group has run a
    /// size-0 problem and passed the closing barrier; no timing report is
    /// printed or logged for such a run.
    pub fn run(&self) -> Result<RunReport, Error> {
        let config = self.config;
        let processes = self.group.size();

        let mut log = File::create(&config.log_path).map_err(|source| Error::LogFile {
            path: config.log_path.clone(),
            source,
        })?;

        let (mut a, mut b, mut n, failure) = match self.load_operands() {
            Ok((a, b, n)) => (a, b, n, None),
            Err(e) => {
                warn!("operands rejected, running empty problem: {}", e);
                (Matrix::invalid(), Matrix::invalid(), 0, Some(e))
            }
        };

        let start = Instant::now();
        let block = block_size(n, processes);
        let mut c = Matrix::create(n, n);
        info!(n, workers = self.worker_count(), block, "distributing");
        if n % processes != 0 {
            debug!(
                "{} trailing rows are not assigned to any process and stay zero",
                n - block * processes
            );
        }

        self.group.broadcast_len(ROOT_RANK, &mut n)?;
        self.group.broadcast(ROOT_RANK, &mut b.data_mut()[..n * n])?;

        for worker in 1..processes {
            let rows = a.block(worker * block, block)?;
            debug!(worker, first_row = rows.first_row(), rows = rows.rows(), "sending block");
            self.group.send(worker, TAG_MATRIX_PARTITION, rows.data())?;
        }

        if block > 0 {
            multiply_block_into(a.block(0, block)?, &b, c.block_mut(0, block)?);
        }

        for worker in 1..processes {
            let mut rows = c.block_mut(worker * block, block)?;
            self.group
                .receive_into(worker, TAG_MATRIX_PARTITION, rows.data_mut())?;
            debug!(worker, first_row = rows.first_row(), "block received");
        }

        let report = RunReport {
            processes,
            block_size: block,
            elapsed: start.elapsed(),
            result: c,
        };
        if failure.is_none() {
            self.publish(&mut log, &report, &a, &b)?;
        }
        drop(log);

        a.release();
        b.release();
        self.group.barrier()?;

        match failure {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Timing line on stdout and in the log, then the optional outputs.
    fn publish(&self, log: &mut File, report: &RunReport, a: &Matrix, b: &Matrix) -> Result<(), Error> {
        let config = self.config;
        let c = &report.result;
        let seconds = report.elapsed_seconds();
        println!(
            "Total time using [{:2}] processors : [{:.6}] seconds",
            report.processes, seconds
        );
        writeln!(log, "{:.6} Seconds\n", seconds)?;
        if config.dump_result {
            matrix_io::write_table(log, c)?;
        }

        if config.print_matrices {
            let mut out = std::io::stdout().lock();
            matrix_io::print_matrix(&mut out, "A", a)?;
            matrix_io::print_matrix(&mut out, "B", b)?;
            matrix_io::print_matrix(&mut out, "C", c)?;
        }
        if let Some(path) = &config.result_path {
            if c.is_valid() {
                matrix_io::write(path, c)?;
            } else {
                debug!(?path, "result is invalid, nothing saved");
            }
        }
        Ok(())
    }

    /// Read both operands and settle the problem size `n`.
    ///
    /// Compat mode never fails: anything that cannot form an `n x n` problem
    /// yields size 0.
    fn load_operands(&self) -> Result<(Matrix, Matrix, usize), Error> {
        let config = self.config;
        match config.mode {
            FailureMode::Compat => {
                let (a, a_ok) = matrix_io::read(&config.matrix_a);
                let (b, b_ok) = matrix_io::read(&config.matrix_b);
                if !a_ok {
                    debug!(path = ?config.matrix_a, "matrix A could not be read");
                }
                if !b_ok {
                    debug!(path = ?config.matrix_b, "matrix B could not be read");
                }
                if fits_square(&a, &b) {
                    let n = a.cols();
                    return Ok((a, b, n));
                }
                if a_ok && b_ok {
                    debug!(
                        "A is {}x{} and B is {}x{}, not an n x n problem",
                        a.rows(),
                        a.cols(),
                        b.rows(),
                        b.cols()
                    );
                }
                Ok((a, b, 0))
            }
            FailureMode::Strict => {
                let a = matrix_io::try_read(&config.matrix_a)?;
                let b = matrix_io::try_read(&config.matrix_b)?;
                let n = a.cols();
                if a.rows() != n || !fits_square(&a, &b) {
                    return Err(Error::DimensionMismatch(a.rows(), a.cols(), b.rows(), b.cols()));
                }
                let processes = self.group.size();
                if n % processes != 0 {
                    return Err(Error::UnevenPartition { n, processes });
                }
                Ok((a, b, n))
            }
        }
    }
}

/// `B` is `n x n` with `n = A.cols`, and `A` has at least `n` rows.
fn fits_square(a: &Matrix, b: &Matrix) -> bool {
    let n = a.cols();
    a.is_valid() && b.is_valid() && a.rows() >= n && b.rows() == n && b.cols() == n
}
