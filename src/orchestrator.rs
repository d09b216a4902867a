//! Role dispatch for the row-block multiplication.
//!
//! Rank 0 coordinates: it reads both operands, broadcasts the problem size
//! and all of `B`, hands each worker a block of `n / size` rows of `A`,
//! multiplies its own block, and collects the workers' blocks into `C`.
//! Every other rank is a worker. Both paths end at a group-wide barrier.

use std::time::Duration;

use tracing::debug;

use crate::coordinator::Coordinator;
use crate::group::{Group, ROOT_RANK};
use crate::worker::Worker;
use crate::{Error, Matrix, RunConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Coordinator,
    Worker,
}

impl Role {
    pub fn from_rank(rank: usize) -> Self {
        if rank == ROOT_RANK {
            Role::Coordinator
        } else {
            Role::Worker
        }
    }
}

/// Rows per rank. The `n % group_size` trailing rows belong to nobody.
pub fn block_size(n: usize, group_size: usize) -> usize {
    if group_size == 0 {
        return 0;
    }
    n / group_size
}

/// What the coordinator measured and assembled.
#[derive(Debug)]
pub struct RunReport {
    pub processes: usize,
    pub block_size: usize,
    pub elapsed: Duration,
    /// `n x n` product; invalid when the run degraded to size 0.
    pub result: Matrix,
}

impl RunReport {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Run this rank's part. Only the coordinator returns a report.
pub fn run<G: Group>(group: &G, config: &RunConfig) -> Result<Option<RunReport>, Error> {
    let role = Role::from_rank(group.rank());
    debug!(rank = group.rank(), size = group.size(), ?role, "starting");
    match role {
        Role::Coordinator => Coordinator::new(group, config).run().map(Some),
        Role::Worker => Worker::new(group).run().map(|()| None),
    }
}
