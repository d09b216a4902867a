//! Process-group capability used by the orchestrator.
//!
//! Every process of the group runs the same program and talks to the others
//! only through this trait: one collective broadcast, blocking point-to-point
//! transfers, and a barrier. [`LocalGroup`] runs the ranks as threads in one
//! process; `MpiGroup` (feature `mpi`) runs them as MPI processes.

mod local;
#[cfg(feature = "mpi")]
mod mpi_world;

pub use local::LocalGroup;
#[cfg(feature = "mpi")]
pub use mpi_world::MpiGroup;

use crate::Error;

/// Rank of the coordinator.
pub const ROOT_RANK: usize = 0;

/// Tag for row-block transfers in both directions.
pub const TAG_MATRIX_PARTITION: i32 = 0x4560;

pub trait Group {
    /// Rank of this process, `0..size()`.
    fn rank(&self) -> usize;

    /// Number of processes in the group.
    fn size(&self) -> usize;

    /// Broadcast a length from `root`. Every rank must call this together.
    fn broadcast_len(&self, root: usize, value: &mut usize) -> Result<(), Error>;

    /// Broadcast `buf` from `root` into `buf` on every other rank.
    fn broadcast(&self, root: usize, buf: &mut [f64]) -> Result<(), Error>;

    /// Blocking send to `dest`.
    fn send(&self, dest: usize, tag: i32, buf: &[f64]) -> Result<(), Error>;

    /// Blocking receive from `source` into `buf`.
    fn receive_into(&self, source: usize, tag: i32, buf: &mut [f64]) -> Result<(), Error>;

    /// Wait until every rank has arrived.
    fn barrier(&self) -> Result<(), Error>;

    /// Tear down the whole group with `code`.
    fn abort(&self, code: i32) -> !;
}
