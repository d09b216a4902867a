use tracing::debug;

use crate::group::{Group, ROOT_RANK, TAG_MATRIX_PARTITION};
use crate::kernel;
use crate::orchestrator::block_size;
use crate::{Error, Matrix};

pub struct Worker<'a, G: Group> {
    rank: usize,
    group: &'a G,
}

impl<'a, G: Group> Worker<'a, G> {
    pub fn new(group: &'a G) -> Self {
        Worker {
            rank: group.rank(),
            group,
        }
    }

    /// Receive `B` and one row block of `A`, send back that block of `C`.
    pub fn run(&self) -> Result<(), Error> {
        let mut n = 0;
        self.group.broadcast_len(ROOT_RANK, &mut n)?;

        let block = block_size(n, self.group.size());
        let mut a = Matrix::create(block, n);
        let mut b = Matrix::create(n, n);
        debug!(rank = self.rank, n, block, "allocated operands");

        self.group.broadcast(ROOT_RANK, b.data_mut())?;
        self.group
            .receive_into(ROOT_RANK, TAG_MATRIX_PARTITION, a.data_mut())?;

        let mut c = kernel::multiply(&a, &b);
        debug!(rank = self.rank, rows = c.rows(), cols = c.cols(), "block computed");
        self.group.send(ROOT_RANK, TAG_MATRIX_PARTITION, c.data())?;

        a.release();
        b.release();
        c.release();
        self.group.barrier()
    }
}
