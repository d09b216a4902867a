use mpi::topology::SimpleCommunicator;
use mpi::traits::*;
use tracing::trace;

use super::Group;
use crate::Error;

/// Group backed by an MPI communicator.
///
/// The caller keeps the `mpi::environment::Universe` alive for as long as the
/// group is in use.
pub struct MpiGroup {
    world: SimpleCommunicator,
}

impl MpiGroup {
    pub fn new(world: SimpleCommunicator) -> Self {
        MpiGroup { world }
    }
}

impl Group for MpiGroup {
    fn rank(&self) -> usize {
        self.world.rank() as usize
    }

    fn size(&self) -> usize {
        self.world.size() as usize
    }

    fn broadcast_len(&self, root: usize, value: &mut usize) -> Result<(), Error> {
        let mut len = *value as u64;
        self.world
            .process_at_rank(root as i32)
            .broadcast_into(&mut len);
        *value = usize::try_from(len)
            .map_err(|_| Error::Protocol(format!("broadcast length {} does not fit usize", len)))?;
        Ok(())
    }

    fn broadcast(&self, root: usize, buf: &mut [f64]) -> Result<(), Error> {
        self.world.process_at_rank(root as i32).broadcast_into(buf);
        Ok(())
    }

    fn send(&self, dest: usize, tag: i32, buf: &[f64]) -> Result<(), Error> {
        trace!(dest, tag, len = buf.len(), "send");
        self.world
            .process_at_rank(dest as i32)
            .send_with_tag(buf, tag);
        Ok(())
    }

    fn receive_into(&self, source: usize, tag: i32, buf: &mut [f64]) -> Result<(), Error> {
        let status = self
            .world
            .process_at_rank(source as i32)
            .receive_into_with_tag(buf, tag);
        trace!(source = status.source_rank(), tag = status.tag(), "received");
        Ok(())
    }

    fn barrier(&self) -> Result<(), Error> {
        self.world.barrier();
        Ok(())
    }

    fn abort(&self, code: i32) -> ! {
        self.world.abort(code)
    }
}
