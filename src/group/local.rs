use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Barrier};
use std::thread;

use tracing::trace;

use super::Group;
use crate::Error;

// Internal tags for collectives; user tags are non-negative.
const TAG_BROADCAST_LEN: i32 = -1;
const TAG_BROADCAST_DATA: i32 = -2;

enum Payload {
    Len(usize),
    Data(Vec<f64>),
}

struct Envelope {
    tag: i32,
    payload: Payload,
}

/// In-process group: one thread per rank, one FIFO channel per ordered pair
/// of ranks. Ranks share nothing but the channels and the barrier; every
/// transfer copies its data.
pub struct LocalGroup {
    rank: usize,
    size: usize,
    // indexed by destination rank
    senders: Vec<Sender<Envelope>>,
    // indexed by source rank
    receivers: Vec<Receiver<Envelope>>,
    barrier: Arc<Barrier>,
}

impl LocalGroup {
    /// Build the endpoints of a `size`-rank group, in rank order.
    pub fn create(size: usize) -> Vec<LocalGroup> {
        let barrier = Arc::new(Barrier::new(size));
        let mut senders: Vec<Vec<Sender<Envelope>>> =
            (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut receivers: Vec<Vec<Receiver<Envelope>>> =
            (0..size).map(|_| Vec::with_capacity(size)).collect();

        for source in 0..size {
            for dest in 0..size {
                let (tx, rx) = mpsc::channel();
                senders[source].push(tx);
                receivers[dest].push(rx);
            }
        }

        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (senders, receivers))| LocalGroup {
                rank,
                size,
                senders,
                receivers,
                barrier: Arc::clone(&barrier),
            })
            .collect()
    }

    /// Run `f` on every rank of a fresh `size`-rank group, one thread each.
    ///
    /// Results come back in rank order. A panic on any rank is resumed on the
    /// calling thread.
    pub fn spawn<T, F>(size: usize, f: F) -> Vec<T>
    where
        F: Fn(LocalGroup) -> T + Sync,
        T: Send,
    {
        let f = &f;
        thread::scope(|scope| {
            let handles: Vec<_> = Self::create(size)
                .into_iter()
                .map(|group| scope.spawn(move || f(group)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }

    fn check_rank(&self, rank: usize) -> Result<(), Error> {
        if rank >= self.size {
            return Err(Error::Protocol(format!(
                "rank {} outside group of {}",
                rank, self.size
            )));
        }
        Ok(())
    }

    fn post(&self, dest: usize, tag: i32, payload: Payload) -> Result<(), Error> {
        self.check_rank(dest)?;
        self.senders[dest]
            .send(Envelope { tag, payload })
            .map_err(|_| Error::Disconnected(dest))
    }

    fn take(&self, source: usize, tag: i32) -> Result<Payload, Error> {
        self.check_rank(source)?;
        let envelope = self.receivers[source]
            .recv()
            .map_err(|_| Error::Disconnected(source))?;
        if envelope.tag != tag {
            return Err(Error::Protocol(format!(
                "rank {} expected tag {:#x} from rank {}, got {:#x}",
                self.rank, tag, source, envelope.tag
            )));
        }
        Ok(envelope.payload)
    }

    fn take_data(&self, source: usize, tag: i32, buf: &mut [f64]) -> Result<(), Error> {
        match self.take(source, tag)? {
            Payload::Data(data) if data.len() <= buf.len() => {
                buf[..data.len()].copy_from_slice(&data);
                Ok(())
            }
            Payload::Data(data) => Err(Error::Protocol(format!(
                "message of {} values overflows buffer of {}",
                data.len(),
                buf.len()
            ))),
            Payload::Len(_) => Err(Error::Protocol("expected data, got length".into())),
        }
    }
}

impl Group for LocalGroup {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast_len(&self, root: usize, value: &mut usize) -> Result<(), Error> {
        self.check_rank(root)?;
        if self.rank == root {
            for dest in (0..self.size).filter(|&r| r != root) {
                self.post(dest, TAG_BROADCAST_LEN, Payload::Len(*value))?;
            }
            return Ok(());
        }
        match self.take(root, TAG_BROADCAST_LEN)? {
            Payload::Len(len) => {
                *value = len;
                Ok(())
            }
            Payload::Data(_) => Err(Error::Protocol("expected length, got data".into())),
        }
    }

    fn broadcast(&self, root: usize, buf: &mut [f64]) -> Result<(), Error> {
        self.check_rank(root)?;
        if self.rank == root {
            for dest in (0..self.size).filter(|&r| r != root) {
                self.post(dest, TAG_BROADCAST_DATA, Payload::Data(buf.to_vec()))?;
            }
            return Ok(());
        }
        self.take_data(root, TAG_BROADCAST_DATA, buf)
    }

    fn send(&self, dest: usize, tag: i32, buf: &[f64]) -> Result<(), Error> {
        trace!(rank = self.rank, dest, tag, len = buf.len(), "send");
        self.post(dest, tag, Payload::Data(buf.to_vec()))
    }

    fn receive_into(&self, source: usize, tag: i32, buf: &mut [f64]) -> Result<(), Error> {
        trace!(rank = self.rank, source, tag, len = buf.len(), "receive");
        self.take_data(source, tag, buf)
    }

    fn barrier(&self) -> Result<(), Error> {
        self.barrier.wait();
        Ok(())
    }

    fn abort(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}
