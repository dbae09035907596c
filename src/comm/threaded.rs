//! Thread backend
use crate::{
    error::{HeatError, Result},
    traits::DistributedComm,
    types::RealScalar,
};
use itertools::Itertools;
use std::sync::mpsc::{channel, Receiver, Sender};

const REDUCE_TAG: i32 = -1;
const GATHER_TAG: i32 = -2;
const BARRIER_TAG: i32 = -3;

#[derive(Debug)]
struct Envelope<T> {
    tag: i32,
    data: Vec<T>,
}

/// Communication between the threads of one process, one thread per partition.
///
/// Every ordered pair of ranks is joined by an unbounded channel, so sends never block. Dropping a
/// communicator disconnects its channels: peers waiting on it get [HeatError::Unreachable]
/// rather than hanging.
#[derive(Debug)]
pub struct ThreadComm<T: RealScalar> {
    rank: usize,
    senders: Vec<Sender<Envelope<T>>>,
    receivers: Vec<Receiver<Envelope<T>>>,
}

impl<T: RealScalar> ThreadComm<T> {
    /// Create connected communicators for `size` ranks. Element `r` belongs to rank `r`
    pub fn universe(size: usize) -> Vec<Self> {
        let mut senders = (0..size).map(|_| Vec::with_capacity(size)).collect_vec();
        let mut receivers = (0..size).map(|_| Vec::with_capacity(size)).collect_vec();
        for source in 0..size {
            for dest in 0..size {
                let (tx, rx) = channel();
                senders[source].push(tx);
                receivers[dest].push(rx);
            }
        }
        senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (senders, receivers))| Self {
                rank,
                senders,
                receivers,
            })
            .collect_vec()
    }

    fn post(&self, dest: usize, tag: i32, data: Vec<T>, operation: &'static str) -> Result<()> {
        self.senders[dest]
            .send(Envelope { tag, data })
            .map_err(|_| HeatError::Unreachable {
                operation,
                rank: dest,
            })
    }

    fn take(&self, source: usize, tag: i32, operation: &'static str) -> Result<Vec<T>> {
        let envelope = self.receivers[source]
            .recv()
            .map_err(|_| HeatError::Unreachable {
                operation,
                rank: source,
            })?;
        if envelope.tag != tag {
            return Err(HeatError::UnexpectedTag {
                operation,
                rank: source,
                expected: tag,
                received: envelope.tag,
            });
        }
        Ok(envelope.data)
    }

    fn others(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.senders.len()).filter(move |r| *r != self.rank)
    }
}

impl<T: RealScalar> DistributedComm<T> for ThreadComm<T> {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.senders.len()
    }

    fn send_receive(
        &self,
        send: &[T],
        dest: Option<usize>,
        recv: &mut [T],
        source: Option<usize>,
        tag: i32,
    ) -> Result<()> {
        if let Some(dest) = dest {
            self.post(dest, tag, send.to_vec(), "halo exchange")?;
        }
        if let Some(source) = source {
            let data = self.take(source, tag, "halo exchange")?;
            if data.len() != recv.len() {
                return Err(HeatError::MessageSize {
                    operation: "halo exchange",
                    rank: source,
                    expected: recv.len(),
                    received: data.len(),
                });
            }
            recv.copy_from_slice(&data);
        }
        Ok(())
    }

    fn all_reduce_max(&self, local: T) -> Result<T> {
        for r in self.others() {
            self.post(r, REDUCE_TAG, vec![local], "reduce max")?;
        }
        let mut global = local;
        for r in self.others() {
            for value in self.take(r, REDUCE_TAG, "reduce max")? {
                global = global.max(value);
            }
        }
        Ok(global)
    }

    fn gather_varcount(
        &self,
        local: &[T],
        counts: &[usize],
        root: usize,
    ) -> Result<Option<Vec<T>>> {
        if self.rank != root {
            self.post(root, GATHER_TAG, local.to_vec(), "gather")?;
            return Ok(None);
        }
        let mut data = Vec::with_capacity(counts.iter().sum());
        for (r, count) in counts.iter().enumerate() {
            let block = if r == root {
                local.to_vec()
            } else {
                self.take(r, GATHER_TAG, "gather")?
            };
            if block.len() != *count {
                return Err(HeatError::MessageSize {
                    operation: "gather",
                    rank: r,
                    expected: *count,
                    received: block.len(),
                });
            }
            data.extend(block);
        }
        Ok(Some(data))
    }

    fn barrier(&self) -> Result<()> {
        for r in self.others() {
            self.post(r, BARRIER_TAG, vec![], "barrier")?;
        }
        for r in self.others() {
            self.take(r, BARRIER_TAG, "barrier")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::thread;

    #[test]
    fn test_ring_shift() {
        let size = 4;
        let results = thread::scope(|s| {
            let handles = ThreadComm::<f64>::universe(size)
                .into_iter()
                .map(|comm| {
                    s.spawn(move || {
                        let rank = comm.rank();
                        let send = vec![rank as f64; 3];
                        let mut recv = vec![-1.0; 3];
                        // Shift towards higher ranks, without wrapping.
                        let dest = (rank + 1 < size).then_some(rank + 1);
                        let source = rank.checked_sub(1);
                        comm.send_receive(&send, dest, &mut recv, source, 7).unwrap();
                        recv
                    })
                })
                .collect_vec();
            handles.into_iter().map(|h| h.join().unwrap()).collect_vec()
        });
        assert_eq!(results[0], vec![-1.0; 3]);
        for rank in 1..size {
            assert_eq!(results[rank], vec![(rank - 1) as f64; 3]);
        }
    }

    #[test]
    fn test_collectives() {
        let size = 3;
        let results = thread::scope(|s| {
            let handles = ThreadComm::<f32>::universe(size)
                .into_iter()
                .map(|comm| {
                    s.spawn(move || {
                        let rank = comm.rank();
                        let max = comm.all_reduce_max(rank as f32 * 1.5).unwrap();
                        comm.barrier().unwrap();
                        let local = vec![rank as f32; rank + 1];
                        let gathered = comm.gather_varcount(&local, &[1, 2, 3], 0).unwrap();
                        (max, gathered)
                    })
                })
                .collect_vec();
            handles.into_iter().map(|h| h.join().unwrap()).collect_vec()
        });
        for (max, _) in &results {
            assert_eq!(*max, 3.0);
        }
        assert_eq!(
            results[0].1,
            Some(vec![0.0, 1.0, 1.0, 2.0, 2.0, 2.0])
        );
        assert_eq!(results[1].1, None);
        assert_eq!(results[2].1, None);
    }

    #[test]
    fn test_dropped_peer_is_unreachable() {
        let mut universe = ThreadComm::<f64>::universe(2);
        let survivor = universe.remove(0);
        drop(universe);
        let mut recv = vec![0.0; 1];
        assert!(matches!(
            survivor.send_receive(&[1.0], None, &mut recv, Some(1), 0),
            Err(HeatError::Unreachable { rank: 1, .. })
        ));
        assert!(matches!(
            survivor.barrier(),
            Err(HeatError::Unreachable { rank: 1, .. })
        ));
    }

    #[test]
    fn test_wrong_length_is_reported() {
        let universe = ThreadComm::<f64>::universe(2);
        let mut recv = vec![0.0; 2];
        universe[1]
            .send_receive(&[1.0, 2.0, 3.0], Some(0), &mut [], None, 0)
            .unwrap();
        assert!(matches!(
            universe[0].send_receive(&[], None, &mut recv, Some(1), 0),
            Err(HeatError::MessageSize {
                expected: 2,
                received: 3,
                ..
            })
        ));
    }
}
