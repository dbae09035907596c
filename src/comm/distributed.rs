//! MPI backend
use crate::{
    error::{HeatError, Result},
    traits::DistributedComm,
    types::RealScalar,
};
use itertools::Itertools;
use mpi::{
    collective::SystemOperation,
    datatype::PartitionMut,
    request::WaitGuard,
    traits::{Communicator, CommunicatorCollectives, Destination, Equivalence, Root, Source},
};

/// Communication between MPI processes
#[derive(Debug)]
pub struct MpiComm<'a, C: Communicator> {
    comm: &'a C,
}

impl<'a, C: Communicator> MpiComm<'a, C> {
    /// Create new
    pub fn new(comm: &'a C) -> Self {
        Self { comm }
    }
}

impl<T: RealScalar + Equivalence, C: Communicator> DistributedComm<T> for MpiComm<'_, C> {
    fn rank(&self) -> usize {
        self.comm.rank() as usize
    }

    fn size(&self) -> usize {
        self.comm.size() as usize
    }

    fn send_receive(
        &self,
        send: &[T],
        dest: Option<usize>,
        recv: &mut [T],
        source: Option<usize>,
        tag: i32,
    ) -> Result<()> {
        let expected = recv.len();
        // The send is posted before the receive and only waited for when the scope closes, so
        // two ranks sending to each other always find a matching receive.
        mpi::request::scope(|scope| {
            let _send_guard = dest.map(|rank| {
                WaitGuard::from(
                    self.comm
                        .process_at_rank(rank as i32)
                        .immediate_send_with_tag(scope, send, tag),
                )
            });
            if let Some(rank) = source {
                let status = self
                    .comm
                    .process_at_rank(rank as i32)
                    .receive_into_with_tag(recv, tag);
                let received = status.count(T::equivalent_datatype()) as usize;
                if received != expected {
                    return Err(HeatError::MessageSize {
                        operation: "halo exchange",
                        rank,
                        expected,
                        received,
                    });
                }
            }
            Ok(())
        })
    }

    fn all_reduce_max(&self, local: T) -> Result<T> {
        let mut global = local;
        self.comm
            .all_reduce_into(&local, &mut global, SystemOperation::max());
        Ok(global)
    }

    fn gather_varcount(
        &self,
        local: &[T],
        counts: &[usize],
        root: usize,
    ) -> Result<Option<Vec<T>>> {
        let root_process = self.comm.process_at_rank(root as i32);
        if self.comm.rank() as usize != root {
            root_process.gather_varcount_into(local);
            return Ok(None);
        }

        if local.len() != counts[root] {
            return Err(HeatError::MessageSize {
                operation: "gather",
                rank: root,
                expected: counts[root],
                received: local.len(),
            });
        }
        let recv_counts = counts.iter().map(|&c| c as i32).collect_vec();
        let displacements = recv_counts
            .iter()
            .scan(0, |acc, &x| {
                let old = *acc;
                *acc += x;
                Some(old)
            })
            .collect_vec();
        let mut data = vec![T::zero(); counts.iter().sum()];
        {
            let mut partition = PartitionMut::new(&mut data[..], recv_counts, displacements);
            root_process.gather_varcount_into_root(local, &mut partition);
        }
        Ok(Some(data))
    }

    fn barrier(&self) -> Result<()> {
        self.comm.barrier();
        Ok(())
    }
}
