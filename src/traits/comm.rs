//! Message passing between the processes of a run
use crate::{error::Result, types::RealScalar};

pub trait DistributedComm<T: RealScalar> {
    //! The communication primitives used by a distributed solve.
    //!
    //! Every method is blocking from the caller's point of view. All ranks must call the
    //! collective methods (`all_reduce_max`, `gather_varcount`, `barrier`) in the same order.

    /// Rank of this process
    fn rank(&self) -> usize;

    /// Number of processes
    fn size(&self) -> usize;

    /// Send `send` to `dest` while receiving exactly `recv.len()` values from `source`.
    ///
    /// Either side may be `None`, in which case that half is skipped. When every rank calls this
    /// with the same `tag` and a consistent shift (each rank's `dest` names this rank as its
    /// `source`) the exchange cannot deadlock.
    fn send_receive(
        &self,
        send: &[T],
        dest: Option<usize>,
        recv: &mut [T],
        source: Option<usize>,
        tag: i32,
    ) -> Result<()>;

    /// Maximum of `local` over all ranks, returned on every rank
    fn all_reduce_max(&self, local: T) -> Result<T>;

    /// Collect `local` from every rank on `root`.
    ///
    /// `counts[r]` is the number of values rank `r` contributes; it only needs to be valid on
    /// `root`. Returns the concatenation in rank order on `root` and `None` elsewhere.
    fn gather_varcount(&self, local: &[T], counts: &[usize], root: usize)
        -> Result<Option<Vec<T>>>;

    /// Wait until every rank has reached this point
    fn barrier(&self) -> Result<()>;
}
