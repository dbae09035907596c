//! Halo exchange between neighbouring processes
use crate::{
    error::Result,
    field::Field,
    topology::ProcessTopology,
    traits::DistributedComm,
    types::{RealScalar, Side},
};
use log::trace;

/// Message tag of the shift that sends towards `side`
pub fn exchange_tag(side: Side) -> i32 {
    match side {
        Side::North => 0,
        Side::South => 1,
        Side::West => 2,
        Side::East => 3,
    }
}

/// Fill every exchanged halo of `field` with the adjacent owned cells of its neighbours.
///
/// The exchange is four shifts, one per side: every rank sends the owned edge next to `side` to
/// its neighbour on `side` and receives into the halo on the opposite side. Halo sides on the
/// global boundary are left untouched, as are the corner cells.
pub fn exchange_halos<T: RealScalar, C: DistributedComm<T>>(
    field: &mut Field<T>,
    topology: &ProcessTopology,
    comm: &C,
) -> Result<()> {
    for side in Side::ALL {
        let dest = topology.halo_kind(side).neighbour();
        let source = topology.halo_kind(side.opposite()).neighbour();
        if dest.is_none() && source.is_none() {
            continue;
        }

        let mut send = vec![T::zero(); field.edge_len(side)];
        if dest.is_some() {
            field.copy_edge(side, &mut send);
        }
        let mut recv = vec![T::zero(); field.edge_len(side.opposite())];
        comm.send_receive(&send, dest, &mut recv, source, exchange_tag(side))?;
        if source.is_some() {
            field.write_halo(side.opposite(), &recv);
        }
        trace!(
            "rank {}: shift {:?} sent to {:?}, received from {:?}",
            topology.rank(),
            side,
            dest,
            source
        );
    }
    Ok(())
}
