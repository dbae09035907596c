//! Global reductions and reassembly of the distributed field
use crate::{
    config::GridConfig,
    error::Result,
    field::{Field, FieldPair},
    partition,
    stencil::max_difference,
    topology::ProcessTopology,
    traits::DistributedComm,
    types::RealScalar,
};
use itertools::{izip, Itertools};
use log::debug;

/// Rank that receives gathered data
pub const ROOT: usize = 0;

/// The whole `nx x ny` grid, stored row-major without halo
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalField<T: RealScalar> {
    nx: usize,
    ny: usize,
    data: Vec<T>,
}

impl<T: RealScalar> GlobalField<T> {
    /// Create from row-major data
    pub fn from_data(nx: usize, ny: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), nx * ny);
        Self { nx, ny, data }
    }

    /// Number of rows
    pub fn nx(&self) -> usize {
        self.nx
    }
    /// Number of columns
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Row-major values
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Value of global cell `(i, j)`
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.ny + j]
    }

    /// One row of values
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.ny..(i + 1) * self.ny]
    }

    /// Largest absolute difference from another field of the same shape
    pub fn max_abs_difference(&self, other: &Self) -> T {
        debug_assert_eq!((self.nx, self.ny), (other.nx, other.ny));
        self.data
            .iter()
            .zip(&other.data)
            .fold(T::zero(), |max, (a, b)| max.max((*a - *b).abs()))
    }
}

/// Collect the interior of every process on [ROOT].
///
/// Returns `None` on every other rank. With a single process the local interior is returned
/// without communicating.
pub fn gather_global<T: RealScalar, C: DistributedComm<T>>(
    field: &Field<T>,
    grid: &GridConfig,
    topology: &ProcessTopology,
    comm: &C,
) -> Result<Option<GlobalField<T>>> {
    let [nx, ny] = grid.global();
    if topology.size() == 1 {
        return Ok(Some(GlobalField::from_data(nx, ny, field.interior())));
    }

    let blocks = partition::blocks(grid.global(), topology);
    let counts = blocks.iter().map(|b| b.cell_count()).collect_vec();
    let Some(gathered) = comm.gather_varcount(&field.interior(), &counts, ROOT)? else {
        return Ok(None);
    };

    let mut data = vec![T::zero(); nx * ny];
    let mut start = 0;
    for (block, count) in izip!(&blocks, &counts) {
        let chunk = &gathered[start..start + count];
        let [oi, oj] = block.offset;
        let [bi, bj] = block.size;
        for (a, row) in chunk.chunks_exact(bj).enumerate().take(bi) {
            let dst = (oi + a) * ny + oj;
            data[dst..dst + bj].copy_from_slice(row);
        }
        start += count;
    }
    debug!("gathered {} blocks into a {nx} x {ny} field", blocks.len());
    Ok(Some(GlobalField::from_data(nx, ny, data)))
}

/// Largest change over the last step, maximised over all processes
pub fn global_max_change<T: RealScalar, C: DistributedComm<T>>(
    pair: &FieldPair<T>,
    comm: &C,
) -> Result<T> {
    comm.all_reduce_max(max_difference(pair.current(), pair.next()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{comm::ThreadComm, config::SolverConfig};
    use std::thread;

    fn gathered(size: usize, nx: usize, ny: usize) -> Vec<Option<GlobalField<f64>>> {
        let config = SolverConfig::new(nx, ny, 1);
        thread::scope(|s| {
            let handles = ThreadComm::<f64>::universe(size)
                .into_iter()
                .map(|comm| {
                    let config = &config;
                    s.spawn(move || {
                        let topology = ProcessTopology::new(size, comm.rank()).unwrap();
                        let grid = GridConfig::new(config, &topology).unwrap();
                        let mut field = Field::new(grid.nx_local, grid.ny_local, -1.0);
                        let [oi, oj] = grid.offset;
                        field.fill_interior(|i, j| (100 * (oi + i) + oj + j) as f64);
                        gather_global(&field, &grid, &topology, &comm).unwrap()
                    })
                })
                .collect_vec();
            handles.into_iter().map(|h| h.join().unwrap()).collect_vec()
        })
    }

    #[test]
    fn test_blocks_placed_at_offsets() {
        for (size, nx, ny) in [(1, 5, 4), (2, 5, 4), (4, 8, 8), (6, 7, 5)] {
            let results = gathered(size, nx, ny);
            let global = results[0].as_ref().unwrap();
            assert_eq!((global.nx(), global.ny()), (nx, ny));
            for i in 0..nx {
                for j in 0..ny {
                    assert_eq!(global.get(i, j), (100 * i + j) as f64);
                }
            }
            assert!(results[1..].iter().all(|r| r.is_none()));
        }
    }

    #[test]
    fn test_global_max_change() {
        let size = 3;
        let results = thread::scope(|s| {
            let handles = ThreadComm::<f64>::universe(size)
                .into_iter()
                .map(|comm| {
                    s.spawn(move || {
                        let mut next = Field::new(2, 2, 1.0);
                        next.set(1, 2, 1.0 + comm.rank() as f64);
                        // The halo is not part of the change.
                        next.set(0, 0, 50.0);
                        let mut pair = FieldPair::new(Field::new(2, 2, 1.0), next);
                        pair.swap();
                        global_max_change(&pair, &comm).unwrap()
                    })
                })
                .collect_vec();
            handles.into_iter().map(|h| h.join().unwrap()).collect_vec()
        });
        assert_eq!(results, vec![2.0; 3]);
    }

    #[test]
    fn test_max_abs_difference() {
        let a = GlobalField::from_data(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
        let b = GlobalField::from_data(2, 2, vec![1.0, 2.5, 2.0, 4.0]);
        assert_eq!(a.max_abs_difference(&b), 1.0);
        assert_eq!(a.row(1), &[3.0, 4.0]);
    }
}
