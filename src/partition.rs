//! Block partitioning of the global grid.
//!
//! Remainder cells go to the lowest coordinates, one each. [local_size] and [offset] must be used
//! for every placement decision (sizing, initial conditions, reassembly) or gathered data will
//! not line up.
use crate::{
    error::{HeatError, Result},
    topology::ProcessTopology,
};
use itertools::Itertools;

/// Number of cells along one axis owned by the process at coordinate `coord`
pub fn local_size(n: usize, p: usize, coord: usize) -> usize {
    n / p + usize::from(coord < n % p)
}

/// Global index of the first cell along one axis owned by the process at coordinate `coord`
pub fn offset(n: usize, p: usize, coord: usize) -> usize {
    coord * (n / p) + usize::min(coord, n % p)
}

/// The rectangle of global cells owned by one process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Global index of the first owned cell in each axis
    pub offset: [usize; 2],
    /// Number of owned cells in each axis
    pub size: [usize; 2],
}

impl Block {
    /// Number of owned cells
    pub fn cell_count(&self) -> usize {
        self.size[0] * self.size[1]
    }

    /// Check if a global cell is owned by this block
    pub fn contains(&self, global: [usize; 2]) -> bool {
        (0..2).all(|a| global[a] >= self.offset[a] && global[a] < self.offset[a] + self.size[a])
    }
}

/// Check that no process would be left without cells
pub fn check_decomposition(global: [usize; 2], dims: [usize; 2]) -> Result<()> {
    for axis in 0..2 {
        if dims[axis] > global[axis] {
            return Err(HeatError::OverDecomposed {
                axis,
                cells: global[axis],
                processes: dims[axis],
            });
        }
    }
    Ok(())
}

/// The block owned by the process at `coords`
pub fn block(global: [usize; 2], dims: [usize; 2], coords: [usize; 2]) -> Block {
    Block {
        offset: [0, 1].map(|a| offset(global[a], dims[a], coords[a])),
        size: [0, 1].map(|a| local_size(global[a], dims[a], coords[a])),
    }
}

/// The blocks of all processes, in rank order
pub fn blocks(global: [usize; 2], topology: &ProcessTopology) -> Vec<Block> {
    (0..topology.size())
        .map(|rank| block(global, topology.dims(), topology.coords_of(rank)))
        .collect_vec()
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::iproduct;

    #[test]
    fn test_sizes_sum_to_global() {
        for n in 1..40 {
            for p in 1..=n {
                let total: usize = (0..p).map(|c| local_size(n, p, c)).sum();
                assert_eq!(total, n);
            }
        }
    }

    #[test]
    fn test_offsets_tile_contiguously() {
        for n in 1..40 {
            for p in 1..=n {
                assert_eq!(offset(n, p, 0), 0);
                for c in 0..p - 1 {
                    assert_eq!(offset(n, p, c) + local_size(n, p, c), offset(n, p, c + 1));
                }
                assert_eq!(offset(n, p, p - 1) + local_size(n, p, p - 1), n);
            }
        }
    }

    #[test]
    fn test_sizes_differ_by_at_most_one() {
        let sizes = (0..4).map(|c| local_size(10, 4, c)).collect_vec();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
        let offsets = (0..4).map(|c| offset(10, 4, c)).collect_vec();
        assert_eq!(offsets, vec![0, 3, 6, 8]);
    }

    #[test]
    fn test_2x2_on_8x8() {
        let topology = ProcessTopology::new(4, 0).unwrap();
        assert_eq!(topology.dims(), [2, 2]);
        let blocks = blocks([8, 8], &topology);
        for b in &blocks {
            assert_eq!(b.size, [4, 4]);
            assert!([0, 4].contains(&b.offset[0]));
            assert!([0, 4].contains(&b.offset[1]));
        }
        assert_eq!(blocks[1].offset, [0, 4]);
        assert_eq!(blocks[2].offset, [4, 0]);
    }

    #[test]
    fn test_blocks_cover_grid_once() {
        let global = [11, 7];
        let topology = ProcessTopology::with_dims(6, 0, [3, 2]).unwrap();
        let blocks = blocks(global, &topology);
        let mut count = vec![0; global[0] * global[1]];
        for b in &blocks {
            for (i, j) in iproduct!(0..b.size[0], 0..b.size[1]) {
                count[(b.offset[0] + i) * global[1] + b.offset[1] + j] += 1;
            }
        }
        assert!(count.iter().all(|c| *c == 1));
        assert_eq!(blocks.iter().map(Block::cell_count).sum::<usize>(), 77);
    }

    #[test]
    fn test_contains() {
        let b = block([10, 10], [2, 2], [1, 0]);
        assert!(b.contains([5, 0]));
        assert!(b.contains([9, 4]));
        assert!(!b.contains([4, 0]));
        assert!(!b.contains([5, 5]));
    }

    #[test]
    fn test_over_decomposition() {
        assert!(check_decomposition([4, 4], [4, 4]).is_ok());
        assert!(matches!(
            check_decomposition([4, 3], [1, 4]),
            Err(HeatError::OverDecomposed { axis: 1, .. })
        ));
    }
}
