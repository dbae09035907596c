//! Cartesian process topology
use crate::{
    error::{HeatError, Result},
    types::{HaloKind, Side},
};

/// Split `size` processes into a two dimensional grid `(px, py)` with `px * py == size`.
///
/// The factors are chosen as close to each other as possible with `px >= py`, which keeps the
/// halo surface of each block small.
pub fn dims_create(size: usize) -> Result<[usize; 2]> {
    if size == 0 {
        return Err(HeatError::NoProcesses);
    }
    let mut py = 1;
    let mut f = 1;
    while f * f <= size {
        if size % f == 0 {
            py = f;
        }
        f += 1;
    }
    Ok([size / py, py])
}

/// Like [dims_create], but with the larger factor on the longer axis of a `global` grid
pub fn dims_create_for(size: usize, global: [usize; 2]) -> Result<[usize; 2]> {
    let [large, small] = dims_create(size)?;
    if global[1] > global[0] {
        Ok([small, large])
    } else {
        Ok([large, small])
    }
}

/// Position of one process in a non-periodic Cartesian process grid.
///
/// Ranks are mapped row-major: `coords = (rank / py, rank % py)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTopology {
    size: usize,
    rank: usize,
    dims: [usize; 2],
    coords: [usize; 2],
    neighbours: [Option<usize>; 4],
}

impl ProcessTopology {
    /// Create a topology with a near-square process grid
    pub fn new(size: usize, rank: usize) -> Result<Self> {
        Self::with_dims(size, rank, dims_create(size)?)
    }

    /// Create a topology with a given process grid
    pub fn with_dims(size: usize, rank: usize, dims: [usize; 2]) -> Result<Self> {
        if size == 0 {
            return Err(HeatError::NoProcesses);
        }
        if dims[0].checked_mul(dims[1]) != Some(size) {
            return Err(HeatError::ProcessCountMismatch {
                px: dims[0],
                py: dims[1],
                size,
            });
        }
        if rank >= size {
            return Err(HeatError::InvalidRank { rank, size });
        }
        let coords = [rank / dims[1], rank % dims[1]];
        let mut topology = Self {
            size,
            rank,
            dims,
            coords,
            neighbours: [None; 4],
        };
        topology.neighbours = Side::ALL.map(|side| topology.shift(side));
        Ok(topology)
    }

    // Rank of the process one step towards `side`, without wrapping.
    fn shift(&self, side: Side) -> Option<usize> {
        let axis = side.axis().index();
        let target = self.coords[axis].checked_add_signed(side.direction())?;
        if target >= self.dims[axis] {
            return None;
        }
        let mut coords = self.coords;
        coords[axis] = target;
        Some(self.rank_of(coords))
    }

    /// Number of processes
    pub fn size(&self) -> usize {
        self.size
    }
    /// Rank of this process
    pub fn rank(&self) -> usize {
        self.rank
    }
    /// Process grid dimensions `(px, py)`
    pub fn dims(&self) -> [usize; 2] {
        self.dims
    }
    /// Coordinates of this process in the process grid
    pub fn coords(&self) -> [usize; 2] {
        self.coords
    }

    /// Coordinates of any rank
    pub fn coords_of(&self, rank: usize) -> [usize; 2] {
        [rank / self.dims[1], rank % self.dims[1]]
    }

    /// Rank at the given coordinates
    pub fn rank_of(&self, coords: [usize; 2]) -> usize {
        coords[0] * self.dims[1] + coords[1]
    }

    /// Neighbouring rank on one side, or `None` on the global boundary
    pub fn neighbour(&self, side: Side) -> Option<usize> {
        self.neighbours[Self::slot(side)]
    }

    /// How the halo on one side is filled
    pub fn halo_kind(&self, side: Side) -> HaloKind {
        match self.neighbour(side) {
            Some(rank) => HaloKind::Exchanged(rank),
            None => HaloKind::Boundary,
        }
    }

    fn slot(side: Side) -> usize {
        match side {
            Side::North => 0,
            Side::South => 1,
            Side::West => 2,
            Side::East => 3,
        }
    }
}
