//! Dirichlet boundary conditions
use crate::{
    field::Field,
    topology::ProcessTopology,
    types::{HaloKind, RealScalar, Side},
};

/// Temperature of the hot edge in the default configuration
pub const T_HOT: f64 = 100.0;
/// Temperature of the cold edges in the default configuration
pub const T_COLD: f64 = 0.0;

/// Fixed temperatures on the four edges of the global domain
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoundaryValues {
    /// Top edge (row 0)
    pub north: f64,
    /// Bottom edge (last row)
    pub south: f64,
    /// Left edge (column 0)
    pub west: f64,
    /// Right edge (last column)
    pub east: f64,
}

impl Default for BoundaryValues {
    fn default() -> Self {
        Self {
            north: T_HOT,
            south: T_COLD,
            west: T_COLD,
            east: T_COLD,
        }
    }
}

impl BoundaryValues {
    /// The same temperature on every edge
    pub fn uniform(value: f64) -> Self {
        Self {
            north: value,
            south: value,
            west: value,
            east: value,
        }
    }

    /// Temperature of one edge
    pub fn value(&self, side: Side) -> f64 {
        match side {
            Side::North => self.north,
            Side::South => self.south,
            Side::West => self.west,
            Side::East => self.east,
        }
    }
}

/// Overwrite the halo of every global-edge side of `field` with its boundary value.
///
/// Sides facing another process are left untouched. Sides are processed north, south, west,
/// east, so the corner cells end up holding the west or east value.
pub fn enforce<T: RealScalar>(
    field: &mut Field<T>,
    topology: &ProcessTopology,
    values: &BoundaryValues,
) {
    for side in Side::ALL {
        if topology.halo_kind(side) == HaloKind::Boundary {
            field.fill_halo(side, T::cast_from(values.value(side)));
        }
    }
}
