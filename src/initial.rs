//! Initial conditions
use crate::{
    config::GridConfig,
    field::Field,
    types::RealScalar,
};

/// Initial interior temperature of the default configuration
pub const T_INITIAL: f64 = 20.0;

/// Initial temperature of the interior cells
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialCondition {
    /// The same temperature everywhere
    Uniform(f64),
    /// A disk centred on global cell `(nx/2, ny/2)`
    HotDisk {
        /// Radius in cells
        radius: f64,
        /// Temperature inside the disk
        temperature: f64,
        /// Temperature outside the disk
        background: f64,
    },
}

impl Default for InitialCondition {
    fn default() -> Self {
        InitialCondition::Uniform(T_INITIAL)
    }
}

impl InitialCondition {
    /// A disk of radius `min(nx, ny) / 10` at 100 degrees in a cold domain
    pub fn default_hot_disk(nx: usize, ny: usize) -> Self {
        InitialCondition::HotDisk {
            radius: (usize::min(nx, ny) / 10) as f64,
            temperature: 100.0,
            background: 0.0,
        }
    }

    /// Temperature of the global cell `(gi, gj)` on an `nx x ny` grid
    pub fn value_at(&self, gi: usize, gj: usize, nx: usize, ny: usize) -> f64 {
        match *self {
            InitialCondition::Uniform(value) => value,
            InitialCondition::HotDisk {
                radius,
                temperature,
                background,
            } => {
                let di = gi as f64 - (nx / 2) as f64;
                let dj = gj as f64 - (ny / 2) as f64;
                if (di * di + dj * dj).sqrt() < radius {
                    temperature
                } else {
                    background
                }
            }
        }
    }

    /// Fill the interior of a local field, placing it with the global offsets of `grid`
    pub fn apply<T: RealScalar>(&self, field: &mut Field<T>, grid: &GridConfig) {
        let [oi, oj] = grid.offset;
        field.fill_interior(|i, j| {
            T::cast_from(self.value_at(oi + i, oj + j, grid.nx_global, grid.ny_global))
        });
    }
}
