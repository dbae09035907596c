//! Solver configuration
use crate::{
    boundary::BoundaryValues,
    error::{HeatError, Result},
    initial::InitialCondition,
    partition::{self, Block},
    topology::{dims_create_for, ProcessTopology},
};
use std::path::PathBuf;

/// Default thermal diffusivity
pub const ALPHA: f64 = 0.01;

/// User input for a run. Immutable once the solver is built
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Global grid points along `i`
    pub nx: usize,
    /// Global grid points along `j`
    pub ny: usize,
    /// Number of time steps
    pub steps: usize,
    /// Thermal diffusivity
    pub alpha: f64,
    /// Time step. If `None`, the largest stable step `0.25 * min(dx^2, dy^2) / alpha` is used
    pub dt: Option<f64>,
    /// Process grid `(px, py)`. If `None`, a near-square grid is chosen
    pub process_grid: Option<[usize; 2]>,
    /// Initial interior temperatures
    pub initial: InitialCondition,
    /// Fixed edge temperatures
    pub boundary: BoundaryValues,
    /// Write a snapshot every this many steps. 0 disables periodic snapshots
    pub save_interval: usize,
    /// Directory for snapshots and the run summary. If `None`, nothing is written
    pub output_dir: Option<PathBuf>,
    /// Stop early once the global maximum change per step falls below this value
    pub tolerance: Option<f64>,
    /// Steps between convergence checks
    pub check_interval: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            nx: 256,
            ny: 256,
            steps: 1000,
            alpha: ALPHA,
            dt: None,
            process_grid: None,
            initial: InitialCondition::default(),
            boundary: BoundaryValues::default(),
            save_interval: 100,
            output_dir: None,
            tolerance: None,
            check_interval: 1,
        }
    }
}

impl SolverConfig {
    /// Create a configuration with default physics for an `nx x ny` grid
    pub fn new(nx: usize, ny: usize, steps: usize) -> Self {
        Self {
            nx,
            ny,
            steps,
            ..Default::default()
        }
    }

    /// Check the inputs that do not depend on the process layout
    pub fn validate(&self) -> Result<()> {
        if self.nx < 2 || self.ny < 2 {
            return Err(HeatError::InvalidGridSize {
                nx: self.nx,
                ny: self.ny,
            });
        }
        if self.steps == 0 {
            return Err(HeatError::NoTimeSteps);
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(HeatError::NonPositiveDiffusivity(self.alpha));
        }
        if let Some(dt) = self.dt {
            if !(dt.is_finite() && dt > 0.0) {
                return Err(HeatError::NonPositiveTimeStep(dt));
            }
        }
        if let Some(tolerance) = self.tolerance {
            if !(tolerance.is_finite() && tolerance > 0.0) {
                return Err(HeatError::InvalidTolerance(tolerance));
            }
            if self.check_interval == 0 {
                return Err(HeatError::ZeroCheckInterval);
            }
        }
        Ok(())
    }

    /// Build the process topology requested by this configuration.
    ///
    /// Without an explicit `process_grid`, the larger factor of the process count goes to the
    /// longer grid axis.
    pub fn topology(&self, size: usize, rank: usize) -> Result<ProcessTopology> {
        let dims = match self.process_grid {
            Some(dims) => dims,
            None => dims_create_for(size, [self.nx, self.ny])?,
        };
        ProcessTopology::with_dims(size, rank, dims)
    }
}

/// Grid parameters of one process, derived once at start-up.
///
/// Summing `nx_local` over one column of the process grid gives `nx_global` (and likewise for
/// `ny_local`), since both are computed by [partition::local_size].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Global grid points along `i`
    pub nx_global: usize,
    /// Global grid points along `j`
    pub ny_global: usize,
    /// Interior cells owned along `i`
    pub nx_local: usize,
    /// Interior cells owned along `j`
    pub ny_local: usize,
    /// Global index of the first owned cell in each axis
    pub offset: [usize; 2],
    /// Grid spacing along `i`
    pub dx: f64,
    /// Grid spacing along `j`
    pub dy: f64,
    /// Thermal diffusivity
    pub alpha: f64,
    /// Time step
    pub dt: f64,
    /// Coordinates of this process
    pub coords: [usize; 2],
    /// Process grid dimensions
    pub dims: [usize; 2],
}

impl GridConfig {
    /// Derive the grid of the process described by `topology`
    pub fn new(config: &SolverConfig, topology: &ProcessTopology) -> Result<Self> {
        config.validate()?;
        let global = [config.nx, config.ny];
        partition::check_decomposition(global, topology.dims())?;
        let block = partition::block(global, topology.dims(), topology.coords());

        let dx = 1.0 / (config.nx - 1) as f64;
        let dy = 1.0 / (config.ny - 1) as f64;
        let dt = config
            .dt
            .unwrap_or_else(|| 0.25 * f64::min(dx * dx, dy * dy) / config.alpha);

        Ok(Self {
            nx_global: config.nx,
            ny_global: config.ny,
            nx_local: block.size[0],
            ny_local: block.size[1],
            offset: block.offset,
            dx,
            dy,
            alpha: config.alpha,
            dt,
            coords: topology.coords(),
            dims: topology.dims(),
        })
    }

    /// Mesh ratio `alpha * dt / dx^2`
    pub fn rx(&self) -> f64 {
        self.alpha * self.dt / (self.dx * self.dx)
    }
    /// Mesh ratio `alpha * dt / dy^2`
    pub fn ry(&self) -> f64 {
        self.alpha * self.dt / (self.dy * self.dy)
    }

    /// The block of global cells owned by this process
    pub fn block(&self) -> Block {
        Block {
            offset: self.offset,
            size: [self.nx_local, self.ny_local],
        }
    }

    /// Global grid size
    pub fn global(&self) -> [usize; 2] {
        [self.nx_global, self.ny_global]
    }

    /// Simulated time after `step` steps
    pub fn time(&self, step: usize) -> f64 {
        step as f64 * self.dt
    }
}
