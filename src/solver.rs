//! Time stepping driver
use crate::{
    boundary::enforce,
    config::{GridConfig, SolverConfig},
    error::Result,
    field::{Field, FieldPair},
    gather::{gather_global, global_max_change, GlobalField, ROOT},
    halo::exchange_halos,
    stencil::Stencil,
    topology::ProcessTopology,
    traits::{DistributedComm, SnapshotExport},
    types::RealScalar,
};
use log::{debug, info, trace};
use std::{
    path::{Path, PathBuf},
    time::Instant,
};

/// Floating point operations per cell update of the 5-point stencil
pub const FLOPS_PER_UPDATE: f64 = 7.0;

/// File name of the run summary written next to the snapshots
pub const SUMMARY_FILENAME: &str = "run_summary.ron";

/// Timing and convergence data of a completed run, identical on every rank
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// Global grid points along `i`
    pub nx: usize,
    /// Global grid points along `j`
    pub ny: usize,
    /// Number of processes
    pub processes: usize,
    /// Process grid dimensions
    pub process_grid: [usize; 2],
    /// Steps performed
    pub steps: usize,
    /// Whether the run stopped early because the change fell below the tolerance
    pub converged: bool,
    /// Wall clock time of the time loop, maximised over processes
    pub elapsed_seconds: f64,
    /// Global maximum change over the final step
    pub final_max_change: f64,
    /// Final temperature of the global centre cell `(nx/2, ny/2)`
    pub center_temperature: f64,
}

impl RunSummary {
    /// Cell updates per second
    pub fn updates_per_second(&self) -> f64 {
        if self.elapsed_seconds > 0.0 {
            self.nx as f64 * self.ny as f64 * self.steps as f64 / self.elapsed_seconds
        } else {
            0.0
        }
    }

    /// Milliseconds per step
    pub fn ms_per_step(&self) -> f64 {
        if self.steps > 0 {
            self.elapsed_seconds * 1000.0 / self.steps as f64
        } else {
            0.0
        }
    }

    /// Achieved GFLOP/s
    pub fn gflops(&self) -> f64 {
        FLOPS_PER_UPDATE * self.updates_per_second() / 1e9
    }
}

/// One partition of a distributed heat equation solve.
///
/// Every rank of `comm` builds its own solver from the same [SolverConfig]. All methods that
/// communicate must then be called by every rank in the same order.
pub struct HeatSolver<'a, T: RealScalar, C: DistributedComm<T>> {
    comm: &'a C,
    config: SolverConfig,
    topology: ProcessTopology,
    grid: GridConfig,
    stencil: Stencil<T>,
    fields: FieldPair<T>,
    step: usize,
}

impl<'a, T: RealScalar, C: DistributedComm<T>> HeatSolver<'a, T, C> {
    /// Set up the partition owned by this rank.
    ///
    /// Every configuration check happens here, before any message is sent.
    pub fn new(comm: &'a C, config: &SolverConfig) -> Result<Self> {
        let topology = config.topology(comm.size(), comm.rank())?;
        let grid = GridConfig::new(config, &topology)?;
        let stencil = Stencil::from_grid(&grid)?;

        let mut field = Field::new(grid.nx_local, grid.ny_local, T::zero());
        config.initial.apply(&mut field, &grid);
        enforce(&mut field, &topology, &config.boundary);
        let fields = FieldPair::new(field.clone(), field);

        debug!(
            "rank {} at {:?} of {:?}: {} x {} cells from {:?}",
            topology.rank(),
            topology.coords(),
            topology.dims(),
            grid.nx_local,
            grid.ny_local,
            grid.offset
        );
        if topology.rank() == ROOT {
            info!(
                "{} x {} grid on {} x {} processes, dt = {:e}, rx = {}, ry = {}",
                grid.nx_global,
                grid.ny_global,
                grid.dims[0],
                grid.dims[1],
                grid.dt,
                stencil.rx(),
                stencil.ry()
            );
        }

        Ok(Self {
            comm,
            config: config.clone(),
            topology,
            grid,
            stencil,
            fields,
            step: 0,
        })
    }

    /// Process topology
    pub fn topology(&self) -> &ProcessTopology {
        &self.topology
    }
    /// Grid parameters of this partition
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }
    /// Configuration the solver was built from
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
    /// Local field holding the latest state
    pub fn field(&self) -> &Field<T> {
        self.fields.current()
    }
    /// Steps taken so far
    pub fn steps_taken(&self) -> usize {
        self.step
    }
    /// Simulated time reached
    pub fn time(&self) -> f64 {
        self.grid.time(self.step)
    }

    /// Advance by one step: exchange halos, apply the stencil, swap, enforce the boundary
    pub fn step(&mut self) -> Result<()> {
        exchange_halos(self.fields.current_mut(), &self.topology, self.comm)?;
        let (current, next) = self.fields.split();
        self.stencil.apply(current, next);
        self.fields.swap();
        for field in self.fields.both_mut() {
            enforce(field, &self.topology, &self.config.boundary);
        }
        self.step += 1;
        trace!("rank {}: step {}", self.topology.rank(), self.step);
        Ok(())
    }

    /// Global maximum change over the last step
    pub fn max_change(&self) -> Result<T> {
        global_max_change(&self.fields, self.comm)
    }

    /// Temperature of the global centre cell `(nx/2, ny/2)`, returned on every rank
    pub fn center_temperature(&self) -> Result<T> {
        let centre = [self.grid.nx_global / 2, self.grid.ny_global / 2];
        let block = self.grid.block();
        // Only the owner contributes a finite value to the reduction.
        let local = if block.contains(centre) {
            self.fields.current().get(
                centre[0] - block.offset[0] + 1,
                centre[1] - block.offset[1] + 1,
            )
        } else {
            T::neg_infinity()
        };
        self.comm.all_reduce_max(local)
    }

    /// The global field, on rank 0 only
    pub fn gather(&self) -> Result<Option<GlobalField<T>>> {
        gather_global(self.fields.current(), &self.grid, &self.topology, self.comm)
    }

    /// Gather the field and write a snapshot of the current step into `dir` on rank 0.
    ///
    /// Returns the path written on rank 0 and `None` elsewhere.
    pub fn save_snapshot(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let Some(global) = self.gather()? else {
            return Ok(None);
        };
        let path = global.export_snapshot(dir, self.step, self.time())?;
        debug!("saved solution to {}", path.display());
        Ok(Some(path))
    }

    /// Run the configured number of steps, writing snapshots and stopping early on convergence
    pub fn run(&mut self) -> Result<RunSummary> {
        let output_dir = self.config.output_dir.clone();
        let steps = self.config.steps;
        let save_interval = self.config.save_interval;
        let is_root = self.topology.rank() == ROOT;

        if let Some(dir) = &output_dir {
            self.save_snapshot(dir)?;
        }

        self.comm.barrier()?;
        let start = Instant::now();

        let mut converged = false;
        let mut saved = true;
        for _ in 0..steps {
            self.step()?;
            saved = false;
            if let Some(tolerance) = self.config.tolerance {
                if self.step % self.config.check_interval == 0 {
                    converged = self.max_change()?.cast_to() < tolerance;
                }
            }
            if save_interval > 0 && self.step % save_interval == 0 {
                if is_root {
                    info!("Step {} / {}", self.step, steps);
                }
                if let Some(dir) = &output_dir {
                    self.save_snapshot(dir)?;
                    saved = true;
                }
            }
            if converged {
                if is_root {
                    info!("converged after {} steps", self.step);
                }
                break;
            }
        }
        if converged && !saved {
            if let Some(dir) = &output_dir {
                self.save_snapshot(dir)?;
            }
        }

        let final_max_change = self.max_change()?.cast_to();
        let center_temperature = self.center_temperature()?.cast_to();
        self.comm.barrier()?;
        let local_elapsed = start.elapsed().as_secs_f64();
        let elapsed_seconds = self
            .comm
            .all_reduce_max(T::cast_from(local_elapsed))?
            .cast_to();

        let summary = RunSummary {
            nx: self.grid.nx_global,
            ny: self.grid.ny_global,
            processes: self.topology.size(),
            process_grid: self.topology.dims(),
            steps: self.step,
            converged,
            elapsed_seconds,
            final_max_change,
            center_temperature,
        };
        if is_root {
            info!(
                "{} steps in {:.3} s: {:.2e} updates/s, {:.3} ms/step, {:.2} GFLOP/s",
                summary.steps,
                summary.elapsed_seconds,
                summary.updates_per_second(),
                summary.ms_per_step(),
                summary.gflops()
            );
            info!("centre temperature {:.6}", summary.center_temperature);
            if let Some(dir) = &output_dir {
                write_summary(&summary, dir)?;
            }
        }
        Ok(summary)
    }
}

#[cfg(feature = "serde")]
fn write_summary(summary: &RunSummary, dir: &Path) -> Result<()> {
    use crate::traits::RONExport;
    summary.export_as_ron(&dir.join(SUMMARY_FILENAME))
}

#[cfg(not(feature = "serde"))]
fn write_summary(_summary: &RunSummary, _dir: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        boundary::BoundaryValues, comm::ThreadComm, error::HeatError,
        initial::InitialCondition, types::Side,
    };
    use approx::assert_relative_eq;

    fn serial<T: RealScalar>() -> ThreadComm<T> {
        ThreadComm::universe(1).remove(0)
    }

    #[test]
    fn test_10x10_first_step() {
        let comm = serial::<f64>();
        let mut solver = HeatSolver::new(&comm, &SolverConfig::new(10, 10, 1)).unwrap();
        solver.step().unwrap();
        let field = solver.field();
        assert_relative_eq!(field.get(1, 1), 35.0, epsilon = 1e-10);
        assert_relative_eq!(field.get(9, 1), 15.0, epsilon = 1e-10);
        assert_relative_eq!(field.get(5, 5), 20.0, epsilon = 1e-10);
        assert_eq!(field.halo(Side::North), vec![100.0; 10]);
        assert_eq!(solver.steps_taken(), 1);
        // Cells next to the hot edge away from the corners gain 20 degrees.
        assert_relative_eq!(solver.max_change().unwrap(), 20.0, epsilon = 1e-10);
        assert_eq!(solver.center_temperature().unwrap(), solver.field().get(6, 6));
    }

    #[test]
    fn test_uniform_problem_is_steady() {
        let comm = serial::<f32>();
        let mut config = SolverConfig::new(6, 7, 3);
        config.initial = InitialCondition::Uniform(5.0);
        config.boundary = BoundaryValues::uniform(5.0);
        let mut solver = HeatSolver::new(&comm, &config).unwrap();
        let summary = solver.run().unwrap();
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.final_max_change, 0.0);
        assert_eq!(summary.center_temperature, 5.0);
        assert!(!summary.converged);
    }

    #[test]
    fn test_convergence_stops_early() {
        let comm = serial::<f64>();
        let mut config = SolverConfig::new(6, 6, 100);
        config.initial = InitialCondition::Uniform(5.0);
        config.boundary = BoundaryValues::uniform(5.0);
        config.tolerance = Some(1e-8);
        config.check_interval = 4;
        let mut solver = HeatSolver::new(&comm, &config).unwrap();
        let summary = solver.run().unwrap();
        assert!(summary.converged);
        assert_eq!(summary.steps, 4);
    }

    #[test]
    fn test_unstable_dt_rejected() {
        let comm = serial::<f64>();
        let mut config = SolverConfig::new(10, 10, 1);
        config.dt = Some(1.0);
        assert!(matches!(
            HeatSolver::new(&comm, &config),
            Err(HeatError::Unstable { .. })
        ));
    }

    #[test]
    fn test_summary_rates_do_not_overflow() {
        let summary = RunSummary {
            nx: 1 << 32,
            ny: 1 << 32,
            processes: 1,
            process_grid: [1, 1],
            steps: 1 << 32,
            converged: false,
            elapsed_seconds: 1.0,
            final_max_change: 0.0,
            center_temperature: 0.0,
        };
        assert_relative_eq!(summary.updates_per_second(), 2f64.powi(96));
    }

    #[test]
    fn test_summary_rates() {
        let summary = RunSummary {
            nx: 100,
            ny: 100,
            processes: 4,
            process_grid: [2, 2],
            steps: 10,
            converged: false,
            elapsed_seconds: 0.5,
            final_max_change: 0.0,
            center_temperature: 20.0,
        };
        assert_relative_eq!(summary.updates_per_second(), 2e5);
        assert_relative_eq!(summary.ms_per_step(), 50.0);
        assert_relative_eq!(summary.gflops(), 1.4e-3);
    }
}
