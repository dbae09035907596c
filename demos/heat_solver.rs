//! Solve the heat equation on every process of an MPI job
use clap::Parser;
use heatgrid::{
    traits::RONImport, HeatSolver, InitialCondition, MpiComm, Result, RunSummary, SolverConfig,
};
use mpi::{environment::Universe, traits::Communicator};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Global grid points along i
    #[arg(default_value_t = 256)]
    nx: usize,
    /// Global grid points along j
    #[arg(default_value_t = 256)]
    ny: usize,
    /// Number of time steps
    #[arg(default_value_t = 1000)]
    steps: usize,
    /// Read the whole configuration from a RON file, ignoring the other arguments
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Directory for snapshots and the run summary
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
    /// Steps between snapshots
    #[arg(short, long, default_value_t = 100)]
    save_interval: usize,
    /// Start from a hot disk in a cold domain instead of a uniform temperature
    #[arg(long)]
    hot_disk: bool,
    /// Stop once the largest change per step falls below this value
    #[arg(short, long)]
    tolerance: Option<f64>,
}

impl Args {
    fn solver_config(&self) -> Result<SolverConfig> {
        if let Some(path) = &self.config {
            return SolverConfig::import_from_ron(path);
        }
        let mut config = SolverConfig::new(self.nx, self.ny, self.steps);
        config.output_dir = self.output_dir.clone();
        config.save_interval = self.save_interval;
        config.tolerance = self.tolerance;
        if self.hot_disk {
            config.initial = InitialCondition::default_hot_disk(self.nx, self.ny);
        }
        Ok(config)
    }
}

fn solve<C: Communicator>(args: &Args, world: &C) -> Result<RunSummary> {
    let config = args.solver_config()?;
    let comm = MpiComm::new(world);
    let mut solver = HeatSolver::<f64, _>::new(&comm, &config)?;

    if world.rank() == 0 {
        let grid = solver.grid();
        println!("Heat Solver MPI");
        println!("Process grid: {} x {}", grid.dims[0], grid.dims[1]);
        println!("Global grid: {} x {}", grid.nx_global, grid.ny_global);
        println!("Local grid: {} x {}", grid.nx_local, grid.ny_local);
        println!("Time step: {:.6e}", grid.dt);
        println!("{}", "-".repeat(50));
    }

    solver.run()
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", "=".repeat(50));
    println!("Performance Summary");
    println!("{}", "=".repeat(50));
    println!("Grid size: {} x {}", summary.nx, summary.ny);
    println!("Processes: {}", summary.processes);
    println!("Time steps: {}", summary.steps);
    if summary.converged {
        println!("Converged: max change {:.3e}", summary.final_max_change);
    }
    println!("Center temperature: {:.6}", summary.center_temperature);
    println!("Total time: {:.3} seconds", summary.elapsed_seconds);
    println!("Updates/sec: {:.2e}", summary.updates_per_second());
    println!("Time per step: {:.3} ms", summary.ms_per_step());
    println!("GFLOPS: {:.2}", summary.gflops());
    println!("{}", "=".repeat(50));
}

fn main() {
    let args = Args::parse();
    let universe: Universe = mpi::initialize().unwrap();
    let world = universe.world();

    match solve(&args, &world) {
        Ok(summary) => {
            if world.rank() == 0 {
                print_summary(&summary);
            }
        }
        Err(e) => {
            eprintln!("rank {}: {e}", world.rank());
            world.abort(1);
        }
    }
}
