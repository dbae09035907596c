//! Solve the heat equation with one thread per partition
use clap::Parser;
use heatgrid::{HeatSolver, InitialCondition, SolverConfig, ThreadComm};
use itertools::Itertools;
use std::{path::PathBuf, thread};

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
    /// Number of partitions, each run on its own thread
    #[arg(short = 'n', long, default_value_t = 4)]
    threads: usize,
    /// Directory for snapshots and the run summary
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
    /// Start from a hot disk in a cold domain instead of a uniform temperature
    #[arg(long)]
    hot_disk: bool,
}

fn main() {
    let args = Args::parse();
    let mut config = SolverConfig::new(args.nx, args.ny, args.steps);
    config.output_dir = args.output_dir;
    if args.hot_disk {
        config.initial = InitialCondition::default_hot_disk(args.nx, args.ny);
    }

    let results = thread::scope(|s| {
        let handles = ThreadComm::<f64>::universe(args.threads)
            .into_iter()
            .map(|comm| {
                let config = &config;
                s.spawn(move || HeatSolver::new(&comm, config).and_then(|mut solver| solver.run()))
            })
            .collect_vec();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect_vec()
    });

    for (rank, result) in results.iter().enumerate() {
        if let Err(e) = result {
            eprintln!("rank {rank}: {e}");
        }
    }
    if let Some(Ok(summary)) = results.first() {
        println!(
            "{} x {} grid on {} threads: {} steps in {:.3} s ({:.2e} updates/s, {:.2} GFLOPS)",
            summary.nx,
            summary.ny,
            summary.processes,
            summary.steps,
            summary.elapsed_seconds,
            summary.updates_per_second(),
            summary.gflops()
        );
    } else {
        std::process::exit(1);
    }
}
