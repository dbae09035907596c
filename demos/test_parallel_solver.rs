//! Check an MPI run against a single process solve of the same problem
use heatgrid::{
    BoundaryValues, HeatSolver, InitialCondition, MpiComm, SolverConfig, ThreadComm,
};
use mpi::{environment::Universe, traits::Communicator};

fn main() {
    let universe: Universe = mpi::initialize().unwrap();
    let world = universe.world();
    let comm = MpiComm::new(&world);

    let mut config = SolverConfig::new(37, 29, 60);
    config.initial = InitialCondition::default_hot_disk(37, 29);
    config.boundary = BoundaryValues {
        north: 100.0,
        south: 10.0,
        west: 40.0,
        east: 0.0,
    };

    let mut solver = HeatSolver::<f64, _>::new(&comm, &config).unwrap();
    for _ in 0..config.steps {
        solver.step().unwrap();
    }
    let change = solver.max_change().unwrap();
    let gathered = solver.gather().unwrap();

    if world.rank() == 0 {
        let gathered = gathered.unwrap();

        let serial_comm = ThreadComm::<f64>::universe(1).remove(0);
        let mut serial = HeatSolver::new(&serial_comm, &config).unwrap();
        for _ in 0..config.steps {
            serial.step().unwrap();
        }
        let expected = serial.gather().unwrap().unwrap();

        let difference = gathered.max_abs_difference(&expected);
        assert!(difference < 1e-12, "difference {difference:e}");
        assert_eq!(change, serial.max_change().unwrap());
        println!(
            "{} processes agree with a single process (max difference {difference:e})",
            world.size()
        );
    } else {
        assert!(gathered.is_none());
    }
}
