//! Errors
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, HeatError>;

/// Errors raised while configuring or running a distributed solve
#[derive(Error, Debug)]
pub enum HeatError {
    /// The global grid is too small for finite differences
    #[error("invalid grid size {nx} x {ny}: both dimensions must be at least 2")]
    InvalidGridSize {
        /// Global rows
        nx: usize,
        /// Global columns
        ny: usize,
    },

    /// Thermal diffusivity must be strictly positive
    #[error("thermal diffusivity must be positive and finite, got {0}")]
    NonPositiveDiffusivity(f64),

    /// A user supplied time step must be strictly positive
    #[error("time step must be positive and finite, got {0}")]
    NonPositiveTimeStep(f64),

    /// A convergence tolerance must be strictly positive
    #[error("convergence tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    /// Convergence checks need a positive interval
    #[error("convergence check interval must be positive")]
    ZeroCheckInterval,

    /// At least one time step is required
    #[error("number of time steps must be positive")]
    NoTimeSteps,

    /// A topology needs at least one process
    #[error("cannot build a process topology for zero processes")]
    NoProcesses,

    /// Rank outside of the communicator
    #[error("rank {rank} is out of range for {size} processes")]
    InvalidRank {
        /// Offending rank
        rank: usize,
        /// Number of processes
        size: usize,
    },

    /// A requested process grid does not match the number of processes
    #[error("process grid {px} x {py} does not match {size} processes")]
    ProcessCountMismatch {
        /// Processes along `i`
        px: usize,
        /// Processes along `j`
        py: usize,
        /// Number of processes available
        size: usize,
    },

    /// More processes than cells along one axis
    #[error("cannot split {cells} cells along axis {axis} over {processes} processes")]
    OverDecomposed {
        /// Axis index (0 for `i`, 1 for `j`)
        axis: usize,
        /// Global cells along the axis
        cells: usize,
        /// Processes along the axis
        processes: usize,
    },

    /// The explicit scheme would diverge
    #[error("unstable time step: rx + ry = {rx} + {ry} exceeds 0.5")]
    Unstable {
        /// `alpha * dt / dx^2`
        rx: f64,
        /// `alpha * dt / dy^2`
        ry: f64,
    },

    /// A peer process stopped participating
    #[error("{operation}: rank {rank} is unreachable")]
    Unreachable {
        /// Communication step that failed
        operation: &'static str,
        /// Peer rank
        rank: usize,
    },

    /// A message had the wrong number of values
    #[error("{operation}: expected {expected} values from rank {rank}, received {received}")]
    MessageSize {
        /// Communication step that failed
        operation: &'static str,
        /// Peer rank
        rank: usize,
        /// Expected number of values
        expected: usize,
        /// Received number of values
        received: usize,
    },

    /// A message arrived out of protocol order
    #[error("{operation}: unexpected message tag {received} from rank {rank}, expected {expected}")]
    UnexpectedTag {
        /// Communication step that failed
        operation: &'static str,
        /// Peer rank
        rank: usize,
        /// Expected tag
        expected: i32,
        /// Received tag
        received: i32,
    },

    /// File output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A RON configuration could not be parsed
    #[cfg(feature = "serde")]
    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    /// A value could not be written as RON
    #[cfg(feature = "serde")]
    #[error("RON serialisation error: {0}")]
    RonWrite(#[from] ron::Error),
}
