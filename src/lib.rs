//! Distributed explicit finite-difference solver for the 2D heat equation
//!
//! The global grid is split into rectangular blocks, one per process. Each block is stored with
//! a one cell halo that is refreshed from neighbouring blocks before every step.
#![cfg_attr(feature = "strict", deny(warnings), deny(unused_crate_dependencies))]
#![warn(missing_docs)]

pub mod boundary;
pub mod comm;
pub mod config;
pub mod error;
pub mod field;
pub mod gather;
pub mod halo;
pub mod initial;
mod io;
pub mod partition;
pub mod solver;
pub mod stencil;
pub mod topology;
pub mod traits;
pub mod types;

pub use boundary::BoundaryValues;
#[cfg(feature = "mpi")]
pub use comm::MpiComm;
pub use comm::ThreadComm;
pub use config::{GridConfig, SolverConfig};
pub use error::{HeatError, Result};
pub use gather::GlobalField;
pub use initial::InitialCondition;
pub use solver::{HeatSolver, RunSummary};
pub use topology::ProcessTopology;
