//! RON I/O
use crate::{
    config::SolverConfig,
    solver::RunSummary,
    traits::{RONExport, RONImport},
};

impl RONExport for SolverConfig {}
impl RONImport for SolverConfig {}

impl RONExport for RunSummary {}
impl RONImport for RunSummary {}
