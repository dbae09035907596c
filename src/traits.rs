//! Traits

mod comm;
mod io;

pub use comm::DistributedComm;
pub use io::{snapshot_filename, SnapshotExport};
#[cfg(feature = "serde")]
pub use io::{RONExport, RONImport};
