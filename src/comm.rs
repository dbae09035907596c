//! Communication backends
#[cfg(feature = "mpi")]
mod distributed;
mod threaded;

#[cfg(feature = "mpi")]
pub use distributed::MpiComm;
pub use threaded::ThreadComm;
