//! Plain text snapshots
use crate::{error::Result, gather::GlobalField, traits::SnapshotExport, types::RealScalar};
use std::io::Write;

impl<T: RealScalar> SnapshotExport for GlobalField<T> {
    fn write_snapshot<W: Write>(&self, writer: &mut W, step: usize, time: f64) -> Result<()> {
        // The second header line starts with a space, which existing readers expect.
        writeln!(writer, "# Heat equation solution at timestep {step}")?;
        writeln!(writer, " # nx={} ny={} time={time:.6}", self.nx(), self.ny())?;
        for i in 0..self.nx() {
            for value in self.row(i) {
                write!(writer, "{:.6} ", value.cast_to())?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}
