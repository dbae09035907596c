//! Output of gathered fields and run data
use crate::error::Result;
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// File name of the snapshot written after `step` steps
pub fn snapshot_filename(step: usize) -> String {
    format!("heat_solution_{step:05}.dat")
}

pub trait SnapshotExport {
    //! Plain text snapshots of a global field

    /// Write the snapshot text for the state after `step` steps at simulated time `time`
    fn write_snapshot<W: Write>(&self, writer: &mut W, step: usize, time: f64) -> Result<()>;

    /// Export as a snapshot file in `dir`, returning the path written
    fn export_snapshot(&self, dir: &Path, step: usize, time: f64) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(snapshot_filename(step));
        let mut writer = BufWriter::new(fs::File::create(&path)?);
        self.write_snapshot(&mut writer, step, time)?;
        writer.flush()?;
        Ok(path)
    }
}

#[cfg(feature = "serde")]
pub trait RONExport: serde::Serialize {
    //! Export for RON

    /// Generate the RON string
    fn to_ron_string(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// Export as RON
    fn export_as_ron(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }
}

#[cfg(feature = "serde")]
pub trait RONImport: Sized + serde::de::DeserializeOwned {
    //! Import for RON

    /// Parse from a RON string
    fn from_ron_string(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    /// Import from a RON file
    fn import_from_ron(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_string(&content)
    }
}
