use super::traits::{DihedralFormat, FormatError, resolved_ids};
use crate::core::models::dihedral::Dihedral;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A cpptraj input script measuring every dihedral over a trajectory.
///
/// Atom IDs are written as `@N` atom-number masks, so the script is only valid for
/// the topology the dihedrals were resolved against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpptrajInput {
    topology: Option<PathBuf>,
    trajectories: Vec<PathBuf>,
    data_file: Option<PathBuf>,
}

impl CpptrajInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `parm` line loading `path` as topology.
    pub fn topology(mut self, path: impl AsRef<Path>) -> Self {
        self.topology = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds a `trajin` line; may be called repeatedly.
    pub fn trajectory(mut self, path: impl AsRef<Path>) -> Self {
        self.trajectories.push(path.as_ref().to_path_buf());
        self
    }

    /// Routes every dihedral's time series into `path`.
    pub fn data_file(mut self, path: impl AsRef<Path>) -> Self {
        self.data_file = Some(path.as_ref().to_path_buf());
        self
    }
}

impl DihedralFormat for CpptrajInput {
    fn write_to(&self, dihedrals: &[Dihedral], writer: &mut impl Write) -> Result<(), FormatError> {
        let ids = dihedrals
            .iter()
            .map(resolved_ids)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(topology) = &self.topology {
            writeln!(writer, "parm {}", topology.display())?;
        }
        for trajectory in &self.trajectories {
            writeln!(writer, "trajin {}", trajectory.display())?;
        }
        for (dihedral, [a1, a2, a3, a4]) in dihedrals.iter().zip(ids) {
            write!(
                writer,
                "dihedral {} @{} @{} @{} @{}",
                dihedral.label(),
                a1,
                a2,
                a3,
                a4
            )?;
            if let Some(data_file) = &self.data_file {
                write!(writer, " out {}", data_file.display())?;
            }
            writeln!(writer)?;
        }
        writeln!(writer, "run")?;
        Ok(())
    }
}
