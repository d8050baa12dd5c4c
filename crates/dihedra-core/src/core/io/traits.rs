use crate::core::models::dihedral::Dihedral;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("No restraint parameters defined for angle '{angle}' of pattern '{pattern}' (dihedral {label})")]
    MissingRestraint {
        label: String,
        pattern: String,
        angle: String,
    },
    #[error("Atom '{atom}' of dihedral {label} has no resolved atom ID")]
    UnresolvedAtom { label: String, atom: String },
}

/// Defines the interface for rendering resolved dihedrals into a text format.
///
/// Implementors carry whatever format-specific settings they need (file paths for
/// analysis scripts, the pattern set holding restraint parameters) and write the
/// dihedrals in the order they are given.
pub trait DihedralFormat {
    /// Writes `dihedrals` to a writer.
    ///
    /// # Arguments
    ///
    /// * `dihedrals` - The resolved dihedrals to render.
    /// * `writer` - The writer to output to.
    ///
    /// # Return
    ///
    /// Returns `Ok(())` on success.
    ///
    /// # Errors
    ///
    /// Returns an error if a dihedral cannot be rendered in this format or writing
    /// fails.
    fn write_to(&self, dihedrals: &[Dihedral], writer: &mut impl Write) -> Result<(), FormatError>;

    /// Writes `dihedrals` to a file, creating or truncating it.
    ///
    /// # Arguments
    ///
    /// * `dihedrals` - The resolved dihedrals to render.
    /// * `path` - The path to the file to write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        &self,
        dihedrals: &[Dihedral],
        path: P,
    ) -> Result<(), FormatError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(dihedrals, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Renders `dihedrals` into a string.
    fn render(&self, dihedrals: &[Dihedral]) -> Result<String, FormatError> {
        let mut buffer = Vec::new();
        self.write_to(dihedrals, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// The four topology atom IDs of `dihedral`, or an error naming the first unresolved atom.
pub(crate) fn resolved_ids(dihedral: &Dihedral) -> Result<[usize; 4], FormatError> {
    let mut ids = [0usize; 4];
    for (slot, atom) in ids.iter_mut().zip(dihedral.atoms()) {
        *slot = atom.id.ok_or_else(|| FormatError::UnresolvedAtom {
            label: dihedral.label().to_string(),
            atom: atom.name.clone(),
        })?;
    }
    Ok(ids)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use tempfile::tempdir;

    struct LabelsOnly;

    impl DihedralFormat for LabelsOnly {
        fn write_to(
            &self,
            dihedrals: &[Dihedral],
            writer: &mut impl Write,
        ) -> Result<(), FormatError> {
            for d in dihedrals {
                writeln!(writer, "{}", d.label())?;
            }
            Ok(())
        }
    }

    #[test]
    fn resolved_ids_returns_ids_in_atom_order() {
        let d = psi_dihedral([4, 3, 2, 1]);
        assert_eq!(resolved_ids(&d).unwrap(), [4, 3, 2, 1]);
    }

    #[test]
    fn resolved_ids_names_unresolved_atom() {
        let err = resolved_ids(&unresolved_dihedral()).unwrap_err();
        assert!(matches!(err, FormatError::UnresolvedAtom { ref atom, .. } if atom == "C1"));
    }

    #[test]
    fn write_to_path_creates_file_with_rendered_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        LabelsOnly
            .write_to_path(&[psi_dihedral([1, 2, 3, 4])], &path)
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "013_04V-014_4ZB-psi\n");
    }

    #[test]
    fn write_to_path_fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("labels.txt");
        let result = LabelsOnly.write_to_path(&[], &path);
        assert!(matches!(result, Err(FormatError::Io(_))));
    }
}
