use std::fmt;

/// Represents an atom taking part in a dihedral angle.
///
/// An atom is identified structurally by its name and its parent residue. The
/// topology-wide atom ID is unknown (`None`) until it has been resolved through an
/// [`AtomLookup`](crate::core::lookup::AtomLookup); once resolved it never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    /// The topology-wide atom ID, if already resolved.
    pub id: Option<usize>,
    /// The name of the atom (e.g., "C1", "O4", "H1").
    pub name: String,
    /// The ID of the residue this atom belongs to.
    pub residue_id: isize,
    /// The name of the residue this atom belongs to.
    pub residue_name: String,
}

impl Atom {
    /// Creates an unresolved `Atom` for the given residue.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the parent residue.
    /// * `residue_name` - The name of the parent residue.
    pub fn new(name: &str, residue_id: isize, residue_name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            residue_id,
            residue_name: residue_name.to_string(),
        }
    }

    /// Returns this atom with its topology-wide ID set.
    pub fn resolved(self, id: usize) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.id.is_some()
    }
}

impl fmt::Display for Atom {
    /// Formats the atom as a zero-padded atom ID followed by its name
    /// (e.g. `00042_C1`). Unresolved atoms print `?????` in place of the ID.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{:05}_{}", id, self.name),
            None => write!(f, "?????_{}", self.name),
        }
    }
}
