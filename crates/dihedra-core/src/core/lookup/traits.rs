use super::error::LookupError;

/// Resolves residue names to the IDs of the residues bearing that name.
pub trait ResidueLookup {
    /// Returns the IDs of all residues named `name`, in any order.
    ///
    /// `Ok(None)` means the topology has no residue of that name, which is distinct
    /// from a failing lookup.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] if the underlying topology query fails.
    fn residue_ids_for_name(&self, name: &str) -> Result<Option<Vec<isize>>, LookupError>;
}

/// Resolves an atom, addressed by residue ID and atom name, to its topology-wide ID.
pub trait AtomLookup {
    /// Returns the unique atom ID of `atom_name` in residue `residue_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] if no atom or more than one atom matches, or the
    /// underlying topology query fails.
    fn atom_id_for(&self, residue_id: isize, atom_name: &str) -> Result<usize, LookupError>;
}

impl<T: ResidueLookup + ?Sized> ResidueLookup for &T {
    fn residue_ids_for_name(&self, name: &str) -> Result<Option<Vec<isize>>, LookupError> {
        (**self).residue_ids_for_name(name)
    }
}

impl<T: AtomLookup + ?Sized> AtomLookup for &T {
    fn atom_id_for(&self, residue_id: isize, atom_name: &str) -> Result<usize, LookupError> {
        (**self).atom_id_for(residue_id, atom_name)
    }
}
