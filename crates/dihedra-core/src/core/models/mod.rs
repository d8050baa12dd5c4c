//! Immutable records describing residues, atoms and resolved dihedrals.

pub mod atom;
pub mod dihedral;
pub mod residue;
