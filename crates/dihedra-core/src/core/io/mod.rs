//! Output formats for resolved dihedrals.
//!
//! Every format implements [`traits::DihedralFormat`] and renders a slice of
//! [`Dihedral`](crate::core::models::dihedral::Dihedral)s into a writer or a file:
//! Amber `&rst` restraint namelists, cpptraj analysis input, a CSV atom listing and
//! a plain-text listing of one human-readable line per dihedral.

pub mod cpptraj;
pub mod listing;
pub mod restraint;
pub mod traits;
