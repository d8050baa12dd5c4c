//! # Dihedra Core Library
//!
//! Identification of dihedral angle units in residue chains (glycans, peptides and
//! other linear polymers) and resolution of the atoms that define each angle.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Immutable data models (`ResidueOccurrence`, `Atom`,
//!   `Dihedral`), the strongly-typed `DihedralPatternSet` and its loader, the lookup
//!   collaborator traits, and output formats for downstream tools.
//!
//! - **[`engine`]: The Logic Core.** Windowed sequence matching, residue ordering,
//!   contiguity validation, label construction and the `DihedralUnitResolver` that
//!   turns matched windows into fully resolved dihedral records.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into a single
//!   identification pass driven by external residue and atom lookups.

pub mod core;
pub mod engine;
pub mod workflows;
