//! # Core Module
//!
//! The fundamental building blocks of dihedral identification.
//!
//! - **Data Models** ([`models`]) - Residue occurrences, atoms and resolved dihedrals
//! - **Pattern Definitions** ([`patterns`]) - Typed, validated dihedral pattern sets and their TOML loader
//! - **Lookups** ([`lookup`]) - Collaborator traits for residue/atom ID resolution and an in-memory topology table
//! - **File I/O** ([`io`]) - Restraint, cpptraj and CSV renderings of resolved dihedrals

pub mod io;
pub mod lookup;
pub mod models;
pub mod patterns;
