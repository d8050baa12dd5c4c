//! # Workflows Module
//!
//! High-level entry points that run a complete dihedral identification pass.
//!
//! - **Identification Workflow** ([`identify`]) - Residue lookup for every residue name
//!   referenced by the pattern set, ordering of the resulting sequence in search
//!   direction, and resolution of all matched units into [`Dihedral`](crate::core::models::dihedral::Dihedral)s.
//!
//! Workflows own no topology access themselves; residue and atom lookups are supplied
//! by the caller through the [`ResidueLookup`](crate::core::lookup::ResidueLookup) and
//! [`AtomLookup`](crate::core::lookup::AtomLookup) traits.

pub mod identify;
