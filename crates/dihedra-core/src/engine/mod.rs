//! # Engine Module
//!
//! The dihedral-unit identification algorithm.
//!
//! - **Ordering** ([`ordering`]) - Flattening name → IDs mappings into a residue sequence sorted in search direction
//! - **Matching** ([`matcher`]) - Contiguous windows whose residue names equal a pattern key
//! - **Unit Validation** ([`unit`]) - Residue-ID contiguity checks and label construction
//! - **Resolution** ([`resolver`]) - Expansion of matched windows into resolved [`Dihedral`](crate::core::models::dihedral::Dihedral)s
//! - **Configuration** ([`config`]) - Search direction and pattern set of a resolution pass
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Distinguishable error kinds for invalid patterns, gaps and failed lookups
//!
//! Resolution is synchronous and single-threaded. Every error aborts the whole pass;
//! there is no partial-result mode.

pub mod config;
pub mod error;
pub mod matcher;
pub mod ordering;
pub mod progress;
pub mod resolver;
pub mod unit;
