//! # Pattern Module
//!
//! Strongly-typed dihedral pattern definitions.
//!
//! A pattern maps a [`PatternKey`] (an ordered tuple of residue names, written as
//! `"04V-4ZB"`) to one or more [`AngleDefinition`]s, each binding four atoms to
//! positions of the key. Pattern sets are validated once, when they are built or
//! loaded, so the resolver can rely on their consistency.
//!
//! ```ignore
//! use dihedra::core::patterns::DihedralPatternSet;
//!
//! let patterns = DihedralPatternSet::load("glycan.toml")?;
//! for (key, angles) in patterns.iter() {
//!     println!("{key}: {} angles", angles.len());
//! }
//! ```

mod error;
pub mod file;
mod set;

pub use error::PatternError;
pub use file::PatternLoadError;
pub use set::{AngleDefinition, AtomSlot, DihedralPatternSet, KEY_SEPARATOR, PatternKey};
