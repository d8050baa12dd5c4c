//! # Lookup Module
//!
//! Collaborator interfaces through which residue and atom IDs are obtained from a
//! topology, plus [`TopologyTable`], an in-memory implementation that can be loaded
//! from CSV.
//!
//! The engine borrows a lookup for the duration of one resolution pass and never
//! caches, retries or parallelizes calls; such policies belong to the implementor.

mod error;
pub mod table;
mod traits;

pub use error::LookupError;
pub use table::{AtomRecord, TopologyTable};
pub use traits::{AtomLookup, ResidueLookup};
