use super::config::ConfigError;
use crate::core::lookup::LookupError;
use crate::core::patterns::{PatternError, PatternKey};
use std::fmt;
use thiserror::Error;

/// The object a failed lookup was trying to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionTarget {
    Residue {
        name: String,
    },
    Atom {
        residue_id: isize,
        residue_name: String,
        atom_name: String,
    },
}

impl fmt::Display for ResolutionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Residue { name } => write!(f, "residue IDs of residue '{}'", name),
            Self::Atom {
                residue_id,
                residue_name,
                atom_name,
            } => write!(
                f,
                "atom '{}' of residue {} ({})",
                atom_name, residue_id, residue_name
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] PatternError),

    #[error("Identified residue unit for pattern '{pattern}' with non-contiguous residue IDs: {residue_ids:?}")]
    Contiguity {
        pattern: PatternKey,
        residue_ids: Vec<isize>,
    },

    #[error("Failed to resolve {target}: {source}")]
    AtomResolution {
        target: ResolutionTarget,
        #[source]
        source: LookupError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Coarse classification of [`EngineError`]s, for callers that map error kinds to
/// exit statuses or messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidPattern,
    Contiguity,
    AtomResolution,
    Config,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPattern(_) => ErrorKind::InvalidPattern,
            Self::Contiguity { .. } => ErrorKind::Contiguity,
            Self::AtomResolution { .. } => ErrorKind::AtomResolution,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}
