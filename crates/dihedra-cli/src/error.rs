use dihedra::core::io::traits::FormatError;
use dihedra::core::lookup::LookupError;
use dihedra::core::patterns::PatternLoadError;
use dihedra::engine::error::{EngineError, ErrorKind};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Dihedra(#[from] EngineError),

    #[error(transparent)]
    Patterns(#[from] PatternLoadError),

    #[error("Failed to load topology table: {0}")]
    Topology(#[from] LookupError),

    #[error("Failed to write output: {0}")]
    Output(#[from] FormatError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit status for this error.
    ///
    /// Invalid patterns, contiguity violations and failed atom resolutions each get
    /// their own status; everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Dihedra(e) => match e.kind() {
                ErrorKind::InvalidPattern => 2,
                ErrorKind::Contiguity => 3,
                ErrorKind::AtomResolution => 4,
                ErrorKind::Config => 1,
            },
            Self::Patterns(PatternLoadError::Invalid { .. }) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dihedra::core::patterns::{DihedralPatternSet, PatternError, PatternKey};
    use dihedra::engine::error::ResolutionTarget;

    #[test]
    fn engine_error_kinds_map_to_distinct_exit_codes() {
        let invalid: CliError = EngineError::from(PatternError::EmptyKey).into();
        assert_eq!(invalid.exit_code(), 2);

        let contiguity: CliError = EngineError::Contiguity {
            pattern: PatternKey::parse("A-B").unwrap(),
            residue_ids: vec![1, 3],
        }
        .into();
        assert_eq!(contiguity.exit_code(), 3);

        let resolution: CliError = EngineError::AtomResolution {
            target: ResolutionTarget::Residue {
                name: "A".to_string(),
            },
            source: LookupError::Tool("boom".to_string()),
        }
        .into();
        assert_eq!(resolution.exit_code(), 4);
    }

    #[test]
    fn inconsistent_pattern_file_exits_as_invalid_pattern() {
        let err = DihedralPatternSet::from_toml_str(
            "[A-B.psi]\nresnames = [\"A\", \"A\", \"C\", \"C\"]\natoms = [\"H1\", \"C1\", \"O4\", \"C4\"]\n",
        )
        .unwrap_err();
        assert_eq!(CliError::from(err).exit_code(), 2);
    }

    #[test]
    fn unreadable_pattern_file_is_a_generic_failure() {
        let err = DihedralPatternSet::from_toml_str("not toml [").unwrap_err();
        assert_eq!(CliError::from(err).exit_code(), 1);
        assert_eq!(CliError::Config("x".to_string()).exit_code(), 1);
    }
}
