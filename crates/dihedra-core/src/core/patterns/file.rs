use super::error::PatternError;
use super::set::{AngleDefinition, DihedralPatternSet, PatternKey};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// On-disk form of one angle definition.
///
/// ```toml
/// [04V-4ZB.psi]
/// resnames = ["04V", "04V", "4ZB", "4ZB"]
/// atoms = ["H1", "C1", "O4", "C4"]
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct FileAngle {
    resnames: Vec<String>,
    atoms: Vec<String>,
    positions: Option<Vec<usize>>,
    restraint: Option<String>,
}

#[derive(Debug, Error)]
pub enum PatternLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{origin}': {source}")]
    Toml {
        origin: String,
        source: toml::de::Error,
    },
    #[error("Invalid structure in '{origin}': entry '{entry}' must be a table")]
    NotATable { origin: String, entry: String },
    #[error("Invalid pattern in '{origin}': {source}")]
    Invalid {
        origin: String,
        source: PatternError,
    },
}

impl DihedralPatternSet {
    /// Loads and validates a pattern set from a TOML file.
    ///
    /// Top-level keys are pattern keys; each holds one table per angle. Angles keep
    /// the order in which they are declared in the file.
    ///
    /// # Errors
    ///
    /// Returns [`PatternLoadError`] if the file cannot be read, is not valid TOML,
    /// has the wrong shape, or describes an inconsistent pattern.
    pub fn load(path: &Path) -> Result<Self, PatternLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| PatternLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        parse_patterns(&content, &path.to_string_lossy())
    }

    /// Parses and validates a pattern set from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, PatternLoadError> {
        parse_patterns(content, "<inline>")
    }
}

fn parse_patterns(content: &str, origin: &str) -> Result<DihedralPatternSet, PatternLoadError> {
    let toml_err = |e: toml::de::Error| PatternLoadError::Toml {
        origin: origin.to_string(),
        source: e,
    };
    let invalid = |e: PatternError| PatternLoadError::Invalid {
        origin: origin.to_string(),
        source: e,
    };

    let document: toml::Table = toml::from_str(content).map_err(toml_err)?;
    let mut set = DihedralPatternSet::new();

    for (encoded_key, value) in document {
        let key = PatternKey::parse(&encoded_key).map_err(invalid)?;
        let toml::Value::Table(angle_table) = value else {
            return Err(PatternLoadError::NotATable {
                origin: origin.to_string(),
                entry: encoded_key,
            });
        };

        let mut angles = Vec::with_capacity(angle_table.len());
        for (angle_name, angle_value) in angle_table {
            if !angle_value.is_table() {
                return Err(PatternLoadError::NotATable {
                    origin: origin.to_string(),
                    entry: format!("{}.{}", encoded_key, angle_name),
                });
            }
            let raw: FileAngle = angle_value.try_into().map_err(toml_err)?;
            let mut angle = AngleDefinition::from_names(
                &key,
                &angle_name,
                &raw.resnames,
                &raw.atoms,
                raw.positions.as_deref(),
            )
            .map_err(invalid)?;
            if let Some(restraint) = raw.restraint.as_deref() {
                angle = angle.with_restraint(restraint);
            }
            angles.push(angle);
        }

        debug!(
            "Loaded pattern {} with angles [{}].",
            key,
            angles
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        set.insert(key, angles).map_err(invalid)?;
    }

    Ok(set)
}
