use crate::core::patterns::DihedralPatternSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value '{value}' for parameter '{parameter}'")]
    InvalidValue {
        parameter: &'static str,
        value: String,
    },
}

/// Order in which the residue sequence is scanned for pattern matches.
///
/// Pattern keys are order-sensitive, so the direction decides which orientation of
/// a chain is recognized. The default scans from the largest to the smallest residue
/// ID; for glycosaminoglycans this runs from the non-reducing to the reducing end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchDirection {
    Ascending,
    #[default]
    Descending,
}

impl fmt::Display for SearchDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "ascending"),
            Self::Descending => write!(f, "descending"),
        }
    }
}

impl FromStr for SearchDirection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ascending" | "asc" => Ok(Self::Ascending),
            "descending" | "desc" => Ok(Self::Descending),
            _ => Err(ConfigError::InvalidValue {
                parameter: "search_direction",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    pub search_direction: SearchDirection,
    pub pattern_set: DihedralPatternSet,
}

#[derive(Default)]
pub struct ResolverConfigBuilder {
    search_direction: Option<SearchDirection>,
    pattern_set: Option<DihedralPatternSet>,
}

impl ResolverConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_direction(mut self, direction: SearchDirection) -> Self {
        self.search_direction = Some(direction);
        self
    }
    pub fn pattern_set(mut self, patterns: DihedralPatternSet) -> Self {
        self.pattern_set = Some(patterns);
        self
    }

    pub fn build(self) -> Result<ResolverConfig, ConfigError> {
        Ok(ResolverConfig {
            search_direction: self.search_direction.unwrap_or_default(),
            pattern_set: self
                .pattern_set
                .ok_or(ConfigError::MissingParameter("pattern_set"))?,
        })
    }
}
