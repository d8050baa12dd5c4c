use thiserror::Error;

/// Violations of the pattern-set invariants, detected before any matching starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern key is empty")]
    EmptyKey,

    #[error("Pattern key '{key}' contains an empty residue name")]
    EmptyResidueName { key: String },

    #[error("Pattern '{key}' is defined more than once")]
    DuplicatePattern { key: String },

    #[error("Pattern '{key}' defines no angles")]
    NoAngles { key: String },

    #[error("Pattern '{key}' contains an angle with an empty name")]
    EmptyAngleName { key: String },

    #[error("Angle '{angle}' is defined more than once for pattern '{key}'")]
    DuplicateAngle { key: String, angle: String },

    #[error("Angle '{angle}' of pattern '{key}' must list exactly 4 {field}, found {found}")]
    SlotCount {
        key: String,
        angle: String,
        field: &'static str,
        found: usize,
    },

    #[error("Angle '{angle}' of pattern '{key}' references residue '{residue}', which is not part of the pattern")]
    UnknownResidue {
        key: String,
        angle: String,
        residue: String,
    },

    #[error("Angle '{angle}' of pattern '{key}' references residue '{residue}', which occurs more than once in the pattern; specify `positions`")]
    AmbiguousResidue {
        key: String,
        angle: String,
        residue: String,
    },

    #[error("Angle '{angle}' of pattern '{key}' references position {position}, but the pattern has only {len} residues")]
    PositionOutOfRange {
        key: String,
        angle: String,
        position: usize,
        len: usize,
    },

    #[error("Angle '{angle}' of pattern '{key}' binds residue '{found}' to position {position}, which holds '{expected}'")]
    PositionMismatch {
        key: String,
        angle: String,
        position: usize,
        expected: String,
        found: String,
    },

    #[error("Angle '{angle}' of pattern '{key}' contains an empty atom name")]
    EmptyAtomName { key: String, angle: String },

    #[error("Pattern '{key}' names residues {unused:?} that no angle slot uses")]
    NameSetMismatch { key: String, unused: Vec<String> },
}
