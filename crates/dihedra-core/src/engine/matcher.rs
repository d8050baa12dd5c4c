use super::error::EngineError;
use crate::core::models::residue::ResidueOccurrence;
use crate::core::patterns::{PatternError, PatternKey};

/// A contiguous slice of the ordered residue sequence whose names equal a pattern key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchWindow<'s> {
    start: usize,
    residues: &'s [ResidueOccurrence],
}

impl<'s> MatchWindow<'s> {
    /// Index of the first residue of the window in the searched sequence.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn residues(&self) -> &'s [ResidueOccurrence] {
        self.residues
    }

    pub fn ids(&self) -> Vec<isize> {
        self.residues.iter().map(|r| r.id).collect()
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

/// Finds every window of an ordered residue sequence whose residue names equal a
/// target tuple.
///
/// Matching never skips ahead after a hit: overlapping windows are all reported,
/// in the order in which they start. The matcher holds no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct SequenceWindowMatcher<'k> {
    target: &'k [String],
}

impl<'k> SequenceWindowMatcher<'k> {
    /// Creates a matcher for a target tuple of residue names.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPattern`] if `target` is empty.
    pub fn new(target: &'k [String]) -> Result<Self, EngineError> {
        if target.is_empty() {
            return Err(PatternError::EmptyKey.into());
        }
        Ok(Self { target })
    }

    /// Creates a matcher for a pattern key, which is never empty.
    pub fn for_key(key: &'k PatternKey) -> Self {
        Self {
            target: key.names(),
        }
    }

    pub fn width(&self) -> usize {
        self.target.len()
    }

    /// Lazily yields the matching windows of `sequence`.
    ///
    /// A sequence shorter than the target yields nothing.
    pub fn matches<'s>(
        &self,
        sequence: &'s [ResidueOccurrence],
    ) -> impl Iterator<Item = MatchWindow<'s>> + use<'k, 's> {
        let target = self.target;
        sequence
            .windows(target.len())
            .enumerate()
            .filter(move |(_, window)| {
                window
                    .iter()
                    .zip(target)
                    .all(|(residue, name)| residue.name == *name)
            })
            .map(|(start, residues)| MatchWindow { start, residues })
    }
}
