use super::error::EngineError;
use super::matcher::MatchWindow;
use crate::core::patterns::{KEY_SEPARATOR, PatternKey};

/// Whether `ids`, once sorted, form a run of consecutive integers without gaps or repeats.
pub fn is_contiguous(ids: &[isize]) -> bool {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).all(|pair| pair[1].checked_sub(pair[0]) == Some(1))
}

/// Rejects a matched window whose residues are not numbered consecutively.
///
/// A gap means the matched residues do not form one physically connected unit.
pub fn validate_contiguity(pattern: &PatternKey, window: &MatchWindow<'_>) -> Result<(), EngineError> {
    let ids = window.ids();
    if is_contiguous(&ids) {
        return Ok(());
    }
    let mut residue_ids = ids;
    residue_ids.sort_unstable();
    Err(EngineError::Contiguity {
        pattern: pattern.clone(),
        residue_ids,
    })
}

/// Builds the label of a dihedral, e.g. `013_04V-014_4ZB-psi`.
///
/// Residues appear in the order of the pattern key, each as its residue ID padded to
/// at least three digits joined to its name by `_`; the angle name comes last.
pub fn format_label(pattern: &PatternKey, window: &MatchWindow<'_>, angle_name: &str) -> String {
    let mut tokens: Vec<String> = pattern
        .names()
        .iter()
        .zip(window.residues())
        .map(|(name, residue)| format!("{:03}_{}", residue.id, name))
        .collect();
    tokens.push(angle_name.to_string());
    tokens.join(KEY_SEPARATOR)
}
