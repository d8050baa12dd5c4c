use super::config::SearchDirection;
use crate::core::models::residue::ResidueOccurrence;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Residue IDs grouped by residue name, as obtained from a residue lookup.
pub type ResidueIdMap = BTreeMap<String, Vec<isize>>;

/// Flattens a residue-name → IDs mapping into the sequence scanned by the matcher.
///
/// The sequence is sorted by residue ID in `direction`. Equal IDs, which only occur
/// when a lookup reports one ID under several names, are ordered by name.
pub fn order_residues(mapping: &ResidueIdMap, direction: SearchDirection) -> Vec<ResidueOccurrence> {
    let mut sequence: Vec<ResidueOccurrence> = mapping
        .iter()
        .flat_map(|(name, ids)| ids.iter().map(move |&id| ResidueOccurrence::new(name, id)))
        .collect();

    sequence.sort_by(|a, b| {
        let by_id = match direction {
            SearchDirection::Ascending => a.id.cmp(&b.id),
            SearchDirection::Descending => b.id.cmp(&a.id),
        };
        match by_id {
            Ordering::Equal => a.name.cmp(&b.name),
            other => other,
        }
    });
    sequence
}
