use super::config::{ResolverConfig, SearchDirection};
use super::error::{EngineError, ResolutionTarget};
use super::matcher::{MatchWindow, SequenceWindowMatcher};
use super::ordering::{ResidueIdMap, order_residues};
use super::progress::{Progress, ProgressReporter};
use super::unit::{format_label, validate_contiguity};
use crate::core::lookup::{AtomLookup, LookupError};
use crate::core::models::atom::Atom;
use crate::core::models::dihedral::Dihedral;
use crate::core::models::residue::ResidueOccurrence;
use crate::core::patterns::{AngleDefinition, AtomSlot, DihedralPatternSet, PatternKey};
use tracing::{debug, info};

/// Expands pattern matches into fully resolved [`Dihedral`]s.
///
/// For every pattern (in key order), every matching window of the ordered residue
/// sequence (in sequence order) and every angle of the pattern (in declaration
/// order), the resolver validates residue contiguity, resolves the four atoms through
/// the borrowed [`AtomLookup`] and emits one dihedral.
///
/// Any failure aborts the whole pass; no partial list is ever returned.
pub struct DihedralUnitResolver<'a, A: AtomLookup + ?Sized> {
    patterns: &'a DihedralPatternSet,
    atoms: &'a A,
    direction: SearchDirection,
    reporter: Option<&'a ProgressReporter<'a>>,
}

impl<'a, A: AtomLookup + ?Sized> DihedralUnitResolver<'a, A> {
    /// Creates a resolver scanning in the default (descending) direction.
    pub fn new(patterns: &'a DihedralPatternSet, atoms: &'a A) -> Self {
        Self {
            patterns,
            atoms,
            direction: SearchDirection::default(),
            reporter: None,
        }
    }

    pub fn from_config(config: &'a ResolverConfig, atoms: &'a A) -> Self {
        Self::new(&config.pattern_set, atoms).with_direction(config.search_direction)
    }

    pub fn with_direction(mut self, direction: SearchDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_reporter(mut self, reporter: &'a ProgressReporter<'a>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    /// Orders the residues of `mapping` in this resolver's search direction.
    pub fn order(&self, mapping: &ResidueIdMap) -> Vec<ResidueOccurrence> {
        order_residues(mapping, self.direction)
    }

    /// Orders `mapping` and resolves every pattern against the resulting sequence.
    pub fn resolve(&self, mapping: &ResidueIdMap) -> Result<Vec<Dihedral>, EngineError> {
        let sequence = self.order(mapping);
        info!(
            "Sorted residue list in {} search direction: [{}]",
            self.direction,
            sequence
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.resolve_sequence(&sequence)
    }

    /// Resolves every pattern against an already ordered residue sequence.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Contiguity`] if a matched unit has a gap in its residue
    /// numbering and [`EngineError::AtomResolution`] if an atom cannot be resolved.
    pub fn resolve_sequence(
        &self,
        sequence: &[ResidueOccurrence],
    ) -> Result<Vec<Dihedral>, EngineError> {
        self.report(Progress::TaskStart {
            total_steps: self.patterns.len() as u64,
        });

        let mut dihedrals = Vec::new();
        for (key, angles) in self.patterns.iter() {
            let resolved = self.resolve_pattern(key, angles, sequence)?;
            dihedrals.extend(resolved);
            self.report(Progress::TaskIncrement);
        }

        self.report(Progress::TaskFinish);
        Ok(dihedrals)
    }

    fn resolve_pattern(
        &self,
        key: &PatternKey,
        angles: &[AngleDefinition],
        sequence: &[ResidueOccurrence],
    ) -> Result<Vec<Dihedral>, EngineError> {
        info!("Looking for matches for dihedral pattern {}.", key);
        let matcher = SequenceWindowMatcher::for_key(key);

        let mut dihedrals = Vec::new();
        let mut unit_count = 0usize;
        for window in matcher.matches(sequence) {
            info!(
                "Unit matches pattern {} at sequence index {}: [{}].",
                key,
                window.start(),
                window
                    .residues()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            validate_contiguity(key, &window)?;
            for angle in angles {
                dihedrals.push(self.resolve_angle(key, angle, &window)?);
            }
            unit_count += 1;
        }

        if unit_count == 0 {
            info!("No residue unit matches pattern {}.", key);
        } else {
            info!(
                "Pattern {}: {} unit(s), {} dihedral(s).",
                key,
                unit_count,
                dihedrals.len()
            );
        }
        Ok(dihedrals)
    }

    fn resolve_angle(
        &self,
        key: &PatternKey,
        angle: &AngleDefinition,
        window: &MatchWindow<'_>,
    ) -> Result<Dihedral, EngineError> {
        let label = format_label(key, window, &angle.name);
        debug!(
            "Creating dihedral {} involving atoms [{}].",
            label,
            angle
                .slots
                .iter()
                .map(|s| s.atom_name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let [s0, s1, s2, s3] = &angle.slots;
        let atoms = [
            self.resolve_slot(s0, window)?,
            self.resolve_slot(s1, window)?,
            self.resolve_slot(s2, window)?,
            self.resolve_slot(s3, window)?,
        ];

        let dihedral = Dihedral::new(label, key.clone(), &angle.name, atoms);
        info!("Created {}.", dihedral);
        Ok(dihedral)
    }

    fn resolve_slot(&self, slot: &AtomSlot, window: &MatchWindow<'_>) -> Result<Atom, EngineError> {
        let residue = unit_residue(slot, window)?;
        let atom_id = self
            .atoms
            .atom_id_for(residue.id, &slot.atom_name)
            .map_err(|source| EngineError::AtomResolution {
                target: ResolutionTarget::Atom {
                    residue_id: residue.id,
                    residue_name: residue.name.clone(),
                    atom_name: slot.atom_name.clone(),
                },
                source,
            })?;
        let atom = Atom::new(&slot.atom_name, residue.id, &residue.name).resolved(atom_id);
        debug!("Resolved atom {:?}.", atom);
        Ok(atom)
    }

    fn report(&self, event: Progress) {
        if let Some(reporter) = self.reporter {
            reporter.report(event);
        }
    }
}

/// The residue of `window` that `slot` binds to.
fn unit_residue<'s>(
    slot: &AtomSlot,
    window: &MatchWindow<'s>,
) -> Result<&'s ResidueOccurrence, EngineError> {
    window
        .residues()
        .get(slot.position)
        .filter(|r| r.name == slot.residue_name)
        .ok_or_else(|| EngineError::AtomResolution {
            target: ResolutionTarget::Residue {
                name: slot.residue_name.clone(),
            },
            source: LookupError::ResidueNotFound {
                name: slot.residue_name.clone(),
            },
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lookup::{AtomRecord, TopologyTable};
    use std::cell::RefCell;
    use std::collections::BTreeSet;

    fn mapping(entries: &[(&str, &[isize])]) -> ResidueIdMap {
        entries
            .iter()
            .map(|(name, ids)| (name.to_string(), ids.to_vec()))
            .collect()
    }

    fn simple_patterns(key: &str) -> DihedralPatternSet {
        let k = PatternKey::parse(key).unwrap();
        let (a, b) = (k.names()[0].clone(), k.names()[1].clone());
        let psi = AngleDefinition::from_names(
            &k,
            "psi",
            &[&a, &a, &b, &b],
            &["H1", "C1", "O4", "C4"],
            None,
        )
        .unwrap();
        let phi = AngleDefinition::from_names(
            &k,
            "phi",
            &[&a, &b, &b, &b],
            &["C1", "O4", "C4", "H4"],
            None,
        )
        .unwrap();
        let mut set = DihedralPatternSet::new();
        set.insert(k, vec![psi, phi]).unwrap();
        set
    }

    /// Atom lookup deriving IDs from residue ID and atom name, recording every call.
    #[derive(Default)]
    struct SyntheticAtoms {
        calls: RefCell<Vec<(isize, String)>>,
        missing: BTreeSet<(isize, String)>,
    }

    impl SyntheticAtoms {
        fn missing(residue_id: isize, atom_name: &str) -> Self {
            Self {
                missing: [(residue_id, atom_name.to_string())].into_iter().collect(),
                ..Default::default()
            }
        }

        fn id_for(residue_id: isize, atom_name: &str) -> usize {
            let offset = match atom_name {
                "H1" => 1,
                "C1" => 2,
                "O4" => 3,
                "C4" => 4,
                "H4" => 5,
                _ => 9,
            };
            residue_id as usize * 10 + offset
        }
    }

    impl AtomLookup for SyntheticAtoms {
        fn atom_id_for(&self, residue_id: isize, atom_name: &str) -> Result<usize, LookupError> {
            self.calls
                .borrow_mut()
                .push((residue_id, atom_name.to_string()));
            if self.missing.contains(&(residue_id, atom_name.to_string())) {
                return Err(LookupError::AtomNotFound {
                    residue_id,
                    atom_name: atom_name.to_string(),
                });
            }
            Ok(Self::id_for(residue_id, atom_name))
        }
    }

    fn labels(dihedrals: &[Dihedral]) -> Vec<&str> {
        dihedrals.iter().map(Dihedral::label).collect()
    }

    mod matching_and_contiguity {
        use super::*;

        #[test]
        fn adjacent_residues_yield_one_dihedral_per_angle() {
            let patterns = simple_patterns("A-B");
            let atoms = SyntheticAtoms::default();
            let resolver = DihedralUnitResolver::new(&patterns, &atoms)
                .with_direction(SearchDirection::Ascending);
            let dihedrals = resolver.resolve(&mapping(&[("A", &[1]), ("B", &[2])])).unwrap();
            assert_eq!(labels(&dihedrals), vec!["001_A-002_B-psi", "001_A-002_B-phi"]);
        }

        #[test]
        fn gap_in_residue_ids_is_a_contiguity_error() {
            let patterns = simple_patterns("A-B");
            let atoms = SyntheticAtoms::default();
            let resolver = DihedralUnitResolver::new(&patterns, &atoms)
                .with_direction(SearchDirection::Ascending);
            let result = resolver.resolve(&mapping(&[("A", &[1]), ("B", &[3])]));
            assert!(matches!(
                result,
                Err(EngineError::Contiguity { ref residue_ids, .. }) if residue_ids == &vec![1, 3]
            ));
            assert!(atoms.calls.borrow().is_empty());
        }

        #[test]
        fn descending_scan_rejects_non_adjacent_first_match() {
            let patterns = simple_patterns("A-B");
            let atoms = SyntheticAtoms::default();
            let resolver = DihedralUnitResolver::new(&patterns, &atoms);
            assert_eq!(resolver.direction(), SearchDirection::Descending);

            let result = resolver.resolve(&mapping(&[("A", &[1, 5]), ("B", &[3])]));
            assert!(matches!(
                result,
                Err(EngineError::Contiguity { ref residue_ids, .. }) if residue_ids == &vec![3, 5]
            ));
        }

        #[test]
        fn descending_scan_accepts_adjacent_first_match() {
            let patterns = simple_patterns("A-B");
            let atoms = SyntheticAtoms::default();
            let resolver = DihedralUnitResolver::new(&patterns, &atoms);
            let dihedrals = resolver
                .resolve(&mapping(&[("A", &[4, 1]), ("B", &[3])]))
                .unwrap();
            assert_eq!(labels(&dihedrals), vec!["004_A-003_B-psi", "004_A-003_B-phi"]);
        }

        #[test]
        fn direction_decides_which_orientation_matches() {
            let patterns = simple_patterns("A-B");
            let atoms = SyntheticAtoms::default();
            let m = mapping(&[("A", &[1]), ("B", &[2])]);

            let descending = DihedralUnitResolver::new(&patterns, &atoms).resolve(&m).unwrap();
            assert!(descending.is_empty());

            let ascending = DihedralUnitResolver::new(&patterns, &atoms)
                .with_direction(SearchDirection::Ascending)
                .resolve(&m)
                .unwrap();
            assert_eq!(ascending.len(), 2);
        }

        #[test]
        fn pattern_without_match_contributes_nothing() {
            let patterns = simple_patterns("A-B");
            let atoms = SyntheticAtoms::default();
            let resolver = DihedralUnitResolver::new(&patterns, &atoms);
            let dihedrals = resolver.resolve(&mapping(&[("C", &[2, 1])])).unwrap();
            assert!(dihedrals.is_empty());
            assert!(atoms.calls.borrow().is_empty());
        }

        #[test]
        fn repeated_units_are_emitted_in_sequence_order() {
            let patterns = simple_patterns("4ZB-34V");
            let atoms = SyntheticAtoms::default();
            let resolver = DihedralUnitResolver::new(&patterns, &atoms);
            let m = mapping(&[("34V", &[3, 5, 7]), ("4ZB", &[2, 4, 6])]);
            let dihedrals = resolver.resolve(&m).unwrap();
            assert_eq!(
                labels(&dihedrals),
                vec![
                    "006_4ZB-005_34V-psi",
                    "006_4ZB-005_34V-phi",
                    "004_4ZB-003_34V-psi",
                    "004_4ZB-003_34V-phi",
                ]
            );
        }
    }

    mod atom_resolution {
        use super::*;

        #[test]
        fn atoms_follow_slot_order_exactly() {
            let k = PatternKey::parse("04V-4ZB").unwrap();
            let angle = AngleDefinition::from_names(
                &k,
                "psi",
                &["04V", "04V", "4ZB", "4ZB"],
                &["H1", "C1", "O4", "C4"],
                None,
            )
            .unwrap();
            let mut patterns = DihedralPatternSet::new();
            patterns.insert(k, vec![angle]).unwrap();

            let table = TopologyTable::from_records([
                AtomRecord::new(300, "C4", 14, "4ZB"),
                AtomRecord::new(100, "O4", 14, "4ZB"),
                AtomRecord::new(250, "C1", 13, "04V"),
                AtomRecord::new(200, "H1", 13, "04V"),
            ]);
            let resolver = DihedralUnitResolver::new(&patterns, &table)
                .with_direction(SearchDirection::Ascending);
            let dihedrals = resolver
                .resolve(&mapping(&[("04V", &[13]), ("4ZB", &[14])]))
                .unwrap();

            assert_eq!(dihedrals.len(), 1);
            let d = &dihedrals[0];
            assert_eq!(d.label(), "013_04V-014_4ZB-psi");
            let names: Vec<(&str, isize, &str)> = d
                .atoms()
                .iter()
                .map(|a| (a.name.as_str(), a.residue_id, a.residue_name.as_str()))
                .collect();
            assert_eq!(
                names,
                vec![
                    ("H1", 13, "04V"),
                    ("C1", 13, "04V"),
                    ("O4", 14, "4ZB"),
                    ("C4", 14, "4ZB"),
                ]
            );
            assert_eq!(d.atom_ids(), [Some(200), Some(250), Some(100), Some(300)]);
        }

        #[test]
        fn repeated_atoms_are_kept() {
            let k = PatternKey::parse("A").unwrap();
            let angle =
                AngleDefinition::from_names(&k, "x", &["A", "A", "A", "A"], &["C1", "C1", "O4", "C1"], None)
                    .unwrap();
            let mut patterns = DihedralPatternSet::new();
            patterns.insert(k, vec![angle]).unwrap();
            let atoms = SyntheticAtoms::default();
            let dihedrals = DihedralUnitResolver::new(&patterns, &atoms)
                .resolve(&mapping(&[("A", &[2])]))
                .unwrap();
            assert_eq!(dihedrals[0].atom_ids(), [Some(22), Some(22), Some(23), Some(22)]);
        }

        #[test]
        fn lookup_failure_aborts_the_whole_pass() {
            let mut patterns = simple_patterns("A-B");
            let k = PatternKey::parse("C-D").unwrap();
            let angle = AngleDefinition::from_names(
                &k,
                "psi",
                &["C", "C", "D", "D"],
                &["H1", "C1", "O4", "C4"],
                None,
            )
            .unwrap();
            patterns.insert(k, vec![angle]).unwrap();

            let atoms = SyntheticAtoms::missing(2, "O4");
            let resolver = DihedralUnitResolver::new(&patterns, &atoms)
                .with_direction(SearchDirection::Ascending);
            let result = resolver.resolve(&mapping(&[
                ("A", &[1]),
                ("B", &[2]),
                ("C", &[5]),
                ("D", &[6]),
            ]));

            match result {
                Err(EngineError::AtomResolution {
                    target:
                        ResolutionTarget::Atom {
                            residue_id,
                            atom_name,
                            ..
                        },
                    source: LookupError::AtomNotFound { .. },
                }) => {
                    assert_eq!(residue_id, 2);
                    assert_eq!(atom_name, "O4");
                }
                other => panic!("expected AtomResolution error, got {:?}", other),
            }
            assert!(
                atoms.calls.borrow().iter().all(|(id, _)| *id < 5),
                "later patterns must not be resolved after a failure"
            );
        }
    }

    mod determinism {
        use super::*;

        fn chain() -> ResidueIdMap {
            mapping(&[
                ("04V", &[9]),
                ("4ZB", &[8, 6, 4, 2]),
                ("34V", &[7, 5, 3]),
                ("ROH", &[1]),
            ])
        }

        fn chain_patterns() -> DihedralPatternSet {
            let mut set = simple_patterns("04V-4ZB");
            for key in ["4ZB-34V", "34V-4ZB"] {
                let other = simple_patterns(key);
                for (k, angles) in other.iter() {
                    set.insert(k.clone(), angles.to_vec()).unwrap();
                }
            }
            set
        }

        #[test]
        fn repeated_runs_yield_identical_output() {
            let patterns = chain_patterns();
            let atoms = SyntheticAtoms::default();
            let resolver = DihedralUnitResolver::new(&patterns, &atoms);
            let first = resolver.resolve(&chain()).unwrap();
            let second = resolver.resolve(&chain()).unwrap();
            assert_eq!(first, second);
        }

        #[test]
        fn output_is_ordered_by_pattern_then_match_then_angle() {
            let patterns = chain_patterns();
            let atoms = SyntheticAtoms::default();
            let dihedrals = DihedralUnitResolver::new(&patterns, &atoms)
                .resolve(&chain())
                .unwrap();
            assert_eq!(
                labels(&dihedrals),
                vec![
                    "009_04V-008_4ZB-psi",
                    "009_04V-008_4ZB-phi",
                    "007_34V-006_4ZB-psi",
                    "007_34V-006_4ZB-phi",
                    "005_34V-004_4ZB-psi",
                    "005_34V-004_4ZB-phi",
                    "003_34V-002_4ZB-psi",
                    "003_34V-002_4ZB-phi",
                    "008_4ZB-007_34V-psi",
                    "008_4ZB-007_34V-phi",
                    "006_4ZB-005_34V-psi",
                    "006_4ZB-005_34V-phi",
                    "004_4ZB-003_34V-psi",
                    "004_4ZB-003_34V-phi",
                ]
            );
        }

        #[test]
        fn labels_are_unique_without_overlapping_patterns() {
            let patterns = chain_patterns();
            let atoms = SyntheticAtoms::default();
            let dihedrals = DihedralUnitResolver::new(&patterns, &atoms)
                .resolve(&chain())
                .unwrap();
            let unique: BTreeSet<&str> = dihedrals.iter().map(Dihedral::label).collect();
            assert_eq!(unique.len(), dihedrals.len());
        }

        #[test]
        fn reporter_receives_one_increment_per_pattern() {
            use std::sync::Mutex;
            let events = Mutex::new(Vec::new());
            let reporter = ProgressReporter::with_callback(Box::new(|e| {
                events.lock().unwrap().push(e);
            }));
            let patterns = chain_patterns();
            let atoms = SyntheticAtoms::default();
            DihedralUnitResolver::new(&patterns, &atoms)
                .with_reporter(&reporter)
                .resolve(&chain())
                .unwrap();
            drop(reporter);
            let events = events.into_inner().unwrap();
            assert_eq!(events.first(), Some(&Progress::TaskStart { total_steps: 3 }));
            assert_eq!(
                events.iter().filter(|e| **e == Progress::TaskIncrement).count(),
                3
            );
            assert_eq!(events.last(), Some(&Progress::TaskFinish));
        }
    }
}
