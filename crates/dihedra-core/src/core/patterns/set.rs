use super::error::PatternError;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Separator between residue names in the textual form of a pattern key.
pub const KEY_SEPARATOR: &str = "-";

/// An ordered tuple of residue names identifying a dihedral-bearing residue unit.
///
/// Keys are order-sensitive: `A-B` and `B-A` are different patterns. Ordering between
/// keys is lexicographic over the residue names, which fixes the order in which
/// patterns are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternKey {
    names: Vec<String>,
}

impl PatternKey {
    /// Creates a key from residue names.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::EmptyKey`] if `names` is empty and
    /// [`PatternError::EmptyResidueName`] if any name is blank.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Self, PatternError> {
        if names.is_empty() {
            return Err(PatternError::EmptyKey);
        }
        let names: Vec<String> = names.iter().map(|n| n.as_ref().trim().to_string()).collect();
        if names.iter().any(|n| n.is_empty()) {
            return Err(PatternError::EmptyResidueName {
                key: names.join(KEY_SEPARATOR),
            });
        }
        Ok(Self { names })
    }

    /// Parses the textual form, e.g. `"04V-4ZB"`.
    pub fn parse(encoded: &str) -> Result<Self, PatternError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(PatternError::EmptyKey);
        }
        let names: Vec<&str> = encoded.split(KEY_SEPARATOR).collect();
        Self::new(&names)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Positions at which `residue_name` occurs in this key.
    pub fn positions_of(&self, residue_name: &str) -> Vec<usize> {
        self.names
            .iter()
            .enumerate()
            .filter(|(_, n)| n.as_str() == residue_name)
            .map(|(i, _)| i)
            .collect()
    }
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(KEY_SEPARATOR))
    }
}

/// Binds one of the four dihedral atoms to a residue position of the pattern key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomSlot {
    pub position: usize,      // Index into the pattern key
    pub residue_name: String, // Name of the residue at `position`
    pub atom_name: String,    // Atom within that residue
}

impl AtomSlot {
    pub fn new(position: usize, residue_name: &str, atom_name: &str) -> Self {
        Self {
            position,
            residue_name: residue_name.to_string(),
            atom_name: atom_name.to_string(),
        }
    }
}

/// A named angle (e.g. "phi", "psi") defined on a pattern by four ordered atom slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AngleDefinition {
    pub name: String,
    pub slots: [AtomSlot; 4],
    /// Amber NMR restraint parameters (e.g. `r1=-180.0, r2=-60.0, r3=-60.0, r4=180.0, rk2=50.0, rk3=50.0`).
    pub restraint: Option<String>,
}

impl AngleDefinition {
    pub fn new(name: &str, slots: [AtomSlot; 4]) -> Self {
        Self {
            name: name.to_string(),
            slots,
            restraint: None,
        }
    }

    pub fn with_restraint(mut self, restraint: &str) -> Self {
        self.restraint = Some(restraint.trim().to_string());
        self
    }

    /// Builds an angle from parallel residue-name and atom-name lists, deriving each
    /// slot's key position from its residue name.
    ///
    /// When `positions` is given, it is used verbatim instead; this is the only way to
    /// bind slots in keys that repeat a residue name.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if a list does not have exactly four entries, a
    /// residue name is not part of `key`, or a name occurs more than once in `key`
    /// and no explicit positions were supplied.
    pub fn from_names<R: AsRef<str>, A: AsRef<str>>(
        key: &PatternKey,
        name: &str,
        residue_names: &[R],
        atom_names: &[A],
        positions: Option<&[usize]>,
    ) -> Result<Self, PatternError> {
        let check_count = |field: &'static str, found: usize| {
            if found == 4 {
                Ok(())
            } else {
                Err(PatternError::SlotCount {
                    key: key.to_string(),
                    angle: name.to_string(),
                    field,
                    found,
                })
            }
        };
        check_count("resnames", residue_names.len())?;
        check_count("atoms", atom_names.len())?;
        if let Some(p) = positions {
            check_count("positions", p.len())?;
        }

        let mut slots = Vec::with_capacity(4);
        for (i, (residue, atom)) in residue_names.iter().zip(atom_names).enumerate() {
            let residue = residue.as_ref().trim();
            let position = match positions {
                Some(p) => p[i],
                None => match key.positions_of(residue).as_slice() {
                    [single] => *single,
                    [] => {
                        return Err(PatternError::UnknownResidue {
                            key: key.to_string(),
                            angle: name.to_string(),
                            residue: residue.to_string(),
                        });
                    }
                    _ => {
                        return Err(PatternError::AmbiguousResidue {
                            key: key.to_string(),
                            angle: name.to_string(),
                            residue: residue.to_string(),
                        });
                    }
                },
            };
            slots.push(AtomSlot::new(position, residue, atom.as_ref().trim()));
        }

        let slots: [AtomSlot; 4] = slots
            .try_into()
            .map_err(|v: Vec<AtomSlot>| PatternError::SlotCount {
                key: key.to_string(),
                angle: name.to_string(),
                field: "slots",
                found: v.len(),
            })?;
        Ok(Self::new(name, slots))
    }
}

/// Validated mapping from pattern keys to their angle definitions.
///
/// Every pattern added to the set satisfies the closed-world invariant: the residue
/// names referenced by its angle slots are exactly the residue names of its key.
/// Iteration is in lexicographic key order; angles keep their declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DihedralPatternSet {
    patterns: BTreeMap<PatternKey, Vec<AngleDefinition>>,
}

impl DihedralPatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pattern after validating it against its key.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] if the key is already present, `angles` is empty,
    /// angle names are blank or repeated, a slot points outside the key or at a
    /// residue of another name, or the slot residue names differ from the key's.
    pub fn insert(
        &mut self,
        key: PatternKey,
        angles: Vec<AngleDefinition>,
    ) -> Result<(), PatternError> {
        if self.patterns.contains_key(&key) {
            return Err(PatternError::DuplicatePattern {
                key: key.to_string(),
            });
        }
        validate_pattern(&key, &angles)?;
        self.patterns.insert(key, angles);
        Ok(())
    }

    pub fn get(&self, key: &PatternKey) -> Option<&[AngleDefinition]> {
        self.patterns.get(key).map(Vec::as_slice)
    }

    pub fn angle(&self, key: &PatternKey, angle_name: &str) -> Option<&AngleDefinition> {
        self.get(key)?.iter().find(|a| a.name == angle_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PatternKey, &[AngleDefinition])> {
        self.patterns.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &PatternKey> {
        self.patterns.keys()
    }

    /// All distinct residue names used by any pattern key, sorted.
    pub fn residue_names(&self) -> BTreeSet<&str> {
        self.patterns
            .keys()
            .flat_map(|k| k.names().iter().map(String::as_str))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn angle_count(&self) -> usize {
        self.patterns.values().map(Vec::len).sum()
    }
}

fn validate_pattern(key: &PatternKey, angles: &[AngleDefinition]) -> Result<(), PatternError> {
    if angles.is_empty() {
        return Err(PatternError::NoAngles {
            key: key.to_string(),
        });
    }

    let key_names: BTreeSet<&str> = key.names().iter().map(String::as_str).collect();
    let mut seen_angles = BTreeSet::new();
    let mut slot_names: BTreeSet<&str> = BTreeSet::new();

    for angle in angles {
        if angle.name.trim().is_empty() {
            return Err(PatternError::EmptyAngleName {
                key: key.to_string(),
            });
        }
        if !seen_angles.insert(angle.name.as_str()) {
            return Err(PatternError::DuplicateAngle {
                key: key.to_string(),
                angle: angle.name.clone(),
            });
        }

        for slot in &angle.slots {
            let Some(expected) = key.names().get(slot.position) else {
                return Err(PatternError::PositionOutOfRange {
                    key: key.to_string(),
                    angle: angle.name.clone(),
                    position: slot.position,
                    len: key.len(),
                });
            };
            if *expected != slot.residue_name {
                return Err(PatternError::PositionMismatch {
                    key: key.to_string(),
                    angle: angle.name.clone(),
                    position: slot.position,
                    expected: expected.clone(),
                    found: slot.residue_name.clone(),
                });
            }
            if slot.atom_name.trim().is_empty() {
                return Err(PatternError::EmptyAtomName {
                    key: key.to_string(),
                    angle: angle.name.clone(),
                });
            }
        }

        slot_names.extend(angle.slots.iter().map(|s| s.residue_name.as_str()));
    }

    // Slot names are already known to be key names; each key name needs a slot.
    let unused: Vec<String> = key_names
        .difference(&slot_names)
        .map(|name| name.to_string())
        .collect();
    if !unused.is_empty() {
        return Err(PatternError::NameSetMismatch {
            key: key.to_string(),
            unused,
        });
    }
    Ok(())
}
