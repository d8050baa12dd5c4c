use super::atom::Atom;
use crate::core::patterns::PatternKey;
use std::fmt;

/// A fully resolved dihedral angle of one matched residue unit.
///
/// Dihedrals are terminal output records: they are built by the
/// [`DihedralUnitResolver`](crate::engine::resolver::DihedralUnitResolver) and never
/// modified afterwards. The order of `atoms` defines the rotation sense of the
/// torsion and is exactly the slot order of the angle definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dihedral {
    label: String,
    pattern: PatternKey,
    angle_name: String,
    atoms: [Atom; 4],
}

impl Dihedral {
    pub(crate) fn new(label: String, pattern: PatternKey, angle_name: &str, atoms: [Atom; 4]) -> Self {
        Self {
            label,
            pattern,
            angle_name: angle_name.to_string(),
            atoms,
        }
    }

    /// The deterministic label, e.g. `013_04V-014_4ZB-psi`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The pattern key whose match produced this dihedral.
    pub fn pattern(&self) -> &PatternKey {
        &self.pattern
    }

    pub fn angle_name(&self) -> &str {
        &self.angle_name
    }

    pub fn atoms(&self) -> &[Atom; 4] {
        &self.atoms
    }

    /// The resolved atom IDs in slot order. `None` only for atoms that were never resolved.
    pub fn atom_ids(&self) -> [Option<usize>; 4] {
        [
            self.atoms[0].id,
            self.atoms[1].id,
            self.atoms[2].id,
            self.atoms[3].id,
        ]
    }
}

impl fmt::Display for Dihedral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dihedral {} with atoms {}--{}--{}--{}",
            self.label, self.atoms[0], self.atoms[1], self.atoms[2], self.atoms[3]
        )
    }
}
