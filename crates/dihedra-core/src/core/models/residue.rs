use std::fmt;

/// One residue instance of the structure, as reported by the topology.
///
/// Residue IDs are unique within a structure but not necessarily contiguous
/// across it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueOccurrence {
    pub name: String, // Residue name (e.g., "04V", "4ZB")
    pub id: isize,    // Residue sequence number from the topology
}

impl ResidueOccurrence {
    pub fn new(name: &str, id: isize) -> Self {
        Self {
            name: name.to_string(),
            id,
        }
    }
}

impl fmt::Display for ResidueOccurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.id)
    }
}
