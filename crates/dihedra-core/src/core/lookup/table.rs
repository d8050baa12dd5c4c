use super::error::LookupError;
use super::traits::{AtomLookup, ResidueLookup};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One atom of a topology, as listed in a topology table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomRecord {
    pub atom_id: usize,
    pub atom_name: String,
    pub residue_id: isize,
    pub residue_name: String,
}

impl AtomRecord {
    pub fn new(atom_id: usize, atom_name: &str, residue_id: isize, residue_name: &str) -> Self {
        Self {
            atom_id,
            atom_name: atom_name.to_string(),
            residue_id,
            residue_name: residue_name.to_string(),
        }
    }
}

/// In-memory topology answering residue and atom lookups.
///
/// The table is loaded from a CSV file with the header
/// `atom_id,atom_name,residue_id,residue_name`, or built directly from records.
#[derive(Debug, Clone, Default)]
pub struct TopologyTable {
    residues_by_name: HashMap<String, BTreeSet<isize>>,
    atoms_by_residue: HashMap<(isize, String), Vec<usize>>,
    atom_count: usize,
}

impl TopologyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = AtomRecord>) -> Self {
        let mut table = Self::new();
        for record in records {
            table.insert(record);
        }
        table
    }

    pub fn insert(&mut self, record: AtomRecord) {
        self.residues_by_name
            .entry(record.residue_name)
            .or_default()
            .insert(record.residue_id);
        self.atoms_by_residue
            .entry((record.residue_id, record.atom_name))
            .or_default()
            .push(record.atom_id);
        self.atom_count += 1;
    }

    /// Reads a topology table in CSV form.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Csv`] if a row is malformed or misses a column.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, LookupError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);
        let mut table = Self::new();
        for row in csv_reader.deserialize::<AtomRecord>() {
            table.insert(row?);
        }
        debug!(
            "Read topology table with {} atoms in {} residue names.",
            table.atom_count,
            table.residues_by_name.len()
        );
        Ok(table)
    }

    /// Loads a topology table from a CSV file.
    pub fn load(path: &Path) -> Result<Self, LookupError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(std::io::BufReader::new(file))
    }

    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    pub fn is_empty(&self) -> bool {
        self.atom_count == 0
    }
}

impl ResidueLookup for TopologyTable {
    fn residue_ids_for_name(&self, name: &str) -> Result<Option<Vec<isize>>, LookupError> {
        Ok(self
            .residues_by_name
            .get(name)
            .map(|ids| ids.iter().copied().collect()))
    }
}

impl AtomLookup for TopologyTable {
    fn atom_id_for(&self, residue_id: isize, atom_name: &str) -> Result<usize, LookupError> {
        match self
            .atoms_by_residue
            .get(&(residue_id, atom_name.to_string()))
            .map(Vec::as_slice)
        {
            Some([id]) => Ok(*id),
            Some(ids) if ids.len() > 1 => Err(LookupError::Ambiguous {
                residue_id,
                atom_name: atom_name.to_string(),
                count: ids.len(),
            }),
            _ => Err(LookupError::AtomNotFound {
                residue_id,
                atom_name: atom_name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const TABLE_CSV: &str = "\
atom_id,atom_name,residue_id,residue_name
# reducing end
1, O1, 1, ROH
2, H1, 2, 4ZB
3, C1, 2, 4ZB
4, O4, 2, 4ZB
5, C4, 2, 4ZB
6, H1, 3, 04V
7, C1, 3, 04V
";

    #[test]
    fn csv_table_resolves_residue_ids() {
        let table = TopologyTable::from_csv_reader(TABLE_CSV.as_bytes()).unwrap();
        assert_eq!(table.atom_count(), 7);
        assert_eq!(table.residue_ids_for_name("4ZB").unwrap(), Some(vec![2]));
        assert_eq!(table.residue_ids_for_name("ROH").unwrap(), Some(vec![1]));
    }

    #[test]
    fn absent_residue_name_is_none_not_error() {
        let table = TopologyTable::from_csv_reader(TABLE_CSV.as_bytes()).unwrap();
        assert_eq!(table.residue_ids_for_name("34V").unwrap(), None);
    }

    #[test]
    fn residue_ids_are_distinct_and_sorted() {
        let table = TopologyTable::from_records([
            AtomRecord::new(10, "C1", 9, "34V"),
            AtomRecord::new(11, "C3", 9, "34V"),
            AtomRecord::new(1, "C1", 3, "34V"),
            AtomRecord::new(5, "C1", 5, "34V"),
        ]);
        assert_eq!(
            table.residue_ids_for_name("34V").unwrap(),
            Some(vec![3, 5, 9])
        );
    }

    #[test]
    fn csv_table_resolves_atom_ids() {
        let table = TopologyTable::from_csv_reader(TABLE_CSV.as_bytes()).unwrap();
        assert_eq!(table.atom_id_for(2, "O4").unwrap(), 4);
        assert_eq!(table.atom_id_for(3, "H1").unwrap(), 6);
    }

    #[test]
    fn missing_atom_is_reported() {
        let table = TopologyTable::from_csv_reader(TABLE_CSV.as_bytes()).unwrap();
        assert!(matches!(
            table.atom_id_for(3, "O4"),
            Err(LookupError::AtomNotFound { residue_id: 3, .. })
        ));
    }

    #[test]
    fn duplicate_atom_names_are_ambiguous() {
        let table = TopologyTable::from_records([
            AtomRecord::new(1, "C1", 2, "4ZB"),
            AtomRecord::new(2, "C1", 2, "4ZB"),
        ]);
        assert!(matches!(
            table.atom_id_for(2, "C1"),
            Err(LookupError::Ambiguous { count: 2, .. })
        ));
    }

    #[test]
    fn malformed_rows_return_csv_error() {
        let content = "atom_id,atom_name,residue_id,residue_name\nx,C1,2,4ZB\n";
        assert!(matches!(
            TopologyTable::from_csv_reader(content.as_bytes()),
            Err(LookupError::Csv(_))
        ));
    }

    #[test]
    fn load_reads_table_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("topology.csv");
        fs::write(&path, TABLE_CSV).unwrap();
        let table = TopologyTable::load(&path).unwrap();
        assert!(!table.is_empty());
        assert!(matches!(
            TopologyTable::load(&dir.path().join("missing.csv")),
            Err(LookupError::Io(_))
        ));
    }
}
