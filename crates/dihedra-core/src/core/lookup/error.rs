use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("No residue named '{name}' in the topology")]
    ResidueNotFound { name: String },

    #[error("No atom '{atom_name}' in residue {residue_id}")]
    AtomNotFound { residue_id: isize, atom_name: String },

    #[error("Atom '{atom_name}' in residue {residue_id} is ambiguous ({count} matches)")]
    Ambiguous {
        residue_id: isize,
        atom_name: String,
        count: usize,
    },

    #[error("Unexpected lookup output: {0}")]
    Malformed(String),

    #[error("Lookup tool failed: {0}")]
    Tool(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
