use super::traits::{DihedralFormat, FormatError, resolved_ids};
use crate::core::models::dihedral::Dihedral;
use serde::Serialize;
use std::io::Write;

/// One human-readable line per dihedral, as produced by its `Display` implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextListing;

impl DihedralFormat for TextListing {
    fn write_to(&self, dihedrals: &[Dihedral], writer: &mut impl Write) -> Result<(), FormatError> {
        for dihedral in dihedrals {
            writeln!(writer, "{}", dihedral)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ListingRow<'d> {
    label: &'d str,
    pattern: String,
    angle: &'d str,
    atom1_id: usize,
    atom1_name: &'d str,
    atom1_residue_id: isize,
    atom1_residue_name: &'d str,
    atom2_id: usize,
    atom2_name: &'d str,
    atom2_residue_id: isize,
    atom2_residue_name: &'d str,
    atom3_id: usize,
    atom3_name: &'d str,
    atom3_residue_id: isize,
    atom3_residue_name: &'d str,
    atom4_id: usize,
    atom4_name: &'d str,
    atom4_residue_id: isize,
    atom4_residue_name: &'d str,
}

impl<'d> ListingRow<'d> {
    fn from_dihedral(dihedral: &'d Dihedral) -> Result<Self, FormatError> {
        let ids = resolved_ids(dihedral)?;
        let [a1, a2, a3, a4] = dihedral.atoms();
        Ok(Self {
            label: dihedral.label(),
            pattern: dihedral.pattern().to_string(),
            angle: dihedral.angle_name(),
            atom1_id: ids[0],
            atom1_name: &a1.name,
            atom1_residue_id: a1.residue_id,
            atom1_residue_name: &a1.residue_name,
            atom2_id: ids[1],
            atom2_name: &a2.name,
            atom2_residue_id: a2.residue_id,
            atom2_residue_name: &a2.residue_name,
            atom3_id: ids[2],
            atom3_name: &a3.name,
            atom3_residue_id: a3.residue_id,
            atom3_residue_name: &a3.residue_name,
            atom4_id: ids[3],
            atom4_name: &a4.name,
            atom4_residue_id: a4.residue_id,
            atom4_residue_name: &a4.residue_name,
        })
    }
}

/// A CSV table with one row per dihedral and the id, name, residue ID and residue
/// name of each of its four atoms.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvListing;

impl DihedralFormat for CsvListing {
    fn write_to(&self, dihedrals: &[Dihedral], writer: &mut impl Write) -> Result<(), FormatError> {
        let rows = dihedrals
            .iter()
            .map(ListingRow::from_dihedral)
            .collect::<Result<Vec<_>, _>>()?;

        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
