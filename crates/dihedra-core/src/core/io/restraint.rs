use super::traits::{DihedralFormat, FormatError, resolved_ids};
use crate::core::models::dihedral::Dihedral;
use crate::core::patterns::DihedralPatternSet;
use std::io::Write;

/// Amber `&rst` namelist restraints, one block per dihedral.
///
/// The restraint parameters (`r1`, `rk2`, ...) come from the angle definition the
/// dihedral was resolved from, so the pattern set used for resolution is borrowed here.
///
/// ```text
/// &rst
///     iat=12, 13, 40, 41,
///     r1=-180.0, r2=-60.0, r3=-60.0, r4=180.0, rk2=50.0, rk3=50.0,
/// &end
/// ```
pub struct RestraintFile<'p> {
    patterns: &'p DihedralPatternSet,
}

impl<'p> RestraintFile<'p> {
    pub fn new(patterns: &'p DihedralPatternSet) -> Self {
        Self { patterns }
    }

    fn restraint_for(&self, dihedral: &Dihedral) -> Result<&'p str, FormatError> {
        self.patterns
            .angle(dihedral.pattern(), dihedral.angle_name())
            .and_then(|angle| angle.restraint.as_deref())
            .map(|r| r.trim().trim_end_matches(',').trim_end())
            .filter(|r| !r.is_empty())
            .ok_or_else(|| FormatError::MissingRestraint {
                label: dihedral.label().to_string(),
                pattern: dihedral.pattern().to_string(),
                angle: dihedral.angle_name().to_string(),
            })
    }
}

impl DihedralFormat for RestraintFile<'_> {
    fn write_to(&self, dihedrals: &[Dihedral], writer: &mut impl Write) -> Result<(), FormatError> {
        // Nothing is written unless every dihedral renders.
        let blocks = dihedrals
            .iter()
            .map(|d| Ok((resolved_ids(d)?, self.restraint_for(d)?)))
            .collect::<Result<Vec<_>, FormatError>>()?;

        for (index, (ids, restraint)) in blocks.iter().enumerate() {
            if index > 0 {
                writeln!(writer)?;
            }
            writeln!(writer, "&rst")?;
            writeln!(
                writer,
                "    iat={}, {}, {}, {},",
                ids[0], ids[1], ids[2], ids[3]
            )?;
            writeln!(writer, "    {},", restraint)?;
            writeln!(writer, "&end")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::traits::test_support::{psi_dihedral, unresolved_dihedral};
    use super::*;

    const RESTRAINT: &str = "r1=-180.0, r2=-60.0, r3=-60.0, r4=180.0, rk2=50.0, rk3=50.0";

    fn patterns(restraint: Option<&str>) -> DihedralPatternSet {
        let restraint_line = restraint
            .map(|r| format!("restraint = \"{}\"\n", r))
            .unwrap_or_default();
        let toml = format!(
            "[04V-4ZB.psi]\nresnames = [\"04V\", \"04V\", \"4ZB\", \"4ZB\"]\natoms = [\"H1\", \"C1\", \"O4\", \"C4\"]\n{}",
            restraint_line
        );
        DihedralPatternSet::from_toml_str(&toml).unwrap()
    }

    #[test]
    fn renders_one_namelist_per_dihedral() {
        let set = patterns(Some(RESTRAINT));
        let output = RestraintFile::new(&set)
            .render(&[psi_dihedral([12, 13, 40, 41]), psi_dihedral([1, 2, 3, 4])])
            .unwrap();
        let expected = format!(
            "&rst\n    iat=12, 13, 40, 41,\n    {r},\n&end\n\n&rst\n    iat=1, 2, 3, 4,\n    {r},\n&end\n",
            r = RESTRAINT
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn trailing_comma_in_restraint_is_not_doubled() {
        let set = patterns(Some("r1=0.0, rk2=10.0,"));
        let output = RestraintFile::new(&set)
            .render(&[psi_dihedral([1, 2, 3, 4])])
            .unwrap();
        assert!(output.contains("    r1=0.0, rk2=10.0,\n&end"));
    }

    #[test]
    fn missing_restraint_is_an_error_without_output() {
        let set = patterns(None);
        let mut buffer = Vec::new();
        let result = RestraintFile::new(&set).write_to(&[psi_dihedral([1, 2, 3, 4])], &mut buffer);
        assert!(matches!(
            result,
            Err(FormatError::MissingRestraint { ref angle, .. }) if angle == "psi"
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn unresolved_atom_is_an_error() {
        let set = patterns(Some(RESTRAINT));
        let result = RestraintFile::new(&set).render(&[unresolved_dihedral()]);
        assert!(matches!(result, Err(FormatError::UnresolvedAtom { .. })));
    }

    #[test]
    fn empty_input_renders_nothing() {
        let set = patterns(Some(RESTRAINT));
        assert_eq!(RestraintFile::new(&set).render(&[]).unwrap(), "");
    }
}
