use crate::core::lookup::{AtomLookup, ResidueLookup};
use crate::core::models::dihedral::Dihedral;
use crate::core::models::residue::ResidueOccurrence;
use crate::engine::config::ResolverConfig;
use crate::engine::error::{EngineError, ResolutionTarget};
use crate::engine::ordering::ResidueIdMap;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::resolver::DihedralUnitResolver;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifyResult {
    /// The residue sequence that was scanned, in search direction.
    pub sequence: Vec<ResidueOccurrence>,
    /// All resolved dihedrals, ordered by pattern key, then match position, then angle.
    pub dihedrals: Vec<Dihedral>,
}

impl IdentifyResult {
    pub fn is_empty(&self) -> bool {
        self.dihedrals.is_empty()
    }
}

/// Runs a full identification pass over the topology behind `residues` and `atoms`.
///
/// # Errors
///
/// Returns [`EngineError::AtomResolution`] if a residue or atom lookup fails and
/// [`EngineError::Contiguity`] if a matched unit has a gap in its residue IDs. No
/// partial result is produced in either case.
#[instrument(skip_all, name = "identify_workflow")]
pub fn run<R, A>(
    residues: &R,
    atoms: &A,
    config: &ResolverConfig,
    reporter: &ProgressReporter,
) -> Result<IdentifyResult, EngineError>
where
    R: ResidueLookup + ?Sized,
    A: AtomLookup + ?Sized,
{
    info!(
        "Identifying dihedrals for {} pattern(s) with {} angle(s).",
        config.pattern_set.len(),
        config.pattern_set.angle_count()
    );

    // === Phase 1: Residue lookup ===
    reporter.report(Progress::PhaseStart {
        name: "Residue lookup",
    });
    let mapping = lookup_residues(residues, config, reporter)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Dihedral resolution ===
    reporter.report(Progress::PhaseStart {
        name: "Dihedral resolution",
    });
    let resolver = DihedralUnitResolver::from_config(config, atoms).with_reporter(reporter);
    let sequence = resolver.order(&mapping);
    let dihedrals = resolver.resolve_sequence(&sequence)?;
    reporter.report(Progress::PhaseFinish);

    info!(
        "Identified {} dihedral(s) in a sequence of {} residue(s).",
        dihedrals.len(),
        sequence.len()
    );
    Ok(IdentifyResult {
        sequence,
        dihedrals,
    })
}

fn lookup_residues<R: ResidueLookup + ?Sized>(
    residues: &R,
    config: &ResolverConfig,
    reporter: &ProgressReporter,
) -> Result<ResidueIdMap, EngineError> {
    let names = config.pattern_set.residue_names();
    reporter.report(Progress::TaskStart {
        total_steps: names.len() as u64,
    });

    let mut mapping = ResidueIdMap::new();
    for name in names {
        let ids = residues
            .residue_ids_for_name(name)
            .map_err(|source| EngineError::AtomResolution {
                target: ResolutionTarget::Residue {
                    name: name.to_string(),
                },
                source,
            })?;
        match ids {
            Some(ids) if !ids.is_empty() => {
                debug!("Residue {} found with IDs {:?}.", name, ids);
                mapping.insert(name.to_string(), ids);
            }
            _ => info!("No residue named {} in the topology.", name),
        }
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    Ok(mapping)
}
