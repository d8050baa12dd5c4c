use crate::ambmask::AmbmaskLookup;
use crate::cli::{IdentifyArgs, OutputFormat};
use crate::config::{IdentifyConfig, OutputConfig, PartialIdentifyConfig, TopologySource};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use dihedra::core::io::cpptraj::CpptrajInput;
use dihedra::core::io::listing::{CsvListing, TextListing};
use dihedra::core::io::restraint::RestraintFile;
use dihedra::core::io::traits::DihedralFormat;
use dihedra::core::lookup::TopologyTable;
use dihedra::core::models::dihedral::Dihedral;
use dihedra::engine::progress::ProgressReporter;
use dihedra::workflows::identify::{self, IdentifyResult};
use std::io::{self, Write};
use tracing::{info, warn};

pub fn run(args: IdentifyArgs, show_progress: bool) -> Result<()> {
    let partial_config = PartialIdentifyConfig::for_args(&args)?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args)?;

    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let result = identify_with_source(&config, &reporter)?;

    if result.is_empty() {
        warn!("No dihedral units were identified.");
    } else {
        info!("Identified {} dihedral(s).", result.dihedrals.len());
    }

    write_output(&result.dihedrals, &config)?;
    if let Some(path) = &config.output.path {
        eprintln!(
            "✓ {} dihedral(s) written to: {}",
            result.dihedrals.len(),
            path.display()
        );
    }
    Ok(())
}

fn identify_with_source(
    config: &IdentifyConfig,
    reporter: &ProgressReporter,
) -> Result<IdentifyResult> {
    let result = match &config.source {
        TopologySource::Table(path) => {
            info!("Loading topology table from {:?}", path);
            let table = TopologyTable::load(path)?;
            info!("Topology table holds {} atom(s).", table.atom_count());
            identify::run(&table, &table, &config.resolver, reporter)?
        }
        TopologySource::Ambmask {
            prmtop,
            coordinates,
            settings,
        } => {
            info!(
                "Querying {:?} / {:?} through '{}'.",
                prmtop, coordinates, settings.executable
            );
            let ambmask = AmbmaskLookup::new(prmtop, coordinates, settings.clone());
            identify::run(&ambmask, &ambmask, &config.resolver, reporter)?
        }
    };
    Ok(result)
}

fn write_output(dihedrals: &[Dihedral], config: &IdentifyConfig) -> Result<()> {
    let output = &config.output;
    match output.format {
        OutputFormat::List => emit(&TextListing, dihedrals, output),
        OutputFormat::Csv => emit(&CsvListing, dihedrals, output),
        OutputFormat::Restraint => emit(
            &RestraintFile::new(&config.resolver.pattern_set),
            dihedrals,
            output,
        ),
        OutputFormat::Cpptraj => emit(&cpptraj_input(config), dihedrals, output),
    }
}

fn cpptraj_input(config: &IdentifyConfig) -> CpptrajInput {
    let output = &config.output;
    let mut input = CpptrajInput::new();
    if let TopologySource::Ambmask { prmtop, .. } = &config.source {
        input = input.topology(prmtop);
    }
    for trajectory in &output.trajectories {
        input = input.trajectory(trajectory);
    }
    if let Some(data_file) = &output.data_file {
        input = input.data_file(data_file);
    }
    input
}

fn emit<F: DihedralFormat>(format: &F, dihedrals: &[Dihedral], output: &OutputConfig) -> Result<()> {
    match &output.path {
        Some(path) => {
            info!("Writing {:?} output to {:?}", output.format, path);
            format.write_to_path(dihedrals, path)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            format.write_to(dihedrals, &mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}
