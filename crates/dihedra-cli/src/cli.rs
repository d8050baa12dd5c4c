use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Dihedra Developers",
    version,
    about = "Dihedra CLI - Identify dihedral angle units in glycan and polymer chains and resolve their atoms for Amber restraints and cpptraj analysis.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Identify all dihedral units of a topology and write them in the requested format.
    Identify(IdentifyArgs),
    /// Load and validate a pattern file and summarize its patterns and angles.
    Check(CheckArgs),
}

/// Output format for identified dihedrals.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One human-readable line per dihedral.
    #[default]
    List,
    /// Amber `&rst` restraint namelists.
    Restraint,
    /// A cpptraj input script measuring every dihedral.
    Cpptraj,
    /// A CSV table of dihedrals and their atoms.
    Csv,
}

/// Arguments for the `identify` subcommand.
#[derive(Args, Debug)]
pub struct IdentifyArgs {
    /// Path to the dihedral pattern file in TOML format.
    #[arg(required = true, value_name = "PATTERNS")]
    pub patterns: PathBuf,

    // --- Topology Source ---
    /// Amber topology (prmtop) queried through ambmask.
    #[arg(short = 'p', long, value_name = "PATH", conflicts_with = "table")]
    pub topology: Option<PathBuf>,

    /// Amber coordinate file matching the topology.
    #[arg(short = 'x', long, value_name = "PATH", conflicts_with = "table")]
    pub coordinates: Option<PathBuf>,

    /// CSV atom table (atom_id, atom_name, residue_id, residue_name) used instead of ambmask.
    #[arg(short = 't', long, value_name = "PATH")]
    pub table: Option<PathBuf>,

    /// Override the ambmask executable.
    #[arg(long, value_name = "PATH")]
    pub ambmask: Option<String>,

    // --- Search ---
    /// Scan residues from the smallest to the largest residue ID.
    #[arg(short, long)]
    pub inverse_search: bool,

    // --- Output ---
    /// Output format, overriding the config file.
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write output to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Trajectory to analyze in cpptraj output. Can be used multiple times.
    #[arg(long = "trajectory", value_name = "PATH")]
    pub trajectories: Vec<PathBuf>,

    /// Data file receiving dihedral time series in cpptraj output.
    #[arg(long, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    // --- Configuration ---
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S output.format=cpptraj
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the dihedral pattern file in TOML format.
    #[arg(required = true, value_name = "PATTERNS")]
    pub patterns: PathBuf,
}
