use crate::ambmask::AmbmaskSettings;
use crate::cli::{IdentifyArgs, OutputFormat};
use crate::error::{CliError, Result};
use clap::ValueEnum;
use dihedra::core::patterns::DihedralPatternSet;
use dihedra::engine::config::{ResolverConfig, ResolverConfigBuilder, SearchDirection};
use dihedra::engine::error::EngineError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialTopologyConfig {
    prmtop: Option<PathBuf>,
    coordinates: Option<PathBuf>,
    table: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialAmbmaskConfig {
    executable: Option<String>,
    printlevel: Option<u8>,
    outformat: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    format: Option<OutputFormat>,
    path: Option<PathBuf>,
    #[serde(rename = "data-file")]
    data_file: Option<PathBuf>,
    trajectories: Option<Vec<PathBuf>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialIdentifyConfig {
    #[serde(rename = "search-direction")]
    search_direction: Option<String>,
    topology: Option<PartialTopologyConfig>,
    ambmask: Option<PartialAmbmaskConfig>,
    output: Option<PartialOutputConfig>,
}

/// Where residue and atom IDs come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologySource {
    Ambmask {
        prmtop: PathBuf,
        coordinates: PathBuf,
        settings: AmbmaskSettings,
    },
    Table(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// `None` writes to standard output.
    pub path: Option<PathBuf>,
    pub data_file: Option<PathBuf>,
    pub trajectories: Vec<PathBuf>,
}

/// Fully merged settings of one `identify` run.
#[derive(Debug, Clone)]
pub struct IdentifyConfig {
    pub resolver: ResolverConfig,
    pub source: TopologySource,
    pub output: OutputConfig,
}

impl PartialIdentifyConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the config file named by `args`, if any.
    pub fn for_args(args: &IdentifyArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli(mut self, args: &IdentifyArgs) -> Result<IdentifyConfig> {
        self.apply_set_values(&args.set_values)?;

        let topology = self.topology.take().unwrap_or_default();
        let ambmask = self.ambmask.take().unwrap_or_default();
        let output = self.output.take().unwrap_or_default();

        let search_direction = if args.inverse_search {
            SearchDirection::Ascending
        } else {
            match self.search_direction.as_deref() {
                Some(value) => value
                    .parse::<SearchDirection>()
                    .map_err(EngineError::from)?,
                None => SearchDirection::default(),
            }
        };

        debug!("Loading dihedral patterns from {:?}", &args.patterns);
        let pattern_set = DihedralPatternSet::load(&args.patterns)?;
        let resolver = ResolverConfigBuilder::new()
            .search_direction(search_direction)
            .pattern_set(pattern_set)
            .build()
            .map_err(EngineError::from)?;

        let source = Self::merge_source(args, topology, ambmask)?;

        let output = OutputConfig {
            format: args.format.or(output.format).unwrap_or_default(),
            path: args.output.clone().or(output.path),
            data_file: args.data_file.clone().or(output.data_file),
            trajectories: if args.trajectories.is_empty() {
                output.trajectories.unwrap_or_default()
            } else {
                args.trajectories.clone()
            },
        };

        Ok(IdentifyConfig {
            resolver,
            source,
            output,
        })
    }

    fn merge_source(
        args: &IdentifyArgs,
        file: PartialTopologyConfig,
        ambmask: PartialAmbmaskConfig,
    ) -> Result<TopologySource> {
        // A source named on the command line replaces the file's source entirely.
        let cli_names_source =
            args.table.is_some() || args.topology.is_some() || args.coordinates.is_some();
        let (table, prmtop, coordinates) = if cli_names_source {
            (
                args.table.clone(),
                args.topology.clone(),
                args.coordinates.clone(),
            )
        } else {
            (file.table, file.prmtop, file.coordinates)
        };

        match (table, prmtop, coordinates) {
            (Some(table), None, None) => Ok(TopologySource::Table(table)),
            (None, Some(prmtop), Some(coordinates)) => {
                let defaults = AmbmaskSettings::default();
                let settings = AmbmaskSettings {
                    executable: args
                        .ambmask
                        .clone()
                        .or(ambmask.executable)
                        .unwrap_or(defaults.executable),
                    printlevel: ambmask.printlevel.unwrap_or(defaults.printlevel),
                    outformat: ambmask.outformat.unwrap_or(defaults.outformat),
                };
                Ok(TopologySource::Ambmask {
                    prmtop,
                    coordinates,
                    settings,
                })
            }
            (Some(_), _, _) => Err(CliError::Config(
                "A topology table cannot be combined with an Amber topology/coordinate pair."
                    .to_string(),
            )),
            (None, Some(_), None) | (None, None, Some(_)) => Err(CliError::Config(
                "An Amber topology requires both a prmtop and a coordinate file.".to_string(),
            )),
            (None, None, None) => Err(CliError::Config(
                "No topology given. Use --topology/--coordinates or --table, or set [topology] in the config file."
                    .to_string(),
            )),
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "search-direction" => {
                    self.search_direction = Some(value_str.to_string());
                }
                "topology.prmtop" => {
                    self.topology.get_or_insert_with(Default::default).prmtop =
                        Some(PathBuf::from(value_str));
                }
                "topology.coordinates" => {
                    self.topology
                        .get_or_insert_with(Default::default)
                        .coordinates = Some(PathBuf::from(value_str));
                }
                "topology.table" => {
                    self.topology.get_or_insert_with(Default::default).table =
                        Some(PathBuf::from(value_str));
                }
                "ambmask.executable" => {
                    self.ambmask.get_or_insert_with(Default::default).executable =
                        Some(value_str.to_string());
                }
                "ambmask.printlevel" => {
                    self.ambmask.get_or_insert_with(Default::default).printlevel =
                        Some(value_str.parse().map_err(|_| {
                            CliError::Config(format!(
                                "Invalid integer value for {}: {}",
                                key, value_str
                            ))
                        })?);
                }
                "ambmask.outformat" => {
                    self.ambmask.get_or_insert_with(Default::default).outformat =
                        Some(value_str.to_string());
                }
                "output.format" => {
                    self.output.get_or_insert_with(Default::default).format =
                        Some(OutputFormat::from_str(value_str, true).map_err(|_| {
                            CliError::Config(format!(
                                "Invalid output format for {}: {}",
                                key, value_str
                            ))
                        })?);
                }
                "output.path" => {
                    self.output.get_or_insert_with(Default::default).path =
                        Some(PathBuf::from(value_str));
                }
                "output.data-file" => {
                    self.output.get_or_insert_with(Default::default).data_file =
                        Some(PathBuf::from(value_str));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
