use dihedra::core::lookup::{AtomLookup, LookupError, ResidueLookup};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, trace};

pub const DEFAULT_EXECUTABLE: &str = "ambmask";
pub const DEFAULT_PRINTLEVEL: u8 = 0;
pub const DEFAULT_OUTFORMAT: &str = "amber";

/// How `ambmask` is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AmbmaskSettings {
    pub executable: String,
    pub printlevel: u8,
    pub outformat: String,
}

impl Default for AmbmaskSettings {
    fn default() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
            printlevel: DEFAULT_PRINTLEVEL,
            outformat: DEFAULT_OUTFORMAT.to_string(),
        }
    }
}

/// Residue and atom lookups answered by running `ambmask` against an Amber
/// topology/coordinate pair, one process per query.
#[derive(Debug, Clone)]
pub struct AmbmaskLookup {
    topology: PathBuf,
    coordinates: PathBuf,
    settings: AmbmaskSettings,
}

impl AmbmaskLookup {
    pub fn new(topology: &Path, coordinates: &Path, settings: AmbmaskSettings) -> Self {
        Self {
            topology: topology.to_path_buf(),
            coordinates: coordinates.to_path_buf(),
            settings,
        }
    }

    fn command(&self, mask: &str) -> Command {
        let mut command = Command::new(&self.settings.executable);
        command
            .arg("-p")
            .arg(&self.topology)
            .arg("-c")
            .arg(&self.coordinates)
            .arg("-prnlev")
            .arg(self.settings.printlevel.to_string())
            .arg("-out")
            .arg(&self.settings.outformat)
            .arg("-find")
            .arg(mask);
        command
    }

    /// Runs one query and returns its standard output.
    fn query(&self, mask: &str) -> Result<String, LookupError> {
        debug!("Running {} with mask '{}'.", self.settings.executable, mask);
        let output = self.command(mask).output().map_err(|e| {
            LookupError::Tool(format!(
                "failed to execute '{}' (is it in your PATH?): {}",
                self.settings.executable, e
            ))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            return Err(LookupError::Tool(format!(
                "'{}' for mask '{}' exited with {}: {}",
                self.settings.executable,
                mask,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        trace!("ambmask stdout for '{}': {:?}", mask, stdout);
        Ok(stdout)
    }
}

impl ResidueLookup for AmbmaskLookup {
    fn residue_ids_for_name(&self, name: &str) -> Result<Option<Vec<isize>>, LookupError> {
        let stdout = self.query(&residue_mask(name))?;
        parse_residue_ids(&stdout)
    }
}

impl AtomLookup for AmbmaskLookup {
    fn atom_id_for(&self, residue_id: isize, atom_name: &str) -> Result<usize, LookupError> {
        let stdout = self.query(&atom_mask(residue_id, atom_name))?;
        parse_atom_id(&stdout, residue_id, atom_name)
    }
}

pub fn residue_mask(name: &str) -> String {
    format!(":{}", name)
}

pub fn atom_mask(residue_id: isize, atom_name: &str) -> String {
    format!(":{}@{}", residue_id, atom_name)
}

fn parse_pair(line: &str, tag: &str) -> Result<(i64, i64), LookupError> {
    let malformed = || LookupError::Malformed(format!("expected '{} <first> <last>', got '{}'", tag, line));
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some(tag) {
        return Err(malformed());
    }
    let first = tokens.next().and_then(|t| t.parse().ok()).ok_or_else(malformed)?;
    let last = tokens.next().and_then(|t| t.parse().ok()).ok_or_else(malformed)?;
    Ok((first, last))
}

/// Parses `RES <start> <end>` lines of a residue query.
///
/// Empty output means the topology has no residue of that name. Each line must name
/// a single residue; ranges are rejected because a name query is expected to report
/// every residue separately.
pub fn parse_residue_ids(stdout: &str) -> Result<Option<Vec<isize>>, LookupError> {
    if stdout.trim().is_empty() {
        return Ok(None);
    }
    let mut ids = Vec::new();
    for line in stdout.lines().map(str::trim).filter(|l| l.starts_with("RES")) {
        let (start, end) = parse_pair(line, "RES")?;
        if start != end {
            return Err(LookupError::Malformed(format!(
                "expected a single residue per line, got range {}..{} in '{}'",
                start, end, line
            )));
        }
        let id = isize::try_from(start)
            .map_err(|_| LookupError::Malformed(format!("residue ID out of range in '{}'", line)))?;
        ids.push(id);
    }
    Ok(Some(ids))
}

/// Parses the single `ATOM <first> <last>` line of an atom query.
pub fn parse_atom_id(stdout: &str, residue_id: isize, atom_name: &str) -> Result<usize, LookupError> {
    let lines: Vec<&str> = stdout.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let line = match lines.as_slice() {
        [] => {
            return Err(LookupError::AtomNotFound {
                residue_id,
                atom_name: atom_name.to_string(),
            });
        }
        [line] => *line,
        _ => {
            return Err(LookupError::Ambiguous {
                residue_id,
                atom_name: atom_name.to_string(),
                count: lines.len(),
            });
        }
    };

    let (first, last) = parse_pair(line, "ATOM")?;
    if first != last {
        let count = usize::try_from(last.abs_diff(first))
            .map_or(usize::MAX, |span| span.saturating_add(1));
        return Err(LookupError::Ambiguous {
            residue_id,
            atom_name: atom_name.to_string(),
            count,
        });
    }
    usize::try_from(first)
        .map_err(|_| LookupError::Malformed(format!("atom ID out of range in '{}'", line)))
}
