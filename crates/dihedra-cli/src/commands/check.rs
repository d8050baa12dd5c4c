use crate::cli::CheckArgs;
use crate::error::Result;
use dihedra::core::patterns::DihedralPatternSet;
use std::io::{self, Write};
use tracing::info;

pub fn run(args: CheckArgs) -> Result<()> {
    info!("Validating pattern file {:?}", &args.patterns);
    let patterns = DihedralPatternSet::load(&args.patterns)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_summary(&patterns, &mut handle)?;
    handle.flush()?;
    Ok(())
}

/// Writes one line per pattern with its angles, followed by a total.
fn write_summary(patterns: &DihedralPatternSet, writer: &mut impl Write) -> io::Result<()> {
    for (key, angles) in patterns.iter() {
        let names: Vec<String> = angles
            .iter()
            .map(|a| {
                if a.restraint.is_some() {
                    format!("{} (restrained)", a.name)
                } else {
                    a.name.clone()
                }
            })
            .collect();
        writeln!(writer, "{}: {}", key, names.join(", "))?;
    }
    writeln!(
        writer,
        "✓ {} pattern(s), {} angle(s), residues: {}",
        patterns.len(),
        patterns.angle_count(),
        patterns
            .residue_names()
            .into_iter()
            .collect::<Vec<_>>()
            .join(", ")
    )
}
