use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use prettytable::{Table, format, row};

use molload::io::{LoadConfig, LoadedStructure, load_batch};
use molload::{CLASSIFICATION_KEY, MolecularStructure, SecondaryStructure};

use crate::commands::{InputText, print_boxed_label, read_input_file, run_with_spinner};

/// Report-only command that loads one or more files and summarizes each.
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Structure files to inspect (PDB or mmCIF).
    #[arg(value_name = "FILES", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

/// Loads every file (in parallel) and prints a report per file to stderr.
///
/// Files that fail validation or parsing are reported inline; the command fails at the end if
/// any of them did.
pub fn run(args: &InfoArgs, config: &LoadConfig) -> Result<()> {
    let inputs = args
        .files
        .iter()
        .map(|path| read_input_file(path))
        .collect::<Result<Vec<InputText>>>()?;

    let message = format!("Parsing {} structure file(s)", inputs.len());
    let results = run_with_spinner(&message, || {
        let batch: Vec<(&str, Option<&str>)> = inputs
            .iter()
            .map(|input| (input.text.as_str(), input.filename.as_deref()))
            .collect();
        Ok(load_batch(&batch, config))
    })?;

    let mut stderr = io::stderr().lock();
    let mut failures = 0;
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(loaded) => print_report(&mut stderr, &input.label, &loaded)?,
            Err(err) => {
                failures += 1;
                writeln!(
                    stderr,
                    "✗ {}: {err} (HTTP {})",
                    input.label,
                    err.http_status()
                )?;
                writeln!(stderr)?;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} file(s) failed to load", inputs.len());
    }
    Ok(())
}

fn print_report<W: Write>(writer: &mut W, label: &str, loaded: &LoadedStructure) -> Result<()> {
    let structure = &loaded.structure;
    print_boxed_label(writer, &format!("{label} ({})", loaded.format))?;

    let mut chain_table = Table::new();
    chain_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    chain_table.set_titles(row!["Chain", "Residues", "Atoms", "Helix", "Sheet"]);
    for report in collect_chain_reports(structure) {
        chain_table.add_row(row![
            report.id,
            report.residues,
            report.atoms,
            report.helix,
            report.sheet
        ]);
    }
    chain_table
        .print(writer)
        .context("Failed to render chain summary")?;

    let metadata = &structure.metadata;
    let mut summary_table = Table::new();
    summary_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    summary_table.set_titles(row!["Metric", "Value"]);
    summary_table.add_row(row!["ID", or_dash(metadata.id.as_deref())]);
    summary_table.add_row(row!["Title", or_dash(metadata.title.as_deref())]);
    summary_table.add_row(row![
        "Classification",
        or_dash(
            metadata
                .extension(CLASSIFICATION_KEY)
                .and_then(|value| value.as_str())
        )
    ]);
    summary_table.add_row(row!["Method", or_dash(metadata.method.as_deref())]);
    summary_table.add_row(row![
        "Resolution (Å)",
        metadata
            .resolution
            .map_or_else(|| "-".to_string(), |r| format!("{r:.2}"))
    ]);
    summary_table.add_row(row!["Deposited", or_dash(metadata.deposition_date.as_deref())]);
    if !metadata.organisms.is_empty() {
        summary_table.add_row(row!["Organisms", metadata.organisms.join("; ")]);
    }
    summary_table.add_row(row!["Atoms", structure.atom_count()]);
    summary_table.add_row(row!["Residues", structure.residue_count()]);
    summary_table.add_row(row!["Chains", structure.chain_count()]);
    summary_table.add_row(row![
        "Bonds",
        structure
            .bonds
            .as_ref()
            .map_or_else(|| "none in source".to_string(), |b| b.len().to_string())
    ]);
    if let Some((min, max)) = structure.bounding_box() {
        let extent = max - min;
        summary_table.add_row(row![
            "Extent (Å)",
            format!("{:.2} × {:.2} × {:.2}", extent.x, extent.y, extent.z)
        ]);
    }
    let center = structure.geometric_center();
    summary_table.add_row(row![
        "Center (Å)",
        format!("{:.3}, {:.3}, {:.3}", center.x, center.y, center.z)
    ]);
    let skipped = loaded.skipped;
    summary_table.add_row(row![
        "Skipped",
        format!(
            "{} atom records, {} rows, {} bonds",
            skipped.atoms, skipped.rows, skipped.bonds
        )
    ]);
    summary_table
        .print(writer)
        .context("Failed to render structure summary")?;
    writeln!(writer)?;

    Ok(())
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

#[derive(Debug)]
struct ChainReport {
    id: String,
    residues: usize,
    atoms: usize,
    helix: usize,
    sheet: usize,
}

fn collect_chain_reports(structure: &MolecularStructure) -> Vec<ChainReport> {
    structure
        .chains
        .iter()
        .map(|chain| {
            let count_kind = |kind| {
                chain
                    .residue_indices
                    .iter()
                    .filter(|&&i| structure.residues[i].secondary_structure == Some(kind))
                    .count()
            };
            ChainReport {
                id: chain.id.to_string(),
                residues: chain.residue_count(),
                atoms: chain.atom_count(),
                helix: count_kind(SecondaryStructure::Helix),
                sheet: count_kind(SecondaryStructure::Sheet),
            }
        })
        .collect()
}
