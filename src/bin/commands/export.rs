use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use molload::MolecularStructure;
use molload::io::{LoadConfig, load_structure};

use crate::commands::{
    InputText, ensure_noninteractive_stdout, read_input_file, read_stdin, run_with_spinner,
};

/// Serializes a parsed structure as JSON.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Structure file to export. When omitted, stdin is used.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
    /// Output file path. When omitted, stdout is used.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Emit single-line JSON instead of pretty-printed output.
    #[arg(long)]
    pub compact: bool,
    /// Mark the structure as a computational model attributed to SOURCE (e.g. "AlphaFold DB").
    #[arg(long, value_name = "SOURCE")]
    pub computational_model: Option<String>,
}

pub fn run(args: &ExportArgs, config: &LoadConfig) -> Result<()> {
    ensure_noninteractive_stdout("export", args.output.as_deref())?;

    let input = match &args.file {
        Some(path) => read_input_file(path)?,
        None => read_stdin()?,
    };

    let mut structure = run_with_spinner("Parsing structure", || parse(&input, config))?;
    if let Some(source) = &args.computational_model {
        structure.metadata.mark_computational_model(source);
    }

    write_json(&structure, args.output.as_deref(), args.compact)
}

fn parse(input: &InputText, config: &LoadConfig) -> Result<MolecularStructure> {
    let loaded = load_structure(&input.text, input.filename.as_deref(), config)
        .with_context(|| format!("Failed to load structure from {}", input.label))?;
    Ok(loaded.structure)
}

fn write_json(structure: &MolecularStructure, output: Option<&Path>, compact: bool) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serialize(&mut writer, structure, compact)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
            writer.flush().context("Failed to flush output writer")?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serialize(&mut writer, structure, compact)
                .context("Failed to write JSON to stdout")?;
            writer.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

fn serialize<W: Write>(
    writer: &mut W,
    structure: &MolecularStructure,
    compact: bool,
) -> Result<()> {
    if compact {
        serde_json::to_writer(&mut *writer, structure)?;
    } else {
        serde_json::to_writer_pretty(&mut *writer, structure)?;
    }
    writeln!(writer)?;
    Ok(())
}
