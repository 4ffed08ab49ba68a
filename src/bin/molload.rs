use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{export, info};

#[derive(Parser, Debug)]
#[command(
    name = "molload",
    about = "A command-line tool for validating, inspecting, and exporting PDB and mmCIF structure files.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// TOML file overriding loader limits (e.g. max_input_bytes).
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load structures and print per-file summaries to stderr.
    Info(info::InfoArgs),
    /// Load a structure and write it as JSON.
    Export(export::ExportArgs),
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Info(args) => info::run(args, &config)?,
        Command::Export(args) => export::run(args, &config)?,
    }

    Ok(())
}
