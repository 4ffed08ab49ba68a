use std::fs;
use std::io::{self as stdio, Read, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;

use molload::io::{LoadConfig, sanitize_filename};

pub mod export;
pub mod info;

/// Raw structure text plus the sanitized filename used for format-marker checks.
#[derive(Debug, Clone)]
pub struct InputText {
    /// Where the text came from, for messages.
    pub label: String,
    pub filename: Option<String>,
    pub text: String,
}

/// Reads the loader configuration, falling back to defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<LoadConfig> {
    let Some(path) = path else {
        return Ok(LoadConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    LoadConfig::from_toml_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Reads a structure file into memory.
pub fn read_input_file(path: &Path) -> Result<InputText> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(sanitize_filename)
        .filter(|name| !name.is_empty());

    Ok(InputText {
        label: path.display().to_string(),
        filename,
        text,
    })
}

/// Reads a structure from stdin, refusing to wait on an interactive terminal.
pub fn read_stdin() -> Result<InputText> {
    let stdin = stdio::stdin();
    if stdin.is_terminal() {
        bail!(
            "No input file provided and stdin is a TTY. Pass a file or pipe a structure into molload."
        );
    }
    let mut text = String::new();
    stdin
        .lock()
        .read_to_string(&mut text)
        .context("Failed to read structure from stdin")?;

    Ok(InputText {
        label: "<stdin>".to_string(),
        filename: None,
        text,
    })
}

/// Wraps long-running operations with a spinner rendered to stderr.
pub fn run_with_spinner<T, F>(message: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    let result = work();

    match &result {
        Ok(_) => spinner.finish_with_message(format!("{} ✓", message)),
        Err(_) => spinner.abandon_with_message(format!("{} ✗", message)),
    }

    result
}

/// Draws a rounded box around a section title.
pub fn print_boxed_label<W: Write>(writer: &mut W, title: &str) -> stdio::Result<()> {
    let inner = format!(" {title} ");
    let width = inner.chars().count();
    writeln!(writer, "╭{}╮", "─".repeat(width))?;
    writeln!(writer, "│{}│", inner)?;
    writeln!(writer, "╰{}╯", "─".repeat(width))?;
    Ok(())
}

/// Ensures commands do not dump structured output directly into an interactive terminal.
pub fn ensure_noninteractive_stdout(command: &str, output: Option<&Path>) -> Result<()> {
    if output.is_none() && stdio::stdout().is_terminal() {
        bail!(
            "Refusing to stream {command} results to an interactive terminal. Use -o/--output or pipe the command into a file."
        );
    }
    Ok(())
}
