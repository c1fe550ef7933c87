// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use clap::{ArgAction, Parser, ValueEnum};

use crate::core::error::RunError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str = "Two-pass assembler for the 15-bit word machine.

Each input is appended with .as when the suffix is absent. All inputs of one
invocation form a translation-unit group sharing a symbol table; the group
emits one object file (.ob), one entries file (.ent), and one externals
file (.ext), named by joining the input file stems with underscores.
Artifacts are only written when the whole group assembles without errors.";

#[derive(Parser, Debug)]
#[command(
    name = "asm15",
    version = VERSION,
    about = "Two-pass assembler for a 15-bit word pedagogical machine",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        value_name = "FILE",
        required = true,
        action = ArgAction::Append,
        long_help = "Input assembly source (repeatable). The .as suffix is appended when absent."
    )]
    pub inputs: Vec<String>,
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select diagnostics output format. text is default; json emits one machine-readable document."
    )]
    pub format: OutputFormat,
    #[arg(
        short = 'q',
        long = "quiet",
        action = ArgAction::SetTrue,
        long_help = "Suppress diagnostic output for successful assembly runs. Errors are still reported."
    )]
    pub quiet: bool,
    #[arg(
        long = "werror",
        action = ArgAction::SetTrue,
        long_help = "Treat warnings as errors: artifacts are suppressed and the exit status is non-zero."
    )]
    pub werror: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Validated CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub input_paths: Vec<String>,
    pub format: OutputFormat,
    pub quiet: bool,
    pub werror: bool,
}

pub fn validate_cli(cli: &Cli) -> Result<CliConfig, RunError> {
    if cli.inputs.is_empty() {
        return Err(RunError::new("No input files", Vec::new()));
    }
    let input_paths = cli.inputs.iter().map(|path| with_as_suffix(path)).collect();
    Ok(CliConfig {
        input_paths,
        format: cli.format,
        quiet: cli.quiet,
        werror: cli.werror,
    })
}

/// Append the `.as` suffix when absent.
pub fn with_as_suffix(path: &str) -> String {
    if path.ends_with(".as") {
        path.to_string()
    } else {
        format!("{path}.as")
    }
}

/// Path of the expanded source written next to the input: `<stem>.am`.
pub fn preprocessed_path(input: &str) -> String {
    match input.strip_suffix(".as") {
        Some(stem) => format!("{stem}.am"),
        None => format!("{input}.am"),
    }
}

/// Stem of one input: characters after the last `/`, up to the last `.`,
/// with separator and dot characters replaced by underscores.
fn sanitized_stem(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    let stem = match name.rfind('.') {
        Some(0) | None => name,
        Some(pos) => &name[..pos],
    };
    stem.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | '.' => '_',
            other => other,
        })
        .collect()
}

/// Output base for the group: the sanitized input stems joined with `_`.
pub fn output_base_name(input_paths: &[String]) -> String {
    input_paths
        .iter()
        .map(|path| sanitized_stem(path))
        .collect::<Vec<_>>()
        .join("_")
}
