// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for asm15.

use std::io::{self, Write};

use clap::Parser;

use asm15::assembler::cli::{validate_cli, Cli, OutputFormat};
use asm15::core::error::Diagnostic;

use serde_json::json;

fn emit_diagnostics(diagnostics: &[Diagnostic], format: OutputFormat) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match format {
        OutputFormat::Text => {
            for diag in diagnostics {
                let _ = writeln!(out, "{}", diag.format());
            }
        }
        OutputFormat::Json => {
            let payload = json!({
                "diagnostics": diagnostics.iter().map(Diagnostic::to_json).collect::<Vec<_>>(),
            });
            let _ = writeln!(out, "{payload}");
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config = match validate_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match asm15::assembler::run_with_cli(&cli) {
        Ok(report) => {
            if !config.quiet {
                emit_diagnostics(report.diagnostics(), config.format);
            }
        }
        Err(err) => {
            emit_diagnostics(err.diagnostics(), config.format);
            if config.format == OutputFormat::Text {
                eprintln!("{err}");
            }
            std::process::exit(1);
        }
    }
}
