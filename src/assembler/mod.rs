// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Two-pass assembler for the 15-bit word machine.
//!
//! This module ties together the machine-agnostic core with the pass
//! drivers, directive and instruction encoders, and the artifact emitters.

pub mod cli;
mod directives;
mod engine;
mod instruction;
mod output;
mod passes;
#[cfg(test)]
mod tests;

use engine::Assembler;
use output::emit_artifacts;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use clap::Parser;

use crate::core::error::{Diagnostics, ErrorKind, PassCounts, RunError, RunReport};
use crate::core::opcodes::{self, Arity};
use crate::core::operand::{
    classify, register_number, valid_data_value, valid_immediate, valid_label_name,
    valid_string_literal, AddressingMode,
};
use crate::core::preprocess::preprocess;
use crate::core::source::{read_lines, SourceReader};
use crate::core::symbol_table::SymbolTable;
use crate::core::word::{
    address_word, header_word, immediate_word, int_to_word, register_pair_word, register_word,
    Are, BASE_ADDRESS, MEMORY_SIZE,
};

use cli::{output_base_name, preprocessed_path, validate_cli, Cli};

pub use cli::VERSION;

/// Run the assembler with command-line arguments.
pub fn run() -> Result<RunReport, RunError> {
    passes::run()
}

pub fn run_with_cli(cli: &Cli) -> Result<RunReport, RunError> {
    passes::run_with_cli(cli)
}

/// Split a source line on whitespace and commas.
pub(crate) fn tokenize(line: &str) -> Vec<&str> {
    line.split([' ', '\t', ','])
        .filter(|token| !token.is_empty())
        .collect()
}
