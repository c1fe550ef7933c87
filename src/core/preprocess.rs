// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Macro collection and expansion.
//!
//! Two phases over the same file: definition capture (`macr` .. `endmacr`)
//! and expansion. Malformed definitions are reported and skipped; the
//! preprocessor always produces a best-effort output so later passes can
//! surface more errors in one run.

use std::collections::HashMap;

use crate::core::error::{Diagnostics, ErrorKind};
use crate::core::operand::valid_macro_name;
use crate::core::source::MAX_LINE_LENGTH;

/// A macro definition: its name and the body lines captured verbatim.
#[derive(Debug, Clone)]
pub struct Macro {
    pub name: String,
    pub lines: Vec<String>,
}

/// Macro definitions for one file, private to the preprocessor.
#[derive(Debug, Default)]
pub struct MacroTable {
    macros: Vec<Macro>,
    index: HashMap<String, usize>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, definition: Macro) {
        match self.index.get(&definition.name) {
            Some(&i) => self.macros[i] = definition,
            None => {
                self.index
                    .insert(definition.name.clone(), self.macros.len());
                self.macros.push(definition);
            }
        }
    }

    pub fn find(&self, name: &str) -> Option<&Macro> {
        self.index.get(name).map(|&i| &self.macros[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.macros.iter().map(|m| m.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    pub fn reset(&mut self) {
        self.macros.clear();
        self.index.clear();
    }
}

/// Result of preprocessing one file.
pub struct PreprocessOutput {
    pub expanded: Vec<String>,
    pub macro_names: Vec<String>,
}

/// Expand macros in `lines`, recording problems against `file_name`.
pub fn preprocess(
    file_name: &str,
    lines: &[String],
    diagnostics: &mut Diagnostics,
) -> PreprocessOutput {
    let mut table = MacroTable::new();
    collect_definitions(file_name, lines, &mut table, diagnostics);
    let expanded = expand(lines, &table);
    let macro_names = table.names().map(str::to_string).collect();
    PreprocessOutput {
        expanded,
        macro_names,
    }
}

fn collect_definitions(
    file_name: &str,
    lines: &[String],
    table: &mut MacroTable,
    diagnostics: &mut Diagnostics,
) {
    // `None` body means the definition had a bad name; its lines are
    // consumed but discarded.
    let mut current: Option<Option<Macro>> = None;

    for (index, line) in lines.iter().enumerate() {
        let line_number = index as u32 + 1;
        if line.chars().count() > MAX_LINE_LENGTH {
            diagnostics.add_warning(
                ErrorKind::UnexpectedToken,
                file_name,
                line_number,
                Some("line exceeds 80 characters"),
            );
        }

        if current.is_some() {
            if line.trim_start().starts_with("endmacr") {
                if let Some(done) = current.take().flatten() {
                    table.add(done);
                }
            } else if let Some(Some(definition)) = current.as_mut() {
                definition.lines.push(line.clone());
            }
            continue;
        }

        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("macr") {
            continue;
        }
        match tokens.next() {
            None => {
                diagnostics.add(ErrorKind::MacroNameMissing, file_name, line_number, None);
                current = Some(None);
            }
            Some(name) if !valid_macro_name(name) => {
                diagnostics.add(
                    ErrorKind::MacroNameInvalid,
                    file_name,
                    line_number,
                    Some(name),
                );
                current = Some(None);
            }
            Some(name) => {
                current = Some(Some(Macro {
                    name: name.to_string(),
                    lines: Vec::new(),
                }));
            }
        }
    }

    // Unterminated definition: keep what was captured.
    if let Some(Some(definition)) = current {
        table.add(definition);
    }
}

fn expand(lines: &[String], table: &MacroTable) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut inside_body = false;

    for line in lines {
        let first = line.split_whitespace().next();
        if first == Some("macr") {
            inside_body = true;
            continue;
        }
        if line.trim_start().starts_with("endmacr") {
            inside_body = false;
            continue;
        }
        if inside_body {
            continue;
        }
        match first.and_then(|token| table.find(token)) {
            Some(definition) => out.extend(definition.lines.iter().cloned()),
            None => out.push(line.clone()),
        }
    }

    out
}
