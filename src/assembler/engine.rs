// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use super::*;

/// One emitted word: its address, contents, and — for placeholder words —
/// the label whose final address the second pass patches in.
#[derive(Debug, Clone)]
pub(crate) struct WordNode {
    pub address: u16,
    pub data: u16,
    pub label: Option<String>,
}

/// Per-group assembly state: the symbol table, the instruction and data
/// word streams, counters, and the diagnostics sink. One `Assembler` value
/// owns everything a translation-unit group touches, so `reset` leaves no
/// residue between invocations.
pub(crate) struct Assembler {
    pub(crate) symbols: SymbolTable,
    pub(crate) instructions: Vec<WordNode>,
    pub(crate) data: Vec<WordNode>,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) macro_names: HashSet<String>,
    /// Use sites of external labels, in instruction-stream order.
    pub(crate) externals: Vec<(String, u16)>,
    pub(crate) ic: u16,
    pub(crate) dc: u16,
    pub(crate) ic_final: u16,
    pub(crate) dc_final: u16,
    pub(crate) current_file: String,
    pub(crate) current_line_number: u32,
}

impl Assembler {
    pub(crate) fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            instructions: Vec::new(),
            data: Vec::new(),
            diagnostics: Diagnostics::new(),
            macro_names: HashSet::new(),
            externals: Vec::new(),
            ic: 0,
            dc: 0,
            ic_final: 0,
            dc_final: 0,
            current_file: String::new(),
            current_line_number: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.symbols.reset();
        self.instructions.clear();
        self.data.clear();
        self.diagnostics.reset();
        self.macro_names.clear();
        self.externals.clear();
        self.ic = 0;
        self.dc = 0;
        self.ic_final = 0;
        self.dc_final = 0;
        self.current_file.clear();
        self.current_line_number = 0;
    }

    pub(crate) fn error(&mut self, kind: ErrorKind, detail: Option<&str>) {
        let file = self.current_file.clone();
        self.diagnostics
            .add(kind, &file, self.current_line_number, detail);
    }

    /// First pass over one preprocessed file. Counters continue across the
    /// files of a group; addresses are still raw (offsets are applied by
    /// `finalize_layout` once the whole group has been read).
    pub(crate) fn first_pass(&mut self, file_name: &str, lines: &[String]) -> PassCounts {
        self.current_file = file_name.to_string();
        let mut counts = PassCounts::new();
        let errors_before = self.diagnostics.error_count();
        let warnings_before = self.diagnostics.warning_count();

        for (line_number, line) in SourceReader::new(lines) {
            self.current_line_number = line_number;
            self.process_line(line);
            counts.lines += 1;
        }

        counts.errors = (self.diagnostics.error_count() - errors_before) as u32;
        counts.warnings = (self.diagnostics.warning_count() - warnings_before) as u32;
        counts
    }

    fn process_line(&mut self, line: &str) {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            return;
        }

        let mut tokens = tokenize(line);
        let mut label: Option<&str> = None;
        if let Some(first) = tokens.first().copied() {
            if let Some(pos) = first.find(':') {
                label = Some(&first[..pos]);
                let remainder = &first[pos + 1..];
                tokens.remove(0);
                if !remainder.is_empty() {
                    tokens.insert(0, remainder);
                }
            }
        }

        // `.entry`/`.extern` never define a line-head label, even when the
        // line is syntactically prefixed with one.
        match tokens.first().copied() {
            Some(".entry") => {
                self.entry_directive(&tokens[1..]);
                return;
            }
            Some(".extern") => {
                self.extern_directive(&tokens[1..]);
                return;
            }
            _ => {}
        }

        if let Some(name) = label {
            self.define_label(name, &tokens);
        }

        match tokens.first().copied() {
            Some(".data") => self.data_directive(&tokens[1..]),
            Some(".string") => self.string_directive(line),
            Some(token) if opcodes::is_mnemonic(token) => {
                self.instruction(line, token, &tokens[1..])
            }
            Some(token) => self.error(ErrorKind::UnexpectedToken, Some(token)),
            None => {}
        }
    }

    /// Define the line-head label at the current location. The lookahead on
    /// the rest of the line decides between the instruction counter and the
    /// data counter.
    fn define_label(&mut self, name: &str, rest: &[&str]) {
        if opcodes::is_reserved_word(name) {
            self.error(ErrorKind::ReservedWord, Some(name));
            return;
        }
        if !valid_label_name(name) {
            self.error(ErrorKind::InvalidLabelName, Some(name));
            return;
        }
        if self.macro_names.contains(name) {
            self.error(ErrorKind::LabelNameUsedAsMacro, Some(name));
            return;
        }

        let is_instruction = rest
            .first()
            .is_some_and(|token| opcodes::is_mnemonic(token));
        let address = if is_instruction { self.ic } else { self.dc };
        let file = self.current_file.clone();
        let line_number = self.current_line_number;

        let record = self.symbols.upsert(name, &file, line_number);
        if record.declared || record.external {
            self.error(ErrorKind::LabelAlreadyDeclared, Some(name));
            return;
        }
        if let Some(record) = self.symbols.find_mut(name) {
            record.declared = true;
            record.is_instruction = is_instruction;
            record.address = address;
            record.file_name = file;
            record.line_number = line_number;
        }
    }

    /// Record a label reference from a Direct operand, creating an
    /// undeclared record on first sight. Reference provenance is kept
    /// current so unresolved-label errors point at a real use site.
    pub(crate) fn reference_label(&mut self, name: &str) {
        let file = self.current_file.clone();
        let line_number = self.current_line_number;
        let record = self.symbols.upsert(name, &file, line_number);
        if !record.declared && !record.external && !record.entry {
            record.file_name = file;
            record.line_number = line_number;
        }
    }

    pub(crate) fn push_instruction_word(&mut self, data: u16, label: Option<String>) {
        self.instructions.push(WordNode {
            address: self.ic,
            data,
            label,
        });
        self.ic += 1;
    }

    pub(crate) fn push_data_word(&mut self, data: u16) {
        self.data.push(WordNode {
            address: self.dc,
            data,
            label: None,
        });
        self.dc += 1;
    }

    /// End of the group's first pass: rebase instruction addresses to 100
    /// and data addresses to 100 + IC_final, for nodes and declared labels
    /// alike. Undeclared labels keep address 0.
    pub(crate) fn finalize_layout(&mut self) {
        self.ic_final = self.ic;
        self.dc_final = self.dc;
        let data_base = BASE_ADDRESS + self.ic_final;

        for node in &mut self.instructions {
            node.address += BASE_ADDRESS;
        }
        for node in &mut self.data {
            node.address += data_base;
        }
        for record in self.symbols.iter_mut() {
            if record.declared {
                record.address += if record.is_instruction {
                    BASE_ADDRESS
                } else {
                    data_base
                };
            }
        }

        if BASE_ADDRESS + self.ic_final + self.dc_final > MEMORY_SIZE {
            let file = self.current_file.clone();
            self.diagnostics
                .add(ErrorKind::MemoryAllocationFailed, &file, 0, None);
        }
    }

    /// Second pass: backfill every placeholder word from the symbol table
    /// and run the group-wide label checks.
    pub(crate) fn second_pass(&mut self) -> PassCounts {
        let mut counts = PassCounts::new();
        let errors_before = self.diagnostics.error_count();

        for node in &mut self.instructions {
            let Some(name) = node.label.as_ref() else {
                continue;
            };
            if let Some(record) = self.symbols.find(name) {
                if record.external {
                    node.data = Are::External.bits();
                    self.externals.push((name.clone(), node.address));
                } else if record.declared {
                    node.data = address_word(record.address, Are::Relocatable);
                }
                // Undeclared references are reported in the sweep below.
            }
        }

        for record in self.symbols.iter() {
            if record.external && record.entry {
                self.diagnostics.add(
                    ErrorKind::LabelDeclaredAsExternal,
                    &record.file_name,
                    record.line_number,
                    Some(&record.name),
                );
            } else if !record.declared && !record.external && !record.entry {
                self.diagnostics.add(
                    ErrorKind::LabelNotDeclared,
                    &record.file_name,
                    record.line_number,
                    Some(&record.name),
                );
            } else if record.entry && !record.declared {
                self.diagnostics.add(
                    ErrorKind::LabelNotDeclared,
                    &record.file_name,
                    record.line_number,
                    Some(&record.name),
                );
            }
        }

        counts.errors = (self.diagnostics.error_count() - errors_before) as u32;
        counts
    }
}
