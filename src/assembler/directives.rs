// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use super::*;

impl Assembler {
    /// `.data v1,v2,…` — validated values appended to the data stream.
    /// Each bad value gets its own diagnostic; the rest of the list is
    /// still placed.
    pub(crate) fn data_directive(&mut self, values: &[&str]) {
        for value in values {
            if !valid_data_value(value) {
                self.error(ErrorKind::InvalidData, Some(value));
                continue;
            }
            match value.parse::<i32>() {
                Ok(parsed) => self.push_data_word(int_to_word(parsed)),
                Err(_) => self.error(ErrorKind::InvalidData, Some(value)),
            }
        }
    }

    /// `.string "…"` — one word per printable ASCII byte, zero-terminated.
    pub(crate) fn string_directive(&mut self, line: &str) {
        let literal = match line.find(".string") {
            Some(pos) => line[pos + ".string".len()..].trim(),
            None => line.trim(),
        };
        if !valid_string_literal(literal) {
            self.error(ErrorKind::InvalidString, Some(literal));
            return;
        }
        for byte in literal[1..literal.len() - 1].bytes() {
            self.push_data_word(byte as u16);
        }
        self.push_data_word(0);
    }

    /// `.entry NAME` — marks NAME as an entry. The conflicting cases are
    /// reported here and the flag left unset, so a `.entry`/`.extern` pair
    /// produces exactly one diagnostic.
    pub(crate) fn entry_directive(&mut self, args: &[&str]) {
        let Some(name) = self.directive_label_operand(args) else {
            return;
        };
        let file = self.current_file.clone();
        let line_number = self.current_line_number;

        let record = self.symbols.upsert(&name, &file, line_number);
        let conflict = if record.external {
            Some(ErrorKind::EntryLabelExternal)
        } else if record.entry {
            Some(ErrorKind::LabelAlreadyDeclared)
        } else if record.declared && record.file_name != file {
            Some(ErrorKind::LabelAlreadyDeclared)
        } else {
            None
        };
        if let Some(kind) = conflict {
            self.error(kind, Some(&name));
            return;
        }
        if let Some(record) = self.symbols.find_mut(&name) {
            record.entry = true;
            if !record.declared {
                record.file_name = file;
                record.line_number = line_number;
            }
        }
    }

    /// `.extern NAME` — marks NAME as external. A name that is already
    /// declared, entry, or external is a conflict; the flag is left unset
    /// so `external` never coexists with `declared` or `entry`.
    pub(crate) fn extern_directive(&mut self, args: &[&str]) {
        let Some(name) = self.directive_label_operand(args) else {
            return;
        };
        let file = self.current_file.clone();
        let line_number = self.current_line_number;

        let record = self.symbols.upsert(&name, &file, line_number);
        let conflict = if record.entry {
            Some(ErrorKind::LabelDeclaredAsExternal)
        } else if record.declared || record.external {
            Some(ErrorKind::LabelAlreadyDeclared)
        } else {
            None
        };
        if let Some(kind) = conflict {
            self.error(kind, Some(&name));
            return;
        }
        if let Some(record) = self.symbols.find_mut(&name) {
            record.external = true;
            record.file_name = file;
            record.line_number = line_number;
        }
    }

    /// Validate the label operand of `.entry`/`.extern`.
    fn directive_label_operand(&mut self, args: &[&str]) -> Option<String> {
        let Some(name) = args.first().copied() else {
            self.error(ErrorKind::InvalidLabelName, None);
            return None;
        };
        if opcodes::is_reserved_word(name) {
            self.error(ErrorKind::ReservedWord, Some(name));
            return None;
        }
        if !valid_label_name(name) {
            self.error(ErrorKind::InvalidLabelName, Some(name));
            return None;
        }
        Some(name.to_string())
    }
}
