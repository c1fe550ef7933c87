// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error taxonomy, diagnostics sink, and run reporting.

use std::fmt;
use std::io::{self, Write};

use serde_json::json;

/// The closed set of error kinds the assembler can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    MacroNameMissing,
    MacroNameInvalid,
    MemoryAllocationFailed,
    UnexpectedToken,
    InvalidLabelName,
    LabelNameUsedAsMacro,
    ReservedWord,
    InvalidData,
    InvalidString,
    InvalidInstruction,
    InvalidSourceOperand,
    InvalidDestOperand,
    InvalidAddressMode,
    LabelAlreadyDeclared,
    LabelDeclaredAsExternal,
    EntryLabelExternal,
    LabelNotDeclared,
}

impl ErrorKind {
    /// Fixed message template for this kind; the detail is appended.
    fn template(self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "file not found or unreadable",
            ErrorKind::MacroNameMissing => "macro name missing after 'macr'",
            ErrorKind::MacroNameInvalid => "macro name is not valid",
            ErrorKind::MemoryAllocationFailed => "memory exhausted",
            ErrorKind::UnexpectedToken => "unexpected token",
            ErrorKind::InvalidLabelName => "invalid label name",
            ErrorKind::LabelNameUsedAsMacro => "label name already used as a macro",
            ErrorKind::ReservedWord => "label name is a reserved word",
            ErrorKind::InvalidData => "invalid data value",
            ErrorKind::InvalidString => "invalid string literal",
            ErrorKind::InvalidInstruction => "invalid instruction",
            ErrorKind::InvalidSourceOperand => "invalid source operand",
            ErrorKind::InvalidDestOperand => "invalid destination operand",
            ErrorKind::InvalidAddressMode => "addressing mode not allowed here",
            ErrorKind::LabelAlreadyDeclared => "label already declared",
            ErrorKind::LabelDeclaredAsExternal => "label declared as external",
            ErrorKind::EntryLabelExternal => "entry label is external",
            ErrorKind::LabelNotDeclared => "label not declared",
        }
    }

    fn code(self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "FILE_NOT_FOUND",
            ErrorKind::MacroNameMissing => "MACRO_NAME_MISSING",
            ErrorKind::MacroNameInvalid => "MACRO_NAME_INVALID",
            ErrorKind::MemoryAllocationFailed => "MEMORY_ALLOCATION_FAILED",
            ErrorKind::UnexpectedToken => "UNEXPECTED_TOKEN",
            ErrorKind::InvalidLabelName => "INVALID_LABEL_NAME",
            ErrorKind::LabelNameUsedAsMacro => "LABEL_NAME_USED_AS_MACRO",
            ErrorKind::ReservedWord => "RESERVED_WORD",
            ErrorKind::InvalidData => "INVALID_DATA",
            ErrorKind::InvalidString => "INVALID_STRING",
            ErrorKind::InvalidInstruction => "INVALID_INSTRUCTION",
            ErrorKind::InvalidSourceOperand => "INVALID_SOURCE_OPERAND",
            ErrorKind::InvalidDestOperand => "INVALID_DEST_OPERAND",
            ErrorKind::InvalidAddressMode => "INVALID_ADDRESS_MODE",
            ErrorKind::LabelAlreadyDeclared => "LABEL_ALREADY_DECLARED",
            ErrorKind::LabelDeclaredAsExternal => "LABEL_DECLARED_AS_EXTERNAL",
            ErrorKind::EntryLabelExternal => "ENTRY_LABEL_EXTERNAL",
            ErrorKind::LabelNotDeclared => "LABEL_NOT_DECLARED",
        }
    }
}

/// Format an error message with an optional detail.
pub fn format_message(kind: ErrorKind, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("{}: {}", kind.template(), detail),
        None => kind.template().to_string(),
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A recorded diagnostic with file and line provenance.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    kind: ErrorKind,
    severity: Severity,
    file: String,
    line: u32,
    message: String,
}

impl Diagnostic {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn format(&self) -> String {
        let label = match self.severity {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        };
        format!(
            "{} in file {} at line {}: {}",
            label, self.file, self.line, self.message
        )
    }

    pub fn to_json(&self) -> serde_json::Value {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        json!({
            "code": self.kind.code(),
            "severity": severity,
            "file": self.file,
            "line": self.line,
            "message": self.message,
        })
    }
}

/// Accumulating diagnostics sink shared across the whole pipeline.
///
/// Errors never unwind control out of a pass; they are recorded here and the
/// pipeline runs to completion. The sticky has-errors flag decides whether
/// artifacts are emitted.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    has_errors: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: ErrorKind, file: &str, line: u32, detail: Option<&str>) {
        self.items.push(Diagnostic {
            kind,
            severity: Severity::Error,
            file: file.to_string(),
            line,
            message: format_message(kind, detail),
        });
        self.has_errors = true;
    }

    pub fn add_warning(&mut self, kind: ErrorKind, file: &str, line: u32, detail: Option<&str>) {
        self.items.push(Diagnostic {
            kind,
            severity: Severity::Warning,
            file: file.to_string(),
            line,
            message: format_message(kind, detail),
        });
    }

    pub fn any_errors(&self) -> bool {
        self.has_errors
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Upgrade every warning to an error (the -Werror policy).
    pub fn promote_warnings(&mut self) {
        for item in &mut self.items {
            if item.severity == Severity::Warning {
                item.severity = Severity::Error;
                self.has_errors = true;
            }
        }
    }

    /// Write all diagnostics to the given writer, one per line.
    pub fn drain<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for item in &self.items {
            writeln!(writer, "{}", item.format())?;
        }
        Ok(())
    }

    /// Write all diagnostics as a single JSON document.
    pub fn drain_json<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let payload = json!({
            "diagnostics": self.items.iter().map(Diagnostic::to_json).collect::<Vec<_>>(),
            "errors": self.error_count(),
            "warnings": self.warning_count(),
        });
        writeln!(writer, "{payload}")
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.has_errors = false;
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        self.has_errors = false;
        std::mem::take(&mut self.items)
    }
}

/// Report from an assembly run that produced artifacts.
#[derive(Debug)]
pub struct RunReport {
    diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
            .count()
    }
}

/// Error from a failed assembly run.
#[derive(Debug)]
pub struct RunError {
    message: String,
    diagnostics: Vec<Diagnostic>,
}

impl RunError {
    pub fn new(message: &str, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            message: message.to_string(),
            diagnostics,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RunError {}

/// Pass statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassCounts {
    pub lines: u32,
    pub errors: u32,
    pub warnings: u32,
}

impl PassCounts {
    pub fn new() -> Self {
        Self::default()
    }
}
