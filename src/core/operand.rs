// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Operand classification and the lexical validators.

use crate::core::opcodes;

/// Addressing mode of a present operand. An absent operand is `None` at the
/// use sites; the mode masks are the bit values encoded in the header word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Immediate,
    Direct,
    IndirectRegister,
    DirectRegister,
}

impl AddressingMode {
    pub fn mask(self) -> u16 {
        match self {
            AddressingMode::Immediate => 1,
            AddressingMode::Direct => 2,
            AddressingMode::IndirectRegister => 4,
            AddressingMode::DirectRegister => 8,
        }
    }

    pub fn is_register(self) -> bool {
        matches!(
            self,
            AddressingMode::IndirectRegister | AddressingMode::DirectRegister
        )
    }
}

/// Classify an operand by its leading characters. Registers run r0..r7;
/// anything that is not an immediate or a register reads as a label
/// reference.
pub fn classify(operand: &str) -> AddressingMode {
    let bytes = operand.as_bytes();
    if bytes.first() == Some(&b'#') {
        AddressingMode::Immediate
    } else if opcodes::is_register(operand) {
        AddressingMode::DirectRegister
    } else if bytes.first() == Some(&b'*') && opcodes::is_register(&operand[1..]) {
        AddressingMode::IndirectRegister
    } else {
        AddressingMode::Direct
    }
}

/// Register number of a register-style operand (digit at offset 1, or 2 for
/// the `*rN` form).
pub fn register_number(operand: &str, mode: AddressingMode) -> u16 {
    let offset = match mode {
        AddressingMode::IndirectRegister => 2,
        _ => 1,
    };
    (operand.as_bytes()[offset] - b'0') as u16
}

/// Optional sign prefix, then decimal digits.
pub fn valid_data_value(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Immediate operand body after the `#` prefix.
pub fn valid_immediate(operand: &str) -> bool {
    match operand.strip_prefix('#') {
        Some(body) => valid_data_value(body),
        None => false,
    }
}

/// Double-quoted, printable-ASCII interior.
pub fn valid_string_literal(literal: &str) -> bool {
    let bytes = literal.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'"' || bytes[bytes.len() - 1] != b'"' {
        return false;
    }
    literal[1..literal.len() - 1]
        .bytes()
        .all(|b| (32..=126).contains(&b))
}

/// Starts with a letter, alphanumeric thereafter.
pub fn valid_label_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() => bytes.all(|b| b.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// Macro names follow label lexical rules and may not shadow the reserved
/// vocabulary.
pub fn valid_macro_name(name: &str) -> bool {
    valid_label_name(name) && !opcodes::is_reserved_word(name)
}
