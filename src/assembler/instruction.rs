// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use super::*;

impl Assembler {
    /// Encode one instruction line: header word, then the operand extra
    /// words. Validation failures are reported and the line emits nothing.
    pub(crate) fn instruction(&mut self, line: &str, mnemonic: &str, operands: &[&str]) {
        let Some(operation) = opcodes::find_operation(mnemonic) else {
            self.error(ErrorKind::InvalidInstruction, Some(mnemonic));
            return;
        };

        let (src, dst) = match operation.arity {
            Arity::Zero => {
                if !operands.is_empty() {
                    self.error(ErrorKind::InvalidDestOperand, Some(line.trim()));
                    return;
                }
                (None, None)
            }
            Arity::One => match operands {
                [] => {
                    self.error(ErrorKind::InvalidDestOperand, Some(line.trim()));
                    return;
                }
                [dst] => (None, Some(*dst)),
                _ => {
                    self.error(ErrorKind::InvalidSourceOperand, Some(line.trim()));
                    return;
                }
            },
            Arity::Two => match operands {
                [] => {
                    self.error(ErrorKind::InvalidSourceOperand, Some(line.trim()));
                    return;
                }
                [_] => {
                    self.error(ErrorKind::InvalidDestOperand, Some(line.trim()));
                    return;
                }
                [src, dst] => (Some(*src), Some(*dst)),
                _ => {
                    self.error(ErrorKind::InvalidInstruction, Some(line.trim()));
                    return;
                }
            },
        };

        // Both operands are validated before bailing so one bad line can
        // surface every operand problem it has.
        let mut valid = true;
        let src_mode = match src {
            Some(operand) => {
                let mode = self.validate_operand(operand);
                valid = valid && mode.is_some();
                mode
            }
            None => None,
        };
        let dst_mode = match dst {
            Some(operand) => {
                let mode = self.validate_operand(operand);
                valid = valid && mode.is_some();
                mode
            }
            None => None,
        };
        if !valid {
            return;
        }

        if !self.validate_modes(mnemonic, src_mode, dst_mode, line) {
            return;
        }

        let src_mask = src_mode.map_or(0, AddressingMode::mask);
        let dst_mask = dst_mode.map_or(0, AddressingMode::mask);
        self.push_instruction_word(header_word(operation.opcode, src_mask, dst_mask), None);

        match (src, src_mode, dst, dst_mode) {
            (Some(src), Some(s), Some(dst), Some(d)) if s.is_register() && d.is_register() => {
                // Two register-style operands share a single extra word.
                let word =
                    register_pair_word(register_number(src, s), register_number(dst, d));
                self.push_instruction_word(word, None);
            }
            _ => {
                if let (Some(operand), Some(mode)) = (src, src_mode) {
                    self.operand_word(operand, mode);
                }
                if let (Some(operand), Some(mode)) = (dst, dst_mode) {
                    self.operand_word(operand, mode);
                }
            }
        }
    }

    /// Lexical validation of one operand; returns its addressing mode.
    fn validate_operand(&mut self, operand: &str) -> Option<AddressingMode> {
        let mode = classify(operand);
        match mode {
            AddressingMode::Immediate => {
                if !valid_immediate(operand) {
                    self.error(ErrorKind::InvalidData, Some(operand));
                    return None;
                }
            }
            AddressingMode::Direct => {
                if opcodes::is_reserved_word(operand) {
                    self.error(ErrorKind::ReservedWord, Some(operand));
                    return None;
                }
                if !valid_label_name(operand) {
                    self.error(ErrorKind::InvalidLabelName, Some(operand));
                    return None;
                }
                if self.macro_names.contains(operand) {
                    self.error(ErrorKind::LabelNameUsedAsMacro, Some(operand));
                    return None;
                }
            }
            AddressingMode::IndirectRegister | AddressingMode::DirectRegister => {}
        }
        Some(mode)
    }

    /// Per-opcode operand rules. The whole source line is the diagnostic
    /// detail.
    fn validate_modes(
        &mut self,
        mnemonic: &str,
        src: Option<AddressingMode>,
        dst: Option<AddressingMode>,
        line: &str,
    ) -> bool {
        match mnemonic {
            "mov" | "add" | "sub" => {
                if dst == Some(AddressingMode::Immediate) {
                    self.error(ErrorKind::InvalidAddressMode, Some(line.trim()));
                    return false;
                }
            }
            "cmp" => {}
            "lea" => {
                if src != Some(AddressingMode::Direct) {
                    self.error(ErrorKind::InvalidAddressMode, Some(line.trim()));
                    return false;
                }
                if dst == Some(AddressingMode::Immediate) {
                    self.error(ErrorKind::InvalidAddressMode, Some(line.trim()));
                    return false;
                }
            }
            "jmp" | "bne" | "jsr" => {
                if !matches!(
                    dst,
                    Some(AddressingMode::Direct) | Some(AddressingMode::IndirectRegister)
                ) {
                    self.error(ErrorKind::InvalidAddressMode, Some(line.trim()));
                    return false;
                }
            }
            "clr" | "not" | "inc" | "dec" | "red" => {
                if dst == Some(AddressingMode::Immediate) {
                    self.error(ErrorKind::InvalidAddressMode, Some(line.trim()));
                    return false;
                }
            }
            _ => {}
        }
        true
    }

    /// Emit the extra word for a single operand. Direct operands become
    /// placeholder words carrying the label name for the second pass.
    fn operand_word(&mut self, operand: &str, mode: AddressingMode) {
        match mode {
            AddressingMode::Immediate => {
                let body = &operand[1..];
                match body.parse::<i32>() {
                    Ok(value) => self.push_instruction_word(immediate_word(value), None),
                    Err(_) => self.error(ErrorKind::InvalidData, Some(operand)),
                }
            }
            AddressingMode::Direct => {
                self.reference_label(operand);
                self.push_instruction_word(0, Some(operand.to_string()));
            }
            AddressingMode::IndirectRegister | AddressingMode::DirectRegister => {
                self.push_instruction_word(register_word(register_number(operand, mode)), None);
            }
        }
    }
}
