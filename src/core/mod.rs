// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! CPU-agnostic building blocks: words, opcodes, operands, symbols,
//! diagnostics, and the macro preprocessor.

pub mod error;
pub mod opcodes;
pub mod operand;
pub mod preprocess;
pub mod source;
pub mod symbol_table;
pub mod word;
