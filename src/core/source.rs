// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Source line reading with 1-based line numbers.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Maximum visible line length; longer lines are flagged by the preprocessor.
pub const MAX_LINE_LENGTH: usize = 80;

/// Read a file into logical lines, newline stripped, other whitespace kept.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    lines_from(file)
}

fn lines_from<R: Read>(reader: R) -> io::Result<Vec<String>> {
    let buf = BufReader::new(reader);
    let mut lines = Vec::new();
    for line in buf.lines() {
        let mut line = line?;
        if line.ends_with('\r') {
            line.pop();
        }
        lines.push(line);
    }
    Ok(lines)
}

/// Iterator over source lines paired with their 1-based line numbers.
pub struct SourceReader<'a> {
    lines: &'a [String],
    next: usize,
}

impl<'a> SourceReader<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines, next: 0 }
    }
}

impl<'a> Iterator for SourceReader<'a> {
    type Item = (u32, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.get(self.next)?;
        self.next += 1;
        Some((self.next as u32, line.as_str()))
    }
}
