use std::fs::File;
use std::io::{self, Write};

use super::engine::Assembler;

/// Emit the group's artifact trio next to the working directory: `.ob`
/// always, `.ent` and `.ext` only when they would be non-empty. Returns the
/// path that failed on an I/O error.
pub(super) fn emit_artifacts(base: &str, asm: &Assembler) -> Result<(), String> {
    let ob_path = format!("{base}.ob");
    create_and_write(&ob_path, |file| write_object(file, asm))?;

    if asm.symbols.iter().any(|record| record.entry) {
        let ent_path = format!("{base}.ent");
        create_and_write(&ent_path, |file| write_entries(file, asm))?;
    }

    if !asm.externals.is_empty() {
        let ext_path = format!("{base}.ext");
        create_and_write(&ext_path, |file| write_externals(file, asm))?;
    }

    Ok(())
}

fn create_and_write(
    path: &str,
    write: impl FnOnce(&mut File) -> io::Result<()>,
) -> Result<(), String> {
    let mut file = File::create(path).map_err(|_| path.to_string())?;
    write(&mut file).map_err(|_| path.to_string())
}

/// Object file: header line `   <IC> <DC>`, then one `%04d %05o` line per
/// word — all instruction words first, then all data words.
pub(super) fn write_object<W: Write>(writer: &mut W, asm: &Assembler) -> io::Result<()> {
    writeln!(writer, "   {} {}", asm.ic_final, asm.dc_final)?;
    for node in asm.instructions.iter().chain(asm.data.iter()) {
        writeln!(writer, "{:04} {:05o}", node.address, node.data)?;
    }
    Ok(())
}

/// Entries file: one `<name> %03d` line per entry label, declaration order.
pub(super) fn write_entries<W: Write>(writer: &mut W, asm: &Assembler) -> io::Result<()> {
    for record in asm.symbols.iter().filter(|record| record.entry) {
        writeln!(writer, "{} {:03}", record.name, record.address)?;
    }
    Ok(())
}

/// Externals file: one `<name> %04d` line per use site of an external
/// label, in the order the resolver walked the instruction stream.
pub(super) fn write_externals<W: Write>(writer: &mut W, asm: &Assembler) -> io::Result<()> {
    for (name, address) in &asm.externals {
        writeln!(writer, "{name} {address:04}")?;
    }
    Ok(())
}
