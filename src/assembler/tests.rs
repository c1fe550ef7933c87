use super::engine::Assembler;
use super::output::{write_entries, write_externals, write_object};
use super::run_with_cli;
use crate::assembler::cli::{Cli, OutputFormat};
use crate::core::error::ErrorKind;
use crate::core::preprocess::preprocess;

fn lines(source: &[&str]) -> Vec<String> {
    source.iter().map(|s| s.to_string()).collect()
}

/// Drive the whole pipeline over in-memory sources, one (name, lines) pair
/// per file of the group.
fn assemble_group(files: &[(&str, &[&str])]) -> Assembler {
    let mut asm = Assembler::new();
    for (name, source) in files {
        let source = lines(source);
        let preprocessed = preprocess(name, &source, &mut asm.diagnostics);
        asm.macro_names
            .extend(preprocessed.macro_names.iter().cloned());
        asm.first_pass(name, &preprocessed.expanded);
    }
    asm.finalize_layout();
    asm.second_pass();
    asm
}

fn assemble(source: &[&str]) -> Assembler {
    assemble_group(&[("test.as", source)])
}

fn object_text(asm: &Assembler) -> String {
    let mut out = Vec::new();
    write_object(&mut out, asm).expect("write object");
    String::from_utf8(out).expect("utf8")
}

fn error_kinds(asm: &Assembler) -> Vec<ErrorKind> {
    asm.diagnostics.items().iter().map(|d| d.kind()).collect()
}

#[test]
fn s1_immediate_and_register_program() {
    let asm = assemble(&["MAIN: mov #5, r3", " stop"]);
    assert!(!asm.diagnostics.any_errors());
    assert_eq!(asm.ic_final, 4);
    assert_eq!(asm.dc_final, 0);

    let words: Vec<(u16, u16)> = asm
        .instructions
        .iter()
        .map(|node| (node.address, node.data))
        .collect();
    assert_eq!(
        words,
        vec![
            (100, (1 << 7) | (8 << 3) | 0b100),
            (101, (5 << 3) | 0b100),
            (102, (3 << 6) | 0b100),
            (103, (15 << 11) | 0b100),
        ]
    );

    let main = asm.symbols.find("MAIN").expect("MAIN");
    assert!(main.declared && main.is_instruction);
    assert_eq!(main.address, 100);

    assert_eq!(
        object_text(&asm),
        "   4 0\n0100 00304\n0101 00054\n0102 00304\n0103 74004\n"
    );
}

#[test]
fn s2_negative_data_is_twos_complement() {
    let asm = assemble(&[".data -1"]);
    assert!(!asm.diagnostics.any_errors());
    assert_eq!(asm.dc_final, 1);
    assert_eq!(object_text(&asm), "   0 1\n0100 77777\n");
}

#[test]
fn s3_string_emits_bytes_and_terminator() {
    let asm = assemble(&[".string \"AB\""]);
    assert!(!asm.diagnostics.any_errors());
    let words: Vec<(u16, u16)> = asm.data.iter().map(|n| (n.address, n.data)).collect();
    assert_eq!(words, vec![(100, 65), (101, 66), (102, 0)]);
}

#[test]
fn s4_external_reference_produces_a_use_site() {
    let asm = assemble(&[".extern X", " jmp X"]);
    assert!(!asm.diagnostics.any_errors(), "{:?}", asm.diagnostics.items());
    assert_eq!(asm.instructions[0].data, (9 << 11) | (2 << 3) | 0b100);
    // The placeholder is patched to ARE=001 with a zero address field.
    assert_eq!(asm.instructions[1].data, 0b001);
    assert_eq!(asm.externals, vec![("X".to_string(), 101)]);
    assert!(!asm.symbols.iter().any(|record| record.entry));

    let mut out = Vec::new();
    write_externals(&mut out, &asm).expect("write externals");
    assert_eq!(String::from_utf8(out).expect("utf8"), "X 0101\n");
}

#[test]
fn s5_undeclared_reference_is_a_single_error() {
    let asm = assemble(&[" jmp Y"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::LabelNotDeclared]);
    assert!(asm.diagnostics.any_errors());
}

#[test]
fn s6_macro_calls_expand_at_their_sites() {
    let asm = assemble(&[
        "macr INC1",
        " inc r1",
        "endmacr",
        " INC1",
        " INC1",
    ]);
    assert!(!asm.diagnostics.any_errors());
    let header = (7 << 11) | (8 << 3) | 0b100;
    let register = (1 << 6) | 0b100;
    let words: Vec<u16> = asm.instructions.iter().map(|n| n.data).collect();
    assert_eq!(words, vec![header, register, header, register]);
}

#[test]
fn forward_references_resolve_as_relocatable() {
    let asm = assemble(&["MAIN: jmp LOOP", "LOOP: stop"]);
    assert!(!asm.diagnostics.any_errors());
    let resolved = asm.instructions[1].data;
    let target = asm.symbols.find("LOOP").expect("LOOP");
    assert_eq!(target.address, 102);
    assert_eq!(resolved >> 3, target.address);
    assert_eq!(resolved & 0b111, 0b010);
}

#[test]
fn entry_labels_resolve_relocatable_and_emit_ent_lines() {
    let asm = assemble(&[".entry MAIN", "MAIN: stop", " jmp MAIN"]);
    assert!(!asm.diagnostics.any_errors());
    assert_eq!(asm.instructions[2].data, (100 << 3) | 0b010);

    let mut out = Vec::new();
    write_entries(&mut out, &asm).expect("write entries");
    assert_eq!(String::from_utf8(out).expect("utf8"), "MAIN 100\n");
}

#[test]
fn data_addresses_follow_the_instruction_space() {
    let asm = assemble(&["start: mov r1, r2", ".data 7, 8", " stop"]);
    assert!(!asm.diagnostics.any_errors());
    // IC counts header + shared register word + stop.
    assert_eq!(asm.ic_final, 3);
    for (i, node) in asm.data.iter().enumerate() {
        assert_eq!(node.address, 100 + asm.ic_final + i as u16);
    }
}

#[test]
fn register_pair_shares_one_extra_word() {
    let asm = assemble(&[" mov r1, *r2"]);
    assert!(!asm.diagnostics.any_errors());
    assert_eq!(asm.ic_final, 2);
    assert_eq!(asm.instructions[1].data, (1 << 3) | (2 << 6) | 0b100);
}

#[test]
fn mixed_register_operand_takes_its_own_word() {
    // Only one register-style operand: no shared word.
    let asm = assemble(&[" mov r1, LOOP", "LOOP: stop"]);
    assert!(!asm.diagnostics.any_errors());
    assert_eq!(asm.ic_final, 4);
    assert_eq!(asm.instructions[1].data, (1 << 6) | 0b100);
    assert_eq!(asm.instructions[2].label.as_deref(), Some("LOOP"));
}

#[test]
fn entry_extern_conflict_is_exactly_one_error() {
    let asm = assemble(&[".extern L", ".entry L"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::EntryLabelExternal]);

    let asm = assemble(&["L: stop", ".entry L", ".extern L"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::LabelDeclaredAsExternal]);
}

#[test]
fn extern_of_a_declared_label_is_a_conflict() {
    let asm = assemble(&["L: stop", ".extern L"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::LabelAlreadyDeclared]);
    let record = asm.symbols.find("L").expect("L");
    assert!(record.declared && !record.external);
}

#[test]
fn double_declaration_is_reported() {
    let asm = assemble(&["L: stop", "L: stop"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::LabelAlreadyDeclared]);
}

#[test]
fn entry_and_extern_lines_do_not_define_their_label_prefix() {
    let asm = assemble(&["FOO: .entry MAIN", "MAIN: stop"]);
    assert!(!asm.diagnostics.any_errors());
    assert!(asm.symbols.find("FOO").is_none());
}

#[test]
fn unexpected_line_head_is_reported() {
    let asm = assemble(&["widget r1"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::UnexpectedToken]);
}

#[test]
fn reserved_and_invalid_label_names_are_rejected() {
    let asm = assemble(&["mov: stop"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::ReservedWord]);

    let asm = assemble(&["9lives: stop"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::InvalidLabelName]);
}

#[test]
fn label_colliding_with_a_macro_is_rejected() {
    let asm = assemble(&[
        "macr M",
        " inc r1",
        "endmacr",
        "M2: stop",
        "M: stop",
    ]);
    // `M:`-the-label collides with `M`-the-macro; `M2` is fine.
    assert_eq!(error_kinds(&asm), vec![ErrorKind::LabelNameUsedAsMacro]);
    assert!(asm.symbols.find("M2").is_some());
}

#[test]
fn addressing_mode_rules_are_enforced_per_opcode() {
    let asm = assemble(&[" mov r1, #2"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::InvalidAddressMode]);

    let asm = assemble(&[" lea r1, r2"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::InvalidAddressMode]);

    let asm = assemble(&[" jmp #5"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::InvalidAddressMode]);

    let asm = assemble(&[" jmp r1"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::InvalidAddressMode]);

    let asm = assemble(&[" jmp *r1"]);
    assert!(!asm.diagnostics.any_errors());

    let asm = assemble(&[" cmp r1, #3"]);
    assert!(!asm.diagnostics.any_errors());

    let asm = assemble(&[" prn #3"]);
    assert!(!asm.diagnostics.any_errors());
}

#[test]
fn operand_count_violations_are_single_diagnostics() {
    let asm = assemble(&[" rts r1"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::InvalidDestOperand]);

    let asm = assemble(&[" inc"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::InvalidDestOperand]);

    let asm = assemble(&[" inc r1, r2"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::InvalidSourceOperand]);

    let asm = assemble(&[" mov r1"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::InvalidDestOperand]);
}

#[test]
fn bad_data_values_do_not_stop_the_list() {
    let asm = assemble(&[".data 1, 2a, 3"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::InvalidData]);
    let values: Vec<u16> = asm.data.iter().map(|n| n.data).collect();
    assert_eq!(values, vec![1, 3]);
}

#[test]
fn unquoted_string_is_invalid() {
    let asm = assemble(&[".string AB"]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::InvalidString]);
    assert!(asm.data.is_empty());
}

#[test]
fn group_counters_continue_across_files() {
    let asm = assemble_group(&[
        ("one.as", &["A: mov r1, r2"][..]),
        ("two.as", &[" jmp A"][..]),
    ]);
    assert!(!asm.diagnostics.any_errors());
    // File two starts where file one left off.
    assert_eq!(asm.instructions[2].address, 102);
    let a = asm.symbols.find("A").expect("A");
    assert_eq!(a.address, 100);
    assert_eq!(asm.instructions[3].data, (100 << 3) | 0b010);
}

#[test]
fn entry_for_a_label_declared_in_another_file_is_a_conflict() {
    let asm = assemble_group(&[
        ("one.as", &["L: stop"][..]),
        ("two.as", &[".entry L"][..]),
    ]);
    assert_eq!(error_kinds(&asm), vec![ErrorKind::LabelAlreadyDeclared]);
}

#[test]
fn image_overflow_is_reported_once() {
    let huge = format!(".data {}", vec!["0"; 4000].join(","));
    let source = [huge.as_str()];
    let asm = assemble(&source);
    assert!(asm
        .diagnostics
        .items()
        .iter()
        .any(|d| d.kind() == ErrorKind::MemoryAllocationFailed));
    assert_eq!(
        error_kinds(&asm)
            .iter()
            .filter(|&&k| k == ErrorKind::MemoryAllocationFailed)
            .count(),
        1
    );
}

#[test]
fn reset_leaves_no_residue() {
    let mut asm = assemble(&["MAIN: mov #5, r3", ".data 1", " widget"]);
    assert!(asm.diagnostics.any_errors());
    asm.reset();
    assert_eq!(asm.ic, 0);
    assert_eq!(asm.dc, 0);
    assert!(asm.symbols.is_empty());
    assert!(asm.instructions.is_empty());
    assert!(asm.data.is_empty());
    assert!(asm.externals.is_empty());
    assert!(asm.macro_names.is_empty());
    assert!(asm.diagnostics.is_empty());
}

#[test]
fn missing_input_file_fails_the_run() {
    let cli = Cli {
        inputs: vec!["no_such_input_xyzzy".to_string()],
        format: OutputFormat::Text,
        quiet: false,
        werror: false,
    };
    let err = run_with_cli(&cli).expect_err("missing input should fail");
    assert!(err
        .diagnostics()
        .iter()
        .any(|d| d.kind() == ErrorKind::FileNotFound));
}

#[test]
fn comment_lines_are_skipped() {
    let asm = assemble(&["; whole line comment", "  ; indented comment", " stop"]);
    assert!(!asm.diagnostics.any_errors());
    assert_eq!(asm.ic_final, 1);
}
