//! Assembler run/pass orchestration.
//!
//! This module owns CLI-driven run flow: preprocessing each input file,
//! first-pass encoding into the shared group state, layout finalization,
//! second-pass resolution, and conditional artifact emission.

use super::*;

/// Run the assembler with command-line arguments.
pub(super) fn run() -> Result<RunReport, RunError> {
    let cli = Cli::parse();
    run_with_cli(&cli)
}

pub(super) fn run_with_cli(cli: &Cli) -> Result<RunReport, RunError> {
    let config = validate_cli(cli)?;
    let mut asm = Assembler::new();

    // Read every input up front so all missing files are reported in one
    // run.
    let mut sources: Vec<(String, Vec<String>)> = Vec::new();
    for path in &config.input_paths {
        match read_lines(Path::new(path)) {
            Ok(lines) => sources.push((path.clone(), lines)),
            Err(_) => asm.diagnostics.add(ErrorKind::FileNotFound, path, 0, None),
        }
    }

    let mut pass_errors: u32 = 0;
    for (path, lines) in &sources {
        let preprocessed = preprocess(path, lines, &mut asm.diagnostics);
        write_preprocessed(path, &preprocessed.expanded, &mut asm.diagnostics);
        asm.macro_names
            .extend(preprocessed.macro_names.iter().cloned());
        pass_errors += asm.first_pass(path, &preprocessed.expanded).errors;
    }

    asm.finalize_layout();
    pass_errors += asm.second_pass().errors;

    if config.werror {
        asm.diagnostics.promote_warnings();
    }

    if pass_errors > 0 || asm.diagnostics.any_errors() {
        return Err(RunError::new(
            "Errors detected in source. No output files created.",
            asm.diagnostics.take(),
        ));
    }

    let base = output_base_name(&config.input_paths);
    if let Err(path) = emit_artifacts(&base, &asm) {
        asm.diagnostics.add(ErrorKind::FileNotFound, &path, 0, None);
        return Err(RunError::new(
            "Error opening file for write",
            asm.diagnostics.take(),
        ));
    }

    Ok(RunReport::new(asm.diagnostics.take()))
}

/// Write the expanded source next to the input as `<stem>.am`. A failure is
/// recorded but does not abort the run.
fn write_preprocessed(input: &str, lines: &[String], diagnostics: &mut Diagnostics) {
    let path = preprocessed_path(input);
    let mut text = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    if fs::write(&path, text).is_err() {
        diagnostics.add(ErrorKind::FileNotFound, &path, 0, None);
    }
}
