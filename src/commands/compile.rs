// src/commands/compile.rs

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::common::parse_and_analyze;
use crate::codegen;

/// Compile an ASL source file to serialized three-address code.
/// Code generation only runs when the program checked cleanly.
pub fn compile_file(path: &Path, output: Option<&Path>) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read '{}': {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let file_path = path.to_string_lossy();
    let Ok(mut analyzed) = parse_and_analyze(&source, &file_path) else {
        return ExitCode::FAILURE;
    };

    let tac = codegen::generate(&analyzed.program, &mut analyzed.sema, &analyzed.interner);
    match output {
        Some(out) => {
            if let Err(e) = fs::write(out, tac.to_string()) {
                eprintln!("error: could not write '{}': {}", out.display(), e);
                return ExitCode::FAILURE;
            }
        }
        None => print!("{tac}"),
    }
    ExitCode::SUCCESS
}
