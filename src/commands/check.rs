// src/commands/check.rs

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::common::parse_and_analyze;

/// Check ASL source files (parse + type check, no code generation)
pub fn check_files(files: &[impl AsRef<Path>]) -> ExitCode {
    let mut failed = false;
    for file in files {
        if check_file(file.as_ref()) == ExitCode::FAILURE {
            failed = true;
        }
    }
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn check_file(path: &Path) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read '{}': {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let file_path = path.to_string_lossy();
    match parse_and_analyze(&source, &file_path) {
        Ok(_) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE, // diagnostics already rendered
    }
}
