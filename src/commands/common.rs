// src/commands/common.rs
//! Shared utilities for CLI commands.

use crate::errors::render_diagnostics;
use crate::frontend::{ast::Program, Interner, Parser};
use crate::sema::{self, SemaOutput};

/// Result of parsing and analyzing a source file.
pub struct AnalyzedProgram {
    pub program: Program,
    pub interner: Interner,
    pub sema: SemaOutput,
}

/// Parse and analyze a source file, rendering any diagnostics on error.
///
/// Returns `Ok(AnalyzedProgram)` on success, or `Err(())` if there were
/// errors (diagnostics are rendered to stderr before returning).
pub fn parse_and_analyze(source: &str, file_path: &str) -> Result<AnalyzedProgram, ()> {
    let mut parser = Parser::new(source);
    let program = match parser.parse_program() {
        Ok(program) => program,
        Err(e) => {
            // Lexer errors usually explain the parse failure; don't
            // render both for the same spot
            let lexer_errors = parser.take_lexer_errors();
            if lexer_errors.is_empty() {
                render_diagnostics(file_path, source, &[e.error]);
            } else {
                render_diagnostics(file_path, source, &lexer_errors);
            }
            return Err(());
        }
    };

    let lexer_errors = parser.take_lexer_errors();
    if !lexer_errors.is_empty() {
        render_diagnostics(file_path, source, &lexer_errors);
        return Err(());
    }

    let interner = parser.into_interner();

    match sema::analyze(&program, &interner) {
        Ok(sema) => Ok(AnalyzedProgram {
            program,
            interner,
            sema,
        }),
        Err(errors) => {
            let diagnostics: Vec<_> = errors.into_iter().map(|e| e.error).collect();
            render_diagnostics(file_path, source, &diagnostics);
            Err(())
        }
    }
}
