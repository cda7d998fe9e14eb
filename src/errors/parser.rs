// src/errors/parser.rs
//! Lexer (E0xxx) and parser (E1xxx) errors.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum LexerError {
    #[error("{message}")]
    #[diagnostic(code(E0001))]
    InvalidToken {
        message: String,
        #[label("invalid token")]
        span: SourceSpan,
    },
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("{message}: found {found}")]
    #[diagnostic(code(E1001))]
    UnexpectedToken {
        found: String,
        message: String,
        #[label("unexpected")]
        span: SourceSpan,
    },

    #[error("{message}: expected {expected}, found {found}")]
    #[diagnostic(code(E1002))]
    ExpectedToken {
        expected: String,
        found: String,
        message: String,
        #[label("expected {expected}")]
        span: SourceSpan,
    },

    #[error("invalid numeric literal '{literal}'")]
    #[diagnostic(code(E1003))]
    InvalidNumber {
        literal: String,
        #[label("does not fit")]
        span: SourceSpan,
    },
}
