// src/errors/sema.rs
//! Semantic analysis errors (E2xxx).

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SemanticError {
    #[error("duplicate declaration of '{name}'")]
    #[diagnostic(code(E2001))]
    DuplicateIdent {
        name: String,
        #[label("already declared in this scope")]
        span: SourceSpan,
    },

    #[error("undeclared identifier '{name}'")]
    #[diagnostic(code(E2002))]
    UndeclaredIdent {
        name: String,
        #[label("not found in any scope")]
        span: SourceSpan,
    },

    #[error("incompatible types in assignment: cannot copy {found} into {expected}")]
    #[diagnostic(code(E2003))]
    IncompatibleAssignment {
        expected: String,
        found: String,
        #[label("type mismatch")]
        span: SourceSpan,
    },

    #[error("left-hand side of assignment cannot be assigned to")]
    #[diagnostic(code(E2004))]
    NonReferenceableLeftExpr {
        #[label("not a storage location")]
        span: SourceSpan,
    },

    #[error("expression cannot be read into")]
    #[diagnostic(code(E2005))]
    NonReferenceableExpression {
        #[label("not a storage location")]
        span: SourceSpan,
    },

    #[error("condition must be bool, found {found}")]
    #[diagnostic(code(E2006))]
    BooleanRequired {
        found: String,
        #[label("expected bool")]
        span: SourceSpan,
    },

    #[error("'{name}' is not callable")]
    #[diagnostic(code(E2007))]
    IsNotCallable {
        name: String,
        #[label("not a function")]
        span: SourceSpan,
    },

    #[error("'{name}' does not return a value")]
    #[diagnostic(code(E2008), help("only non-void functions can be used in expressions"))]
    IsNotFunction {
        name: String,
        #[label("void function in expression")]
        span: SourceSpan,
    },

    #[error("expected {expected} arguments, found {found}")]
    #[diagnostic(code(E2009))]
    NumberOfParameters {
        expected: usize,
        found: usize,
        #[label("wrong number of arguments")]
        span: SourceSpan,
    },

    #[error("incompatible type for parameter {index}: expected {expected}, found {found}")]
    #[diagnostic(code(E2010))]
    IncompatibleParameter {
        /// 1-based position of the offending argument
        index: usize,
        expected: String,
        found: String,
        #[label("argument {index} has the wrong type")]
        span: SourceSpan,
    },

    #[error("incompatible return")]
    #[diagnostic(code(E2011))]
    IncompatibleReturn {
        #[label("does not match the declared return type")]
        span: SourceSpan,
    },

    #[error("read/write requires a basic type, found {found}")]
    #[diagnostic(code(E2012))]
    ReadWriteRequireBasic {
        found: String,
        #[label("expected int, float, bool or char")]
        span: SourceSpan,
    },

    #[error("indexed expression is not an array")]
    #[diagnostic(code(E2013))]
    NonArrayInArrayAccess {
        found: String,
        #[label("has type {found}")]
        span: SourceSpan,
    },

    #[error("array index must be int, found {found}")]
    #[diagnostic(code(E2014))]
    NonIntegerIndexInArrayAccess {
        found: String,
        #[label("expected int")]
        span: SourceSpan,
    },

    #[error("incompatible operands for operator '{op}'")]
    #[diagnostic(code(E2015))]
    IncompatibleOperator {
        op: String,
        #[label("cannot be applied to these operands")]
        span: SourceSpan,
    },

    #[error("there is no 'main' function with no parameters and no return value")]
    #[diagnostic(code(E2016))]
    NoMainProperlyDeclared {
        #[label("program entry point missing or ill-formed")]
        span: SourceSpan,
    },
}
