// src/sema/mod.rs
//! Semantic analysis: symbol registration then type checking.

pub mod analyzer;
pub mod node_data;
pub mod scope;
pub mod symbols;
pub mod type_arena;

pub use analyzer::Analyzer;
pub use node_data::NodeData;
pub use scope::{ScopeId, SymbolInfo, SymbolKind, SymbolTable};
pub use symbols::SymbolCollector;
pub use type_arena::{TypeArena, TypeId};

use crate::errors::SemanticError;
use crate::frontend::{ast::Program, Interner, Span};

/// A semantic error with the span it points at
#[derive(Debug, Clone)]
pub struct TypeError {
    pub error: SemanticError,
    pub span: Span,
}

impl TypeError {
    pub fn new(error: SemanticError, span: Span) -> Self {
        Self { error, span }
    }
}

/// Everything the semantic passes produce for code generation.
#[derive(Debug)]
pub struct SemaOutput {
    pub types: TypeArena,
    pub symbols: SymbolTable,
    pub data: NodeData,
}

/// Run both semantic passes over `program`.
///
/// Diagnostics from the two passes are merged and stably sorted by
/// source position so they render in source order.
pub fn analyze(program: &Program, interner: &Interner) -> Result<SemaOutput, Vec<TypeError>> {
    let mut types = TypeArena::new();
    let mut symbols = SymbolTable::new();
    let mut data = NodeData::new();
    let mut errors = Vec::new();

    SymbolCollector::new(&mut types, &mut symbols, &mut data, interner, &mut errors)
        .collect(program);

    let mut analyzer = Analyzer::new(&mut types, &mut symbols, &mut data, interner);
    analyzer.check_program(program);
    errors.extend(analyzer.into_errors());

    if errors.is_empty() {
        Ok(SemaOutput {
            types,
            symbols,
            data,
        })
    } else {
        errors.sort_by_key(|e| (e.span.start, e.span.end));
        Err(errors)
    }
}
