// src/sema/analyzer/mod.rs

mod expr;
mod stmt;

use crate::errors::SemanticError;
use crate::frontend::ast::*;
use crate::frontend::{Interner, Span};
use crate::sema::node_data::NodeData;
use crate::sema::scope::SymbolTable;
use crate::sema::type_arena::{TypeArena, TypeId};
use crate::sema::TypeError;

/// The type-check pass. Walks the tree with the scopes already built,
/// decorates every expression with a type and an l-value flag, and
/// validates every statement. Never aborts: offending nodes get the
/// error type and checking continues.
pub struct Analyzer<'a> {
    types: &'a mut TypeArena,
    symbols: &'a mut SymbolTable,
    data: &'a mut NodeData,
    interner: &'a Interner,
    errors: Vec<TypeError>,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        types: &'a mut TypeArena,
        symbols: &'a mut SymbolTable,
        data: &'a mut NodeData,
        interner: &'a Interner,
    ) -> Self {
        Self {
            types,
            symbols,
            data,
            interner,
            errors: Vec::new(),
        }
    }

    pub fn into_errors(self) -> Vec<TypeError> {
        self.errors
    }

    pub fn check_program(&mut self, program: &Program) {
        tracing::debug!(functions = program.functions.len(), "type-check pass");
        self.symbols.push_scope(self.data.scope_of(program.id));
        for func in &program.functions {
            self.check_function(func);
        }
        if self.symbols.no_main_properly_declared(self.types) {
            self.add_error(
                SemanticError::NoMainProperlyDeclared {
                    span: program.span.into(),
                },
                program.span,
            );
        }
        self.symbols.pop_scope();
    }

    fn check_function(&mut self, func: &FuncDecl) {
        let ret = match &func.return_type {
            Some(ty_expr) => self.data.type_of(ty_expr.id),
            None => self.types.void(),
        };
        self.symbols.set_current_function_ret(ret);

        self.symbols.push_scope(self.data.scope_of(func.id));
        for stmt in &func.body {
            self.check_stmt(stmt);
        }
        self.symbols.pop_scope();
    }

    pub(super) fn add_error(&mut self, error: SemanticError, span: Span) {
        self.errors.push(TypeError::new(error, span));
    }

    pub(super) fn display(&self, ty: TypeId) -> String {
        self.types.display(ty)
    }

    pub(super) fn name(&self, sym: Symbol) -> String {
        self.interner.resolve(sym).to_string()
    }
}
