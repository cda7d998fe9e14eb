// src/sema/symbols.rs
//
// Symbol registration pass: opens one scope per program and per function,
// registers parameters, locals and function signatures, and decorates
// every type-denoting node with its interned type.

use crate::errors::SemanticError;
use crate::frontend::ast::*;
use crate::frontend::Interner;
use crate::sema::node_data::NodeData;
use crate::sema::scope::SymbolTable;
use crate::sema::type_arena::{TypeArena, TypeId, TypeIdVec};
use crate::sema::TypeError;

pub struct SymbolCollector<'a> {
    types: &'a mut TypeArena,
    symbols: &'a mut SymbolTable,
    data: &'a mut NodeData,
    interner: &'a Interner,
    errors: &'a mut Vec<TypeError>,
}

impl<'a> SymbolCollector<'a> {
    pub fn new(
        types: &'a mut TypeArena,
        symbols: &'a mut SymbolTable,
        data: &'a mut NodeData,
        interner: &'a Interner,
        errors: &'a mut Vec<TypeError>,
    ) -> Self {
        Self {
            types,
            symbols,
            data,
            interner,
            errors,
        }
    }

    pub fn collect(&mut self, program: &Program) {
        tracing::debug!(functions = program.functions.len(), "symbol pass");
        let global = self.symbols.push_new_scope("$global$");
        self.data.set_scope(program.id, global);
        for func in &program.functions {
            self.function(func);
        }
        self.symbols.pop_scope();
    }

    fn function(&mut self, func: &FuncDecl) {
        let name = self.interner.resolve(func.name);
        let scope = self.symbols.push_new_scope(name);
        self.data.set_scope(func.id, scope);

        let mut param_types = TypeIdVec::new();
        for param in &func.params {
            let ty = self.type_expr(&param.ty);
            param_types.push(ty);
            if self.symbols.find_in_current_scope(param.name) {
                self.duplicate(param.name, param.span);
            } else {
                self.symbols.add_parameter(param.name, ty);
            }
        }

        for decl in &func.locals {
            let ty = self.type_expr(&decl.ty);
            for &(name, span) in &decl.names {
                if self.symbols.find_in_current_scope(name) {
                    self.duplicate(name, span);
                } else {
                    self.symbols.add_local_var(name, ty);
                }
            }
        }

        self.symbols.pop_scope();

        // The return type node is decorated even when the signature is
        // rejected below; the type checker reads it unconditionally.
        let ret = match &func.return_type {
            Some(ty_expr) => self.type_expr(ty_expr),
            None => self.types.void(),
        };

        // The signature goes into the enclosing scope, after the body's
        // names so the function cannot collide with its own locals.
        if self.symbols.find_in_current_scope(func.name) {
            self.duplicate(func.name, func.span);
        } else {
            let func_ty = self.types.function(param_types, ret);
            self.symbols.add_function(func.name, func_ty);
        }
    }

    fn type_expr(&mut self, ty_expr: &TypeExpr) -> TypeId {
        let ty = match &ty_expr.kind {
            TypeExprKind::Basic(basic) => self.basic(*basic),
            TypeExprKind::Array { size, elem } => {
                let elem_ty = self.basic(*elem);
                self.types.array(*size, elem_ty)
            }
        };
        self.data.set_type(ty_expr.id, ty);
        ty
    }

    fn basic(&self, basic: BasicType) -> TypeId {
        match basic {
            BasicType::Int => self.types.integer(),
            BasicType::Float => self.types.float(),
            BasicType::Bool => self.types.boolean(),
            BasicType::Char => self.types.character(),
        }
    }

    fn duplicate(&mut self, name: Symbol, span: crate::frontend::Span) {
        self.errors.push(TypeError::new(
            SemanticError::DuplicateIdent {
                name: self.interner.resolve(name).to_string(),
                span: span.into(),
            },
            span,
        ));
    }
}
