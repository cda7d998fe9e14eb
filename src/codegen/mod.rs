// src/codegen/mod.rs
//! TAC lowering of the decorated tree, one subroutine per function.

mod expr;
mod stmt;
pub mod tac;
#[cfg(test)]
mod tests;

pub use tac::{Instruction, Subroutine, TacProgram};

use crate::frontend::ast::*;
use crate::frontend::Interner;
use crate::sema::node_data::NodeData;
use crate::sema::scope::SymbolTable;
use crate::sema::type_arena::TypeArena;
use crate::sema::SemaOutput;

/// Per-function counters for temporaries and structured labels.
/// Reset at every function entry so a function's code is stable under
/// program reordering.
#[derive(Debug, Default)]
struct Counters {
    temp: u32,
    if_label: u32,
    while_label: u32,
}

impl Counters {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn new_temp(&mut self) -> String {
        self.temp += 1;
        format!("%t{}", self.temp)
    }

    fn new_if_label(&mut self) -> u32 {
        self.if_label += 1;
        self.if_label
    }

    fn new_while_label(&mut self) -> u32 {
        self.while_label += 1;
        self.while_label
    }
}

/// Result of lowering one expression: the place holding its value, an
/// optional index temporary selecting an array element, and the
/// instructions computing it.
#[derive(Debug)]
pub(crate) struct ExprCode {
    pub addr: String,
    pub offs: Option<String>,
    pub code: Vec<Instruction>,
}

impl ExprCode {
    fn plain(addr: String, code: Vec<Instruction>) -> Self {
        Self {
            addr,
            offs: None,
            code,
        }
    }
}

pub struct CodeGenerator<'a> {
    types: &'a TypeArena,
    symbols: &'a mut SymbolTable,
    data: &'a NodeData,
    interner: &'a Interner,
    counters: Counters,
}

/// Lower a checked program to TAC.
pub fn generate(program: &Program, sema: &mut SemaOutput, interner: &Interner) -> TacProgram {
    CodeGenerator::new(&sema.types, &mut sema.symbols, &sema.data, interner).generate(program)
}

impl<'a> CodeGenerator<'a> {
    pub fn new(
        types: &'a TypeArena,
        symbols: &'a mut SymbolTable,
        data: &'a NodeData,
        interner: &'a Interner,
    ) -> Self {
        Self {
            types,
            symbols,
            data,
            interner,
            counters: Counters::default(),
        }
    }

    pub fn generate(&mut self, program: &Program) -> TacProgram {
        tracing::debug!(functions = program.functions.len(), "codegen pass");
        let mut tac = TacProgram::new();
        self.symbols.push_scope(self.data.scope_of(program.id));
        for func in &program.functions {
            tac.add_subroutine(self.gen_function(func));
        }
        self.symbols.pop_scope();
        tac
    }

    fn gen_function(&mut self, func: &FuncDecl) -> Subroutine {
        self.symbols.push_scope(self.data.scope_of(func.id));
        self.counters.reset();

        let mut subr = Subroutine::new(self.interner.resolve(func.name));
        // Non-void functions reserve the return slot as first parameter
        if func.return_type.is_some() {
            subr.add_param(self.interner.resolve(Interner::RESULT));
        }
        for param in &func.params {
            subr.add_param(self.interner.resolve(param.name));
        }
        for decl in &func.locals {
            let cells = self.types.size_in_cells(self.data.type_of(decl.ty.id));
            for &(name, _) in &decl.names {
                subr.add_local(self.interner.resolve(name), cells);
            }
        }

        let mut code = Vec::new();
        for stmt in &func.body {
            code.extend(self.gen_stmt(stmt));
        }
        // Guarantee a terminal instruction on every path
        code.push(Instruction::Return);
        subr.code = code;

        self.symbols.pop_scope();
        subr
    }

    fn is_parameter(&self, name: Symbol) -> bool {
        self.symbols.is_parameter_class(name)
    }

    fn name_of(&self, sym: Symbol) -> String {
        self.interner.resolve(sym).to_string()
    }
}
