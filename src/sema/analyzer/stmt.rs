// src/sema/analyzer/stmt.rs

use super::Analyzer;
use crate::errors::SemanticError;
use crate::frontend::ast::*;

impl Analyzer<'_> {
    pub(crate) fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(assign) => self.check_assign(assign),
            Stmt::If(if_stmt) => self.check_if(if_stmt),
            Stmt::While(while_stmt) => self.check_while(while_stmt),
            Stmt::Call(call) => self.check_proc_call(call),
            Stmt::Read(read) => self.check_read(read),
            Stmt::Write(write) => self.check_write(write),
            Stmt::WriteStr(_) => {} // string writes are always well-typed
            Stmt::Return(ret) => self.check_return(ret),
        }
    }

    fn check_assign(&mut self, assign: &AssignStmt) {
        let target_ty = self.check_left_expr(&assign.target);
        let value_ty = self.check_expr(&assign.value);

        if !self.types.is_error(target_ty)
            && !self.types.is_error(value_ty)
            && !self.types.copyable(target_ty, value_ty)
        {
            self.add_error(
                SemanticError::IncompatibleAssignment {
                    expected: self.display(target_ty),
                    found: self.display(value_ty),
                    span: assign.span.into(),
                },
                assign.span,
            );
        }
        if !self.types.is_error(target_ty) && !self.data.is_lvalue(assign.target.id) {
            self.add_error(
                SemanticError::NonReferenceableLeftExpr {
                    span: assign.target.span.into(),
                },
                assign.target.span,
            );
        }
    }

    fn check_if(&mut self, if_stmt: &IfStmt) {
        self.check_condition(&if_stmt.condition);
        for stmt in &if_stmt.then_branch {
            self.check_stmt(stmt);
        }
        if let Some(else_branch) = &if_stmt.else_branch {
            for stmt in else_branch {
                self.check_stmt(stmt);
            }
        }
    }

    fn check_while(&mut self, while_stmt: &WhileStmt) {
        self.check_condition(&while_stmt.condition);
        for stmt in &while_stmt.body {
            self.check_stmt(stmt);
        }
    }

    fn check_condition(&mut self, condition: &Expr) {
        let ty = self.check_expr(condition);
        if !self.types.is_error(ty) && !self.types.is_boolean(ty) {
            self.add_error(
                SemanticError::BooleanRequired {
                    found: self.display(ty),
                    span: condition.span.into(),
                },
                condition.span,
            );
        }
    }

    /// `f(args);` - like a call expression, but a void callee is fine
    fn check_proc_call(&mut self, call: &CallStmt) {
        let callee_ty = self.check_ident(&call.callee);
        // Arguments are visited unconditionally so every node keeps a
        // type decoration even for broken calls.
        let arg_types: Vec<_> = call.args.iter().map(|arg| self.check_expr(arg)).collect();

        if self.types.is_error(callee_ty) {
            return;
        }
        if !self.types.is_function(callee_ty) {
            self.add_error(
                SemanticError::IsNotCallable {
                    name: self.name(call.callee.name),
                    span: call.callee.span.into(),
                },
                call.callee.span,
            );
            return;
        }
        self.check_call_args(callee_ty, &call.args, &arg_types, call.callee.span);
    }

    fn check_read(&mut self, read: &ReadStmt) {
        let ty = self.check_left_expr(&read.target);
        if !self.types.is_error(ty) && !self.types.is_primitive(ty) {
            self.add_error(
                SemanticError::ReadWriteRequireBasic {
                    found: self.display(ty),
                    span: read.target.span.into(),
                },
                read.target.span,
            );
        }
        if !self.types.is_error(ty) && !self.data.is_lvalue(read.target.id) {
            self.add_error(
                SemanticError::NonReferenceableExpression {
                    span: read.target.span.into(),
                },
                read.target.span,
            );
        }
    }

    fn check_write(&mut self, write: &WriteStmt) {
        let ty = self.check_expr(&write.value);
        if !self.types.is_error(ty) && !self.types.is_primitive(ty) {
            self.add_error(
                SemanticError::ReadWriteRequireBasic {
                    found: self.display(ty),
                    span: write.value.span.into(),
                },
                write.value.span,
            );
        }
    }

    fn check_return(&mut self, ret: &ReturnStmt) {
        let declared = self
            .symbols
            .current_function_ret()
            .unwrap_or_else(|| self.types.void());

        match &ret.value {
            Some(value) => {
                let ty = self.check_expr(value);
                let bad = if self.types.is_void(declared) {
                    // A void function must not return a value
                    !self.types.is_error(ty)
                } else {
                    !self.types.copyable(declared, ty)
                };
                if bad {
                    self.add_error(
                        SemanticError::IncompatibleReturn {
                            span: ret.span.into(),
                        },
                        ret.span,
                    );
                }
            }
            None => {
                if !self.types.is_void(declared) {
                    self.add_error(
                        SemanticError::IncompatibleReturn {
                            span: ret.span.into(),
                        },
                        ret.span,
                    );
                }
            }
        }
    }
}
