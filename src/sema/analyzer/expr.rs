// src/sema/analyzer/expr.rs

use super::Analyzer;
use crate::errors::SemanticError;
use crate::frontend::ast::*;
use crate::frontend::Span;
use crate::sema::type_arena::TypeId;

impl Analyzer<'_> {
    /// Type an expression, decorating the node with its type and
    /// l-value flag. Always returns some type; mismatches yield the
    /// error type so parents stay quiet.
    pub(crate) fn check_expr(&mut self, expr: &Expr) -> TypeId {
        let (ty, is_lvalue) = match &expr.kind {
            ExprKind::Ident(ident) => {
                let ty = self.check_ident(ident);
                (ty, self.data.is_lvalue(ident.id))
            }
            ExprKind::Literal(lit) => {
                let ty = match lit {
                    Literal::Int(_) => self.types.integer(),
                    Literal::Float(_) => self.types.float(),
                    Literal::Bool(_) => self.types.boolean(),
                    Literal::Char(_) => self.types.character(),
                };
                (ty, false)
            }
            ExprKind::ArrayAccess { array, index } => {
                let ty = self.check_indexed(array, index);
                (ty, self.data.is_lvalue(array.id))
            }
            ExprKind::Paren(inner) => {
                let ty = self.check_expr(inner);
                (ty, self.data.is_lvalue(inner.id))
            }
            ExprKind::Unary { op, operand } => (self.check_unary(*op, operand, expr.span), false),
            ExprKind::Binary { op, lhs, rhs } => {
                (self.check_binary(*op, lhs, rhs, expr.span), false)
            }
            ExprKind::Call { callee, args } => (self.check_call_expr(callee, args), false),
        };
        self.data.set_type(expr.id, ty);
        self.data.set_lvalue(expr.id, is_lvalue);
        ty
    }

    /// Resolve an identifier against the scope stack.
    ///
    /// Undeclared names decorate as the error type with the l-value
    /// flag set, which silences the follow-on assignment/read checks.
    pub(crate) fn check_ident(&mut self, ident: &Ident) -> TypeId {
        let ty = match self.symbols.find_in_stack(ident.name) {
            None => {
                self.add_error(
                    SemanticError::UndeclaredIdent {
                        name: self.name(ident.name),
                        span: ident.span.into(),
                    },
                    ident.span,
                );
                self.data.set_lvalue(ident.id, true);
                self.types.error()
            }
            Some(_) => {
                let ty = self
                    .symbols
                    .get_type(ident.name)
                    .unwrap_or_else(|| self.types.error());
                self.data
                    .set_lvalue(ident.id, !self.symbols.is_function_class(ident.name));
                ty
            }
        };
        self.data.set_type(ident.id, ty);
        ty
    }

    /// `base[index]` for both l-value and r-value positions
    pub(crate) fn check_indexed(&mut self, array: &Ident, index: &Expr) -> TypeId {
        let mut ty = self.check_ident(array);
        let index_ty = self.check_expr(index);

        let mut ok = !self.types.is_error(ty);
        if !self.types.is_error(ty) && !self.types.is_array(ty) {
            self.add_error(
                SemanticError::NonArrayInArrayAccess {
                    found: self.display(ty),
                    span: array.span.into(),
                },
                array.span,
            );
            ty = self.types.error();
            ok = false;
        }
        if !self.types.is_error(index_ty) && !self.types.is_integer(index_ty) {
            self.add_error(
                SemanticError::NonIntegerIndexInArrayAccess {
                    found: self.display(index_ty),
                    span: index.span.into(),
                },
                index.span,
            );
            ty = self.types.error();
            ok = false;
        }
        if ok {
            ty = self.types.array_elem(ty).unwrap_or_else(|| self.types.error());
        }
        ty
    }

    /// Assignment/read target. Decorates the LeftExpr node itself.
    pub(crate) fn check_left_expr(&mut self, left: &LeftExpr) -> TypeId {
        let ty = match &left.index {
            Some(index) => self.check_indexed(&left.target, index),
            None => self.check_ident(&left.target),
        };
        self.data.set_type(left.id, ty);
        self.data
            .set_lvalue(left.id, self.data.is_lvalue(left.target.id));
        ty
    }

    fn check_unary(&mut self, op: UnaryOp, operand: &Expr, span: Span) -> TypeId {
        let operand_ty = self.check_expr(operand);
        match op {
            UnaryOp::Not => {
                if !self.types.is_error(operand_ty) && !self.types.is_boolean(operand_ty) {
                    self.incompatible_operator(op.as_str(), span);
                }
                self.types.boolean()
            }
            UnaryOp::Neg => {
                if !self.types.is_error(operand_ty) && !self.types.is_numeric(operand_ty) {
                    self.incompatible_operator(op.as_str(), span);
                }
                if self.types.is_float(operand_ty) {
                    self.types.float()
                } else {
                    self.types.integer()
                }
            }
        }
    }

    fn check_binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr, span: Span) -> TypeId {
        let lhs_ty = self.check_expr(lhs);
        let rhs_ty = self.check_expr(rhs);

        if op.is_logical() {
            let lhs_bad = !self.types.is_error(lhs_ty) && !self.types.is_boolean(lhs_ty);
            let rhs_bad = !self.types.is_error(rhs_ty) && !self.types.is_boolean(rhs_ty);
            if lhs_bad || rhs_bad {
                self.incompatible_operator(op.as_str(), span);
            }
            return self.types.boolean();
        }

        if op.is_relational() {
            if !self.types.is_error(lhs_ty)
                && !self.types.is_error(rhs_ty)
                && !self.types.comparable(lhs_ty, rhs_ty, op)
            {
                self.incompatible_operator(op.as_str(), span);
            }
            return self.types.boolean();
        }

        // Arithmetic. Modulo is integer-only, the rest take any numeric
        // mix and widen to float when either side is float.
        if op == BinaryOp::Mod {
            let lhs_bad = !self.types.is_error(lhs_ty) && !self.types.is_integer(lhs_ty);
            let rhs_bad = !self.types.is_error(rhs_ty) && !self.types.is_integer(rhs_ty);
            if lhs_bad || rhs_bad {
                self.incompatible_operator(op.as_str(), span);
            }
            return self.types.integer();
        }

        let lhs_bad = !self.types.is_error(lhs_ty) && !self.types.is_numeric(lhs_ty);
        let rhs_bad = !self.types.is_error(rhs_ty) && !self.types.is_numeric(rhs_ty);
        if lhs_bad || rhs_bad {
            self.incompatible_operator(op.as_str(), span);
        }
        if self.types.is_float(lhs_ty) || self.types.is_float(rhs_ty) {
            self.types.float()
        } else {
            self.types.integer()
        }
    }

    /// `f(args)` in expression position: the callee must be a function
    /// that returns a value.
    fn check_call_expr(&mut self, callee: &Ident, args: &[Expr]) -> TypeId {
        let callee_ty = self.check_ident(callee);
        let arg_types: Vec<_> = args.iter().map(|arg| self.check_expr(arg)).collect();

        if self.types.is_error(callee_ty) {
            return self.types.error();
        }
        if !self.types.is_function(callee_ty) {
            self.add_error(
                SemanticError::IsNotCallable {
                    name: self.name(callee.name),
                    span: callee.span.into(),
                },
                callee.span,
            );
            return self.types.error();
        }

        let mut result = self
            .types
            .func_return(callee_ty)
            .unwrap_or_else(|| self.types.error());
        if self.types.is_void_function(callee_ty) {
            self.add_error(
                SemanticError::IsNotFunction {
                    name: self.name(callee.name),
                    span: callee.span.into(),
                },
                callee.span,
            );
            result = self.types.error();
        }
        self.check_call_args(callee_ty, args, &arg_types, callee.span);
        result
    }

    /// Shared arity/parameter checking for both call forms
    pub(super) fn check_call_args(
        &mut self,
        callee_ty: TypeId,
        args: &[Expr],
        arg_types: &[TypeId],
        callee_span: Span,
    ) {
        let expected = self.types.num_params(callee_ty).unwrap_or(0);
        if expected != args.len() {
            self.add_error(
                SemanticError::NumberOfParameters {
                    expected,
                    found: args.len(),
                    span: callee_span.into(),
                },
                callee_span,
            );
            return;
        }
        for (i, (arg, &arg_ty)) in args.iter().zip(arg_types).enumerate() {
            let Some(param_ty) = self.types.param_at(callee_ty, i) else {
                continue;
            };
            if self.types.is_error(arg_ty) || param_ty == arg_ty {
                continue;
            }
            // The only admissible mismatch is the int-to-float widening
            if self.types.is_integer(arg_ty) && self.types.is_float(param_ty) {
                continue;
            }
            self.add_error(
                SemanticError::IncompatibleParameter {
                    index: i + 1,
                    expected: self.display(param_ty),
                    found: self.display(arg_ty),
                    span: arg.span.into(),
                },
                arg.span,
            );
        }
    }

    fn incompatible_operator(&mut self, op: &str, span: Span) {
        self.add_error(
            SemanticError::IncompatibleOperator {
                op: op.to_string(),
                span: span.into(),
            },
            span,
        );
    }
}
