// src/codegen/expr.rs
//
// Expression lowering. Every visitor returns an ExprCode triple; the
// address is a name, a temporary, or a literal-loaded temporary.

use super::{CodeGenerator, ExprCode};
use crate::codegen::tac::Instruction;
use crate::frontend::ast::*;
use crate::sema::type_arena::TypeId;

impl CodeGenerator<'_> {
    pub(crate) fn gen_expr(&mut self, expr: &Expr) -> ExprCode {
        match &expr.kind {
            ExprKind::Ident(ident) => ExprCode::plain(self.name_of(ident.name), Vec::new()),
            ExprKind::Literal(lit) => self.gen_literal(lit),
            ExprKind::Paren(inner) => {
                let inner_code = self.gen_expr(inner);
                ExprCode::plain(inner_code.addr, inner_code.code)
            }
            ExprKind::ArrayAccess { array, index } => self.gen_array_access(array, index),
            ExprKind::Unary { op, operand } => self.gen_unary(*op, operand),
            ExprKind::Binary { op, lhs, rhs } => self.gen_binary(*op, lhs, rhs),
            ExprKind::Call { callee, args } => self.gen_call(callee, args, true),
        }
    }

    fn gen_literal(&mut self, lit: &Literal) -> ExprCode {
        let temp = self.counters.new_temp();
        let instr = match lit {
            Literal::Int(value) => Instruction::ILoad {
                dst: temp.clone(),
                value: value.to_string(),
            },
            Literal::Float(text) => Instruction::FLoad {
                dst: temp.clone(),
                value: text.clone(),
            },
            Literal::Bool(value) => Instruction::ILoad {
                dst: temp.clone(),
                value: if *value { "1".into() } else { "0".into() },
            },
            Literal::Char(body) => Instruction::ChLoad {
                dst: temp.clone(),
                value: body.clone(),
            },
        };
        ExprCode::plain(temp, vec![instr])
    }

    fn gen_array_access(&mut self, array: &Ident, index: &Expr) -> ExprCode {
        let base = self.name_of(array.name);
        let index_code = self.gen_expr(index);
        let mut code = index_code.code;

        let temp = self.counters.new_temp();
        if self.is_parameter(array.name) {
            // Array parameters hold the address, dereference first
            let base_temp = self.counters.new_temp();
            code.push(Instruction::Load {
                dst: base_temp.clone(),
                src: base,
            });
            code.push(Instruction::LoadX {
                dst: temp.clone(),
                base: base_temp,
                index: index_code.addr,
            });
        } else {
            code.push(Instruction::LoadX {
                dst: temp.clone(),
                base,
                index: index_code.addr,
            });
        }
        ExprCode::plain(temp, code)
    }

    fn gen_unary(&mut self, op: UnaryOp, operand: &Expr) -> ExprCode {
        let operand_code = self.gen_expr(operand);
        let operand_ty = self.data.type_of(operand.id);
        let mut code = operand_code.code;
        let temp = self.counters.new_temp();

        let instr = match op {
            UnaryOp::Not => Instruction::Not {
                dst: temp.clone(),
                src: operand_code.addr,
            },
            UnaryOp::Neg if self.types.is_float(operand_ty) => Instruction::FNeg {
                dst: temp.clone(),
                src: operand_code.addr,
            },
            UnaryOp::Neg => Instruction::Neg {
                dst: temp.clone(),
                src: operand_code.addr,
            },
        };
        code.push(instr);
        ExprCode::plain(temp, code)
    }

    fn gen_binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> ExprCode {
        let lhs_code = self.gen_expr(lhs);
        let rhs_code = self.gen_expr(rhs);
        let lhs_ty = self.data.type_of(lhs.id);
        let rhs_ty = self.data.type_of(rhs.id);

        let mut code = lhs_code.code;
        code.extend(rhs_code.code);

        if op.is_logical() {
            let temp = self.counters.new_temp();
            let instr = match op {
                BinaryOp::And => Instruction::And {
                    dst: temp.clone(),
                    a: lhs_code.addr,
                    b: rhs_code.addr,
                },
                _ => Instruction::Or {
                    dst: temp.clone(),
                    a: lhs_code.addr,
                    b: rhs_code.addr,
                },
            };
            code.push(instr);
            return ExprCode::plain(temp, code);
        }

        if op == BinaryOp::Mod {
            // a % b lowered as a - (a / b) * b
            let quotient = self.counters.new_temp();
            let temp = self.counters.new_temp();
            code.push(Instruction::Div {
                dst: quotient.clone(),
                a: lhs_code.addr.clone(),
                b: rhs_code.addr.clone(),
            });
            code.push(Instruction::Mul {
                dst: temp.clone(),
                a: quotient,
                b: rhs_code.addr,
            });
            code.push(Instruction::Sub {
                dst: temp.clone(),
                a: lhs_code.addr,
                b: temp.clone(),
            });
            return ExprCode::plain(temp, code);
        }

        let temp = self.counters.new_temp();
        // Coerce the integer side (only) into the result temporary when
        // the other operand is float, then operate in place.
        let float_mode = self.types.is_float(lhs_ty) || self.types.is_float(rhs_ty);
        let (a, b) = if float_mode {
            if self.types.is_integer(lhs_ty) {
                code.push(Instruction::Float {
                    dst: temp.clone(),
                    src: lhs_code.addr,
                });
                (temp.clone(), rhs_code.addr)
            } else if self.types.is_integer(rhs_ty) {
                code.push(Instruction::Float {
                    dst: temp.clone(),
                    src: rhs_code.addr,
                });
                (lhs_code.addr, temp.clone())
            } else {
                (lhs_code.addr, rhs_code.addr)
            }
        } else {
            (lhs_code.addr, rhs_code.addr)
        };

        if op.is_relational() {
            self.push_relational(&mut code, op, float_mode, &temp, a, b);
        } else {
            code.push(arith_instr(op, float_mode, &temp, a, b));
        }
        ExprCode::plain(temp, code)
    }

    /// EQ/LT/LE are primitive; the other orderings are synthesized with
    /// a trailing NOT into the same temporary.
    fn push_relational(
        &mut self,
        code: &mut Vec<Instruction>,
        op: BinaryOp,
        float_mode: bool,
        temp: &str,
        a: String,
        b: String,
    ) {
        let dst = temp.to_string();
        let (base, negate) = match op {
            BinaryOp::Eq => (BinaryOp::Eq, false),
            BinaryOp::Ne => (BinaryOp::Eq, true),
            BinaryOp::Lt => (BinaryOp::Lt, false),
            BinaryOp::Le => (BinaryOp::Le, false),
            BinaryOp::Gt => (BinaryOp::Le, true),
            _ => (BinaryOp::Lt, true), // Ge
        };
        let instr = match (base, float_mode) {
            (BinaryOp::Eq, false) => Instruction::Eq { dst, a, b },
            (BinaryOp::Eq, true) => Instruction::FEq { dst, a, b },
            (BinaryOp::Lt, false) => Instruction::Lt { dst, a, b },
            (BinaryOp::Lt, true) => Instruction::FLt { dst, a, b },
            (_, false) => Instruction::Le { dst, a, b },
            (_, true) => Instruction::FLe { dst, a, b },
        };
        code.push(instr);
        if negate {
            code.push(Instruction::Not {
                dst: temp.to_string(),
                src: temp.to_string(),
            });
        }
    }

    /// Call lowering shared by statements and expressions.
    ///
    /// Int actuals widen for float formals, array actuals pass their
    /// address; the return placeholder (when the callee returns a value)
    /// is pushed before the arguments and popped after them.
    pub(crate) fn gen_call(&mut self, callee: &Ident, args: &[Expr], want_result: bool) -> ExprCode {
        let callee_ty = self.data.type_of(callee.id);
        let non_void = !self.types.is_void_function(callee_ty);

        let mut code = Vec::new();
        let mut pushes = Vec::new();
        let mut pops = Vec::new();

        for (i, arg) in args.iter().enumerate() {
            let arg_code = self.gen_expr(arg);
            code.extend(arg_code.code);
            let arg_ty = self.data.type_of(arg.id);
            let formal: Option<TypeId> = self.types.param_at(callee_ty, i);

            let mut addr = arg_code.addr;
            let widen = matches!(formal, Some(f) if self.types.is_float(f))
                && self.types.is_integer(arg_ty);
            if widen {
                let temp = self.counters.new_temp();
                code.push(Instruction::Float {
                    dst: temp.clone(),
                    src: addr,
                });
                addr = temp;
            } else if self.types.is_array(arg_ty) {
                // Arrays pass by reference
                let temp = self.counters.new_temp();
                code.push(Instruction::ALoad {
                    dst: temp.clone(),
                    array: addr,
                });
                addr = temp;
            }
            pushes.push(Instruction::Push { value: Some(addr) });
            pops.push(Instruction::Pop { dst: None });
        }

        if non_void {
            code.push(Instruction::Push { value: None });
        }
        code.extend(pushes);
        code.push(Instruction::Call {
            name: self.name_of(callee.name),
        });
        code.extend(pops);

        let mut addr = String::new();
        if non_void {
            let dst = if want_result {
                let temp = self.counters.new_temp();
                addr = temp.clone();
                Some(temp)
            } else {
                None
            };
            code.push(Instruction::Pop { dst });
        }
        ExprCode::plain(addr, code)
    }
}

fn arith_instr(op: BinaryOp, float_mode: bool, temp: &str, a: String, b: String) -> Instruction {
    let dst = temp.to_string();
    match (op, float_mode) {
        (BinaryOp::Add, false) => Instruction::Add { dst, a, b },
        (BinaryOp::Add, true) => Instruction::FAdd { dst, a, b },
        (BinaryOp::Sub, false) => Instruction::Sub { dst, a, b },
        (BinaryOp::Sub, true) => Instruction::FSub { dst, a, b },
        (BinaryOp::Mul, false) => Instruction::Mul { dst, a, b },
        (BinaryOp::Mul, true) => Instruction::FMul { dst, a, b },
        (BinaryOp::Div, false) => Instruction::Div { dst, a, b },
        _ => Instruction::FDiv { dst, a, b },
    }
}
