// src/codegen/stmt.rs
//
// Statement lowering: assignments (including the unrolled whole-array
// copy), structured control flow, calls, read/write and return.

use super::{CodeGenerator, ExprCode};
use crate::codegen::tac::Instruction;
use crate::frontend::ast::*;
use crate::frontend::Interner;

impl CodeGenerator<'_> {
    pub(crate) fn gen_stmt(&mut self, stmt: &Stmt) -> Vec<Instruction> {
        match stmt {
            Stmt::Assign(assign) => self.gen_assign(assign),
            Stmt::If(if_stmt) => self.gen_if(if_stmt),
            Stmt::While(while_stmt) => self.gen_while(while_stmt),
            Stmt::Call(call) => self.gen_call(&call.callee, &call.args, false).code,
            Stmt::Read(read) => self.gen_read(read),
            Stmt::Write(write) => self.gen_write(write),
            Stmt::WriteStr(write) => self.gen_write_str(write),
            Stmt::Return(ret) => self.gen_return(ret),
        }
    }

    fn gen_assign(&mut self, assign: &AssignStmt) -> Vec<Instruction> {
        let target = self.gen_left_expr(&assign.target);
        let value = self.gen_expr(&assign.value);

        let target_ty = self.data.type_of(assign.target.id);
        let value_ty = self.data.type_of(assign.value.id);

        let mut code = target.code;
        code.extend(value.code);

        // Whole-array assignment: unrolled element-by-element copy
        if self.types.is_array(target_ty) && target.offs.is_none() {
            let size = self.types.array_size(target_ty).unwrap_or(0);
            let dst_base = self.deref_if_parameter(&mut code, &assign.target.target, target.addr);
            let src_base = match array_ident(&assign.value) {
                Some(src) => self.deref_if_parameter(&mut code, src, value.addr),
                None => value.addr,
            };
            let index_temp = self.counters.new_temp();
            let value_temp = self.counters.new_temp();
            for k in 0..size {
                code.push(Instruction::ILoad {
                    dst: index_temp.clone(),
                    value: k.to_string(),
                });
                code.push(Instruction::LoadX {
                    dst: value_temp.clone(),
                    base: src_base.clone(),
                    index: index_temp.clone(),
                });
                code.push(Instruction::XLoad {
                    base: dst_base.clone(),
                    index: index_temp.clone(),
                    src: value_temp.clone(),
                });
            }
            return code;
        }

        let mut src = value.addr;
        if self.types.is_float(target_ty) && self.types.is_integer(value_ty) {
            let temp = self.counters.new_temp();
            code.push(Instruction::Float {
                dst: temp.clone(),
                src,
            });
            src = temp;
        }

        match target.offs {
            Some(index) => code.push(Instruction::XLoad {
                base: target.addr,
                index,
                src,
            }),
            None => code.push(Instruction::Load {
                dst: target.addr,
                src,
            }),
        }
        code
    }

    /// Assignment/read target: the base address plus the index
    /// temporary when it names an array element.
    pub(crate) fn gen_left_expr(&mut self, left: &LeftExpr) -> ExprCode {
        let mut addr = self.name_of(left.target.name);
        let mut code = Vec::new();
        let mut offs = None;

        if let Some(index) = &left.index {
            let index_code = self.gen_expr(index);
            code.extend(index_code.code);
            offs = Some(index_code.addr);
            addr = self.deref_if_parameter(&mut code, &left.target, addr);
        }

        ExprCode { addr, offs, code }
    }

    /// Array parameters hold the caller's address; dereference before
    /// any indexed access.
    fn deref_if_parameter(
        &mut self,
        code: &mut Vec<Instruction>,
        ident: &Ident,
        addr: String,
    ) -> String {
        if self.is_parameter(ident.name) {
            let temp = self.counters.new_temp();
            code.push(Instruction::Load {
                dst: temp.clone(),
                src: addr,
            });
            temp
        } else {
            addr
        }
    }

    fn gen_if(&mut self, if_stmt: &IfStmt) -> Vec<Instruction> {
        let label = self.counters.new_if_label();
        let condition = self.gen_expr(&if_stmt.condition);

        let mut code = vec![Instruction::Label {
            name: format!("if{label}"),
        }];
        code.extend(condition.code);

        let end_label = format!("endif{label}");
        match &if_stmt.else_branch {
            Some(else_branch) => {
                let else_label = format!("else{label}");
                code.push(Instruction::FJump {
                    cond: condition.addr,
                    label: else_label.clone(),
                });
                for stmt in &if_stmt.then_branch {
                    code.extend(self.gen_stmt(stmt));
                }
                code.push(Instruction::UJump {
                    label: end_label.clone(),
                });
                code.push(Instruction::Label { name: else_label });
                for stmt in else_branch {
                    code.extend(self.gen_stmt(stmt));
                }
            }
            None => {
                code.push(Instruction::FJump {
                    cond: condition.addr,
                    label: end_label.clone(),
                });
                for stmt in &if_stmt.then_branch {
                    code.extend(self.gen_stmt(stmt));
                }
            }
        }
        code.push(Instruction::Label { name: end_label });
        code
    }

    fn gen_while(&mut self, while_stmt: &WhileStmt) -> Vec<Instruction> {
        let label = self.counters.new_while_label();
        let head_label = format!("while{label}");
        let end_label = format!("endwhile{label}");

        let condition = self.gen_expr(&while_stmt.condition);
        let mut code = vec![Instruction::Label {
            name: head_label.clone(),
        }];
        code.extend(condition.code);
        code.push(Instruction::FJump {
            cond: condition.addr,
            label: end_label.clone(),
        });
        for stmt in &while_stmt.body {
            code.extend(self.gen_stmt(stmt));
        }
        code.push(Instruction::UJump { label: head_label });
        code.push(Instruction::Label { name: end_label });
        code
    }

    fn gen_read(&mut self, read: &ReadStmt) -> Vec<Instruction> {
        let target = self.gen_left_expr(&read.target);
        let target_ty = self.data.type_of(read.target.id);
        let mut code = target.code;

        // Element reads go through a fresh temporary, then store back
        let dst = match &target.offs {
            Some(_) => self.counters.new_temp(),
            None => target.addr.clone(),
        };

        let instr = if self.types.is_float(target_ty) {
            Instruction::ReadF { dst: dst.clone() }
        } else if self.types.is_character(target_ty) {
            Instruction::ReadC { dst: dst.clone() }
        } else {
            Instruction::ReadI { dst: dst.clone() }
        };
        code.push(instr);

        if let Some(index) = target.offs {
            code.push(Instruction::XLoad {
                base: target.addr,
                index,
                src: dst,
            });
        }
        code
    }

    fn gen_write(&mut self, write: &WriteStmt) -> Vec<Instruction> {
        let value = self.gen_expr(&write.value);
        let value_ty = self.data.type_of(write.value.id);
        let mut code = value.code;

        let instr = if self.types.is_float(value_ty) {
            Instruction::WriteF { src: value.addr }
        } else if self.types.is_character(value_ty) {
            Instruction::WriteC { src: value.addr }
        } else {
            // Booleans print as their 0/1 encoding
            Instruction::WriteI { src: value.addr }
        };
        code.push(instr);
        code
    }

    /// String writes decode character by character; `\n` becomes
    /// WRITELN, the other recognized escapes load their two-character
    /// sequence verbatim.
    fn gen_write_str(&mut self, write: &WriteStrStmt) -> Vec<Instruction> {
        let mut code = Vec::new();
        let temp = self.counters.new_temp();
        let chars: Vec<char> = write.text.chars().collect();

        let mut i = 0;
        while i < chars.len() {
            if chars[i] == '\\' && i + 1 < chars.len() {
                match chars[i + 1] {
                    'n' => {
                        code.push(Instruction::WriteLn);
                        i += 2;
                        continue;
                    }
                    't' | '"' | '\\' => {
                        code.push(Instruction::ChLoad {
                            dst: temp.clone(),
                            value: format!("\\{}", chars[i + 1]),
                        });
                        code.push(Instruction::WriteC { src: temp.clone() });
                        i += 2;
                        continue;
                    }
                    _ => {}
                }
            }
            code.push(Instruction::ChLoad {
                dst: temp.clone(),
                value: chars[i].to_string(),
            });
            code.push(Instruction::WriteC { src: temp.clone() });
            i += 1;
        }
        code
    }

    fn gen_return(&mut self, ret: &ReturnStmt) -> Vec<Instruction> {
        match &ret.value {
            Some(value) => {
                let value_code = self.gen_expr(value);
                let mut code = value_code.code;
                code.push(Instruction::Load {
                    dst: self.interner.resolve(Interner::RESULT).to_string(),
                    src: value_code.addr,
                });
                code.push(Instruction::Return);
                code
            }
            None => vec![Instruction::Return],
        }
    }
}

/// The identifier behind an array-typed expression, looking through
/// parentheses. Arrays only ever occur as bare names.
fn array_ident(expr: &Expr) -> Option<&Ident> {
    match &expr.kind {
        ExprKind::Ident(ident) => Some(ident),
        ExprKind::Paren(inner) => array_ident(inner),
        _ => None,
    }
}
