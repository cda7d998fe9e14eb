// src/codegen/tac.rs
//
// Three-address-code model: one tagged variant per instruction, a
// subroutine per source function, and the serialized program format.
// Operands are plain strings: identifiers, %-prefixed temporaries, or
// literals.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `LOAD dst, src` - plain copy (also dereferences array parameters)
    Load { dst: String, src: String },
    /// `ILOAD dst, k` - integer (or boolean 0/1) constant
    ILoad { dst: String, value: String },
    /// `FLOAD dst, k` - float constant
    FLoad { dst: String, value: String },
    /// `CHLOAD dst, c` - character constant, quotes stripped
    ChLoad { dst: String, value: String },
    /// `ALOAD dst, arr` - address of an array
    ALoad { dst: String, array: String },
    /// `LOADX dst, base, idx` - indexed read
    LoadX {
        dst: String,
        base: String,
        index: String,
    },
    /// `XLOAD base, idx, src` - indexed write
    XLoad {
        base: String,
        index: String,
        src: String,
    },

    Add { dst: String, a: String, b: String },
    Sub { dst: String, a: String, b: String },
    Mul { dst: String, a: String, b: String },
    Div { dst: String, a: String, b: String },
    FAdd { dst: String, a: String, b: String },
    FSub { dst: String, a: String, b: String },
    FMul { dst: String, a: String, b: String },
    FDiv { dst: String, a: String, b: String },
    Neg { dst: String, src: String },
    FNeg { dst: String, src: String },

    Eq { dst: String, a: String, b: String },
    Lt { dst: String, a: String, b: String },
    Le { dst: String, a: String, b: String },
    FEq { dst: String, a: String, b: String },
    FLt { dst: String, a: String, b: String },
    FLe { dst: String, a: String, b: String },

    And { dst: String, a: String, b: String },
    Or { dst: String, a: String, b: String },
    Not { dst: String, src: String },

    /// `FLOAT dst, src` - the int-to-float widening
    Float { dst: String, src: String },

    /// `PUSH [val]` - argument or return-slot placeholder
    Push { value: Option<String> },
    /// `POP [dst]` - discard or fetch the call result
    Pop { dst: Option<String> },
    Call { name: String },
    Return,

    UJump { label: String },
    /// `FJUMP cond, label` - jump when the condition is false
    FJump { cond: String, label: String },
    Label { name: String },

    ReadI { dst: String },
    ReadF { dst: String },
    ReadC { dst: String },
    WriteI { src: String },
    WriteF { src: String },
    WriteC { src: String },
    WriteLn,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match self {
            Load { dst, src } => write!(f, "LOAD {dst}, {src}"),
            ILoad { dst, value } => write!(f, "ILOAD {dst}, {value}"),
            FLoad { dst, value } => write!(f, "FLOAD {dst}, {value}"),
            ChLoad { dst, value } => write!(f, "CHLOAD {dst}, {value}"),
            ALoad { dst, array } => write!(f, "ALOAD {dst}, {array}"),
            LoadX { dst, base, index } => write!(f, "LOADX {dst}, {base}, {index}"),
            XLoad { base, index, src } => write!(f, "XLOAD {base}, {index}, {src}"),
            Add { dst, a, b } => write!(f, "ADD {dst}, {a}, {b}"),
            Sub { dst, a, b } => write!(f, "SUB {dst}, {a}, {b}"),
            Mul { dst, a, b } => write!(f, "MUL {dst}, {a}, {b}"),
            Div { dst, a, b } => write!(f, "DIV {dst}, {a}, {b}"),
            FAdd { dst, a, b } => write!(f, "FADD {dst}, {a}, {b}"),
            FSub { dst, a, b } => write!(f, "FSUB {dst}, {a}, {b}"),
            FMul { dst, a, b } => write!(f, "FMUL {dst}, {a}, {b}"),
            FDiv { dst, a, b } => write!(f, "FDIV {dst}, {a}, {b}"),
            Neg { dst, src } => write!(f, "NEG {dst}, {src}"),
            FNeg { dst, src } => write!(f, "FNEG {dst}, {src}"),
            Eq { dst, a, b } => write!(f, "EQ {dst}, {a}, {b}"),
            Lt { dst, a, b } => write!(f, "LT {dst}, {a}, {b}"),
            Le { dst, a, b } => write!(f, "LE {dst}, {a}, {b}"),
            FEq { dst, a, b } => write!(f, "FEQ {dst}, {a}, {b}"),
            FLt { dst, a, b } => write!(f, "FLT {dst}, {a}, {b}"),
            FLe { dst, a, b } => write!(f, "FLE {dst}, {a}, {b}"),
            And { dst, a, b } => write!(f, "AND {dst}, {a}, {b}"),
            Or { dst, a, b } => write!(f, "OR {dst}, {a}, {b}"),
            Not { dst, src } => write!(f, "NOT {dst}, {src}"),
            Float { dst, src } => write!(f, "FLOAT {dst}, {src}"),
            Push { value: Some(v) } => write!(f, "PUSH {v}"),
            Push { value: None } => write!(f, "PUSH"),
            Pop { dst: Some(d) } => write!(f, "POP {d}"),
            Pop { dst: None } => write!(f, "POP"),
            Call { name } => write!(f, "CALL {name}"),
            Return => write!(f, "RETURN"),
            UJump { label } => write!(f, "UJUMP {label}"),
            FJump { cond, label } => write!(f, "FJUMP {cond}, {label}"),
            Label { name } => write!(f, "LABEL {name}"),
            ReadI { dst } => write!(f, "READI {dst}"),
            ReadF { dst } => write!(f, "READF {dst}"),
            ReadC { dst } => write!(f, "READC {dst}"),
            WriteI { src } => write!(f, "WRITEI {src}"),
            WriteF { src } => write!(f, "WRITEF {src}"),
            WriteC { src } => write!(f, "WRITEC {src}"),
            WriteLn => write!(f, "WRITELN"),
        }
    }
}

/// One generated function: parameter names in push order, locals with
/// their cell counts, and the instruction list.
#[derive(Debug, Clone, Default)]
pub struct Subroutine {
    pub name: String,
    pub params: Vec<String>,
    pub locals: Vec<(String, usize)>,
    pub code: Vec<Instruction>,
}

impl Subroutine {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn add_param(&mut self, name: &str) {
        self.params.push(name.to_string());
    }

    pub fn add_local(&mut self, name: &str, cells: usize) {
        self.locals.push((name.to_string(), cells));
    }
}

impl fmt::Display for Subroutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "subroutine {}", self.name)?;
        for param in &self.params {
            writeln!(f, "param {param}")?;
        }
        for (name, cells) in &self.locals {
            writeln!(f, "local {name} {cells}")?;
        }
        for instr in &self.code {
            writeln!(f, "  {instr}")?;
        }
        Ok(())
    }
}

/// The full lowered program, one subroutine per source function.
#[derive(Debug, Clone, Default)]
pub struct TacProgram {
    pub subroutines: Vec<Subroutine>,
}

impl TacProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subroutine(&mut self, subroutine: Subroutine) {
        self.subroutines.push(subroutine);
    }
}

impl fmt::Display for TacProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, subroutine) in self.subroutines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{subroutine}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_serialize_one_per_line() {
        let add = Instruction::Add {
            dst: "%t3".into(),
            a: "%t1".into(),
            b: "%t2".into(),
        };
        assert_eq!(add.to_string(), "ADD %t3, %t1, %t2");

        let push = Instruction::Push { value: None };
        assert_eq!(push.to_string(), "PUSH");
        let pop = Instruction::Pop {
            dst: Some("%t1".into()),
        };
        assert_eq!(pop.to_string(), "POP %t1");
    }

    #[test]
    fn subroutine_header_lists_params_and_locals() {
        let mut subr = Subroutine::new("f");
        subr.add_param("_result");
        subr.add_param("n");
        subr.add_local("a", 10);
        subr.code.push(Instruction::Return);

        let text = subr.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["subroutine f", "param _result", "param n", "local a 10", "  RETURN"]
        );
    }

    #[test]
    fn program_separates_subroutines_with_blank_lines() {
        let mut program = TacProgram::new();
        program.add_subroutine(Subroutine::new("f"));
        program.add_subroutine(Subroutine::new("main"));
        let text = program.to_string();
        assert_eq!(text, "subroutine f\n\nsubroutine main\n");
    }
}
