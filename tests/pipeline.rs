// tests/pipeline.rs
//! End-to-end pipeline tests through the public API: parse, analyze,
//! lower, serialize.

use aslc::codegen;
use aslc::frontend::Parser;
use aslc::sema;

fn compile(source: &str) -> String {
    let mut parser = Parser::new(source);
    let program = parser.parse_program().expect("source should parse");
    let interner = parser.into_interner();
    let mut sema = sema::analyze(&program, &interner).expect("source should check");
    codegen::generate(&program, &mut sema, &interner).to_string()
}

#[test]
fn compiles_a_counting_loop() {
    let text = compile(
        "func main()\n\
         var i, n: int endvar\n\
         n = 3;\n\
         i = 0;\n\
         while i < n do\n\
           write i;\n\
           write \"\\n\";\n\
           i = i + 1;\n\
         endwhile\n\
         endfunc\n",
    );
    let expected = "\
subroutine main
local i 1
local n 1
  ILOAD %t1, 3
  LOAD n, %t1
  ILOAD %t2, 0
  LOAD i, %t2
  LABEL while1
  LT %t3, i, n
  FJUMP %t3, endwhile1
  WRITEI i
  WRITELN
  ILOAD %t5, 1
  ADD %t6, i, %t5
  LOAD i, %t6
  UJUMP while1
  LABEL endwhile1
  RETURN
";
    assert_eq!(text, expected);
}

#[test]
fn compiles_functions_with_values_and_references() {
    let text = compile(
        "func sum(v: array[3] of int): int\n\
         var i, s: int endvar\n\
         s = 0;\n\
         i = 0;\n\
         while i < 3 do\n\
           s = s + v[i];\n\
           i = i + 1;\n\
         endwhile\n\
         return s;\n\
         endfunc\n\
         func main()\n\
         var a: array[3] of int endvar\n\
         var total: int endvar\n\
         a[0] = 5;\n\
         total = sum(a);\n\
         write total;\n\
         endfunc\n",
    );

    // The callee dereferences its array parameter before indexing
    assert!(text.contains("subroutine sum\nparam _result\nparam v\n"));
    assert!(text.contains("LOAD %t6, v\n  LOADX %t5, %t6, i"));

    // The caller passes the array address and collects the result
    assert!(text.contains("ALOAD %t3, a"));
    assert!(text.contains("PUSH\n  PUSH %t3\n  CALL sum\n  POP\n  POP %t4"));
    assert!(text.contains("LOAD total, %t4"));
}

#[test]
fn rejects_programs_with_diagnostics_before_codegen() {
    let source = "func main() var x: int endvar x = true; endfunc";
    let mut parser = Parser::new(source);
    let program = parser.parse_program().expect("source should parse");
    let interner = parser.into_interner();
    let result = sema::analyze(&program, &interner);
    assert!(result.is_err());
    assert_eq!(result.err().map(|e| e.len()), Some(1));
}
