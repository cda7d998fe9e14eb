// src/codegen/tests.rs

use crate::codegen::{self, TacProgram};
use crate::frontend::Parser;
use crate::sema;

fn gen(source: &str) -> TacProgram {
    let mut parser = Parser::new(source);
    let program = parser.parse_program().expect("test source should parse");
    let interner = parser.into_interner();
    let mut sema = sema::analyze(&program, &interner).expect("test source should check");
    codegen::generate(&program, &mut sema, &interner)
}

fn instructions(tac: &TacProgram, subroutine: &str) -> Vec<String> {
    tac.subroutines
        .iter()
        .find(|s| s.name == subroutine)
        .unwrap_or_else(|| panic!("no subroutine '{subroutine}'"))
        .code
        .iter()
        .map(|i| i.to_string())
        .collect()
}

#[test]
fn straight_line_arithmetic() {
    let tac = gen("func main() var x: int endvar x = 3 + 4; endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "ILOAD %t1, 3",
            "ILOAD %t2, 4",
            "ADD %t3, %t1, %t2",
            "LOAD x, %t3",
            "RETURN",
        ]
    );
}

#[test]
fn widening_assignment_inserts_float() {
    let tac = gen("func main() var f: float endvar var i: int endvar f = i; endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec!["FLOAT %t1, i", "LOAD f, %t1", "RETURN"]
    );
}

#[test]
fn array_element_read() {
    let tac = gen(
        "func main() var a: array[4] of int endvar var i: int endvar i = a[2]; endfunc",
    );
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "ILOAD %t1, 2",
            "LOADX %t2, a, %t1",
            "LOAD i, %t2",
            "RETURN",
        ]
    );
}

#[test]
fn array_element_store() {
    let tac = gen("func main() var a: array[4] of int endvar a[1] = 7; endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "ILOAD %t1, 1",
            "ILOAD %t2, 7",
            "XLOAD a, %t1, %t2",
            "RETURN",
        ]
    );
}

#[test]
fn array_parameter_access_dereferences() {
    let tac = gen(
        "func f(a: array[4] of int): int return a[0]; endfunc func main() endfunc",
    );
    assert_eq!(
        instructions(&tac, "f"),
        vec![
            "ILOAD %t1, 0",
            "LOAD %t3, a",
            "LOADX %t2, %t3, %t1",
            "LOAD _result, %t2",
            "RETURN",
            "RETURN",
        ]
    );
}

#[test]
fn whole_array_assignment_unrolls() {
    let tac = gen(
        "func main() var a: array[3] of int endvar var b: array[3] of int endvar \
         a = b; endfunc",
    );
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "ILOAD %t1, 0",
            "LOADX %t2, b, %t1",
            "XLOAD a, %t1, %t2",
            "ILOAD %t1, 1",
            "LOADX %t2, b, %t1",
            "XLOAD a, %t1, %t2",
            "ILOAD %t1, 2",
            "LOADX %t2, b, %t1",
            "XLOAD a, %t1, %t2",
            "RETURN",
        ]
    );
}

#[test]
fn whole_array_assignment_dereferences_parameters() {
    let tac = gen(
        "func f(p: array[2] of int) var a: array[2] of int endvar a = p; endfunc \
         func main() endfunc",
    );
    let code = instructions(&tac, "f");
    assert_eq!(code[0], "LOAD %t1, p");
    assert!(code.contains(&"LOADX %t3, %t1, %t2".to_string()));
    assert!(code.contains(&"XLOAD a, %t2, %t3".to_string()));
}

#[test]
fn subroutine_headers_carry_result_params_and_locals() {
    let tac = gen(
        "func f(n: int, x: float): int var a: array[10] of int endvar var y: float endvar \
         return n; endfunc func main() endfunc",
    );
    let f = &tac.subroutines[0];
    assert_eq!(f.params, vec!["_result", "n", "x"]);
    assert_eq!(
        f.locals,
        vec![("a".to_string(), 10), ("y".to_string(), 1)]
    );

    let main = &tac.subroutines[1];
    assert!(main.params.is_empty());
}

#[test]
fn every_subroutine_ends_with_return() {
    let tac = gen(
        "func f(): int return 1; endfunc \
         func g() endfunc \
         func main() g(); endfunc",
    );
    for subroutine in &tac.subroutines {
        assert_eq!(
            subroutine.code.last().map(|i| i.to_string()).as_deref(),
            Some("RETURN"),
            "subroutine {} lacks a terminal return",
            subroutine.name
        );
    }
}

#[test]
fn call_expression_pushes_result_slot_before_arguments() {
    let tac = gen(
        "func f(a: int, b: float): int return a; endfunc \
         func main() var y: int endvar y = f(1, 2); endfunc",
    );
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "ILOAD %t1, 1",
            "ILOAD %t2, 2",
            "FLOAT %t3, %t2",
            "PUSH",
            "PUSH %t1",
            "PUSH %t3",
            "CALL f",
            "POP",
            "POP",
            "POP %t4",
            "LOAD y, %t4",
            "RETURN",
        ]
    );
}

#[test]
fn call_sites_balance_pushes_and_pops() {
    let tac = gen(
        "func f(a: int, b: float): int return a; endfunc \
         func p(a: int) endfunc \
         func main() var y: int endvar y = f(1, 2.0); p(3); endfunc",
    );
    let code = instructions(&tac, "main");
    let pushes = code.iter().filter(|i| i.starts_with("PUSH")).count();
    let pops = code.iter().filter(|i| i.starts_with("POP")).count();
    // f: 2 args + result slot; p: 1 arg
    assert_eq!(pushes, 4);
    assert_eq!(pops, pushes);
}

#[test]
fn void_procedure_call_has_no_result_slot() {
    let tac = gen("func p(a: int) endfunc func main() p(3); endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec!["ILOAD %t1, 3", "PUSH %t1", "CALL p", "POP", "RETURN"]
    );
}

#[test]
fn non_void_procedure_call_discards_the_result_slot() {
    let tac = gen("func f(): int return 1; endfunc func main() f(); endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec!["PUSH", "CALL f", "POP", "RETURN"]
    );
}

#[test]
fn array_argument_passes_its_address() {
    let tac = gen(
        "func f(v: array[4] of int) endfunc \
         func main() var a: array[4] of int endvar f(a); endfunc",
    );
    assert_eq!(
        instructions(&tac, "main"),
        vec!["ALOAD %t1, a", "PUSH %t1", "CALL f", "POP", "RETURN"]
    );
}

#[test]
fn if_without_else_jumps_to_endif() {
    let tac = gen("func main() var b: bool endvar if b then b = false; endif endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "LABEL if1",
            "FJUMP b, endif1",
            "ILOAD %t1, 0",
            "LOAD b, %t1",
            "LABEL endif1",
            "RETURN",
        ]
    );
}

#[test]
fn if_with_else_jumps_over_the_else_block() {
    let tac = gen(
        "func main() var b: bool endvar \
         if b then b = false; else b = true; endif endfunc",
    );
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "LABEL if1",
            "FJUMP b, else1",
            "ILOAD %t1, 0",
            "LOAD b, %t1",
            "UJUMP endif1",
            "LABEL else1",
            "ILOAD %t2, 1",
            "LOAD b, %t2",
            "LABEL endif1",
            "RETURN",
        ]
    );
}

#[test]
fn while_loops_jump_back_to_the_head() {
    let tac = gen(
        "func main() var i: int endvar \
         while i < 10 do i = i + 1; endwhile endfunc",
    );
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "LABEL while1",
            "ILOAD %t1, 10",
            "LT %t2, i, %t1",
            "FJUMP %t2, endwhile1",
            "ILOAD %t3, 1",
            "ADD %t4, i, %t3",
            "LOAD i, %t4",
            "UJUMP while1",
            "LABEL endwhile1",
            "RETURN",
        ]
    );
}

#[test]
fn labels_are_unique_within_a_subroutine() {
    let tac = gen(
        "func main() var b: bool endvar var i: int endvar \
         if b then if b then i = 1; endif endif \
         while b do while b do i = 2; endwhile endwhile \
         if b then i = 3; else i = 4; endif endfunc",
    );
    let code = instructions(&tac, "main");
    let labels: Vec<&str> = code
        .iter()
        .filter_map(|line| line.strip_prefix("LABEL "))
        .collect();
    let mut deduped = labels.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), labels.len(), "duplicate label in {labels:?}");

    // Every jump target is defined exactly once
    for line in &code {
        let target = line
            .strip_prefix("UJUMP ")
            .or_else(|| line.split(", ").nth(1).filter(|_| line.starts_with("FJUMP")));
        if let Some(target) = target {
            let count = code
                .iter()
                .filter(|l| l.as_str() == format!("LABEL {target}"))
                .count();
            assert_eq!(count, 1, "jump target {target} defined {count} times");
        }
    }
}

#[test]
fn counters_reset_per_function() {
    let tac = gen(
        "func f(): int return 1; endfunc \
         func main() var x: int endvar x = 2; endfunc",
    );
    assert_eq!(
        instructions(&tac, "f")[0],
        "ILOAD %t1, 1",
    );
    assert_eq!(
        instructions(&tac, "main")[0],
        "ILOAD %t1, 2",
    );
}

#[test]
fn generation_is_deterministic() {
    let source = "func f(a: int, b: float): float \
                  var r: float endvar \
                  r = a * b; return r; endfunc \
                  func main() var x: float endvar x = f(2, 3.5); write x; endfunc";
    assert_eq!(gen(source).to_string(), gen(source).to_string());
}

#[test]
fn modulo_lowers_to_div_mul_sub() {
    let tac = gen("func main() var x: int endvar x = x % 3; endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "ILOAD %t1, 3",
            "DIV %t2, x, %t1",
            "MUL %t3, %t2, %t1",
            "SUB %t3, x, %t3",
            "LOAD x, %t3",
            "RETURN",
        ]
    );
}

#[test]
fn greater_than_is_synthesized_with_not() {
    let tac = gen("func main() var b: bool endvar b = 2 > 1; endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "ILOAD %t1, 2",
            "ILOAD %t2, 1",
            "LE %t3, %t1, %t2",
            "NOT %t3, %t3",
            "LOAD b, %t3",
            "RETURN",
        ]
    );
}

#[test]
fn mixed_comparison_coerces_the_integer_side() {
    let tac = gen("func main() var b: bool endvar var f: float endvar b = 1 < f; endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "ILOAD %t1, 1",
            "FLOAT %t2, %t1",
            "FLT %t2, %t2, f",
            "LOAD b, %t2",
            "RETURN",
        ]
    );
}

#[test]
fn unary_operators_pick_the_typed_variant() {
    let tac = gen(
        "func main() var x: int endvar var f: float endvar var b: bool endvar \
         x = -x; f = -f; b = !b; endfunc",
    );
    let code = instructions(&tac, "main");
    assert!(code.contains(&"NEG %t1, x".to_string()));
    assert!(code.contains(&"FNEG %t2, f".to_string()));
    assert!(code.contains(&"NOT %t3, b".to_string()));
}

#[test]
fn boolean_literals_load_zero_or_one() {
    let tac = gen("func main() var b: bool endvar b = true; b = false; endfunc");
    let code = instructions(&tac, "main");
    assert_eq!(code[0], "ILOAD %t1, 1");
    assert_eq!(code[2], "ILOAD %t2, 0");
}

#[test]
fn read_statements_pick_the_typed_variant() {
    let tac = gen(
        "func main() var i: int endvar var f: float endvar var c: char endvar \
         read i; read f; read c; endfunc",
    );
    assert_eq!(
        instructions(&tac, "main"),
        vec!["READI i", "READF f", "READC c", "RETURN"]
    );
}

#[test]
fn read_into_array_element_goes_through_a_temporary() {
    let tac = gen("func main() var a: array[4] of int endvar read a[0]; endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "ILOAD %t1, 0",
            "READI %t2",
            "XLOAD a, %t1, %t2",
            "RETURN",
        ]
    );
}

#[test]
fn write_statements_pick_the_typed_variant() {
    let tac = gen(
        "func main() var i: int endvar var f: float endvar var c: char endvar var b: bool endvar \
         write i; write f; write c; write b; endfunc",
    );
    assert_eq!(
        instructions(&tac, "main"),
        vec!["WRITEI i", "WRITEF f", "WRITEC c", "WRITEI b", "RETURN"]
    );
}

#[test]
fn string_writes_decode_escapes() {
    let tac = gen("func main() write \"ab\\n\\tc\"; endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "CHLOAD %t1, a",
            "WRITEC %t1",
            "CHLOAD %t1, b",
            "WRITEC %t1",
            "WRITELN",
            "CHLOAD %t1, \\t",
            "WRITEC %t1",
            "CHLOAD %t1, c",
            "WRITEC %t1",
            "RETURN",
        ]
    );
}

#[test]
fn char_literal_loads_strip_quotes() {
    let tac = gen("func main() var c: char endvar c = 'z'; endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec!["CHLOAD %t1, z", "LOAD c, %t1", "RETURN"]
    );
}

#[test]
fn float_literals_use_fload() {
    let tac = gen("func main() var f: float endvar f = 2.5; endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec!["FLOAD %t1, 2.5", "LOAD f, %t1", "RETURN"]
    );
}

#[test]
fn return_loads_the_result_slot() {
    let tac = gen("func f(): int return 42; endfunc func main() endfunc");
    assert_eq!(
        instructions(&tac, "f"),
        vec!["ILOAD %t1, 42", "LOAD _result, %t1", "RETURN", "RETURN"]
    );
}

#[test]
fn int_actual_widens_for_float_formal_in_procedure_call() {
    let tac = gen("func p(x: float) endfunc func main() p(3); endfunc");
    assert_eq!(
        instructions(&tac, "main"),
        vec![
            "ILOAD %t1, 3",
            "FLOAT %t2, %t1",
            "PUSH %t2",
            "CALL p",
            "POP",
            "RETURN",
        ]
    );
}
