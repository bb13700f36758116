use super::{flatten_name, generate, CodegenError};
use crate::ast::{Node, Program};
use crate::parser::parse;
use crate::semantic::check;

fn compile(source: &str) -> String {
    let mut program = parse(source).unwrap();
    check(&mut program).unwrap();
    generate(&program).unwrap()
}

#[test]
fn test_main_adds_two_numbers() {
    let asm = compile("func int main() { return 1 + 2; }");

    let expected = [
        "    .text",
        "    .globl main",
        "main:",
        "    push %rbp",
        "    mov %rsp, %rbp",
        "    call initSystem",
        "    mov $1, %rax",
        "    push %rax",
        "    mov $2, %rax",
        "    mov %rax, %rdi",
        "    pop %rax",
        "    add %rdi, %rax",
        "    leave",
        "    ret",
        "    mov $0, %rax",
        "    leave",
        "    ret",
        "    .section .note.GNU-stack,\"\",@progbits",
    ]
    .map(|line| format!("{line}\n"))
    .concat();
    assert_eq!(asm, expected);
}

#[test]
fn test_generation_is_deterministic() {
    let source = "func int main() { let s = \"x\"; return 4 / 2; }";
    assert_eq!(compile(source), compile(source));
}

#[test]
fn test_duplicate_strings_share_a_label() {
    let asm = compile(
        "func main() {\n  let a = \"hi\";\n  let b = \"bye\";\n  let c = \"hi\";\n}",
    );

    assert!(asm.starts_with(
        "    .section .rodata\n.LC0:\n    .asciz \"hi\"\n.LC1:\n    .asciz \"bye\"\n    .text\n"
    ));
    assert_eq!(asm.matches(".asciz").count(), 2);
    assert_eq!(asm.matches("lea .LC0(%rip), %rax").count(), 2);
    assert_eq!(asm.matches("lea .LC1(%rip), %rax").count(), 1);
}

#[test]
fn test_no_rodata_without_strings() {
    let asm = compile("func int main() { return 0; }");
    assert!(!asm.contains(".rodata"));
}

#[test]
fn test_parameters_are_spilled_to_slots() {
    let asm = compile("func int add(int a, int b) { let c = a + b; return c; }");

    assert!(asm.contains("    .globl add\nadd:\n    push %rbp\n    mov %rsp, %rbp\n    sub $32, %rsp\n"));
    assert!(asm.contains("    mov %rdi, -8(%rbp)\n    mov %rsi, -16(%rbp)\n"));
    assert!(asm.contains("    mov -8(%rbp), %rax\n"));
    assert!(asm.contains("    mov -16(%rbp), %rax\n"));
    assert!(asm.contains("    mov %rax, -24(%rbp)\n"));
    assert!(!asm.contains("initSystem"));
}

#[test]
fn test_frame_size_rounds_to_sixteen() {
    let asm = compile("func f(int a) { }");
    assert!(asm.contains("sub $16, %rsp"));

    let asm = compile("func g() { }");
    assert!(!asm.contains("sub $"));
}

#[test]
fn test_uninitialized_local_is_zeroed() {
    let asm = compile("func main() { var x: int; x = 5; }");

    assert!(asm.contains("    movq $0, -8(%rbp)\n"));
    assert!(asm.contains("    mov $5, %rax\n    mov %rax, -8(%rbp)\n"));
}

#[test]
fn test_call_uses_flattened_name() {
    let asm = compile("func main() { sys.IO.print(7, 8); }");

    assert!(asm.contains(
        "    mov $7, %rax\n    push %rax\n    mov $8, %rax\n    push %rax\n    pop %rsi\n    pop %rdi\n    call sys_IO_print\n"
    ));
    assert_eq!(flatten_name("sys.Math.powInt"), "sys_Math_powInt");
}

#[test]
fn test_call_inside_binary_is_aligned() {
    let asm = compile("func int main() { return 1 + sys.Math.powInt(2, 3); }");
    assert!(asm.contains("    sub $8, %rsp\n    call sys_Math_powInt\n    add $8, %rsp\n"));
}

#[test]
fn test_literals() {
    let asm = compile("func main() { let t = true; let f = false; let x = 2.5; }");

    assert!(asm.contains("    mov $1, %rax\n"));
    assert!(asm.contains("    mov $0, %rax\n"));
    let bits = 2.5f64.to_bits() as i64;
    assert!(asm.contains(&format!("    movabs ${bits}, %rax    # 2.5\n")));
}

#[test]
fn test_division_and_subtraction() {
    let asm = compile("func int main() { return 8 / 2 - 1; }");

    assert!(asm.contains("    cqo\n    idiv %rdi\n"));
    assert!(asm.contains("    sub %rdi, %rax\n"));
}

#[test]
fn test_unknown_name_is_zero() {
    // Globals have no storage, so functions see them as unknown names.
    let asm = compile("let g = 1;\nfunc int main() { return g; }");
    assert!(asm.contains("    # unknown name g, using 0\n    mov $0, %rax\n"));
}

#[test]
fn test_newlines_in_strings_are_escaped() {
    let asm = compile("func main() { let s = \"a\nb\"; }");
    assert!(asm.contains("    .asciz \"a\\nb\"\n"));
}

#[test]
fn test_backslashes_are_literal_bytes() {
    let asm = compile("func main() { let p = \"C:\\\"; let q = \"a\\nb\"; }");

    assert!(asm.contains("    .asciz \"C:\\\\\"\n"));
    assert!(asm.contains("    .asciz \"a\\\\nb\"\n"));
    // The pool must not swallow the code that follows it.
    assert!(asm.contains("\n    .text\n    .globl main\nmain:\n"));
}

#[test]
fn test_non_printable_bytes_use_octal() {
    assert_eq!(super::escape_asm_string("\u{1}x\u{7f}"), "\\001x\\177");
    assert_eq!(super::escape_asm_string("é"), "\\303\\251");
}

#[test]
fn test_unsupported_callee() {
    let program = Program::new(vec![Node::function(
        "main",
        vec![],
        None,
        Program::new(vec![Node::call(
            Node::literal(crate::ast::Literal::Integer(1), 1),
            vec![],
            1,
        )]),
        1,
    )]);

    assert!(matches!(
        generate(&program),
        Err(CodegenError::UnsupportedCallee { line: 1 })
    ));
}

#[test]
fn test_too_many_call_arguments() {
    let arguments = (0..7)
        .map(|i| Node::literal(crate::ast::Literal::Integer(i), 1))
        .collect();
    let program = Program::new(vec![Node::function(
        "main",
        vec![],
        None,
        Program::new(vec![Node::call(Node::variable("f", 1), arguments, 1)]),
        1,
    )]);

    assert!(matches!(
        generate(&program),
        Err(CodegenError::TooManyArguments { count: 7, .. })
    ));
}

#[test]
fn test_assignment_to_global_is_an_error() {
    let mut program = parse("let g = 1;\nfunc main() {\n  g = 2;\n}").unwrap();
    check(&mut program).unwrap();

    match generate(&program) {
        Err(CodegenError::GlobalAssignment { name, line }) => {
            assert_eq!(name, "g");
            assert_eq!(line, 3);
        }
        other => panic!("Expected a global assignment error, got {other:?}"),
    }
}
