use super::{parse, Location};
use crate::ast::{BinaryOperator, Literal, NodeKind, Type};

#[test]
fn test_function_declaration() {
    let program = parse("func int add(int a, int b) { return a + b; }").unwrap();

    assert_eq!(program.statements.len(), 1);
    let NodeKind::FunctionDecl(func) = &program.statements[0].kind else {
        panic!("Expected function declaration");
    };
    assert_eq!(func.name, "add");
    assert_eq!(func.return_type, Some(Type::Int));

    let params: Vec<_> = func
        .parameter_decls()
        .map(|p| (p.name.as_str(), p.var_type))
        .collect();
    assert_eq!(params, [("a", Some(Type::Int)), ("b", Some(Type::Int))]);

    assert_eq!(func.body.statements.len(), 1);
    match &func.body.statements[0].kind {
        NodeKind::Return { value: Some(value) } => match &value.kind {
            NodeKind::Binary { left, operator, right } => {
                assert_eq!(*operator, BinaryOperator::Plus);
                assert_eq!(left.dotted_name().as_deref(), Some("a"));
                assert_eq!(right.dotted_name().as_deref(), Some("b"));
            }
            other => panic!("Expected binary expression, got {other:?}"),
        },
        other => panic!("Expected return statement, got {other:?}"),
    }
}

#[test]
fn test_function_without_return_type() {
    let program = parse("func main() { }").unwrap();

    let func = program.functions().next().unwrap();
    assert_eq!(func.name, "main");
    assert_eq!(func.return_type, None);
    assert!(func.parameters.is_empty());
    assert!(func.body.statements.is_empty());
}

#[test]
fn test_missing_paren_fails_with_diagnostics() {
    let err = parse("func int main( { return 0; }").unwrap_err();

    assert!(!err.diagnostics.is_empty());
    assert_eq!(err.line(), 1);
    assert_eq!(
        err.diagnostics[0].to_string(),
        "[line 1] Error at '{': Expect parameter type."
    );
}

#[test]
fn test_error_at_end() {
    let err = parse("let x = 1").unwrap_err();

    assert_eq!(err.diagnostics.len(), 1);
    assert_eq!(err.diagnostics[0].location, Location::End);
    assert_eq!(
        err.to_string(),
        "[line 1] Error at end: Expect ';' after variable declaration."
    );
}

#[test]
fn test_variable_declaration_forms() {
    let program = parse("let a: int = 1;\nvar b float;\nlet c = \"hi\";\nvar d;").unwrap();

    let decls: Vec<_> = program
        .statements
        .iter()
        .map(|stmt| match &stmt.kind {
            NodeKind::VarDecl(decl) => (decl.name.as_str(), decl.var_type, decl.initializer.is_some(), stmt.line),
            other => panic!("Expected variable declaration, got {other:?}"),
        })
        .collect();

    assert_eq!(
        decls,
        [
            ("a", Some(Type::Int), true, 1),
            ("b", Some(Type::Float), false, 2),
            ("c", None, true, 3),
            ("d", None, false, 4),
        ]
    );
}

#[test]
fn test_void_variable_is_rejected() {
    let err = parse("let v: void;").unwrap_err();
    assert_eq!(err.diagnostics[0].message, "Variables cannot have type 'void'.");
}

#[test]
fn test_literals() {
    let program = parse("let a = 42;\nlet b = 2.5;\nlet c = \"text\";\nlet d = true;\nlet e = null;").unwrap();

    let values: Vec<_> = program
        .statements
        .iter()
        .map(|stmt| match &stmt.kind {
            NodeKind::VarDecl(decl) => match &decl.initializer.as_deref().unwrap().kind {
                NodeKind::Literal(literal) => literal.clone(),
                other => panic!("Expected literal, got {other:?}"),
            },
            other => panic!("Expected variable declaration, got {other:?}"),
        })
        .collect();

    assert_eq!(
        values,
        [
            Literal::Integer(42),
            Literal::Float(2.5),
            Literal::String("text".to_string()),
            Literal::Boolean(true),
            Literal::Null,
        ]
    );
}

#[test]
fn test_integer_out_of_range() {
    let err = parse("let n = 99999999999999999999;").unwrap_err();

    assert_eq!(err.diagnostics.len(), 1);
    assert_eq!(err.diagnostics[0].message, "Number literal out of range.");
}

#[test]
fn test_operators_are_left_associative() {
    let program = parse("1 - 2 * 3;").unwrap();

    let NodeKind::Binary { left, operator, right } = &program.statements[0].kind else {
        panic!("Expected binary expression");
    };
    assert_eq!(*operator, BinaryOperator::Star);
    assert!(matches!(right.kind, NodeKind::Literal(Literal::Integer(3))));
    assert!(matches!(
        left.kind,
        NodeKind::Binary { operator: BinaryOperator::Minus, .. }
    ));
}

#[test]
fn test_parenthesised_expression() {
    let program = parse("1 - (2 * 3);").unwrap();

    let NodeKind::Binary { operator, right, .. } = &program.statements[0].kind else {
        panic!("Expected binary expression");
    };
    assert_eq!(*operator, BinaryOperator::Minus);
    assert!(matches!(
        right.kind,
        NodeKind::Binary { operator: BinaryOperator::Star, .. }
    ));
}

#[test]
fn test_dotted_call() {
    let program = parse("sys.IO.print(1, x);").unwrap();

    let NodeKind::Call { callee, arguments } = &program.statements[0].kind else {
        panic!("Expected call");
    };
    assert_eq!(callee.dotted_name().as_deref(), Some("sys.IO.print"));
    assert_eq!(arguments.len(), 2);
}

#[test]
fn test_member_chain_without_call() {
    let program = parse("a.b.c;").unwrap();

    let stmt = &program.statements[0];
    assert!(matches!(stmt.kind, NodeKind::MemberAccess { .. }));
    assert_eq!(stmt.dotted_name().as_deref(), Some("a.b.c"));
}

#[test]
fn test_missing_member_name() {
    let err = parse("a.;").unwrap_err();
    assert_eq!(err.diagnostics[0].message, "Expect member name after '.'.");
}

#[test]
fn test_assignment_statement() {
    let program = parse("func f() { var x: int; x = 3; }").unwrap();

    let func = program.functions().next().unwrap();
    match &func.body.statements[1].kind {
        NodeKind::Assign { target, value } => {
            assert_eq!(target.dotted_name().as_deref(), Some("x"));
            assert!(matches!(value.kind, NodeKind::Literal(Literal::Integer(3))));
        }
        other => panic!("Expected assignment, got {other:?}"),
    }
}

#[test]
fn test_include_directive() {
    let program = parse("#include <sys>\nfunc main() { }").unwrap();

    assert_eq!(program.statements.len(), 2);
    match &program.statements[0].kind {
        NodeKind::Include { path } => assert_eq!(path, "<sys>"),
        other => panic!("Expected include, got {other:?}"),
    }
    assert!(matches!(program.statements[1].kind, NodeKind::FunctionDecl(_)));
}

#[test]
fn test_include_without_name() {
    let err = parse("#include\nlet x = 1;").unwrap_err();
    assert_eq!(err.diagnostics[0].message, "Expect file name after '#include'.");
}

#[test]
fn test_recovery_reports_every_declaration() {
    let err = parse("let = 1;\nlet y 2;\nlet z = 3;").unwrap_err();

    let lines: Vec<_> = err.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, [1, 2]);
    assert_eq!(err.diagnostics[0].message, "Expect variable name.");
    assert_eq!(err.diagnostics[1].message, "Expect ';' after variable declaration.");
}

#[test]
fn test_recovery_inside_function_body() {
    let err = parse("func main() {\n  let x = ;\n  let y = ;\n}\nfunc g() { }").unwrap_err();

    let lines: Vec<_> = err.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, [2, 3]);
    assert!(err.diagnostics.iter().all(|d| d.message == "Expect expression."));
}

#[test]
fn test_lexer_error_becomes_diagnostic() {
    let err = parse("let x = @;").unwrap_err();

    assert_eq!(err.diagnostics.len(), 1);
    assert_eq!(err.diagnostics[0].location, Location::Lexer);
    assert_eq!(err.to_string(), "[line 1] Error: Unexpected character.");
}

#[test]
fn test_unconsumable_token_makes_progress() {
    let err = parse(") ) )").unwrap_err();
    assert!(!err.diagnostics.is_empty());
}
