use pretty_assertions::assert_eq;
use rox::ast::{Expr, Stmt};
use rox::ast_printer::AstPrinter;
use rox::error::Diagnostics;
use rox::parser::Parser;
use rox::scanner::Scanner;

fn parse_program(source: &str) -> (Vec<Stmt>, Diagnostics) {
    let (tokens, diagnostics) = Scanner::new(source).scan_tokens();
    assert!(diagnostics.is_empty(), "unexpected lex errors");
    Parser::new(tokens).parse()
}

fn print_expression(source: &str) -> String {
    let (tokens, _) = Scanner::new(source).scan_tokens();
    let expr = Parser::new(tokens)
        .parse_expression()
        .unwrap_or_else(|e| panic!("parse failed: {}", e));
    AstPrinter::print(&expr)
}

fn messages(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics.iter().map(|e| e.to_string()).collect()
}

#[test]
fn negation_times_group_prints_canonically() {
    assert_eq!(print_expression("-1 * (2 + 3)"), "(* (- 1) (group (+ 2 3)))");
}

#[test]
fn precedence_climbs_from_factor_to_equality() {
    assert_eq!(
        print_expression("1 + 2 * 3 == 7 > 6"),
        "(== (+ 1 (* 2 3)) (> 7 6))"
    );
    assert_eq!(print_expression("1 - 2 - 3"), "(- (- 1 2) 3)");
    assert_eq!(print_expression("!!true"), "(! (! true))");
}

#[test]
fn logical_operators_bind_looser_than_equality() {
    assert_eq!(
        print_expression("a or b and c == nil"),
        "(or a (and b (== c nil)))"
    );
}

#[test]
fn assignment_is_right_associative() {
    assert_eq!(print_expression("a = b = 2.5"), "(= a (= b 2.5))");
}

#[test]
fn calls_and_property_chains() {
    assert_eq!(
        print_expression("point.move(1, \"x\").y = this"),
        "(= (. (call (. point move) 1 x) y) this)"
    );
}

#[test]
fn for_loop_desugars_into_block_with_while() {
    let (statements, diagnostics) =
        parse_program("for (var i = 0; i < 3; i = i + 1) print i;");

    assert!(diagnostics.is_empty());
    assert_eq!(statements.len(), 1);

    let Stmt::Block(outer) = &statements[0] else {
        panic!("expected block, got {:?}", statements[0]);
    };
    assert!(matches!(outer[0], Stmt::Var { .. }));

    let Stmt::While { body, .. } = &outer[1] else {
        panic!("expected while, got {:?}", outer[1]);
    };
    let Stmt::Block(inner) = body.as_ref() else {
        panic!("expected body block, got {:?}", body);
    };
    assert!(matches!(inner[0], Stmt::Print(_)));
    assert!(matches!(inner[1], Stmt::Expression(Expr::Assign { .. })));
}

#[test]
fn for_loop_without_clauses_loops_on_true() {
    let (statements, diagnostics) = parse_program("for (;;) print 1;");

    assert!(diagnostics.is_empty());
    assert!(matches!(
        &statements[0],
        Stmt::While { body, .. } if matches!(body.as_ref(), Stmt::Print(_))
    ));
}

#[test]
fn else_binds_to_nearest_if() {
    let (statements, _) = parse_program("if (a) if (b) print 1; else print 2;");

    let Stmt::If {
        then_branch,
        else_branch,
        ..
    } = &statements[0]
    else {
        panic!("expected if");
    };
    assert!(else_branch.is_none());
    assert!(matches!(
        then_branch.as_ref(),
        Stmt::If { else_branch: Some(_), .. }
    ));
}

#[test]
fn synchronization_reports_each_broken_statement() {
    let (statements, diagnostics) = parse_program(
        "var = 1;\nprint 2;\nprint (3;\nvar ok = 4;",
    );

    assert_eq!(
        messages(&diagnostics),
        vec![
            "[line 1] Error at '=': Expect variable name.",
            "[line 3] Error at ';': Expect ')' after expression.",
        ]
    );
    assert_eq!(statements.len(), 2);
    assert!(matches!(statements[0], Stmt::Print(_)));
    assert!(matches!(&statements[1], Stmt::Var { name, .. } if name.lexeme == "ok"));
}

#[test]
fn error_at_end_of_input() {
    let (_, diagnostics) = parse_program("print 1 +");

    assert_eq!(
        messages(&diagnostics),
        vec!["[line 1] Error at end: Expect expression."]
    );
}

#[test]
fn broken_statement_inside_block_is_dropped_only() {
    let (statements, diagnostics) = parse_program("{ print ; print 1; }");

    assert_eq!(diagnostics.len(), 1);
    let Stmt::Block(inner) = &statements[0] else {
        panic!("expected block");
    };
    assert_eq!(inner.len(), 1);
}

#[test]
fn invalid_assignment_target_is_reported_without_unwinding() {
    let (statements, diagnostics) = parse_program("1 + 2 = 3; print 4;");

    assert_eq!(
        messages(&diagnostics),
        vec!["[line 1] Error at '=': Invalid assignment target."]
    );
    assert_eq!(statements.len(), 2);
}

#[test]
fn too_many_arguments_is_not_fatal() {
    let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
    let source = format!("f({});", args.join(", "));
    let (statements, diagnostics) = parse_program(&source);

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics
        .iter()
        .all(|e| e.message() == "Can't have more than 255 arguments."));
    assert!(matches!(
        &statements[0],
        Stmt::Expression(Expr::Call { arguments, .. }) if arguments.len() == 256
    ));
}

#[test]
fn class_with_methods() {
    let (statements, diagnostics) =
        parse_program("class Point { init(x, y) { this.x = x; } norm() { return 0; } }");

    assert!(diagnostics.is_empty());
    let Stmt::Class { name, methods } = &statements[0] else {
        panic!("expected class");
    };
    assert_eq!(name.lexeme, "Point");
    let names: Vec<&str> = methods.iter().map(|m| m.name.lexeme.as_str()).collect();
    assert_eq!(names, vec!["init", "norm"]);
    assert_eq!(methods[0].params.len(), 2);
}

#[test]
fn parse_expression_rejects_trailing_tokens() {
    let (tokens, _) = Scanner::new("1 2").scan_tokens();
    let error = Parser::new(tokens)
        .parse_expression()
        .err()
        .map(|e| e.to_string());

    assert_eq!(
        error,
        Some("[line 1] Error at '2': Expect end of expression.".to_string())
    );
}
