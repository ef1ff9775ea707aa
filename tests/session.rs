mod common;

use common::{run, session};
use pretty_assertions::assert_eq;
use rox::session::{Outcome, EXIT_RUNTIME_ERROR, EXIT_STATIC_ERROR};

fn rendered(outcome: &Outcome) -> Vec<String> {
    outcome.errors().iter().map(|e| e.to_string()).collect()
}

#[test]
fn exit_codes() {
    let (ok, _) = run("print 1;");
    let (static_error, _) = run("print ;");
    let (runtime_error, _) = run("print -nil;");

    assert_eq!(ok.exit_code(), 0);
    assert_eq!(static_error.exit_code(), EXIT_STATIC_ERROR);
    assert_eq!(runtime_error.exit_code(), EXIT_RUNTIME_ERROR);
    assert_eq!(EXIT_STATIC_ERROR, 65);
    assert_eq!(EXIT_RUNTIME_ERROR, 70);
}

#[test]
fn lexical_and_syntax_errors_are_reported_together() {
    let (outcome, output) = run("print @;\nvar = 2;\nprint 3;");

    assert!(matches!(outcome, Outcome::StaticErrors(_)));
    assert_eq!(
        rendered(&outcome),
        vec![
            "[line 1] Error: Unexpected character: @",
            "[line 1] Error at ';': Expect expression.",
            "[line 2] Error at '=': Expect variable name.",
        ]
    );
    assert_eq!(output, "", "nothing runs when a static error was found");
}

#[test]
fn resolution_errors_prevent_execution() {
    let (outcome, output) = run("print 1;\n{ var a = 1; var a = 2; }");

    assert_eq!(outcome.exit_code(), EXIT_STATIC_ERROR);
    assert_eq!(
        rendered(&outcome),
        vec!["[line 2] Error at 'a': Already a variable with this name in this scope."]
    );
    assert_eq!(output, "");
}

#[test]
fn syntax_errors_skip_resolution() {
    // The `return` would be a resolution error, but parsing already failed.
    let (outcome, _) = run("return 1;\nprint (;");

    assert_eq!(
        rendered(&outcome),
        vec!["[line 2] Error at ';': Expect expression."]
    );
}

#[test]
fn globals_persist_between_runs() {
    let (mut session, buffer) = session();

    assert!(session.run("var a = 1;").is_success());
    assert!(session.run("fun inc() { a = a + 1; }").is_success());
    assert!(session.run("inc(); inc();").is_success());
    assert!(session.run("print a;").is_success());

    assert_eq!(buffer.contents(), "3\n");
}

#[test]
fn errors_do_not_leak_into_the_next_run() {
    let (mut session, buffer) = session();

    assert_eq!(session.run("print ;").exit_code(), EXIT_STATIC_ERROR);
    assert_eq!(session.run("print nope;").exit_code(), EXIT_RUNTIME_ERROR);
    assert!(session.run("print \"still fine\";").is_success());

    assert_eq!(buffer.contents(), "still fine\n");
}

#[test]
fn runtime_error_inside_a_block_restores_global_scope() {
    let (mut session, buffer) = session();

    let outcome = session.run("var a = \"outer\"; { var a = \"inner\"; print -a; }");
    assert_eq!(outcome.exit_code(), EXIT_RUNTIME_ERROR);

    assert!(session.run("print a;").is_success());
    assert_eq!(buffer.contents(), "outer\n");
}

#[test]
fn closures_from_earlier_runs_keep_working() {
    let (mut session, buffer) = session();

    session.run("fun make() { var n = 0; fun next() { n = n + 1; return n; } return next; }");
    session.run("var next = make();");
    session.run("next();");
    session.run("print next();");

    assert_eq!(buffer.contents(), "2\n");
}

#[test]
fn classes_defined_in_one_run_are_usable_later() {
    let (mut session, buffer) = session();

    session.run("class Box { init(v) { this.v = v; } get() { return this.v; } }");
    session.run("var b = Box(\"x\");");
    session.run("print b.get();");

    assert_eq!(buffer.contents(), "x\n");
}
