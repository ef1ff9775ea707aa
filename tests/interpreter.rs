mod common;

use common::{run, run_ok};
use pretty_assertions::assert_eq;
use rox::session::Outcome;

fn runtime_error(source: &str) -> (String, String) {
    match run(source) {
        (Outcome::RuntimeError(e), output) => (e.to_string(), output),
        (other, _) => panic!("expected a runtime error, got {:?}", other),
    }
}

#[test]
fn arithmetic_and_printing() {
    assert_eq!(
        run_ok("print 1 + 2 * 3;\nprint (1 + 2) * 3;\nprint 7 / 2;\nprint -4 - -1;"),
        "7\n9\n3.5\n-3\n"
    );
}

#[test]
fn division_by_zero_follows_floating_point() {
    assert_eq!(run_ok("print 1 / 0;\nprint -1 / 0;"), "inf\n-inf\n");
}

#[test]
fn string_concatenation() {
    assert_eq!(
        run_ok("var greeting = \"hello\" + \", \" + \"world\"; print greeting;"),
        "hello, world\n"
    );
}

#[test]
fn block_scoping_shadows_then_restores() {
    assert_eq!(
        run_ok("var a = 1; { var a = 2; print a; } print a;"),
        "2\n1\n"
    );
}

#[test]
fn assignment_reaches_enclosing_scope() {
    assert_eq!(run_ok("var a = 1; { a = a + 1; } print a;"), "2\n");
}

#[test]
fn uninitialized_variable_is_nil() {
    assert_eq!(run_ok("var a; print a;"), "nil\n");
}

#[test]
fn truthiness_only_nil_and_false_are_falsey() {
    assert_eq!(
        run_ok("print !nil; print !false; print !0; print !\"\"; print !!true;"),
        "true\ntrue\nfalse\nfalse\ntrue\n"
    );
}

#[test]
fn equality_never_converts_between_kinds() {
    assert_eq!(
        run_ok(
            "print 1 == \"1\";\nprint nil == false;\nprint nil == nil;\n\
             print \"a\" == \"a\";\nprint 2 != 3;"
        ),
        "false\nfalse\ntrue\ntrue\ntrue\n"
    );
}

#[test]
fn logical_operators_return_an_operand() {
    assert_eq!(
        run_ok(
            "print nil or \"yes\";\nprint 1 or 2;\nprint nil and 1;\nprint 1 and 2;"
        ),
        "yes\n1\nnil\n2\n"
    );
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(
        run_ok(
            "var hit = false;\n\
             fun touch() { hit = true; return true; }\n\
             var r = false and touch();\n\
             r = true or touch();\n\
             print hit;"
        ),
        "false\n"
    );
}

#[test]
fn if_else_and_while() {
    assert_eq!(
        run_ok(
            "var i = 0;\n\
             while (i < 3) { if (i == 1) print \"one\"; else print i; i = i + 1; }"
        ),
        "0\none\n2\n"
    );
}

#[test]
fn for_loop_counts() {
    assert_eq!(
        run_ok("for (var i = 0; i < 3; i = i + 1) print i;"),
        "0\n1\n2\n"
    );
}

#[test]
fn closures_capture_their_defining_scope() {
    assert_eq!(
        run_ok(
            "fun make(n) { fun add(x) { return x + n; } return add; }\n\
             var add5 = make(5);\n\
             print add5(3);"
        ),
        "8\n"
    );
}

#[test]
fn closures_share_mutable_state() {
    assert_eq!(
        run_ok(
            "fun counter() { var i = 0; fun inc() { i = i + 1; return i; } return inc; }\n\
             var c = counter();\n\
             c(); c();\n\
             print c();\n\
             var d = counter();\n\
             print d();"
        ),
        "3\n1\n"
    );
}

#[test]
fn loop_body_block_variables_are_fresh_per_iteration() {
    assert_eq!(
        run_ok(
            "var fns0; var fns1;\n\
             for (var i = 0; i < 2; i = i + 1) {\n\
               var j = i;\n\
               fun show() { print j; }\n\
               if (j == 0) fns0 = show; else fns1 = show;\n\
             }\n\
             fns0();\n\
             fns1();"
        ),
        "0\n1\n"
    );
}

#[test]
fn resolution_is_static_not_dynamic() {
    assert_eq!(
        run_ok(
            "var a = \"global\";\n\
             {\n\
               fun showA() { print a; }\n\
               showA();\n\
               var a = \"block\";\n\
               showA();\n\
             }"
        ),
        "global\nglobal\n"
    );
}

#[test]
fn recursion() {
    assert_eq!(
        run_ok(
            "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }\n\
             print fib(15);"
        ),
        "610\n"
    );
}

#[test]
fn return_unwinds_out_of_loops() {
    assert_eq!(
        run_ok(
            "fun first(limit) {\n\
               var i = 0;\n\
               while (true) { if (i * i > limit) return i; i = i + 1; }\n\
             }\n\
             print first(10);"
        ),
        "4\n"
    );
}

#[test]
fn function_without_return_yields_nil() {
    assert_eq!(run_ok("fun f() {} print f();"), "nil\n");
}

#[test]
fn callable_display() {
    assert_eq!(
        run_ok(
            "fun f() {}\nclass Bagel {}\n\
             print f;\nprint clock;\nprint Bagel;\nprint Bagel();"
        ),
        "<fn f>\n<native fn>\nBagel\nBagel instance\n"
    );
}

#[test]
fn clock_returns_seconds() {
    assert_eq!(
        run_ok("var t = clock(); print t > 0; print t - t;"),
        "true\n0\n"
    );
}

#[test]
fn fields_and_methods() {
    assert_eq!(
        run_ok(
            "class Counter {\n\
               init(start) { this.count = start; }\n\
               bump() { this.count = this.count + 1; return this; }\n\
             }\n\
             var c = Counter(10);\n\
             c.bump().bump();\n\
             print c.count;"
        ),
        "12\n"
    );
}

#[test]
fn bound_method_remembers_its_instance() {
    assert_eq!(
        run_ok(
            "class Person { init(name) { this.name = name; } greet() { print \"hi \" + this.name; } }\n\
             var greet = Person(\"ada\").greet;\n\
             greet();"
        ),
        "hi ada\n"
    );
}

#[test]
fn initializer_always_yields_the_instance() {
    assert_eq!(
        run_ok(
            "class A { init() { this.x = 1; return; } }\n\
             var a = A();\n\
             print a;\n\
             print a.init() == a;\n\
             print a.x;"
        ),
        "A instance\ntrue\n1\n"
    );
}

#[test]
fn initializer_discards_an_explicit_return_value() {
    assert_eq!(
        run_ok(
            "class A { init() { return 5; } }\n\
             var a = A();\n\
             print a;\n\
             print a.init();"
        ),
        "A instance\nA instance\n"
    );
}

#[test]
fn field_shadows_method() {
    assert_eq!(
        run_ok(
            "class A { m() { return \"method\"; } }\n\
             var a = A();\n\
             print a.m();\n\
             a.m = \"field\";\n\
             print a.m;"
        ),
        "method\nfield\n"
    );
}

#[test]
fn instances_compare_by_identity() {
    assert_eq!(
        run_ok("class A {} var a = A(); var b = A(); print a == a; print a == b;"),
        "true\nfalse\n"
    );
}

#[test]
fn type_error_stops_before_print() {
    let (error, output) = runtime_error("print 1 + \"a\";");

    assert_eq!(
        error,
        "Operands must be two numbers or two strings.\n[line 1]"
    );
    assert_eq!(output, "");
}

#[test]
fn output_before_a_runtime_error_is_kept() {
    let (error, output) = runtime_error("print 1;\nprint -\"x\";\nprint 2;");

    assert_eq!(error, "Operand must be a number.\n[line 2]");
    assert_eq!(output, "1\n");
}

#[test]
fn comparison_requires_numbers() {
    let (error, _) = runtime_error("print \"a\" < \"b\";");

    assert_eq!(error, "Operands must be numbers.\n[line 1]");
}

#[test]
fn undefined_variable() {
    let (error, _) = runtime_error("print 1;\nprint missing;");

    assert_eq!(error, "Undefined variable 'missing'.\n[line 2]");
}

#[test]
fn assigning_undeclared_global() {
    let (error, _) = runtime_error("missing = 1;");

    assert_eq!(error, "Undefined variable 'missing'.\n[line 1]");
}

#[test]
fn calling_a_non_callable() {
    let (error, _) = runtime_error("\"nope\"();");

    assert_eq!(error, "Can only call functions and classes.\n[line 1]");
}

#[test]
fn arity_mismatch_does_not_run_the_body() {
    let (error, output) = runtime_error("fun f(a, b) { print \"ran\"; }\nf(1);");

    assert_eq!(error, "Expected 2 arguments but got 1.\n[line 2]");
    assert_eq!(output, "");
}

#[test]
fn class_arity_comes_from_init() {
    let (error, _) = runtime_error("class P { init(x) {} }\nP();");

    assert_eq!(error, "Expected 1 arguments but got 0.\n[line 2]");
}

#[test]
fn property_errors() {
    let (error, _) = runtime_error("class A {}\nprint A().nope;");
    assert_eq!(error, "Undefined property 'nope'.\n[line 2]");

    let (error, _) = runtime_error("var x = 1;\nprint x.y;");
    assert_eq!(error, "Only instances have properties.\n[line 2]");

    let (error, _) = runtime_error("var x = 1;\nx.y = 2;");
    assert_eq!(error, "Only instances have fields.\n[line 2]");
}

#[test]
fn runtime_error_inside_call_reports_its_own_line() {
    let (error, _) = runtime_error("fun f() {\n  return nil + 1;\n}\nf();");

    assert_eq!(error, "Operands must be two numbers or two strings.\n[line 2]");
}

#[test]
fn output_is_deterministic_across_runs() {
    let source = "class A { init(n) { this.n = n; } }\n\
                  var total = 0;\n\
                  for (var i = 0; i < 5; i = i + 1) total = total + A(i).n;\n\
                  print total;";

    assert_eq!(run_ok(source), run_ok(source));
    assert_eq!(run_ok(source), "10\n");
}
