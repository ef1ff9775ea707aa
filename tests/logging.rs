mod common;

use common::run_ok;
use log::LevelFilter;
use pretty_assertions::assert_eq;

/// Same logger shape the binary installs for `--log`, writing to the test
/// harness instead of a file.
fn init_debug_logger() {
    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

#[test]
fn instance_stored_in_its_own_field_with_debug_logging() {
    init_debug_logger();

    assert_eq!(
        run_ok("class A {}\nvar a = A();\na.me = a;\nprint a.me;\nprint a.me.me == a;"),
        "A instance\ntrue\n"
    );
}

#[test]
fn full_program_runs_with_debug_logging() {
    init_debug_logger();

    assert_eq!(
        run_ok(
            "class Node { init(next) { this.next = next; this.self = this; } }\n\
             var n = Node(Node(nil));\n\
             print n.self.next.next;"
        ),
        "nil\n"
    );
}
