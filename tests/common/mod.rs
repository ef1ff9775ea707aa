#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::session::{Outcome, Session};

/// `print` sink that the test keeps a handle to.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session wired to a fresh capture buffer.
pub fn session() -> (Session, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let session = Session::with_output(Box::new(buffer.clone()));
    (session, buffer)
}

/// Runs `source` in a fresh session, returning the outcome and printed output.
pub fn run(source: &str) -> (Outcome, String) {
    let (mut session, buffer) = session();
    let outcome = session.run(source);
    (outcome, buffer.contents())
}

/// Runs a program that must succeed and returns its output.
pub fn run_ok(source: &str) -> String {
    let (outcome, output) = run(source);
    assert!(
        outcome.is_success(),
        "program failed: {:?}\noutput so far:\n{}",
        outcome.errors().iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        output
    );
    output
}
