use std::cell::RefCell;
use std::fmt::Display;
use std::io::{self, Write};
use std::rc::Rc;

/// Shared output sink. The language has a single output stream: program
/// output and diagnostics from every pass interleave on it, and tests capture
/// it by handing in a `Vec<u8>`.
#[derive(Clone)]
pub struct Reporter {
    out: Rc<RefCell<dyn Write>>,
}

impl Reporter {
    pub fn new(out: Rc<RefCell<dyn Write>>) -> Self {
        Reporter { out }
    }

    pub fn stdout() -> Self {
        Reporter {
            out: Rc::new(RefCell::new(io::stdout())),
        }
    }

    /// Log a diagnostic as one line. Write failures on the sink are ignored,
    /// the pipeline has nowhere else to complain to.
    pub fn report(&self, diag: impl Display) {
        let _ = writeln!(self.out.borrow_mut(), "{}", diag);
    }

    pub fn sink(&self) -> Rc<RefCell<dyn Write>> {
        self.out.clone()
    }
}
