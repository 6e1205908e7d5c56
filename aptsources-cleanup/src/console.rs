//! The operator's terminal, passed explicitly to everything that talks to them.
use std::io::{self, BufRead, Write};

/// Input, output and error streams plus the styling decision
pub struct Console<'a> {
    input: &'a mut dyn BufRead,
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    color: bool,
}

impl<'a> Console<'a> {
    /// Wraps the given streams, without styling
    pub fn new(
        input: &'a mut dyn BufRead,
        out: &'a mut dyn Write,
        err: &'a mut dyn Write,
    ) -> Self {
        Self {
            input,
            out,
            err,
            color: false,
        }
    }

    /// Enables or disables styled prompts
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Whether prompts are styled
    pub fn color(&self) -> bool {
        self.color
    }

    /// Stream for questions, notices and summaries
    pub fn out(&mut self) -> &mut (dyn Write + 'a) {
        &mut *self.out
    }

    /// Stream for errors and removal reports
    pub fn err(&mut self) -> &mut (dyn Write + 'a) {
        &mut *self.err
    }

    /// Reads one line of input, `None` at end of input
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        self.out.flush()?;
        let mut line = String::new();
        match self.input.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }
}
