//! Indented, line-oriented text rendering of messages and attributes.

use std::fmt::{self, Write};

const INDENT: &str = "    ";

/// Line writer with a nesting depth.
///
/// Every line is prefixed with one [`INDENT`] per level and terminated with
/// a newline.
pub struct Printer<'a> {
    out: &'a mut dyn Write,
    depth: usize,
}

impl<'a> Printer<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out, depth: 0 }
    }

    /// Write one line at the current depth.
    pub fn line(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        for _ in 0..self.depth {
            self.out.write_str(INDENT)?;
        }
        self.out.write_fmt(args)?;
        self.out.write_char('\n')
    }

    /// Write `name: value`.
    pub fn field(&mut self, name: &str, value: impl fmt::Display) -> fmt::Result {
        self.line(format_args!("{name}: {value}"))
    }

    /// Write `name:` and run `body` one level deeper.
    pub fn block(
        &mut self,
        name: impl fmt::Display,
        body: impl FnOnce(&mut Self) -> fmt::Result,
    ) -> fmt::Result {
        self.line(format_args!("{name}:"))?;
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Render `value` through a fresh [`Printer`] into a string.
pub fn to_string(render: impl FnOnce(&mut Printer<'_>) -> fmt::Result) -> String {
    let mut out = String::new();
    let mut p = Printer::new(&mut out);
    // Writing into a String cannot fail.
    let _ = render(&mut p);
    out
}
