//! The per-file accumulator of rendered output.

use std::fmt::{Display, Formatter, Result};
use std::mem;

use itertools::Itertools;

/// One line of output, kept as tokens until it is printed.
///
/// Tokens are joined with single spaces, empty tokens included, so an empty
/// slot (a missing `static`, say) still shows up as an extra space.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RenderedLine {
    tokens: Vec<String>,
}

impl RenderedLine {
    pub fn new<I, T>(tokens: I) -> Self
        where I: IntoIterator<Item=T>,
              T: Into<String>
    {
        RenderedLine { tokens: tokens.into_iter().map(Into::into).collect() }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl Display for RenderedLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.tokens.iter().join(" "))
    }
}

/// Everything rendered so far for one file, plus the declaration state later
/// instructions depend on.
///
/// Lines are only ever appended, with one exception: the most recent line can
/// be swapped out with [`replace_last`](OutputUnit::replace_last), which is
/// how `.super` attaches an `extends` clause to the class declaration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OutputUnit {
    lines: Vec<RenderedLine>,
    class_name: Option<String>,
    /// Index of the line pushed by [`push_class_declaration`](OutputUnit::push_class_declaration).
    declaration: Option<usize>,
}

impl OutputUnit {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, line: RenderedLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    pub fn last(&self) -> Option<&RenderedLine> {
        self.lines.last()
    }

    /// Swap the most recently appended line for `line`, returning the old one.
    /// Does nothing and returns `None` if no line has been appended yet.
    pub fn replace_last(&mut self, line: RenderedLine) -> Option<RenderedLine> {
        self.lines.last_mut().map(|last| mem::replace(last, line))
    }

    /// Simple name of the class being declared, once `.class` has been seen.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Append the class declaration line and remember the class it names.
    pub fn push_class_declaration(&mut self, line: RenderedLine, name: impl Into<String>) {
        self.declaration = Some(self.lines.len());
        self.lines.push(line);
        self.class_name = Some(name.into());
    }

    /// Whether the most recent line is the class declaration.
    pub fn ends_with_declaration(&self) -> bool {
        match self.declaration {
            Some(index) => index + 1 == self.lines.len(),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Display for OutputUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
