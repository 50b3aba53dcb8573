use std::io;
use std::path::PathBuf;

use annotate_snippets::display_list::{DisplayList, FormatOptions};
use annotate_snippets::snippet::{Annotation, AnnotationType, Slice, Snippet, SourceAnnotation};
use thiserror::Error;

use crate::util::content_span;

/// Everything that can stop a file, or a whole run, from being translated.
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened, read, or written.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a rendered unit to standard output failed.
    #[error("could not write output: {0}")]
    Output(#[source] io::Error),

    /// The directory tree could not be traversed.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// A line in the file could not be split into the pieces its mnemonic calls for.
    #[error("{}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: MalformedInstruction,
    },
}

/// A recognized instruction whose operands don't have the expected shape.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("malformed `{mnemonic}` on line {line_number}: {reason}")]
pub struct MalformedInstruction {
    pub mnemonic: String,
    pub line: String,
    pub line_number: usize,
    pub reason: MalformedReason,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MalformedReason {
    #[error("missing operand {index}")]
    MissingOperand { index: usize },
    #[error("`{token}` has no `{delimiter}`")]
    MissingDelimiter { token: String, delimiter: &'static str },
    #[error("`{token}` is not wrapped in `{open}` and `{close}`")]
    MissingWrapper { token: String, open: char, close: char },
    #[error("`{token}` is missing its trailing `,`")]
    MissingComma { token: String },
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    #[error("constructor declared before any `.class`")]
    ClassNameUnset,
    #[error("no class declaration directly before `.super`")]
    NoDeclaration,
}

/// A type descriptor that can't be turned into a type name.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum DescriptorError {
    #[error("empty type descriptor")]
    Empty,
    #[error("`{0}` is not an object descriptor (expected `L<path>;`)")]
    NotAnObject(String),
    #[error("array descriptor has {0} dimensions, more than the {max} allowed", max = crate::descriptor::MAX_ARRAY_DIMENSIONS)]
    TooManyDimensions(usize),
}

impl MalformedInstruction {
    /// Renders the error with the offending line underlined, rustc style.
    pub fn render_snippet(&self, origin: Option<&str>, color: bool) -> String {
        let title = self.to_string();
        let label = self.reason.to_string();
        let snippet = Snippet {
            title: Some(Annotation {
                id: None,
                label: Some(&title),
                annotation_type: AnnotationType::Error,
            }),
            footer: vec![],
            slices: vec![Slice {
                source: &self.line,
                line_start: self.line_number,
                origin,
                fold: false,
                annotations: vec![SourceAnnotation {
                    range: content_span(&self.line),
                    label: &label,
                    annotation_type: AnnotationType::Error,
                }],
            }],
            opt: FormatOptions {
                color,
                ..Default::default()
            },
        };
        DisplayList::from(snippet).to_string()
    }
}

impl Error {
    /// The instruction-level cause, when there is one.
    pub fn malformed(&self) -> Option<&MalformedInstruction> {
        match self {
            Error::Malformed { source, .. } => Some(source),
            _ => None,
        }
    }
}
