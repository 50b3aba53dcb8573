//! Render smali disassembly as Java-like source.
//!
//! Translation works one file at a time. Each line is [lexed](crate::lex) into an
//! [`Instruction`](crate::lex::Instruction), handed to the
//! [`Translator`](crate::translate::Translator), and the translator grows an
//! [`OutputUnit`](crate::unit::OutputUnit): class and member declarations, plus a
//! best-effort reconstruction of method bodies. Instructions outside the small
//! vocabulary the translator understands are kept as `//` comments.
//!
//! ```
//! # use smali2java::{Options, session::translate_source};
//! let source = ".class public Lcom/example/Greeter;\n\
//!               .super Ljava/lang/Object;\n\
//!               .method public static greet()Ljava/lang/String;\n\
//!               const-string v0, \"hello\"\n\
//!               return-object v0\n\
//!               .end method\n\
//!               .end class\n";
//! let unit = translate_source(source, &Options::default()).unwrap();
//! assert_eq!(unit.to_string(),
//!     "public class Greeter {\n\
//!      public static java.lang.String greet (  ) {\n\
//!      final String v0 = \"hello\" ;\n\
//!      return  v0;\n\
//!      }\n\
//!      }\n");
//! ```
//!
//! Whole directory trees are handled by [`discover`], which translates every
//! `.smali` file it finds in parallel.

pub mod error;

pub mod lex;
pub mod descriptor;
pub mod parse;
pub mod unit;
pub mod translate;
pub mod session;
pub mod discover;

mod util;

/// How forgiving the translator is about the shape of operands.
///
/// Smali emitted by different disassemblers varies a little, so the default is
/// to accept anything that can be sliced into the expected pieces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LeniencyLevel {
    /// Object descriptors are unwrapped without checking for `L` and `;`,
    /// and trailing commas after destination registers are optional.
    Lenient,
    /// Object descriptors must look like `L<path>;` and destination
    /// registers must carry their trailing comma.
    Strict,
}

impl Default for LeniencyLevel {
    fn default() -> Self {
        LeniencyLevel::Lenient
    }
}

impl LeniencyLevel {
    pub fn requires_descriptor_wrapper(&self) -> bool {
        match self {
            LeniencyLevel::Lenient => false,
            LeniencyLevel::Strict => true,
        }
    }

    pub fn requires_trailing_comma(&self) -> bool {
        match self {
            LeniencyLevel::Lenient => false,
            LeniencyLevel::Strict => true,
        }
    }
}

/// Settings shared by every file translated in one run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Options {
    pub leniency: LeniencyLevel,
    /// Translate the `sget` family into assignments instead of passing them through.
    pub static_field_reads: bool,
}
