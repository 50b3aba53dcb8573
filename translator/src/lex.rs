//! Splitting smali source lines into [`Instruction`]s.
//!
//! Smali is line oriented: every significant line starts with a mnemonic (an
//! opcode like `invoke-static` or a directive like `.method`) followed by
//! operands. Lexing a line only splits it on whitespace and looks the first
//! token up in a fixed table; it doesn't check that the operands make sense.
//!
//! ```
//! # use smali2java::lex::*;
//! let instruction = lex_line("    const-string v0, \"hi\"", 3).unwrap();
//! assert_eq!(instruction.op, Some(Mnemonic::ConstString));
//! assert_eq!(instruction.mnemonic, "const-string");
//! assert_eq!(instruction.operands, vec!["v0,", "\"hi\""]);
//! assert_eq!(instruction.operand_src, "v0, \"hi\"");
//! ```
//!
//! Mnemonics missing from the table still lex; they just carry no [`Mnemonic`].

use crate::error::{MalformedInstruction, MalformedReason};

/// The instructions the translator knows how to render.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mnemonic {
    Class,
    Super,
    Field,
    Method,
    End,
    ReturnVoid,
    ReturnObject,
    ConstString,
    InvokeStatic,
    /// Any of the `sget` family. Only translated when enabled in [`Options`](crate::Options).
    StaticGet,
}

use Mnemonic::*;

impl Mnemonic {
    // Matched against the whole first token of a line, so order doesn't matter.
    const PATTERNS: [(&'static str, Mnemonic); 16] = [
        (".class",  Class),
        (".super",  Super),
        (".field",  Field),
        (".method", Method),
        (".end",    End),

        ("return-void",   ReturnVoid),
        ("return-object", ReturnObject),

        ("const-string",  ConstString),
        ("invoke-static", InvokeStatic),

        ("sget",         StaticGet),
        ("sget-object",  StaticGet),
        ("sget-boolean", StaticGet),
        ("sget-byte",    StaticGet),
        ("sget-char",    StaticGet),
        ("sget-short",   StaticGet),
        ("sget-wide",    StaticGet),
    ];

    pub fn from_token(token: &str) -> Option<Mnemonic> {
        Self::PATTERNS.iter()
            .find(|(pattern, _)| *pattern == token)
            .map(|(_, mnemonic)| *mnemonic)
    }
}

/// One non-empty line of smali, split on whitespace.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Instruction<'input> {
    /// The whole line as read, indentation included.
    pub src: &'input str,
    /// 1-based.
    pub line_number: usize,
    pub mnemonic: &'input str,
    pub op: Option<Mnemonic>,
    pub operands: Vec<&'input str>,
    /// Everything after the mnemonic, trimmed. Keeps the whitespace inside
    /// string literals and register lists that `operands` loses.
    pub operand_src: &'input str,
}

impl<'input> Instruction<'input> {
    pub fn operand(&self, index: usize) -> Result<&'input str, MalformedInstruction> {
        self.operands.get(index)
            .copied()
            .ok_or_else(|| self.malformed(MalformedReason::MissingOperand { index }))
    }

    /// The mnemonic followed by every operand, exactly as they appeared.
    pub fn tokens(&self) -> impl Iterator<Item=&'input str> + '_ {
        std::iter::once(self.mnemonic).chain(self.operands.iter().copied())
    }

    pub fn malformed(&self, reason: MalformedReason) -> MalformedInstruction {
        MalformedInstruction {
            mnemonic: self.mnemonic.to_string(),
            line: self.src.to_string(),
            line_number: self.line_number,
            reason,
        }
    }
}

/// Produce the [`Instruction`] on the given line, or `None` if the line is blank.
pub fn lex_line(src: &str, line_number: usize) -> Option<Instruction<'_>> {
    let mut words = src.split_whitespace();
    let mnemonic = words.next()?;
    let operands = words.collect::<Vec<_>>();

    let after_indent = src.trim_start();
    let operand_src = after_indent[mnemonic.len()..].trim();

    Some(Instruction {
        src,
        line_number,
        mnemonic,
        op: Mnemonic::from_token(mnemonic),
        operands,
        operand_src,
    })
}

/// Lex every line of `source`, skipping blank ones.
pub fn lex(source: &str) -> impl Iterator<Item=Instruction<'_>> {
    source.lines()
        .enumerate()
        .filter_map(|(index, line)| lex_line(line, index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_lines_have_no_instruction() {
        assert_eq!(lex_line("", 1), None);
        assert_eq!(lex_line(" \t  ", 1), None);
    }

    #[test]
    fn table_lookup_is_exact() {
        assert_eq!(Mnemonic::from_token(".class"), Some(Class));
        assert_eq!(Mnemonic::from_token("invoke-static"), Some(InvokeStatic));
        assert_eq!(Mnemonic::from_token("invoke-static/range"), None);
        assert_eq!(Mnemonic::from_token("const-string/jumbo"), None);
        assert_eq!(Mnemonic::from_token("sget-object"), Some(StaticGet));
        assert_eq!(Mnemonic::from_token(".CLASS"), None);
        assert_eq!(Mnemonic::from_token("invoke-virtual"), None);
        assert_eq!(Mnemonic::from_token(".classy"), None);
    }

    #[test]
    fn unrecognized_lines_still_lex() {
        let instruction = lex_line("foo bar baz", 9).unwrap();
        assert_eq!(instruction.op, None);
        assert_eq!(instruction.tokens().collect::<Vec<_>>(), vec!["foo", "bar", "baz"]);
        assert_eq!(instruction.line_number, 9);
    }

    #[test]
    fn operand_src_keeps_inner_whitespace() {
        let instruction = lex_line("\tinvoke-static {v0,  v1}, La;->b(II)V  ", 1).unwrap();
        assert_eq!(instruction.operand_src, "{v0,  v1}, La;->b(II)V");
        assert_eq!(instruction.operands, vec!["{v0,", "v1},", "La;->b(II)V"]);
    }

    #[test]
    fn missing_operand_is_malformed() {
        let instruction = lex_line(".super", 2).unwrap();
        let error = instruction.operand(0).unwrap_err();
        assert_eq!(error.mnemonic, ".super");
        assert_eq!(error.line_number, 2);
        assert_eq!(error.reason, MalformedReason::MissingOperand { index: 0 });
    }

    #[test]
    fn lex_numbers_lines_from_one() {
        let source = ".class public LA;\n\n.super Ljava/lang/Object;\n";
        let numbers = lex(source).map(|i| i.line_number).collect::<Vec<_>>();
        assert_eq!(numbers, vec![1, 3]);
    }
}
