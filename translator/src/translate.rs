//! Dispatching instructions onto an [`OutputUnit`].
//!
//! The [`Translator`] owns one file's [`OutputUnit`] and is fed that file's
//! instructions in order. Recognized mnemonics are parsed with a
//! [`SignatureParser`] and rendered as Java-ish lines; everything else is kept
//! verbatim behind a `//` so nothing from the input silently disappears.

use log::trace;

use crate::descriptor::{is_root_object, simple_name};
use crate::error::{MalformedInstruction, MalformedReason};
use crate::lex::{lex_line, Instruction, Mnemonic};
use crate::parse::{ClassDecl, FieldDecl, MethodDecl, MethodKind, SignatureParser, StaticCall, StaticRead, StringConstant};
use crate::unit::{OutputUnit, RenderedLine};
use crate::Options;

const CLASS_KEYWORD: &str = "class";
const EXTENDS_KEYWORD: &str = "extends";
const STATIC_KEYWORD: &str = "static";
const COMMENT_MARKER: &str = "//";

pub struct Translator {
    unit: OutputUnit,
    parser: SignatureParser,
    static_field_reads: bool,
}

impl Translator {
    pub fn new(options: &Options) -> Self {
        Translator {
            unit: OutputUnit::new(),
            parser: SignatureParser::new(options.leniency),
            static_field_reads: options.static_field_reads,
        }
    }

    /// Lex and translate one source line. Blank lines are skipped.
    pub fn translate_line(&mut self, src: &str, line_number: usize) -> Result<(), MalformedInstruction> {
        match lex_line(src, line_number) {
            Some(instruction) => self.translate(&instruction),
            None => Ok(()),
        }
    }

    pub fn translate(&mut self, instruction: &Instruction) -> Result<(), MalformedInstruction> {
        let op = match instruction.op {
            Some(Mnemonic::StaticGet) if !self.static_field_reads => None,
            op => op,
        };

        match op {
            Some(Mnemonic::Class) => self.class(instruction)?,
            Some(Mnemonic::Super) => self.super_class(instruction)?,
            Some(Mnemonic::Field) => {
                let field = self.parser.field(instruction)?;
                self.unit.push(field_line(&field));
            }
            Some(Mnemonic::Method) => self.method(instruction)?,
            Some(Mnemonic::End) => self.unit.push(RenderedLine::new(vec!["}"])),
            Some(Mnemonic::ReturnVoid) => self.unit.push(RenderedLine::new(vec!["return;"])),
            Some(Mnemonic::ReturnObject) => {
                let register = self.parser.returned(instruction)?;
                self.unit.push(RenderedLine::new(vec!["return ".to_string(), format!("{};", register)]));
            }
            Some(Mnemonic::ConstString) => {
                let constant = self.parser.string_constant(instruction)?;
                self.unit.push(string_constant_line(&constant));
            }
            Some(Mnemonic::InvokeStatic) => {
                let call = self.parser.static_call(instruction)?;
                self.unit.push(static_call_line(&call));
            }
            Some(Mnemonic::StaticGet) => {
                let read = self.parser.static_read(instruction)?;
                self.unit.push(static_read_line(&read));
            }
            None => {
                trace!("passing through line {}: {}", instruction.line_number, instruction.mnemonic);
                self.unit.push(passthrough_line(instruction));
            }
        }
        Ok(())
    }

    fn class(&mut self, instruction: &Instruction) -> Result<(), MalformedInstruction> {
        let ClassDecl { accessor, modifiers, name } = self.parser.class(instruction)?;
        let mut tokens = vec![accessor];
        tokens.extend(modifiers);
        tokens.extend(vec![CLASS_KEYWORD, name.as_str(), "{"]);
        let line = RenderedLine::new(tokens);
        self.unit.push_class_declaration(line, name);
        Ok(())
    }

    /// Rewrites the class declaration just above to extend the superclass,
    /// unless the superclass is `Object`.
    fn super_class(&mut self, instruction: &Instruction) -> Result<(), MalformedInstruction> {
        let super_name = self.parser.super_class(instruction)?;
        if is_root_object(&super_name) {
            return Ok(());
        }

        let declaration = match self.unit.last() {
            Some(line) if self.unit.ends_with_declaration() => line.tokens(),
            _ => return Err(instruction.malformed(MalformedReason::NoDeclaration)),
        };
        let keyword = declaration.iter()
            .position(|token| token == CLASS_KEYWORD)
            .filter(|position| position + 1 < declaration.len())
            .ok_or_else(|| instruction.malformed(MalformedReason::NoDeclaration))?;

        let mut tokens = declaration[..=keyword + 1].to_vec();
        tokens.push(EXTENDS_KEYWORD.to_string());
        tokens.push(simple_name(&super_name).to_string());
        self.unit.replace_last(RenderedLine::new(tokens));
        Ok(())
    }

    fn method(&mut self, instruction: &Instruction) -> Result<(), MalformedInstruction> {
        let MethodDecl { accessor, is_static, modifiers, kind } = self.parser.method(instruction)?;
        let (return_type, name) = match kind {
            MethodKind::Constructor => {
                let class_name = self.unit.class_name()
                    .ok_or_else(|| instruction.malformed(MalformedReason::ClassNameUnset))?;
                (String::new(), class_name.to_string())
            }
            MethodKind::Named { name, return_type } => (return_type, name.to_string()),
        };

        let mut tokens = vec![accessor.to_string(), static_slot(is_static).to_string()];
        tokens.extend(modifiers.into_iter().map(String::from));
        tokens.extend(vec![return_type, name]);
        // Parameter types aren't reconstructed, so the list is always empty.
        tokens.extend(vec!["(", "", ")", "{"].into_iter().map(String::from));
        self.unit.push(RenderedLine::new(tokens));
        Ok(())
    }

    pub fn unit(&self) -> &OutputUnit {
        &self.unit
    }

    pub fn finish(self) -> OutputUnit {
        self.unit
    }
}

fn static_slot(is_static: bool) -> &'static str {
    if is_static { STATIC_KEYWORD } else { "" }
}

fn field_line(field: &FieldDecl) -> RenderedLine {
    let mut tokens = vec![field.accessor, static_slot(field.is_static)];
    tokens.extend(field.modifiers.iter().copied());
    tokens.extend(vec![field.ty.as_str(), field.name]);
    if let Some(value) = field.initializer {
        tokens.extend(vec!["=", value]);
    }
    tokens.push(";");
    RenderedLine::new(tokens)
}

fn string_constant_line(constant: &StringConstant) -> RenderedLine {
    RenderedLine::new(vec!["final String", constant.destination, "=", constant.literal, ";"])
}

fn static_call_line(call: &StaticCall) -> RenderedLine {
    RenderedLine::new(vec![call.owner.as_str(), ".", call.method, "(", call.arguments, ");"])
}

fn static_read_line(read: &StaticRead) -> RenderedLine {
    RenderedLine::new(vec![read.destination, "=", read.owner.as_str(), ".", read.field, ";"])
}

fn passthrough_line(instruction: &Instruction) -> RenderedLine {
    RenderedLine::new(std::iter::once(COMMENT_MARKER).chain(instruction.tokens()))
}
