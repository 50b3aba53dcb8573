//! Pulling the structured pieces out of recognized instructions.
//!
//! Each function here takes a lexed [`Instruction`] whose mnemonic is already
//! known and splits its operands into the parts the translator renders:
//! names, accessors, decoded types, call targets. Nothing is rendered here.
//!
//! Operands are sliced on fixed delimiters (`:`, `(`, `)`, `->`, `,`). When a
//! delimiter is missing the parser returns a [`MalformedInstruction`] instead
//! of guessing.

use regex::Regex;

use crate::descriptor::{decode, simple_name};
use crate::error::{MalformedInstruction, MalformedReason};
use crate::lex::Instruction;
use crate::LeniencyLevel;

const STATIC_KEYWORD: &str = "static";
const CONSTRUCTOR_KEYWORD: &str = "constructor";
const INITIALIZER_SEPARATOR: &str = "=";

/// `.class <accessor> [modifiers...] <descriptor>`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassDecl<'input> {
    pub accessor: &'input str,
    pub modifiers: Vec<&'input str>,
    /// The simple name, without package.
    pub name: String,
}

/// `.field <accessor> [static] [modifiers...] <name>:<descriptor> [= <value>]`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDecl<'input> {
    pub accessor: &'input str,
    pub is_static: bool,
    pub modifiers: Vec<&'input str>,
    pub name: &'input str,
    pub ty: String,
    pub initializer: Option<&'input str>,
}

/// `.method <accessor> [static] [modifiers...] (constructor <init>... | <name>(<args>)<return>)`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MethodDecl<'input> {
    pub accessor: &'input str,
    pub is_static: bool,
    pub modifiers: Vec<&'input str>,
    pub kind: MethodKind<'input>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MethodKind<'input> {
    /// Named after the enclosing class, which only the translator knows.
    Constructor,
    Named { name: &'input str, return_type: String },
}

/// `invoke-static {<registers>}, <owner>-><name>(<args>)<return>`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StaticCall<'input> {
    pub owner: String,
    pub method: &'input str,
    /// The register list between the braces, untouched.
    pub arguments: &'input str,
}

/// `sget* <register>, <owner>-><name>:<descriptor>`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StaticRead<'input> {
    pub destination: &'input str,
    pub owner: String,
    pub field: &'input str,
}

/// `const-string <register>, "<literal>"`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StringConstant<'input> {
    pub destination: &'input str,
    /// Quotes included.
    pub literal: &'input str,
}

/// Splits instruction operands, with the patterns it needs compiled once.
pub struct SignatureParser {
    leniency: LeniencyLevel,
    string_literal: Regex,
    register_list: Regex,
}

impl SignatureParser {
    // quotes with any number of non-quote/backslash chars *or* escaped chars in between.
    const STRING_LITERAL: &'static str = r#""([^"\\]|\\.)*""#;
    // `{...}`, an optional comma, then the call target.
    const REGISTER_LIST: &'static str = r"^\{([^}]*)\}(,?)\s*(\S+)";

    pub fn new(leniency: LeniencyLevel) -> Self {
        SignatureParser {
            leniency,
            string_literal: Self::compile(Self::STRING_LITERAL),
            register_list: Self::compile(Self::REGISTER_LIST),
        }
    }

    fn compile(pattern: &str) -> Regex {
        Regex::new(pattern).expect("Invalid regex")
    }

    fn decode<'input>(&self, instruction: &Instruction<'input>, descriptor: &str) -> Result<String, MalformedInstruction> {
        decode(descriptor, self.leniency).map_err(|e| instruction.malformed(e.into()))
    }

    pub fn class<'input>(&self, instruction: &Instruction<'input>) -> Result<ClassDecl<'input>, MalformedInstruction> {
        let accessor = instruction.operand(0)?;
        let last = instruction.operands.len().saturating_sub(1).max(1);
        let descriptor = instruction.operand(last)?;
        let modifiers = instruction.operands[1..last].to_vec();
        let name = simple_name(&self.decode(instruction, descriptor)?).to_string();
        Ok(ClassDecl { accessor, modifiers, name })
    }

    /// The fully qualified name of the superclass.
    pub fn super_class(&self, instruction: &Instruction) -> Result<String, MalformedInstruction> {
        let descriptor = instruction.operand(0)?;
        self.decode(instruction, descriptor)
    }

    pub fn field<'input>(&self, instruction: &Instruction<'input>) -> Result<FieldDecl<'input>, MalformedInstruction> {
        let (accessor, is_static, rest) = modifier_prefix(instruction)?;

        let pair_index = rest.iter()
            .position(|token| token.contains(':'))
            .ok_or_else(|| instruction.malformed(MalformedReason::MissingDelimiter {
                token: rest.last().copied().unwrap_or_default().to_string(),
                delimiter: ":",
            }))?;
        let modifiers = rest[..pair_index].to_vec();
        let (name, descriptor) = split_once(instruction, rest[pair_index], ":")?;
        let ty = self.decode(instruction, descriptor)?;

        let initializer = match rest.get(pair_index + 1) {
            Some(&INITIALIZER_SEPARATOR) => Some(after_initializer(instruction)?),
            _ => None,
        };

        Ok(FieldDecl { accessor, is_static, modifiers, name, ty, initializer })
    }

    pub fn method<'input>(&self, instruction: &Instruction<'input>) -> Result<MethodDecl<'input>, MalformedInstruction> {
        let (accessor, is_static, rest) = modifier_prefix(instruction)?;

        if let Some(position) = rest.iter().position(|token| *token == CONSTRUCTOR_KEYWORD) {
            let modifiers = rest[..position].to_vec();
            return Ok(MethodDecl { accessor, is_static, modifiers, kind: MethodKind::Constructor });
        }

        let (&signature, modifiers) = rest.split_last()
            .ok_or_else(|| instruction.malformed(MalformedReason::MissingOperand {
                index: instruction.operands.len(),
            }))?;
        let (name_and_args, return_descriptor) = split_once(instruction, signature, ")")?;
        let (name, _args) = split_once(instruction, name_and_args, "(")?;
        let return_type = self.decode(instruction, return_descriptor)?;

        Ok(MethodDecl {
            accessor,
            is_static,
            modifiers: modifiers.to_vec(),
            kind: MethodKind::Named { name, return_type },
        })
    }

    pub fn string_constant<'input>(&self, instruction: &Instruction<'input>) -> Result<StringConstant<'input>, MalformedInstruction> {
        let destination = self.destination(instruction)?;
        let literal = match self.string_literal.find(instruction.operand_src) {
            Some(found) => found.as_str(),
            None => instruction.operand(1)?,
        };
        Ok(StringConstant { destination, literal })
    }

    pub fn static_call<'input>(&self, instruction: &Instruction<'input>) -> Result<StaticCall<'input>, MalformedInstruction> {
        let captures = self.register_list.captures(instruction.operand_src)
            .ok_or_else(|| instruction.malformed(MalformedReason::MissingWrapper {
                token: instruction.operands.first().copied().unwrap_or_default().to_string(),
                open: '{',
                close: '}',
            }))?;
        let (arguments, comma, target) = match (captures.get(1), captures.get(2), captures.get(3)) {
            (Some(arguments), Some(comma), Some(target)) => (arguments.as_str(), comma.as_str(), target.as_str()),
            _ => return Err(instruction.malformed(MalformedReason::MissingOperand { index: 1 })),
        };
        if comma.is_empty() && self.leniency.requires_trailing_comma() {
            return Err(instruction.malformed(MalformedReason::MissingComma {
                token: format!("{{{}}}", arguments),
            }));
        }

        let (owner, member) = split_once(instruction, target, "->")?;
        let (method, _signature) = split_once(instruction, member, "(")?;
        let owner = self.decode(instruction, owner)?;
        Ok(StaticCall { owner, method, arguments })
    }

    pub fn static_read<'input>(&self, instruction: &Instruction<'input>) -> Result<StaticRead<'input>, MalformedInstruction> {
        let destination = self.destination(instruction)?;
        let (owner, member) = split_once(instruction, instruction.operand(1)?, "->")?;
        let (field, _type) = split_once(instruction, member, ":")?;
        let owner = self.decode(instruction, owner)?;
        Ok(StaticRead { destination, owner, field })
    }

    /// The register named by `return-object`. A trailing comma is dropped if present.
    pub fn returned<'input>(&self, instruction: &Instruction<'input>) -> Result<&'input str, MalformedInstruction> {
        let register = instruction.operand(0)?;
        Ok(register.strip_suffix(',').unwrap_or(register))
    }

    /// First operand with its trailing comma removed.
    fn destination<'input>(&self, instruction: &Instruction<'input>) -> Result<&'input str, MalformedInstruction> {
        let register = instruction.operand(0)?;
        match register.strip_suffix(',') {
            Some(stripped) => Ok(stripped),
            None if self.leniency.requires_trailing_comma() => {
                Err(instruction.malformed(MalformedReason::MissingComma { token: register.to_string() }))
            }
            None => Ok(register),
        }
    }
}

/// Accessor, whether `static` follows it, and the operands after both.
fn modifier_prefix<'a, 'input>(instruction: &'a Instruction<'input>) -> Result<(&'input str, bool, &'a [&'input str]), MalformedInstruction> {
    let accessor = instruction.operand(0)?;
    let is_static = instruction.operands.get(1) == Some(&STATIC_KEYWORD);
    let rest_start = if is_static { 2 } else { 1 };
    if instruction.operands.len() <= rest_start {
        return Err(instruction.malformed(MalformedReason::MissingOperand { index: rest_start }));
    }
    Ok((accessor, is_static, &instruction.operands[rest_start..]))
}

fn split_once<'input>(instruction: &Instruction, token: &'input str, delimiter: &'static str) -> Result<(&'input str, &'input str), MalformedInstruction> {
    let index = token.find(delimiter)
        .ok_or_else(|| instruction.malformed(MalformedReason::MissingDelimiter {
            token: token.to_string(),
            delimiter,
        }))?;
    Ok((&token[..index], &token[index + delimiter.len()..]))
}

/// Raw text after the first `=` in a field declaration, so string values keep their spacing.
fn after_initializer<'input>(instruction: &Instruction<'input>) -> Result<&'input str, MalformedInstruction> {
    let src = instruction.operand_src;
    let (_, value) = split_once(instruction, src, INITIALIZER_SEPARATOR)?;
    let value = value.trim();
    if value.is_empty() {
        let index = instruction.operands.len();
        return Err(instruction.malformed(MalformedReason::MissingOperand { index }));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DescriptorError;
    use crate::lex::lex_line;
    use pretty_assertions::assert_eq;
    use LeniencyLevel::*;

    fn lenient() -> SignatureParser {
        SignatureParser::new(Lenient)
    }

    fn strict() -> SignatureParser {
        SignatureParser::new(Strict)
    }

    fn reason<T: std::fmt::Debug>(result: Result<T, MalformedInstruction>) -> MalformedReason {
        result.unwrap_err().reason
    }

    #[test]
    fn class_uses_simple_name() {
        let instruction = lex_line(".class public La/b/C;", 1).unwrap();
        let decl = lenient().class(&instruction).unwrap();
        assert_eq!(decl, ClassDecl { accessor: "public", modifiers: vec![], name: "C".to_string() });
    }

    #[test]
    fn class_keeps_extra_modifiers() {
        let instruction = lex_line(".class public final Lcom/example/Main;", 1).unwrap();
        let decl = lenient().class(&instruction).unwrap();
        assert_eq!(decl.modifiers, vec!["final"]);
        assert_eq!(decl.name, "Main");
    }

    #[test]
    fn class_without_descriptor() {
        let instruction = lex_line(".class public", 4).unwrap();
        assert_eq!(reason(lenient().class(&instruction)), MalformedReason::MissingOperand { index: 1 });
    }

    #[test]
    fn super_class_is_fully_qualified() {
        let instruction = lex_line(".super Landroid/app/Activity;", 2).unwrap();
        assert_eq!(lenient().super_class(&instruction).unwrap(), "android.app.Activity");
    }

    #[test]
    fn field() {
        let instruction = lex_line(".field public count:I", 1).unwrap();
        let decl = lenient().field(&instruction).unwrap();
        assert_eq!(decl, FieldDecl {
            accessor: "public",
            is_static: false,
            modifiers: vec![],
            name: "count",
            ty: "Integer".to_string(),
            initializer: None,
        });
    }

    #[test]
    fn static_field_with_modifiers_and_value() {
        let instruction = lex_line(".field private static final TAG:Ljava/lang/String; = \"Main  Activity\"", 1).unwrap();
        let decl = lenient().field(&instruction).unwrap();
        assert_eq!(decl, FieldDecl {
            accessor: "private",
            is_static: true,
            modifiers: vec!["final"],
            name: "TAG",
            ty: "java.lang.String".to_string(),
            initializer: Some("\"Main  Activity\""),
        });
    }

    #[test]
    fn field_value_separated_by_tabs() {
        let instruction = lex_line(".field public static x:I\t=\t5", 1).unwrap();
        let decl = lenient().field(&instruction).unwrap();
        assert_eq!(decl.initializer, Some("5"));

        let instruction = lex_line(".field public s:Ljava/lang/String;\t= \"a = b\"", 1).unwrap();
        assert_eq!(lenient().field(&instruction).unwrap().initializer, Some("\"a = b\""));
    }

    #[test]
    fn field_without_type() {
        let instruction = lex_line(".field public count", 1).unwrap();
        assert_eq!(
            reason(lenient().field(&instruction)),
            MalformedReason::MissingDelimiter { token: "count".to_string(), delimiter: ":" }
        );
    }

    #[test]
    fn field_with_only_static() {
        let instruction = lex_line(".field public static", 1).unwrap();
        assert_eq!(reason(lenient().field(&instruction)), MalformedReason::MissingOperand { index: 2 });
    }

    #[test]
    fn field_with_bad_descriptor_in_strict_mode() {
        let instruction = lex_line(".field public name:java/lang/String", 1).unwrap();
        assert_eq!(
            reason(strict().field(&instruction)),
            MalformedReason::Descriptor(DescriptorError::NotAnObject("java/lang/String".to_string()))
        );
    }

    #[test]
    fn named_method() {
        let instruction = lex_line(".method public static main([Ljava/lang/String;)V", 1).unwrap();
        let decl = lenient().method(&instruction).unwrap();
        assert_eq!(decl, MethodDecl {
            accessor: "public",
            is_static: true,
            modifiers: vec![],
            kind: MethodKind::Named { name: "main", return_type: "void".to_string() },
        });
    }

    #[test]
    fn method_with_modifiers() {
        let instruction = lex_line(".method protected final declared-synchronized run()Ljava/lang/Object;", 1).unwrap();
        let decl = lenient().method(&instruction).unwrap();
        assert_eq!(decl.modifiers, vec!["final", "declared-synchronized"]);
        assert_eq!(decl.kind, MethodKind::Named { name: "run", return_type: "java.lang.Object".to_string() });
    }

    #[test]
    fn constructor() {
        let instruction = lex_line(".method public constructor <init>()V", 1).unwrap();
        let decl = lenient().method(&instruction).unwrap();
        assert_eq!(decl, MethodDecl { accessor: "public", is_static: false, modifiers: vec![], kind: MethodKind::Constructor });

        let instruction = lex_line(".method static constructor <clinit>()V", 1).unwrap();
        let decl = lenient().method(&instruction).unwrap();
        assert_eq!(decl.accessor, "static");
        assert_eq!(decl.kind, MethodKind::Constructor);
    }

    #[test]
    fn method_missing_parentheses() {
        let instruction = lex_line(".method public run", 1).unwrap();
        assert_eq!(
            reason(lenient().method(&instruction)),
            MalformedReason::MissingDelimiter { token: "run".to_string(), delimiter: ")" }
        );
        let instruction = lex_line(".method public run)V", 1).unwrap();
        assert_eq!(
            reason(lenient().method(&instruction)),
            MalformedReason::MissingDelimiter { token: "run".to_string(), delimiter: "(" }
        );
    }

    #[test]
    fn string_constant_keeps_inner_spaces() {
        let instruction = lex_line("    const-string v0, \"hello,  world\"", 1).unwrap();
        let constant = lenient().string_constant(&instruction).unwrap();
        assert_eq!(constant, StringConstant { destination: "v0", literal: "\"hello,  world\"" });
    }

    #[test]
    fn string_constant_with_escaped_quote() {
        let instruction = lex_line(r#"const-string v1, "say \"hi\"""#, 1).unwrap();
        let constant = lenient().string_constant(&instruction).unwrap();
        assert_eq!(constant.literal, r#""say \"hi\"""#);
    }

    #[test]
    fn string_constant_comma() {
        let instruction = lex_line("const-string v0 \"hi\"", 1).unwrap();
        assert_eq!(lenient().string_constant(&instruction).unwrap().destination, "v0");
        assert_eq!(
            reason(strict().string_constant(&instruction)),
            MalformedReason::MissingComma { token: "v0".to_string() }
        );
    }

    #[test]
    fn string_constant_without_literal() {
        let instruction = lex_line("const-string v0,", 1).unwrap();
        assert_eq!(reason(lenient().string_constant(&instruction)), MalformedReason::MissingOperand { index: 1 });
    }

    #[test]
    fn static_call() {
        let instruction = lex_line("invoke-static {p0}, Lcom/checker/HttpRequest;->post(Ljava/lang/CharSequence;)Lcom/checker/HttpRequest;", 1).unwrap();
        let call = strict().static_call(&instruction).unwrap();
        assert_eq!(call, StaticCall { owner: "com.checker.HttpRequest".to_string(), method: "post", arguments: "p0" });
    }

    #[test]
    fn static_call_with_several_registers() {
        let instruction = lex_line("invoke-static {v0, v1}, Ljava/lang/Math;->max(II)I", 1).unwrap();
        let call = lenient().static_call(&instruction).unwrap();
        assert_eq!(call.arguments, "v0, v1");
        assert_eq!(call.method, "max");

        let instruction = lex_line("invoke-static {}, Lcom/example/Util;->init()V", 1).unwrap();
        assert_eq!(lenient().static_call(&instruction).unwrap().arguments, "");
    }

    #[test]
    fn static_call_shape_errors() {
        let instruction = lex_line("invoke-static p0, La;->b()V", 1).unwrap();
        assert_eq!(
            reason(lenient().static_call(&instruction)),
            MalformedReason::MissingWrapper { token: "p0,".to_string(), open: '{', close: '}' }
        );

        let instruction = lex_line("invoke-static {p0}, La;.b()V", 1).unwrap();
        assert_eq!(
            reason(lenient().static_call(&instruction)),
            MalformedReason::MissingDelimiter { token: "La;.b()V".to_string(), delimiter: "->" }
        );

        let instruction = lex_line("invoke-static {p0} La;->b()V", 1).unwrap();
        assert!(lenient().static_call(&instruction).is_ok());
        assert_eq!(
            reason(strict().static_call(&instruction)),
            MalformedReason::MissingComma { token: "{p0}".to_string() }
        );
    }

    #[test]
    fn static_read() {
        let instruction = lex_line("sget-object v0, Ljava/lang/System;->out:Ljava/io/PrintStream;", 1).unwrap();
        let read = lenient().static_read(&instruction).unwrap();
        assert_eq!(read, StaticRead { destination: "v0", owner: "java.lang.System".to_string(), field: "out" });
    }

    #[test]
    fn returned_register() {
        let with_comma = lex_line("return-object v1,", 1).unwrap();
        let without = lex_line("return-object v1", 1).unwrap();
        assert_eq!(strict().returned(&with_comma).unwrap(), "v1");
        assert_eq!(strict().returned(&without).unwrap(), "v1");
    }
}
