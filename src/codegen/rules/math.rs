//! Literals, operators and builtin hashing
//!
//! Operator rules report their own precedence and ask for their operands with
//! [`operand_min`], so grouping in the block tree survives into the text.

use crate::codegen::precedence::{operand_min, Side};
use crate::codegen::{EmitRule, Emitter, Fragment, Precedence};
use crate::core::{BlockCategory, BlockKind, BlockKindBuilder, OutputType, Socket};
use crate::workspace::BlockInstance;

use super::argument;

const MATH_COLOUR: u16 = 230;
const LOGIC_COLOUR: u16 = 210;
const HASH_COLOUR: u16 = 300;

fn number(b: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    let code = b.field_text("NUM");
    let precedence = if code.starts_with('-') {
        Precedence::Unary
    } else {
        Precedence::Atomic
    };
    Fragment::expression(code, precedence)
}

/// Solidity string literal.
///
/// Quotes, backslashes and control characters are escaped. Text containing
/// non-ASCII characters gets the `unicode` prefix, which Solidity requires
/// for them.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 9);
    if !text.is_ascii() {
        out.push_str("unicode");
    }
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn text(b: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    Fragment::expression(quote(&b.field_text("TEXT")), Precedence::Atomic)
}

fn boolean(b: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    let code = if b.field_text("BOOL") == "TRUE" { "true" } else { "false" };
    Fragment::expression(code, Precedence::Atomic)
}

/// Shared shape of every binary operator rule
fn binary(
    b: &BlockInstance,
    e: &mut Emitter<'_>,
    op: &str,
    own: Precedence,
    default: &str,
) -> Fragment {
    let left = e.resolve_value_or(b, "A", operand_min(own, Side::Left), default);
    let right = e.resolve_value_or(b, "B", operand_min(own, Side::Right), default);
    Fragment::expression(format!("{} {} {}", left, op, right), own)
}

fn arithmetic(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let (op, own) = match b.field_text("OP").as_str() {
        "MINUS" => ("-", Precedence::Additive),
        "MULTIPLY" => ("*", Precedence::Multiplicative),
        "DIVIDE" => ("/", Precedence::Multiplicative),
        "MODULO" => ("%", Precedence::Multiplicative),
        "POWER" => ("**", Precedence::Exponent),
        _ => ("+", Precedence::Additive),
    };
    binary(b, e, op, own, "0")
}

fn compare(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let (op, own) = match b.field_text("OP").as_str() {
        "NEQ" => ("!=", Precedence::Equality),
        "LT" => ("<", Precedence::Relational),
        "LTE" => ("<=", Precedence::Relational),
        "GT" => (">", Precedence::Relational),
        "GTE" => (">=", Precedence::Relational),
        _ => ("==", Precedence::Equality),
    };
    binary(b, e, op, own, "0")
}

fn operation(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let (op, own) = match b.field_text("OP").as_str() {
        "OR" => ("||", Precedence::LogicalOr),
        _ => ("&&", Precedence::LogicalAnd),
    };
    binary(b, e, op, own, "false")
}

fn negate(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let operand = e.resolve_value_or(b, "BOOL", Precedence::Unary, "true");
    Fragment::expression(format!("!{}", operand), Precedence::Unary)
}

fn keccak256(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let input = argument(b, e, "INPUT");
    Fragment::expression(format!("keccak256({})", input), Precedence::Atomic)
}

fn abi_encode(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let input = argument(b, e, "INPUT");
    Fragment::expression(format!("abi.encode({})", input), Precedence::Atomic)
}

fn value(id: &str, output: OutputType, display: &str, tooltip: &str, colour: u16) -> BlockKindBuilder {
    BlockKind::builder(id)
        .output(output)
        .category(BlockCategory::MathAndLogic)
        .display(display)
        .tooltip(tooltip)
        .colour(colour)
}

pub fn blocks() -> Vec<(BlockKind, EmitRule)> {
    vec![
        (
            value("math_number", OutputType::Number, "%1", "A number", MATH_COLOUR)
                .socket(Socket::number("NUM", 0.0))
                .build(),
            number as EmitRule,
        ),
        (
            value("text", OutputType::String, "\"%1\"", "A string literal", LOGIC_COLOUR)
                .socket(Socket::text("TEXT", ""))
                .build(),
            text,
        ),
        (
            value("logic_boolean", OutputType::Boolean, "%1", "true or false", LOGIC_COLOUR)
                .socket(Socket::dropdown_labeled("BOOL", &[("true", "TRUE"), ("false", "FALSE")]))
                .build(),
            boolean,
        ),
        (
            value("math_arithmetic", OutputType::Number, "%1 %2 %3", "Arithmetic", MATH_COLOUR)
                .socket(Socket::value("A", &[OutputType::Number]))
                .socket(Socket::dropdown_labeled(
                    "OP",
                    &[
                        ("+", "ADD"),
                        ("-", "MINUS"),
                        ("*", "MULTIPLY"),
                        ("/", "DIVIDE"),
                        ("%", "MODULO"),
                        ("**", "POWER"),
                    ],
                ))
                .socket(Socket::value("B", &[OutputType::Number]))
                .build(),
            arithmetic,
        ),
        (
            value("logic_compare", OutputType::Boolean, "%1 %2 %3", "Comparison", LOGIC_COLOUR)
                .socket(Socket::value("A", &[]))
                .socket(Socket::dropdown_labeled(
                    "OP",
                    &[
                        ("=", "EQ"),
                        ("\u{2260}", "NEQ"),
                        ("<", "LT"),
                        ("\u{2264}", "LTE"),
                        (">", "GT"),
                        ("\u{2265}", "GTE"),
                    ],
                ))
                .socket(Socket::value("B", &[]))
                .build(),
            compare,
        ),
        (
            value("logic_operation", OutputType::Boolean, "%1 %2 %3", "Logical and/or", LOGIC_COLOUR)
                .socket(Socket::value("A", &[OutputType::Boolean]))
                .socket(Socket::dropdown_labeled("OP", &[("and", "AND"), ("or", "OR")]))
                .socket(Socket::value("B", &[OutputType::Boolean]))
                .build(),
            operation,
        ),
        (
            value("logic_negate", OutputType::Boolean, "not %1", "Logical not", LOGIC_COLOUR)
                .socket(Socket::value("BOOL", &[OutputType::Boolean]))
                .build(),
            negate,
        ),
        (
            value("solidity_keccak256", OutputType::String, "keccak256(%1)", "Keccak256 hash function", HASH_COLOUR)
                .socket(Socket::value("INPUT", &[OutputType::String]))
                .build(),
            keccak256,
        ),
        (
            value("solidity_abi_encode", OutputType::String, "abi.encode(%1)", "ABI encode function", HASH_COLOUR)
                .socket(Socket::value("INPUT", &[OutputType::String]))
                .build(),
            abi_encode,
        ),
    ]
}
