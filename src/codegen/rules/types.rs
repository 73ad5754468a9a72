//! Typed declarations used as parameters and members

use crate::codegen::{EmitRule, Emitter, Fragment, Precedence};
use crate::core::{BlockCategory, BlockKind, OutputType, Socket};
use crate::workspace::BlockInstance;

const COLOUR: u16 = 210;

fn declaration(code: String) -> Fragment {
    Fragment::expression(code, Precedence::Atomic)
}

fn uint(b: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    declaration(format!("uint{} {}", b.field_text("SIZE"), b.field_text("NAME")))
}

fn address(b: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    declaration(format!("address {}", b.field_text("NAME")))
}

fn boolean(b: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    declaration(format!("bool {}", b.field_text("NAME")))
}

fn string(b: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    declaration(format!("string {}", b.field_text("NAME")))
}

fn bytes(b: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    declaration(format!("bytes{} {}", b.field_text("SIZE"), b.field_text("NAME")))
}

fn array(b: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    declaration(format!(
        "{}[{}] {}",
        b.field_text("TYPE"),
        b.field_text("SIZE"),
        b.field_text("NAME")
    ))
}

fn mapping(b: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    declaration(format!(
        "mapping({} => {}) {}",
        b.field_text("KEY_TYPE"),
        b.field_text("VALUE_TYPE"),
        b.field_text("NAME")
    ))
}

fn kind(id: &str, output: OutputType, display: &str, tooltip: &str) -> crate::core::BlockKindBuilder {
    BlockKind::builder(id)
        .output(output)
        .category(BlockCategory::DataTypes)
        .display(display)
        .tooltip(tooltip)
        .colour(COLOUR)
}

pub fn blocks() -> Vec<(BlockKind, EmitRule)> {
    vec![
        (
            kind("solidity_uint", OutputType::Number, "uint%1 %2", "Unsigned integer variable")
                .socket(Socket::dropdown("SIZE", &["8", "16", "32", "64", "128", "256"]))
                .socket(Socket::text("NAME", "value"))
                .build(),
            uint as EmitRule,
        ),
        (
            kind("solidity_address", OutputType::String, "address %1", "Ethereum address variable")
                .socket(Socket::text("NAME", "addr"))
                .build(),
            address,
        ),
        (
            kind("solidity_bool", OutputType::Boolean, "bool %1", "Boolean variable")
                .socket(Socket::text("NAME", "flag"))
                .build(),
            boolean,
        ),
        (
            kind("solidity_string", OutputType::String, "string %1", "String variable")
                .socket(Socket::text("NAME", "text"))
                .build(),
            string,
        ),
        (
            kind("solidity_bytes", OutputType::String, "bytes%1 %2", "Bytes variable")
                .socket(Socket::dropdown("SIZE", &["", "1", "2", "4", "8", "16", "32"]))
                .socket(Socket::text("NAME", "data"))
                .build(),
            bytes,
        ),
        (
            kind("solidity_array", OutputType::Array, "%1[%2] %3", "Array variable")
                .socket(Socket::dropdown("TYPE", &["uint", "string", "address", "bool"]))
                .socket(Socket::text("SIZE", ""))
                .socket(Socket::text("NAME", "arr"))
                .build(),
            array,
        ),
        (
            kind("solidity_mapping", OutputType::Array, "mapping(%1 => %2) %3", "Mapping variable")
                .socket(Socket::dropdown("KEY_TYPE", &["address", "uint", "string"]))
                .socket(Socket::dropdown("VALUE_TYPE", &["uint", "address", "string", "bool"]))
                .socket(Socket::text("NAME", "map"))
                .build(),
            mapping,
        ),
    ]
}
