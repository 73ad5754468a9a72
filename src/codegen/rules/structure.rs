//! Contracts, interfaces, structs and enums

use crate::codegen::{EmitRule, Emitter, Fragment};
use crate::core::{BlockCategory, BlockKind, BlockKindBuilder, OutputType, Socket};
use crate::workspace::BlockInstance;

use super::{argument, declare};

const COLOUR: u16 = 230;

/// `{keyword} {NAME} {\n{body}}\n`
fn container(b: &BlockInstance, e: &mut Emitter<'_>, keyword: &str) -> Fragment {
    let name = b.field_text("NAME");
    declare(e, &name);
    let body = e.body(b, "BODY");
    Fragment::statement(format!("{} {} {{\n{}}}\n", keyword, name, body))
}

fn contract(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    container(b, e, "contract")
}

fn interface(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    container(b, e, "interface")
}

fn structure(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    container(b, e, "struct")
}

fn constructor(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let params = argument(b, e, "PARAMS");
    let body = e.body(b, "BODY");
    Fragment::statement(format!("constructor({}) {{\n{}}}\n", params, body))
}

fn inheritance(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let name = b.field_text("NAME");
    declare(e, &name);
    let body = e.body(b, "BODY");
    Fragment::statement(format!(
        "contract {} is {} {{\n{}}}\n",
        name,
        b.field_text("PARENT"),
        body
    ))
}

/// Enum members. A plugged-in text literal is read as a comma-separated
/// identifier list rather than a string.
fn members(b: &BlockInstance, e: &mut Emitter<'_>, socket: &str) -> String {
    match e.producer(b, socket) {
        Some(p) if p.kind == "text" => p
            .field_text("TEXT")
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => argument(b, e, socket),
    }
}

fn enumeration(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let values = members(b, e, "VALUES");
    Fragment::statement(format!("enum {} {{ {} }}\n", b.field_text("NAME"), values))
}

fn statement(id: &str, display: &str, tooltip: &str) -> BlockKindBuilder {
    BlockKind::builder(id)
        .statement()
        .category(BlockCategory::ContractStructure)
        .display(display)
        .tooltip(tooltip)
        .colour(COLOUR)
}

pub fn blocks() -> Vec<(BlockKind, EmitRule)> {
    vec![
        (
            statement("solidity_contract", "contract %1 %2", "Contract definition")
                .socket(Socket::text("NAME", "MyContract"))
                .socket(Socket::statement("BODY"))
                .build(),
            contract as EmitRule,
        ),
        (
            statement("solidity_constructor", "constructor %1 %2", "Constructor function")
                .socket(Socket::value("PARAMS", &[OutputType::String]))
                .socket(Socket::statement("BODY"))
                .build(),
            constructor,
        ),
        (
            statement("solidity_inheritance", "contract %1 is %2 %3", "Contract inheritance")
                .socket(Socket::text("NAME", "ChildContract"))
                .socket(Socket::text("PARENT", "ParentContract"))
                .socket(Socket::statement("BODY"))
                .build(),
            inheritance,
        ),
        (
            statement("solidity_interface", "interface %1 %2", "Interface definition")
                .socket(Socket::text("NAME", "IMyInterface"))
                .socket(Socket::statement("BODY"))
                .build(),
            interface,
        ),
        (
            statement("solidity_struct", "struct %1 %2", "Struct definition")
                .socket(Socket::text("NAME", "MyStruct"))
                .socket(Socket::statement("BODY"))
                .build(),
            structure,
        ),
        (
            statement("solidity_enum", "enum %1 %2", "Enum definition")
                .socket(Socket::text("NAME", "Status"))
                .socket(Socket::value("VALUES", &[OutputType::String]))
                .build(),
            enumeration,
        ),
    ]
}
