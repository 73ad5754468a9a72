//! Ether transfers, receive/fallback and the ERC20 template

use crate::codegen::{EmitRule, Emitter, Fragment};
use crate::core::{BlockCategory, BlockKind, BlockKindBuilder, OutputType, Socket};
use crate::workspace::BlockInstance;

use super::{argument, declare};

const COLOUR: u16 = 290;

fn transfer(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let address = argument(b, e, "ADDRESS");
    let amount = argument(b, e, "AMOUNT");
    Fragment::statement(format!("{}.transfer({});\n", address, amount))
}

fn send(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let address = argument(b, e, "ADDRESS");
    let amount = argument(b, e, "AMOUNT");
    Fragment::statement(format!("{}.send({});\n", address, amount))
}

fn call(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let address = argument(b, e, "ADDRESS");
    let value = argument(b, e, "VALUE");
    let data = argument(b, e, "DATA");
    Fragment::statement(format!("{}.call{{value: {}}}({});\n", address, value, data))
}

fn receive(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let body = e.body(b, "BODY");
    Fragment::statement(format!("receive() external payable {{\n{}}}\n", body))
}

fn fallback(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let body = e.body(b, "BODY");
    Fragment::statement(format!("fallback() external payable {{\n{}}}\n", body))
}

fn erc20(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let name = b.field_text("NAME");
    declare(e, &name);
    let ctor = format!(
        "constructor() ERC20(\"{}\", \"{}\") {{}}\n",
        name,
        name.to_uppercase()
    );
    Fragment::statement(format!("contract {} is ERC20 {{\n{}}}\n", name, e.indent(&ctor)))
}

fn statement(id: &str, display: &str, tooltip: &str) -> BlockKindBuilder {
    BlockKind::builder(id)
        .statement()
        .category(BlockCategory::EtherAndTokens)
        .display(display)
        .tooltip(tooltip)
        .colour(COLOUR)
}

pub fn blocks() -> Vec<(BlockKind, EmitRule)> {
    vec![
        (
            statement("solidity_transfer", "%1.transfer(%2)", "Transfer Ether")
                .socket(Socket::value("ADDRESS", &[OutputType::String]))
                .socket(Socket::value("AMOUNT", &[OutputType::Number]))
                .build(),
            transfer as EmitRule,
        ),
        (
            statement("solidity_send", "%1.send(%2)", "Send Ether")
                .socket(Socket::value("ADDRESS", &[OutputType::String]))
                .socket(Socket::value("AMOUNT", &[OutputType::Number]))
                .build(),
            send,
        ),
        (
            statement("solidity_call", "%1.call{value: %2}(%3)", "Low-level call")
                .socket(Socket::value("ADDRESS", &[OutputType::String]))
                .socket(Socket::value("VALUE", &[OutputType::Number]))
                .socket(Socket::value("DATA", &[OutputType::String]))
                .build(),
            call,
        ),
        (
            statement("solidity_receive", "receive() external payable %1", "Receive function")
                .socket(Socket::statement("BODY"))
                .build(),
            receive,
        ),
        (
            statement("solidity_fallback", "fallback() external payable %1", "Fallback function")
                .socket(Socket::statement("BODY"))
                .build(),
            fallback,
        ),
        (
            statement("solidity_erc20", "ERC20 %1", "ERC20 token contract")
                .socket(Socket::text("NAME", "MyToken"))
                .build(),
            erc20,
        ),
    ]
}
