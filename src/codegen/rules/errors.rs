//! require, revert, assert and try/catch

use crate::codegen::{EmitRule, Emitter, Fragment};
use crate::core::{BlockCategory, BlockKind, BlockKindBuilder, OutputType, Socket};
use crate::workspace::BlockInstance;

use super::argument;

const COLOUR: u16 = 20;

fn require(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let condition = argument(b, e, "CONDITION");
    let message = argument(b, e, "MESSAGE");
    Fragment::statement(format!("require({}, {});\n", condition, message))
}

fn revert(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let message = argument(b, e, "MESSAGE");
    Fragment::statement(format!("revert({});\n", message))
}

fn assert(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let condition = argument(b, e, "CONDITION");
    Fragment::statement(format!("assert({});\n", condition))
}

fn try_catch(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let try_block = e.body(b, "TRY_BLOCK");
    let catch_block = e.body(b, "CATCH_BLOCK");
    Fragment::statement(format!(
        "try {{\n{}}} catch {} {{\n{}}}\n",
        try_block,
        b.field_text("ERROR"),
        catch_block
    ))
}

fn statement(id: &str, display: &str, tooltip: &str) -> BlockKindBuilder {
    BlockKind::builder(id)
        .statement()
        .category(BlockCategory::ErrorHandling)
        .display(display)
        .tooltip(tooltip)
        .colour(COLOUR)
}

pub fn blocks() -> Vec<(BlockKind, EmitRule)> {
    vec![
        (
            statement("solidity_require", "require(%1, %2)", "Require condition")
                .socket(Socket::value("CONDITION", &[OutputType::Boolean]))
                .socket(Socket::value("MESSAGE", &[OutputType::String]))
                .build(),
            require as EmitRule,
        ),
        (
            statement("solidity_revert", "revert(%1)", "Revert transaction")
                .socket(Socket::value("MESSAGE", &[OutputType::String]))
                .build(),
            revert,
        ),
        (
            statement("solidity_assert", "assert(%1)", "Assert condition")
                .socket(Socket::value("CONDITION", &[OutputType::Boolean]))
                .build(),
            assert,
        ),
        (
            statement("solidity_try_catch", "try %1 %2 catch %3", "Try-catch block")
                .socket(Socket::statement("TRY_BLOCK"))
                .socket(Socket::statement("CATCH_BLOCK"))
                .socket(Socket::text("ERROR", "Error"))
                .build(),
            try_catch,
        ),
    ]
}
