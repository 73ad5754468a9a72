//! Functions, modifiers and return

use crate::codegen::{EmitRule, Emitter, Fragment};
use crate::core::{BlockCategory, BlockKind, BlockKindBuilder, OutputType, Socket};
use crate::workspace::BlockInstance;

use super::argument;

const COLOUR: u16 = 120;

fn function(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let params = argument(b, e, "PARAMS");
    let body = e.body(b, "BODY");
    let state = b.field_text("STATE");
    let mut code = format!(
        "function {}({}) {}",
        b.field_text("NAME"),
        params,
        b.field_text("VISIBILITY")
    );
    if !state.is_empty() {
        code.push(' ');
        code.push_str(&state);
    }
    code.push_str(&format!(" {{\n{}}}\n", body));
    Fragment::statement(code)
}

fn modifier(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let body = e.body(b, "BODY");
    Fragment::statement(format!("modifier {} {{\n{}}}\n", b.field_text("NAME"), body))
}

/// Parameterless function with a fixed visibility and mutability suffix
fn fixed(b: &BlockInstance, e: &mut Emitter<'_>, suffix: &str) -> Fragment {
    let body = e.body(b, "BODY");
    Fragment::statement(format!(
        "function {}() {} {{\n{}}}\n",
        b.field_text("NAME"),
        suffix,
        body
    ))
}

fn payable(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    fixed(b, e, "external payable")
}

fn view(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    fixed(b, e, "public view")
}

fn pure(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    fixed(b, e, "public pure")
}

fn ret(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let value = argument(b, e, "VALUE");
    Fragment::statement(format!("return {};\n", value))
}

fn statement(id: &str, display: &str, tooltip: &str) -> BlockKindBuilder {
    BlockKind::builder(id)
        .statement()
        .category(BlockCategory::Functions)
        .display(display)
        .tooltip(tooltip)
        .colour(COLOUR)
}

fn named_body(id: &str, display: &str, tooltip: &str, default_name: &str) -> BlockKind {
    statement(id, display, tooltip)
        .socket(Socket::text("NAME", default_name))
        .socket(Socket::statement("BODY"))
        .build()
}

pub fn blocks() -> Vec<(BlockKind, EmitRule)> {
    vec![
        (
            statement("solidity_function", "function %1(%2) %3 %4 %5", "Function definition")
                .socket(Socket::text("NAME", "myFunction"))
                .socket(Socket::value("PARAMS", &[OutputType::String]))
                .socket(Socket::dropdown(
                    "VISIBILITY",
                    &["public", "private", "internal", "external"],
                ))
                .socket(Socket::dropdown("STATE", &["", "view", "pure", "payable"]))
                .socket(Socket::statement("BODY"))
                .build(),
            function as EmitRule,
        ),
        (
            named_body("solidity_modifier", "modifier %1 %2", "Function modifier", "onlyOwner"),
            modifier,
        ),
        (
            named_body("solidity_payable", "payable function %1 %2", "Payable function", "receive"),
            payable,
        ),
        (
            named_body("solidity_view", "view function %1 %2", "View function (read-only)", "getValue"),
            view,
        ),
        (
            named_body(
                "solidity_pure",
                "pure function %1 %2",
                "Pure function (no state access)",
                "calculate",
            ),
            pure,
        ),
        (
            statement("solidity_return", "return %1", "Return statement")
                .socket(Socket::value(
                    "VALUE",
                    &[OutputType::Number, OutputType::String, OutputType::Boolean],
                ))
                .build(),
            ret,
        ),
    ]
}
