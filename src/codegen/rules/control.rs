//! Conditionals, loops, break and continue

use crate::codegen::{EmitRule, Emitter, Fragment, Precedence};
use crate::core::{BlockCategory, BlockKind, BlockKindBuilder, OutputType, Socket};
use crate::workspace::BlockInstance;

use super::argument;

const COLOUR: u16 = 60;

/// Number of condition/body pairs on `controls_if`
pub const IF_CLAUSES: usize = 3;

fn if_chain(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let mut code = String::new();
    for n in 0..IF_CLAUSES {
        let condition_socket = format!("IF{}", n);
        let body_socket = format!("DO{}", n);
        // Later clauses only exist once their condition is plugged in.
        if n > 0 && b.value_input(&condition_socket).is_none() {
            continue;
        }
        let condition = e.resolve_value_or(b, &condition_socket, Precedence::None, "false");
        let body = e.body(b, &body_socket);
        if n > 0 {
            code.push_str(" else ");
        }
        code.push_str(&format!("if ({}) {{\n{}}}", condition, body));
    }
    if b.statement_input("ELSE").is_some() {
        let body = e.body(b, "ELSE");
        code.push_str(&format!(" else {{\n{}}}", body));
    }
    code.push('\n');
    Fragment::statement(code)
}

fn for_loop(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let var = b.field_text("VAR");
    let from = e.resolve_value_or(b, "FROM", Precedence::None, "0");
    let to = e.resolve_value_or(b, "TO", Precedence::Relational.tighter(), "0");
    let by = e.resolve_value_or(b, "BY", Precedence::None, "1");
    let body = e.body(b, "DO");
    Fragment::statement(format!(
        "for (uint256 {v} = {}; {v} <= {}; {v} += {}) {{\n{}}}\n",
        from,
        to,
        by,
        body,
        v = var
    ))
}

fn while_until(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let until = b.field_text("MODE") == "UNTIL";
    let condition = argument(b, e, "BOOL");
    let condition = match (until, condition.is_empty()) {
        (false, true) => "false".to_string(),
        (false, false) => condition,
        (true, true) => "!true".to_string(),
        (true, false) => format!("!({})", condition),
    };
    let body = e.body(b, "DO");
    Fragment::statement(format!("while ({}) {{\n{}}}\n", condition, body))
}

fn brk(_: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    Fragment::statement("break;\n")
}

fn cont(_: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    Fragment::statement("continue;\n")
}

fn statement(id: &str, display: &str, tooltip: &str) -> BlockKindBuilder {
    BlockKind::builder(id)
        .statement()
        .category(BlockCategory::ControlFlow)
        .display(display)
        .tooltip(tooltip)
        .colour(COLOUR)
}

fn if_kind() -> BlockKind {
    let mut builder = statement("controls_if", "if %1 do %2", "Conditional branches");
    for n in 0..IF_CLAUSES {
        builder = builder
            .socket(Socket::value(format!("IF{}", n), &[OutputType::Boolean]))
            .socket(Socket::statement(format!("DO{}", n)));
    }
    builder.socket(Socket::statement("ELSE")).build()
}

pub fn blocks() -> Vec<(BlockKind, EmitRule)> {
    vec![
        (if_kind(), if_chain as EmitRule),
        (
            statement("controls_for", "count with %1 from %2 to %3 by %4", "Counted loop")
                .socket(Socket::text("VAR", "i"))
                .socket(Socket::value("FROM", &[OutputType::Number]))
                .socket(Socket::value("TO", &[OutputType::Number]))
                .socket(Socket::value("BY", &[OutputType::Number]))
                .socket(Socket::statement("DO"))
                .build(),
            for_loop,
        ),
        (
            statement("controls_whileUntil", "repeat %1 %2", "Conditional loop")
                .socket(Socket::dropdown_labeled(
                    "MODE",
                    &[("while", "WHILE"), ("until", "UNTIL")],
                ))
                .socket(Socket::value("BOOL", &[OutputType::Boolean]))
                .socket(Socket::statement("DO"))
                .build(),
            while_until,
        ),
        (
            statement("solidity_break", "break", "Break statement").build(),
            brk,
        ),
        (
            statement("solidity_continue", "continue", "Continue statement").build(),
            cont,
        ),
    ]
}
