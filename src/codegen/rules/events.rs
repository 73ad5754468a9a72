//! Event declarations and emits

use crate::codegen::{EmitRule, Emitter, Fragment, Precedence};
use crate::core::{BlockCategory, BlockKind, OutputType, Socket};
use crate::workspace::BlockInstance;

use super::argument;

const COLOUR: u16 = 160;

fn event(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let params = argument(b, e, "PARAMS");
    Fragment::statement(format!("event {}({});\n", b.field_text("NAME"), params))
}

fn emit(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let params = argument(b, e, "PARAMS");
    Fragment::statement(format!("emit {}({});\n", b.field_text("EVENT"), params))
}

fn indexed(b: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    Fragment::expression(format!("indexed {}", b.field_text("TYPE")), Precedence::Atomic)
}

pub fn blocks() -> Vec<(BlockKind, EmitRule)> {
    vec![
        (
            BlockKind::builder("solidity_event")
                .statement()
                .socket(Socket::text("NAME", "Transfer"))
                .socket(Socket::value("PARAMS", &[OutputType::String]))
                .category(BlockCategory::Events)
                .display("event %1(%2)")
                .tooltip("Event definition")
                .colour(COLOUR)
                .build(),
            event as EmitRule,
        ),
        (
            BlockKind::builder("solidity_emit")
                .statement()
                .socket(Socket::text("EVENT", "Transfer"))
                .socket(Socket::value("PARAMS", &[OutputType::String]))
                .category(BlockCategory::Events)
                .display("emit %1(%2)")
                .tooltip("Emit event")
                .colour(COLOUR)
                .build(),
            emit,
        ),
        (
            BlockKind::builder("solidity_indexed")
                .socket(Socket::dropdown("TYPE", &["address", "uint", "string"]))
                .output(OutputType::String)
                .category(BlockCategory::Events)
                .display("indexed %1")
                .tooltip("Indexed event parameter")
                .colour(COLOUR)
                .build(),
            indexed,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use crate::codegen::{GenerationContext, Generator};
    use crate::workspace::Workspace;

    #[test]
    fn event_with_indexed_parameter() {
        let generator = Generator::solidity();
        let mut ws = Workspace::new(generator.registry().clone());
        let ev = ws.add_instance("solidity_event").unwrap();
        let idx = ws.add_instance("solidity_indexed").unwrap();
        ws.connect_value(ev, "PARAMS", idx).unwrap();
        let em = ws.add_instance("solidity_emit").unwrap();
        ws.link_next(ev, em).unwrap();

        let out = generator.generate_body(&ws, &mut GenerationContext::default());
        assert_eq!(out, "event Transfer(indexed address);\nemit Transfer();\n");
    }
}
