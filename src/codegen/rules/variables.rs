//! State variables, locals, assignments and references

use crate::codegen::{EmitRule, Emitter, Fragment, Precedence};
use crate::core::{BlockCategory, BlockKind, BlockKindBuilder, OutputType, Socket};
use crate::workspace::BlockInstance;

use super::{argument, declare};

const COLOUR: u16 = 330;
const TYPES: &[&str] = &["uint256", "int256", "address", "bool", "string", "bytes32"];

/// ` = value` when the VALUE input is connected
fn initializer(b: &BlockInstance, e: &mut Emitter<'_>) -> String {
    let value = argument(b, e, "VALUE");
    if value.is_empty() {
        value
    } else {
        format!(" = {}", value)
    }
}

fn global_variable(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let name = b.field_text("NAME");
    declare(e, &name);
    let init = initializer(b, e);
    Fragment::statement(format!(
        "{} {} {}{};\n",
        b.field_text("TYPE"),
        b.field_text("VISIBILITY"),
        name,
        init
    ))
}

fn local_variable(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let name = b.field_text("NAME");
    declare(e, &name);
    let init = initializer(b, e);
    Fragment::statement(format!("{} {}{};\n", b.field_text("TYPE"), name, init))
}

fn assignment(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let value = e.resolve_value_or(b, "VALUE", Precedence::Assignment, "0");
    Fragment::statement(format!("{} = {};\n", b.field_text("NAME"), value))
}

fn reference(b: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
    Fragment::expression(b.field_text("NAME"), Precedence::Atomic)
}

fn constant(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let name = b.field_text("NAME");
    declare(e, &name);
    let value = e.resolve_value_or(b, "VALUE", Precedence::None, "0");
    Fragment::statement(format!(
        "{} constant {} = {};\n",
        b.field_text("TYPE"),
        name,
        value
    ))
}

fn immutable(b: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
    let name = b.field_text("NAME");
    declare(e, &name);
    Fragment::statement(format!("{} immutable {};\n", b.field_text("TYPE"), name))
}

fn statement(id: &str, display: &str, tooltip: &str) -> BlockKindBuilder {
    BlockKind::builder(id)
        .statement()
        .category(BlockCategory::Variables)
        .display(display)
        .tooltip(tooltip)
        .colour(COLOUR)
}

pub fn blocks() -> Vec<(BlockKind, EmitRule)> {
    vec![
        (
            statement("solidity_global_variable", "%1 %2 %3 = %4", "State variable")
                .socket(Socket::dropdown("TYPE", TYPES))
                .socket(Socket::dropdown("VISIBILITY", &["public", "private", "internal"]))
                .socket(Socket::text("NAME", "myVar"))
                .socket(Socket::value("VALUE", &[]))
                .build(),
            global_variable as EmitRule,
        ),
        (
            statement("solidity_local_variable", "%1 %2 = %3", "Local variable")
                .socket(Socket::dropdown("TYPE", TYPES))
                .socket(Socket::text("NAME", "localVar"))
                .socket(Socket::value("VALUE", &[]))
                .build(),
            local_variable,
        ),
        (
            statement("solidity_variable_assignment", "%1 = %2", "Assign a value")
                .socket(Socket::text("NAME", "myVar"))
                .socket(Socket::value("VALUE", &[]))
                .build(),
            assignment,
        ),
        (
            BlockKind::builder("solidity_variable_reference")
                .socket(Socket::text("NAME", "myVar"))
                .output(OutputType::Number)
                .category(BlockCategory::Variables)
                .display("%1")
                .tooltip("Read a variable")
                .colour(COLOUR)
                .build(),
            reference,
        ),
        (
            statement("solidity_constant", "%1 constant %2 = %3", "Compile-time constant")
                .socket(Socket::dropdown("TYPE", TYPES))
                .socket(Socket::text("NAME", "MY_CONSTANT"))
                .socket(Socket::value("VALUE", &[]))
                .build(),
            constant,
        ),
        (
            statement("solidity_immutable", "%1 immutable %2", "Set once in the constructor")
                .socket(Socket::dropdown("TYPE", TYPES))
                .socket(Socket::text("NAME", "owner"))
                .build(),
            immutable,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use crate::codegen::{GenerationContext, Generator};
    use crate::workspace::Workspace;

    fn generate(ws: &Workspace, generator: &Generator) -> String {
        generator.generate_body(ws, &mut GenerationContext::default())
    }

    #[test]
    fn global_variable_with_and_without_initializer() {
        let generator = Generator::solidity();
        let mut ws = Workspace::new(generator.registry().clone());
        let plain = ws.add_instance("solidity_global_variable").unwrap();
        let init = ws.add_instance("solidity_global_variable").unwrap();
        ws.set_field(init, "NAME", "total").unwrap();
        let num = ws.add_instance("math_number").unwrap();
        ws.set_field(num, "NUM", 42.0).unwrap();
        ws.connect_value(init, "VALUE", num).unwrap();
        ws.link_next(plain, init).unwrap();

        assert_eq!(
            generate(&ws, &generator),
            "uint256 public myVar;\nuint256 public total = 42;\n"
        );
    }

    #[test]
    fn assignment_defaults_to_zero() {
        let generator = Generator::solidity();
        let mut ws = Workspace::new(generator.registry().clone());
        ws.add_instance("solidity_variable_assignment").unwrap();
        assert_eq!(generate(&ws, &generator), "myVar = 0;\n");
    }

    #[test]
    fn constant_and_immutable() {
        let generator = Generator::solidity();
        let mut ws = Workspace::new(generator.registry().clone());
        let c = ws.add_instance("solidity_constant").unwrap();
        let i = ws.add_instance("solidity_immutable").unwrap();
        ws.set_field(i, "TYPE", "address").unwrap();
        ws.link_next(c, i).unwrap();
        assert_eq!(
            generate(&ws, &generator),
            "uint256 constant MY_CONSTANT = 0;\naddress immutable owner;\n"
        );
    }
}
