//! End-to-end generator behaviour
//!
//! Covers the guarantees callers rely on: deterministic output, settings
//! that do not leak between runs, precedence-correct expressions, tolerance
//! of unknown kinds and root/chain ordering.

#[cfg(test)]
mod generator_tests {
    use crate::codegen::{
        Emitter, Fragment, GenerationContext, Generator, ImportDescriptor, RunConfig,
    };
    use crate::core::{BlockId, BlockKind, KindRegistry, Socket};
    use crate::workspace::{BlockInstance, Workspace};

    const HEADER: &str = "// SPDX-License-Identifier: MIT\npragma solidity ^0.8.20;\n\n";

    fn setup() -> (Generator, Workspace) {
        let generator = Generator::solidity();
        let workspace = Workspace::new(generator.registry().clone());
        (generator, workspace)
    }

    fn token_contract(ws: &mut Workspace) -> BlockId {
        let contract = ws.add_instance("solidity_contract").unwrap();
        ws.set_field(contract, "NAME", "Token").unwrap();
        let supply = ws.add_instance("solidity_global_variable").unwrap();
        ws.set_field(supply, "NAME", "totalSupply").unwrap();
        let ctor = ws.add_instance("solidity_constructor").unwrap();
        let assign = ws.add_instance("solidity_variable_assignment").unwrap();
        ws.set_field(assign, "NAME", "totalSupply").unwrap();
        let amount = ws.add_instance("math_number").unwrap();
        ws.set_field(amount, "NUM", 1000.0).unwrap();
        ws.connect_value(assign, "VALUE", amount).unwrap();
        ws.connect_statement(ctor, "BODY", assign).unwrap();
        ws.link_next(supply, ctor).unwrap();
        ws.connect_statement(contract, "BODY", supply).unwrap();
        contract
    }

    #[test]
    fn test_full_contract_output() {
        let (generator, mut ws) = setup();
        token_contract(&mut ws);

        let out = generator.generate(&ws, GenerationContext::default());
        assert_eq!(
            out,
            format!(
                "{}contract Token {{\n    uint256 public totalSupply;\n    constructor() {{\n        totalSupply = 1000;\n    }}\n}}\n",
                HEADER
            )
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let (generator, mut ws) = setup();
        token_contract(&mut ws);
        let ctx = GenerationContext::default()
            .with_imports(vec![ImportDescriptor::new("./Base.sol")]);

        let first = generator.generate(&ws, ctx.clone());
        let second = generator.generate(&ws, ctx);
        assert_eq!(first, second);
    }

    #[test]
    fn test_imports_do_not_leak_between_runs() {
        let (generator, mut ws) = setup();
        token_contract(&mut ws);
        let mut config = RunConfig::new();
        config.set_imports(vec![ImportDescriptor::aliased("./A.sol", "A")]);

        let first = generator.generate_with(&ws, &mut config);
        assert!(first.contains("import \"./A.sol\" as A;\n\n"));

        let second = generator.generate_with(&ws, &mut config);
        assert!(!second.contains("A.sol"));
        assert!(second.starts_with(HEADER));
        assert!(second[HEADER.len()..].starts_with("contract Token"));
    }

    #[test]
    fn test_license_and_version_persist_in_config() {
        let (generator, ws) = setup();
        let mut config = RunConfig::new();
        config.set_license("GPL-3.0");
        config.set_version(">=0.8.0 <0.9.0");

        for _ in 0..2 {
            let out = generator.generate_with(&ws, &mut config);
            assert_eq!(
                out,
                "// SPDX-License-Identifier: GPL-3.0\npragma solidity >=0.8.0 <0.9.0;\n\n"
            );
        }
    }

    #[test]
    fn test_footer_is_opt_in() {
        let (generator, ws) = setup();
        let plain = generator.generate(&ws, GenerationContext::default());
        assert_eq!(plain, HEADER);

        let footed = generator.clone().with_footer(true);
        let out = footed.generate(&ws, GenerationContext::default());
        assert_eq!(out, format!("{}\n// Generated by block-codegen\n", HEADER));
    }

    /// `(2 + 3) * 4` keeps its grouping; `2 + 3 * 4` gets no extra parens.
    #[test]
    fn test_precedence_round_trip() {
        let (generator, mut ws) = setup();
        let n: Vec<BlockId> = [2.0, 3.0, 4.0]
            .iter()
            .map(|v| {
                let id = ws.add_instance("math_number").unwrap();
                ws.set_field(id, "NUM", *v).unwrap();
                id
            })
            .collect();
        let add = ws.add_instance("math_arithmetic").unwrap();
        ws.connect_value(add, "A", n[0]).unwrap();
        ws.connect_value(add, "B", n[1]).unwrap();
        let mul = ws.add_instance("math_arithmetic").unwrap();
        ws.set_field(mul, "OP", "MULTIPLY").unwrap();
        ws.connect_value(mul, "A", add).unwrap();
        ws.connect_value(mul, "B", n[2]).unwrap();

        let body = generator.generate_body(&ws, &mut GenerationContext::default());
        assert_eq!(body, "(2 + 3) * 4");
    }

    /// The middle block of a three-block chain names a kind that has since
    /// been unregistered: it contributes nothing and its neighbours still emit.
    #[test]
    fn test_unknown_kind_in_chain_is_skipped() {
        let (generator, mut ws) = setup();
        generator
            .registry()
            .register(vec![BlockKind::builder("legacy_stmt").statement().build()]);

        let first = ws.add_instance("solidity_break").unwrap();
        let middle = ws.add_instance("legacy_stmt").unwrap();
        let last = ws.add_instance("solidity_continue").unwrap();
        ws.link_next(first, middle).unwrap();
        ws.link_next(middle, last).unwrap();
        generator.registry().unregister("legacy_stmt");

        let body = generator.generate_body(&ws, &mut GenerationContext::default());
        assert_eq!(body, "break;\ncontinue;\n");
    }

    #[test]
    fn test_unknown_value_producer_yields_empty() {
        let (generator, mut ws) = setup();
        generator.registry().register(vec![BlockKind::builder("legacy_value")
            .output(crate::core::OutputType::String)
            .build()]);
        let revert = ws.add_instance("solidity_revert").unwrap();
        let msg = ws.add_instance("legacy_value").unwrap();
        ws.connect_value(revert, "MESSAGE", msg).unwrap();
        generator.registry().unregister("legacy_value");

        let body = generator.generate_body(&ws, &mut GenerationContext::default());
        assert_eq!(body, "revert();\n");
    }

    /// Output follows `next` pointers, not creation order.
    #[test]
    fn test_chain_order_follows_links() {
        let (generator, mut ws) = setup();
        let contract = ws.add_instance("solidity_contract").unwrap();
        let names = ["c", "a", "b"];
        let ids: Vec<BlockId> = names
            .iter()
            .map(|name| {
                let id = ws.add_instance("solidity_immutable").unwrap();
                ws.set_field(id, "NAME", *name).unwrap();
                id
            })
            .collect();
        // a -> b -> c
        ws.link_next(ids[2], ids[0]).unwrap();
        ws.link_next(ids[1], ids[2]).unwrap();
        ws.connect_statement(contract, "BODY", ids[1]).unwrap();

        let body = generator.generate_body(&ws, &mut GenerationContext::default());
        assert_eq!(
            body,
            "contract MyContract {\n    uint256 immutable a;\n    uint256 immutable b;\n    uint256 immutable c;\n}\n"
        );
    }

    #[test]
    fn test_two_roots_in_declared_order() {
        let (generator, mut ws) = setup();
        let first = ws.add_instance("solidity_interface").unwrap();
        let second = ws.add_instance("solidity_contract").unwrap();
        assert_eq!(ws.root_ids(), &[first, second]);

        let body = generator.generate_body(&ws, &mut GenerationContext::default());
        assert_eq!(body, "interface IMyInterface {\n}\ncontract MyContract {\n}\n");
    }

    #[test]
    fn test_disabled_body_block_is_skipped() {
        let (generator, mut ws) = setup();
        let contract = token_contract(&mut ws);
        let supply = ws.get(contract).unwrap().statement_input("BODY").unwrap();
        ws.set_enabled(supply, false).unwrap();

        let body = generator.generate_body(&ws, &mut GenerationContext::default());
        assert!(!body.contains("totalSupply;"));
        assert!(body.contains("totalSupply = 1000;"));
    }

    fn block_rule(instance: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
        let body = e.resolve_chain(instance, "BODY");
        Fragment::statement(format!("BLOCK {{\n{}}}\n", body))
    }

    fn a_rule(_: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
        Fragment::statement("a;\n")
    }

    fn b_rule(_: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
        Fragment::statement("b;\n")
    }

    /// Custom rules plug into the dispatch table next to a fresh registry.
    #[test]
    fn test_block_scenario_with_custom_rules() {
        let registry = KindRegistry::new();
        registry.register(vec![
            BlockKind::builder("block").socket(Socket::statement("BODY")).build(),
            BlockKind::builder("a").statement().build(),
            BlockKind::builder("b").statement().build(),
        ]);
        let mut generator = Generator::new(registry.clone());
        generator.register_rule("block", block_rule);
        generator.register_rule("a", a_rule);
        generator.register_rule("b", b_rule);

        let mut ws = Workspace::new(registry);
        let root = ws.add_instance("block").unwrap();
        let a = ws.add_instance("a").unwrap();
        let b = ws.add_instance("b").unwrap();
        ws.connect_statement(root, "BODY", a).unwrap();
        ws.link_next(a, b).unwrap();

        let out = generator.generate(&ws, GenerationContext::default());
        assert_eq!(out, format!("{}BLOCK {{\na;\nb;\n}}\n", HEADER));
    }
}
