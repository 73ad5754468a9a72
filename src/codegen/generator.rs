//! Block-to-source generator
//!
//! Walks a [`Workspace`] and turns every emittable block into a text fragment
//! through a dispatch table of emission rules keyed by kind id. Generation
//! never fails: unknown kinds, disabled blocks, dangling references and
//! unconnected sockets all degrade to empty or default fragments.

use log::{debug, warn};
use std::collections::{HashMap, HashSet};

use crate::core::{BlockId, KindRegistry};
use crate::workspace::{BlockInstance, Chain, Workspace};

use super::assembler::OutputAssembler;
use super::context::{GenerationContext, RunConfig};
use super::precedence::{self, Precedence};

/// Text produced by one emission rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Statement text, normally newline terminated
    Statement(String),
    /// Expression text with the rank of its outermost operator
    Expression(String, Precedence),
}

impl Fragment {
    pub fn statement(code: impl Into<String>) -> Self {
        Fragment::Statement(code.into())
    }

    pub fn expression(code: impl Into<String>, precedence: Precedence) -> Self {
        Fragment::Expression(code.into(), precedence)
    }

    pub fn empty() -> Self {
        Fragment::Statement(String::new())
    }

    pub fn code(&self) -> &str {
        match self {
            Fragment::Statement(code) | Fragment::Expression(code, _) => code,
        }
    }

    pub fn into_code(self) -> String {
        match self {
            Fragment::Statement(code) | Fragment::Expression(code, _) => code,
        }
    }

    /// Rank used when this fragment is plugged into a value input.
    /// Statements never get parenthesized.
    pub fn precedence(&self) -> Precedence {
        match self {
            Fragment::Statement(_) => Precedence::Atomic,
            Fragment::Expression(_, p) => *p,
        }
    }
}

/// Emission rule: a pure function from one instance to its text
pub type EmitRule = fn(&BlockInstance, &mut Emitter<'_>) -> Fragment;

/// Dispatch table from kind id to emission rule
#[derive(Clone, Default)]
pub struct RuleTable {
    rules: HashMap<String, EmitRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule; an existing rule for the same id is replaced
    pub fn register(&mut self, kind_id: impl Into<String>, rule: EmitRule) {
        self.rules.insert(kind_id.into(), rule);
    }

    pub fn get(&self, kind_id: &str) -> Option<EmitRule> {
        self.rules.get(kind_id).copied()
    }

    pub fn contains(&self, kind_id: &str) -> bool {
        self.rules.contains_key(kind_id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// The code generator
#[derive(Clone)]
pub struct Generator {
    registry: KindRegistry,
    rules: RuleTable,
    assembler: OutputAssembler,
}

impl Generator {
    /// Generator with an empty dispatch table over `registry`
    pub fn new(registry: KindRegistry) -> Self {
        Self {
            registry,
            rules: RuleTable::new(),
            assembler: OutputAssembler::default(),
        }
    }

    /// Generator over a fresh registry holding the builtin Solidity catalogue
    pub fn solidity() -> Self {
        Self::solidity_with(KindRegistry::new())
    }

    /// Install the builtin Solidity catalogue into `registry` and build a
    /// generator over it
    pub fn solidity_with(registry: KindRegistry) -> Self {
        let mut generator = Self::new(registry);
        super::rules::register_solidity_blocks(&generator.registry, &mut generator.rules);
        generator
    }

    /// Toggle the trailer appended after the body
    pub fn with_footer(mut self, footer: bool) -> Self {
        self.assembler = OutputAssembler::new(footer);
        self
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Add or replace the emission rule for a kind
    pub fn register_rule(&mut self, kind_id: impl Into<String>, rule: EmitRule) {
        self.rules.register(kind_id, rule);
    }

    /// Generate the full source text for `workspace`.
    ///
    /// The context is consumed; build a new one for the next run.
    pub fn generate(&self, workspace: &Workspace, mut context: GenerationContext) -> String {
        let body = self.generate_body(workspace, &mut context);
        self.assembler.assemble(&body, &context)
    }

    /// Generate with persistent settings; imports are used once and cleared
    pub fn generate_with(&self, workspace: &Workspace, config: &mut RunConfig) -> String {
        self.generate(workspace, config.take_context())
    }

    /// Concatenate the emission of every top-level chain, in root order
    pub fn generate_body(&self, workspace: &Workspace, context: &mut GenerationContext) -> String {
        let mut emitter = Emitter::new(workspace, &self.registry, &self.rules, context);
        let mut body = String::new();
        for root in workspace.root_ids() {
            let chain = emitter.chain(Some(*root));
            for instance in chain {
                body.push_str(&emitter.emit_instance(instance).into_code());
            }
        }
        debug!(
            "generated {} bytes from {} top-level roots",
            body.len(),
            workspace.root_ids().len()
        );
        body
    }
}

/// Chain iterator that yields only blocks that will produce text
///
/// Disabled blocks and blocks of unknown kind (no registry entry or no rule)
/// are skipped without ending the walk.
#[derive(Clone)]
pub struct EmittableChain<'a> {
    inner: Chain<'a>,
    registry: &'a KindRegistry,
    rules: &'a RuleTable,
}

impl<'a> Iterator for EmittableChain<'a> {
    type Item = &'a BlockInstance;

    fn next(&mut self) -> Option<Self::Item> {
        let registry = self.registry;
        let rules = self.rules;
        self.inner
            .by_ref()
            .find(|instance| is_emittable(instance, registry, rules))
    }
}

fn is_emittable(instance: &BlockInstance, registry: &KindRegistry, rules: &RuleTable) -> bool {
    if !instance.enabled {
        return false;
    }
    if !registry.contains(&instance.kind) || !rules.contains(&instance.kind) {
        debug!("skipping block {} of unknown kind '{}'", instance.id, instance.kind);
        return false;
    }
    true
}

/// Live state of one generation run, handed to every emission rule
pub struct Emitter<'a> {
    workspace: &'a Workspace,
    registry: &'a KindRegistry,
    rules: &'a RuleTable,
    context: &'a mut GenerationContext,
    /// Blocks currently being emitted; guards loops in restored data
    active: HashSet<BlockId>,
}

impl<'a> Emitter<'a> {
    fn new(
        workspace: &'a Workspace,
        registry: &'a KindRegistry,
        rules: &'a RuleTable,
        context: &'a mut GenerationContext,
    ) -> Self {
        Self {
            workspace,
            registry,
            rules,
            context,
            active: HashSet::new(),
        }
    }

    /// Per-run context (license, version, imports, name scratch space)
    pub fn context(&mut self) -> &mut GenerationContext {
        &mut *self.context
    }

    /// Emittable blocks of the chain starting at `start`
    pub fn chain(&self, start: Option<BlockId>) -> EmittableChain<'a> {
        EmittableChain {
            inner: Chain::new(self.workspace, start),
            registry: self.registry,
            rules: self.rules,
        }
    }

    /// Emit the block with the given id; missing or inert blocks yield nothing
    pub fn emit(&mut self, id: BlockId) -> Fragment {
        let workspace = self.workspace;
        match workspace.get(id) {
            Some(instance) if is_emittable(instance, self.registry, self.rules) => {
                self.emit_instance(instance)
            }
            _ => Fragment::empty(),
        }
    }

    fn emit_instance(&mut self, instance: &BlockInstance) -> Fragment {
        let Some(rule) = self.rules.get(&instance.kind) else {
            return Fragment::empty();
        };
        if !self.active.insert(instance.id) {
            warn!("block {} reached from itself; emitting nothing", instance.id);
            return Fragment::empty();
        }
        let fragment = rule(instance, self);
        self.active.remove(&instance.id);
        fragment
    }

    /// Emittable block plugged into a value input, if any
    pub fn producer(&self, instance: &BlockInstance, socket: &str) -> Option<&'a BlockInstance> {
        let workspace = self.workspace;
        instance
            .value_input(socket)
            .and_then(|id| workspace.get(id))
            .filter(|p| is_emittable(p, self.registry, self.rules))
    }

    /// Text of the producer plugged into a value input.
    ///
    /// The fragment is parenthesized when its own rank binds more loosely than
    /// `min`. An unconnected, disabled or unknown producer yields `""`.
    pub fn resolve_value(&mut self, instance: &BlockInstance, socket: &str, min: Precedence) -> String {
        let Some(producer) = instance.value_input(socket) else {
            return String::new();
        };
        let fragment = self.emit(producer);
        let own = fragment.precedence();
        precedence::wrap(fragment.into_code(), own, min)
    }

    /// Like [`resolve_value`](Self::resolve_value) with a literal for the
    /// unconnected case
    pub fn resolve_value_or(
        &mut self,
        instance: &BlockInstance,
        socket: &str,
        min: Precedence,
        default: &str,
    ) -> String {
        let code = self.resolve_value(instance, socket, min);
        if code.is_empty() {
            default.to_string()
        } else {
            code
        }
    }

    /// Concatenated text of the chain in a statement input, in next order
    pub fn resolve_chain(&mut self, instance: &BlockInstance, socket: &str) -> String {
        let chain = self.chain(instance.statement_input(socket));
        let mut code = String::new();
        for member in chain {
            code.push_str(&self.emit_instance(member).into_code());
        }
        code
    }

    /// Statement body resolved and indented by one level
    pub fn body(&mut self, instance: &BlockInstance, socket: &str) -> String {
        let code = self.resolve_chain(instance, socket);
        self.indent(&code)
    }

    /// Prefix every non-empty line with the run's indent unit
    pub fn indent(&self, code: &str) -> String {
        let mut out = String::with_capacity(code.len());
        for line in code.split_inclusive('\n') {
            if line.trim().is_empty() {
                out.push_str(line);
            } else {
                out.push_str(&self.context.indent);
                out.push_str(line);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BlockKind, OutputType, Socket};

    fn line_a(_: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
        Fragment::statement("a;\n")
    }

    fn line_b(_: &BlockInstance, _: &mut Emitter<'_>) -> Fragment {
        Fragment::statement("b;\n")
    }

    fn wrapper(instance: &BlockInstance, e: &mut Emitter<'_>) -> Fragment {
        let body = e.resolve_chain(instance, "BODY");
        Fragment::statement(format!("BLOCK {{\n{}}}\n", body))
    }

    fn setup() -> Generator {
        let registry = KindRegistry::new();
        registry.register(vec![
            BlockKind::builder("wrapper").socket(Socket::statement("BODY")).statement().build(),
            BlockKind::builder("a").statement().build(),
            BlockKind::builder("b").statement().build(),
            BlockKind::builder("v").output(OutputType::Number).build(),
        ]);
        let mut generator = Generator::new(registry);
        generator.register_rule("wrapper", wrapper);
        generator.register_rule("a", line_a);
        generator.register_rule("b", line_b);
        generator
    }

    #[test]
    fn wrapper_scenario_is_exact() {
        let generator = setup();
        let mut ws = Workspace::new(generator.registry().clone());
        let root = ws.add_instance("wrapper").unwrap();
        let a = ws.add_instance("a").unwrap();
        let b = ws.add_instance("b").unwrap();
        ws.link_next(a, b).unwrap();
        ws.connect_statement(root, "BODY", a).unwrap();

        let body = generator.generate_body(&ws, &mut GenerationContext::default());
        assert_eq!(body, "BLOCK {\na;\nb;\n}\n");
    }

    #[test]
    fn kind_without_rule_is_inert() {
        let generator = setup();
        let mut ws = Workspace::new(generator.registry().clone());
        let a = ws.add_instance("a").unwrap();
        ws.add_instance("v").unwrap();
        let b = ws.add_instance("b").unwrap();
        ws.link_next(a, b).unwrap();

        let body = generator.generate_body(&ws, &mut GenerationContext::default());
        assert_eq!(body, "a;\nb;\n");
    }

    #[test]
    fn disabled_block_is_skipped_but_chain_continues() {
        let generator = setup();
        let mut ws = Workspace::new(generator.registry().clone());
        let a1 = ws.add_instance("a").unwrap();
        let b = ws.add_instance("b").unwrap();
        let a2 = ws.add_instance("a").unwrap();
        ws.link_next(a1, b).unwrap();
        ws.link_next(b, a2).unwrap();
        ws.set_enabled(b, false).unwrap();

        let body = generator.generate_body(&ws, &mut GenerationContext::default());
        assert_eq!(body, "a;\na;\n");
    }

    #[test]
    fn indent_skips_blank_lines() {
        let generator = setup();
        let ws = Workspace::new(generator.registry().clone());
        let mut ctx = GenerationContext::default().with_indent("  ");
        let emitter = Emitter::new(&ws, generator.registry(), generator.rules(), &mut ctx);
        assert_eq!(emitter.indent("x;\n\ny;\n"), "  x;\n\n  y;\n");
    }

    #[test]
    fn empty_workspace_generates_header_only() {
        let generator = setup();
        let ws = Workspace::new(generator.registry().clone());
        let out = generator.generate(&ws, GenerationContext::default());
        assert_eq!(out, "// SPDX-License-Identifier: MIT\npragma solidity ^0.8.20;\n\n");
    }
}
