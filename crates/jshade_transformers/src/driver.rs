//! The transform driver: one orchestrated pass over one tree.

use crate::encode::LiteralEncoder;
use crate::names::NameGenerator;
use crate::rename::IdentifierRenamer;
use jshade_ast::node::{NodeArena, NodeKind};
use jshade_ast::types::NodeId;
use jshade_ast::visit::child_ids;
use jshade_core::collections::FxHashSet;
use jshade_core::intern::StringInterner;
use jshade_diagnostics::ObfuscationError;
use jshade_options::ObfuscationOptions;
use jshade_scopes::{ScopeBuilder, ScopeTree};

/// The transformed tree plus the scope analysis that shaped it.
pub struct TransformOutput {
    pub arena: NodeArena,
    pub scopes: ScopeTree,
}

/// Drives one obfuscation pass: scope building first, then a single
/// pre-order walk dispatching identifiers to the renamer and literals to
/// the encoder.
///
/// All mutable run state lives on the driver instance: the visited set,
/// the name generator, and the reserved-name predicate. The visited set
/// persists across [`run`](TransformDriver::run) calls on the same driver,
/// so feeding an already transformed arena back in leaves it unchanged.
///
/// `run` takes the arena by value and only returns it on success; a failed
/// run consumes the tree, so a partially transformed program is never
/// observable.
pub struct TransformDriver {
    options: ObfuscationOptions,
    reserved: Box<dyn Fn(&str) -> bool>,
    generator: NameGenerator,
    visited: FxHashSet<NodeId>,
}

impl TransformDriver {
    /// A driver whose reserved predicate is membership in
    /// `options.reserved_names`.
    pub fn new(options: ObfuscationOptions) -> Self {
        let reserved_names = options.reserved_names.clone();
        Self {
            options,
            reserved: Box::new(move |name| reserved_names.contains(name)),
            generator: NameGenerator::new(),
            visited: FxHashSet::default(),
        }
    }

    /// Replace the reserved-name predicate. The predicate decides both
    /// which original names keep their text and which generated candidates
    /// are rejected.
    pub fn with_reserved_predicate(
        mut self,
        predicate: impl Fn(&str) -> bool + 'static,
    ) -> Self {
        self.reserved = Box::new(predicate);
        self
    }

    pub fn options(&self) -> &ObfuscationOptions {
        &self.options
    }

    /// Transform the program rooted at `root`.
    pub fn run(
        &mut self,
        mut arena: NodeArena,
        interner: &StringInterner,
        root: NodeId,
    ) -> Result<TransformOutput, ObfuscationError> {
        let mut scopes = ScopeBuilder::new(&arena).build(root)?;

        let encoder = LiteralEncoder::new(&self.options);
        let mut renamer = IdentifierRenamer::new(
            &mut scopes,
            interner,
            &mut self.generator,
            self.reserved.as_ref(),
        );

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !self.visited.insert(id) {
                continue;
            }
            match &arena.get(id).kind {
                NodeKind::Identifier(_) => {
                    if self.options.identifier_renaming {
                        renamer.rename(&mut arena, id)?;
                    }
                }
                NodeKind::Literal(_) => {
                    encoder.encode(&mut arena, id)?;
                }
                _ => {}
            }
            let mut children = child_ids(&arena, id);
            children.reverse();
            stack.extend(children);
        }

        Ok(TransformOutput { arena, scopes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jshade_ast::types::VariableKind;
    use jshade_factory::NodeFactory;

    fn name_of(arena: &NodeArena, interner: &StringInterner, id: NodeId) -> String {
        match &arena.get(id).kind {
            NodeKind::Identifier(ident) => interner.resolve(ident.name).to_string(),
            other => panic!("expected Identifier, got {}", other.name()),
        }
    }

    fn verbatim_of(arena: &NodeArena, id: NodeId) -> String {
        match &arena.get(id).kind {
            NodeKind::Literal(literal) => literal.verbatim.content.clone(),
            other => panic!("expected Literal, got {}", other.name()),
        }
    }

    #[test]
    fn test_run_renames_and_encodes_in_one_pass() {
        let mut f = NodeFactory::new();
        let x_decl = f.identifier("x");
        let six = f.number_literal(6.0);
        let declarator = f.variable_declarator(x_decl, Some(six));
        let var_decl = f.variable_declaration(vec![declarator], VariableKind::Var);
        let x_use = f.identifier("x");
        let use_stmt = f.expression_statement(x_use);
        let program = f.program(vec![var_decl, use_stmt]);

        let (arena, interner) = f.finish();
        let mut driver = TransformDriver::new(ObfuscationOptions::default());
        let output = driver.run(arena, &interner, program).unwrap();

        assert_eq!(name_of(&output.arena, &interner, x_decl), "_0x1000");
        assert_eq!(name_of(&output.arena, &interner, x_use), "_0x1000");
        assert_eq!(verbatim_of(&output.arena, six), "0x6");
    }

    #[test]
    fn test_second_run_on_same_driver_is_a_no_op() {
        let mut f = NodeFactory::new();
        let x_decl = f.identifier("x");
        let declarator = f.variable_declarator(x_decl, None);
        let var_decl = f.variable_declaration(vec![declarator], VariableKind::Var);
        let program = f.program(vec![var_decl]);

        let (arena, interner) = f.finish();
        let mut driver = TransformDriver::new(ObfuscationOptions::default());
        let output = driver.run(arena, &interner, program).unwrap();
        let first = name_of(&output.arena, &interner, x_decl);

        let output = driver.run(output.arena, &interner, program).unwrap();
        assert_eq!(name_of(&output.arena, &interner, x_decl), first);
    }

    #[test]
    fn test_renaming_disabled_keeps_names() {
        let mut f = NodeFactory::new();
        let x_decl = f.identifier("x");
        let declarator = f.variable_declarator(x_decl, None);
        let var_decl = f.variable_declaration(vec![declarator], VariableKind::Var);
        let program = f.program(vec![var_decl]);

        let (arena, interner) = f.finish();
        let mut options = ObfuscationOptions::default();
        options.identifier_renaming = false;
        let mut driver = TransformDriver::new(options);
        let output = driver.run(arena, &interner, program).unwrap();
        assert_eq!(name_of(&output.arena, &interner, x_decl), "x");
    }

    #[test]
    fn test_failed_run_consumes_the_arena() {
        let mut f = NodeFactory::new();
        let bad = f.number_literal(1.0);
        let declarator = f.variable_declarator(bad, None);
        let var_decl = f.variable_declaration(vec![declarator], VariableKind::Var);
        let program = f.program(vec![var_decl]);

        let (arena, interner) = f.finish();
        let mut driver = TransformDriver::new(ObfuscationOptions::default());
        // The arena moves into run and is dropped on the error path.
        assert!(driver.run(arena, &interner, program).is_err());
    }

    #[test]
    fn test_injected_predicate_overrides_options() {
        let mut f = NodeFactory::new();
        let keep_decl = f.identifier("keep");
        let declarator = f.variable_declarator(keep_decl, None);
        let var_decl = f.variable_declaration(vec![declarator], VariableKind::Var);
        let program = f.program(vec![var_decl]);

        let (arena, interner) = f.finish();
        let mut driver = TransformDriver::new(ObfuscationOptions::default())
            .with_reserved_predicate(|name| name == "keep");
        let output = driver.run(arena, &interner, program).unwrap();
        assert_eq!(name_of(&output.arena, &interner, keep_decl), "keep");
    }
}
