//! Scope-aware identifier renaming.

use crate::names::NameGenerator;
use jshade_ast::node::{NodeArena, NodeKind};
use jshade_ast::types::NodeId;
use jshade_core::collections::FxHashSet;
use jshade_core::intern::{InternedString, StringInterner};
use jshade_diagnostics::{messages, Diagnostic, ObfuscationError};
use jshade_scopes::ScopeTree;

/// Renames program-bound identifiers in place. Each binding receives its
/// generated name exactly once, on the first identifier of the binding the
/// walk reaches; every later site of the same binding reuses it, so all
/// declaration and use sites end up textually identical.
///
/// Skipped outright: free/global references, names the reserved predicate
/// accepts, and identifiers with no variable role at all (member property
/// names, non-computed property keys, statement labels).
pub struct IdentifierRenamer<'a> {
    tree: &'a mut ScopeTree,
    interner: &'a StringInterner,
    generator: &'a mut NameGenerator,
    reserved: &'a dyn Fn(&str) -> bool,
    /// Names handed out during this run. Generated names are unique across
    /// the whole program, not merely within one scope.
    generated: FxHashSet<InternedString>,
}

impl<'a> IdentifierRenamer<'a> {
    pub fn new(
        tree: &'a mut ScopeTree,
        interner: &'a StringInterner,
        generator: &'a mut NameGenerator,
        reserved: &'a dyn Fn(&str) -> bool,
    ) -> Self {
        Self {
            tree,
            interner,
            generator,
            reserved,
            generated: FxHashSet::default(),
        }
    }

    /// Rename the identifier at `node` if it is a renameable binding site
    /// or bound use. Returns whether the node was rewritten.
    pub fn rename(
        &mut self,
        arena: &mut NodeArena,
        node: NodeId,
    ) -> Result<bool, ObfuscationError> {
        if !matches!(arena.get(node).kind, NodeKind::Identifier(_)) {
            let n = arena.get(node);
            return Err(ObfuscationError::UnsupportedNode(Diagnostic::with_span(
                n.span,
                &messages::UNSUPPORTED_NODE_KIND,
                &[n.kind.name(), "identifier renamer"],
            )));
        }

        let binding_id = match self.tree.identifier_binding(node) {
            // Free/global reference: must keep its original text.
            Some(None) => return Ok(false),
            Some(Some(b)) => b,
            // Not a variable position at all.
            None => return Ok(false),
        };

        let original = self.tree.binding(binding_id).name;
        if (self.reserved)(self.interner.resolve(original)) {
            return Ok(false);
        }

        let new_name = match self.tree.binding(binding_id).obfuscated_name {
            Some(name) => name,
            None => self.assign_name(binding_id)?,
        };

        if let NodeKind::Identifier(ident) = &mut arena.get_mut(node).kind {
            ident.name = new_name;
        }
        Ok(true)
    }

    /// Generate and record a fresh name for `binding_id`. A candidate is
    /// rejected when it was already handed out this run, is lexically
    /// visible from the binding's scope (as an original or already-assigned
    /// name), was referenced free anywhere, or is itself reserved.
    fn assign_name(
        &mut self,
        binding_id: jshade_ast::types::BindingId,
    ) -> Result<InternedString, ObfuscationError> {
        let scope = self.tree.binding(binding_id).scope;
        let name = {
            let tree = &*self.tree;
            let interner = self.interner;
            let generated = &self.generated;
            let reserved = self.reserved;
            self.generator.generate(|candidate| {
                if reserved(candidate) {
                    return true;
                }
                match interner.get(candidate) {
                    Some(interned) => {
                        generated.contains(&interned)
                            || tree.free_names().contains(&interned)
                            || tree.name_visible_from(scope, interned)
                    }
                    // Never interned, so nothing in the program uses it.
                    None => false,
                }
            })?
        };
        let interned = self.interner.intern(&name);
        self.generated.insert(interned);
        self.tree.binding_mut(binding_id).obfuscated_name = Some(interned);
        Ok(interned)
    }
}
