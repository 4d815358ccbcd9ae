//! The scope tree: flat arenas of scopes, bindings, and references built
//! fresh for each transformation run.

use crate::binding::{Binding, Reference};
use crate::scope::{Scope, ScopeKind};
use jshade_ast::types::{BindingFlags, BindingId, NodeId, ScopeId};
use jshade_core::collections::{FxHashSet, FxMap};
use jshade_core::intern::InternedString;

/// Scope analysis output for one tree. Scopes, bindings, and references
/// live in flat arenas addressed by stable integer handles; back-links are
/// plain handles, so there are no ownership cycles to manage.
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    bindings: Vec<Binding>,
    references: Vec<Reference>,
    /// Every identifier node with a role in scope analysis: declaration
    /// sites map to their binding, use sites to their resolution (`None`
    /// marks a free/global use). Identifier nodes absent from this map are
    /// not program bindings at all (member property names, property keys,
    /// statement labels) and must be left untouched by renaming.
    ident_bindings: FxMap<NodeId, Option<BindingId>>,
    /// Names of all free/global references seen in the program.
    free_names: FxHashSet<InternedString>,
    root: ScopeId,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    /// An empty tree. The root stays `ScopeId::INVALID` until the builder
    /// pushes the program scope.
    pub fn new() -> Self {
        Self {
            scopes: Vec::new(),
            bindings: Vec::new(),
            references: Vec::new(),
            ident_bindings: FxMap::default(),
            free_names: FxHashSet::default(),
            root: ScopeId::INVALID,
        }
    }

    /// The program scope.
    pub fn root(&self) -> ScopeId {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: ScopeId) {
        self.root = root;
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.index()]
    }

    pub fn binding_mut(&mut self, id: BindingId) -> &mut Binding {
        &mut self.bindings[id.index()]
    }

    pub fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(i, s)| (ScopeId(i as u32), s))
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// The scope-analysis role of an identifier node, if it has one.
    /// `Some(None)` is a free/global use; `Some(Some(_))` is a declaration
    /// site or resolved use; `None` means the identifier is not a binding
    /// position or use site at all.
    pub fn identifier_binding(&self, node: NodeId) -> Option<Option<BindingId>> {
        self.ident_bindings.get(&node).copied()
    }

    /// Names referenced free anywhere in the program.
    pub fn free_names(&self) -> &FxHashSet<InternedString> {
        &self.free_names
    }

    /// Look up a binding of `name` starting at `scope` and walking outward.
    pub fn resolve(&self, mut scope: ScopeId, name: InternedString) -> Option<BindingId> {
        loop {
            let s = self.scope(scope);
            if let Some(&binding) = s.bindings.get(&name) {
                return Some(binding);
            }
            scope = s.parent?;
        }
    }

    /// Whether `name` is lexically visible from `scope`, either as an
    /// original declared name or as a name already assigned by renaming.
    pub fn name_visible_from(&self, mut scope: ScopeId, name: InternedString) -> bool {
        loop {
            let s = self.scope(scope);
            if s.bindings.contains_key(&name) {
                return true;
            }
            let assigned = s
                .bindings
                .values()
                .any(|&b| self.binding(b).obfuscated_name == Some(name));
            if assigned {
                return true;
            }
            match s.parent {
                Some(parent) => scope = parent,
                None => return false,
            }
        }
    }

    // ------------------------------------------------------------------
    // Construction (used by the builder)
    // ------------------------------------------------------------------

    pub(crate) fn push_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, parent));
        id
    }

    /// Insert a binding for `name` in `scope`, or merge into the existing
    /// one: two declarations whose target is the same effective scope
    /// collapse into one binding. A declaration node the pre-pass already
    /// recorded is not recorded again, so each source site appears in
    /// `Binding::declarations` exactly once.
    pub(crate) fn declare(
        &mut self,
        scope: ScopeId,
        name: InternedString,
        flags: BindingFlags,
        declaration: NodeId,
    ) -> BindingId {
        if let Some(&existing) = self.scopes[scope.index()].bindings.get(&name) {
            let binding = self.binding_mut(existing);
            binding.flags |= flags;
            if !binding.declarations.contains(&declaration) {
                binding.declarations.push(declaration);
            }
            self.ident_bindings.insert(declaration, Some(existing));
            return existing;
        }

        let id = BindingId(self.bindings.len() as u32);
        let mut binding = Binding::new(id, name, flags, scope);
        binding.declarations.push(declaration);
        self.bindings.push(binding);
        self.scopes[scope.index()].bindings.insert(name, id);
        self.ident_bindings.insert(declaration, Some(id));
        id
    }

    /// Record an identifier use site and its resolution.
    pub(crate) fn add_reference(
        &mut self,
        node: NodeId,
        name: InternedString,
        binding: Option<BindingId>,
    ) {
        self.references.push(Reference { node, binding });
        self.ident_bindings.insert(node, binding);
        match binding {
            Some(b) => self.binding_mut(b).references.push(node),
            None => {
                self.free_names.insert(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jshade_core::intern::StringInterner;

    #[test]
    fn test_new_tree_is_empty_with_invalid_root() {
        let tree = ScopeTree::new();
        assert_eq!(tree.root(), ScopeId::INVALID);
        assert_eq!(tree.scope_count(), 0);
        assert_eq!(tree.binding_count(), 0);
        assert!(tree.references().is_empty());
    }

    #[test]
    fn test_redeclaring_the_same_node_records_it_once() {
        let interner = StringInterner::new();
        let name = interner.intern("test");
        let mut tree = ScopeTree::new();
        let scope = tree.push_scope(ScopeKind::Function, None);

        let site = NodeId(0);
        let first = tree.declare(scope, name, BindingFlags::FUNCTION_SCOPED_VARIABLE, site);
        let second = tree.declare(scope, name, BindingFlags::FUNCTION_SCOPED_VARIABLE, site);
        assert_eq!(first, second);
        assert_eq!(tree.binding(first).declarations, vec![site]);

        // A distinct declaration site of the same name still merges and is
        // still recorded.
        let other_site = NodeId(1);
        let merged = tree.declare(scope, name, BindingFlags::PARAMETER, other_site);
        assert_eq!(merged, first);
        assert_eq!(tree.binding(first).declarations, vec![site, other_site]);
        assert!(tree
            .binding(first)
            .flags
            .contains(BindingFlags::PARAMETER | BindingFlags::FUNCTION_SCOPED_VARIABLE));
    }
}
