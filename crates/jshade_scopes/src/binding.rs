//! Binding and reference records.

use jshade_ast::types::{BindingFlags, BindingId, NodeId, ScopeId};
use jshade_core::intern::InternedString;

/// One declared name. All declarations of a name that land in the same
/// effective scope share a single binding.
#[derive(Debug)]
pub struct Binding {
    pub id: BindingId,
    /// The original declared name.
    pub name: InternedString,
    /// What kinds of declaration sites contributed to this binding.
    pub flags: BindingFlags,
    /// The scope owning this binding.
    pub scope: ScopeId,
    /// Declaration-site identifier nodes, in source order.
    pub declarations: Vec<NodeId>,
    /// Identifier-use nodes that resolved to this binding.
    pub references: Vec<NodeId>,
    /// The generated name, assigned exactly once per run.
    pub obfuscated_name: Option<InternedString>,
}

impl Binding {
    pub fn new(id: BindingId, name: InternedString, flags: BindingFlags, scope: ScopeId) -> Self {
        Self {
            id,
            name,
            flags,
            scope,
            declarations: Vec::new(),
            references: Vec::new(),
            obfuscated_name: None,
        }
    }
}

/// An identifier-use site and the binding it resolved to.
/// `binding` is `None` for free/global references, which are never renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub node: NodeId,
    pub binding: Option<BindingId>,
}
