//! Scope records. Scopes form a chain from inner to outer via parent handles.

use jshade_ast::types::{BindingId, ScopeId};
use jshade_core::collections::OrderedMap;
use jshade_core::intern::InternedString;

/// The kind of lexical region a scope covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The program root. Targets hoisted declarations at the top level.
    Program,
    /// A function body. Targets hoisted declarations inside the function.
    Function,
    /// A block, switch case block, or loop head.
    Block,
    /// A catch clause; owns the catch parameter.
    Catch,
}

impl ScopeKind {
    /// Whether `var`/function declarations attach to this scope.
    pub fn is_hoist_target(self) -> bool {
        matches!(self, ScopeKind::Program | ScopeKind::Function)
    }
}

/// A lexical region and the bindings declared directly in it.
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    /// The enclosing scope; `None` only for the program scope.
    pub parent: Option<ScopeId>,
    /// Declared name -> binding, in declaration order.
    pub bindings: OrderedMap<InternedString, BindingId>,
}

impl Scope {
    pub fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            parent,
            bindings: OrderedMap::new(),
        }
    }
}
