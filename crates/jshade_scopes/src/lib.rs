//! jshade_scopes: Lexical scope analysis for the obfuscation core.
//!
//! Walks a syntax tree once and produces a [`tree::ScopeTree`] mirroring
//! the host language's scoping rules:
//! - `var` and function declarations hoist to the nearest enclosing
//!   function-or-program scope, through any intervening blocks
//! - `let`/`const`, parameters, and catch parameters bind in their own
//!   immediately enclosing scope
//! - re-declarations that land in the same effective scope collapse into
//!   one binding
//! - identifier uses resolve outward through the scope chain; uses with no
//!   matching binding are free/global and are never renamed

pub mod binding;
pub mod builder;
pub mod scope;
pub mod tree;

pub use binding::{Binding, Reference};
pub use builder::ScopeBuilder;
pub use scope::{Scope, ScopeKind};
pub use tree::ScopeTree;
