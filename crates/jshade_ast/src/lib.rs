//! jshade_ast: ESTree-shaped syntax tree definitions.
//!
//! Nodes live in a flat [`node::NodeArena`] and link to their children via
//! stable [`types::NodeId`] handles, so scope and binding records can index
//! identifier nodes without ownership cycles.

pub mod node;
pub mod types;
pub mod visit;

pub use node::{Node, NodeArena, NodeKind};
pub use types::{BindingId, NodeId, ScopeId};
