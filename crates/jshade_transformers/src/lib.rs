//! jshade_transformers: the obfuscating tree rewrites.
//!
//! Two transformations run over a scope-analyzed tree:
//! - the identifier renamer replaces every program-bound name with a
//!   generated one, identically at all declaration and use sites
//! - the literal encoder re-renders string and numeric literals through
//!   their verbatim metadata without touching semantic values
//!
//! The [`TransformDriver`] owns all per-run state (visited set, name
//! generator, options) and orchestrates the single transformation walk.

pub mod driver;
pub mod encode;
pub mod names;
pub mod rename;

pub use driver::{TransformDriver, TransformOutput};
pub use encode::LiteralEncoder;
pub use names::NameGenerator;
pub use rename::IdentifierRenamer;
