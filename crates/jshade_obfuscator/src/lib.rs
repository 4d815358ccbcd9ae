//! jshade_obfuscator: obfuscation run orchestration.
//!
//! Ties the phases together: a tree built through the node factory (or
//! handed over by an external parser) goes through scope analysis and the
//! transformation walk, and comes back annotated for the code generator.
//! A run either completes fully or returns an error and no tree.

pub use jshade_ast::node::{NodeArena, NodeKind};
pub use jshade_ast::types::NodeId;
pub use jshade_core::intern::StringInterner;
pub use jshade_diagnostics::ObfuscationError;
pub use jshade_factory::NodeFactory;
pub use jshade_options::{NumericEncoding, ObfuscationOptions, StringEncoding};
pub use jshade_scopes::ScopeTree;
pub use jshade_transformers::{TransformDriver, TransformOutput};

/// A transformed program: the annotated tree, its interner, and the scope
/// analysis behind the renaming.
#[derive(Debug)]
pub struct ObfuscationResult {
    pub arena: NodeArena,
    pub interner: StringInterner,
    pub scopes: ScopeTree,
}

/// The top-level entry point. Holds the configuration; each call to
/// [`obfuscate`](Obfuscator::obfuscate) is an independent run with fresh
/// per-run state.
pub struct Obfuscator {
    options: ObfuscationOptions,
}

impl Obfuscator {
    pub fn new(options: ObfuscationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ObfuscationOptions {
        &self.options
    }

    /// Obfuscate the program rooted at `root`. Consumes the tree; on error
    /// nothing is returned, so callers never observe a half-transformed
    /// program.
    pub fn obfuscate(
        &self,
        arena: NodeArena,
        interner: StringInterner,
        root: NodeId,
    ) -> Result<ObfuscationResult, ObfuscationError> {
        let mut driver = TransformDriver::new(self.options.clone());
        let output = driver.run(arena, &interner, root)?;
        Ok(ObfuscationResult {
            arena: output.arena,
            interner,
            scopes: output.scopes,
        })
    }

    /// Like [`obfuscate`](Obfuscator::obfuscate), but with a caller-chosen
    /// reserved-name predicate instead of the options' reserved list.
    pub fn obfuscate_with_reserved(
        &self,
        arena: NodeArena,
        interner: StringInterner,
        root: NodeId,
        reserved: impl Fn(&str) -> bool + 'static,
    ) -> Result<ObfuscationResult, ObfuscationError> {
        let mut driver =
            TransformDriver::new(self.options.clone()).with_reserved_predicate(reserved);
        let output = driver.run(arena, &interner, root)?;
        Ok(ObfuscationResult {
            arena: output.arena,
            interner,
            scopes: output.scopes,
        })
    }
}
