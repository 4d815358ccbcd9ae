//! The scope builder.
//!
//! Walks the AST top-down exactly once and builds the scope tree:
//! - Program/function bodies push hoist-target scopes; blocks, catch
//!   clauses, loop heads, and switch case blocks push block scopes
//! - a hoisting pre-pass runs on every function-or-program body so that
//!   `var` and function declarations land in the function scope before any
//!   reference in that body is resolved, no matter how deeply they sit
//!   inside nested blocks
//! - identifier uses resolve outward through the scope chain; unresolved
//!   uses are recorded as free/global references

use crate::scope::ScopeKind;
use crate::tree::ScopeTree;
use jshade_ast::node::{NodeArena, NodeKind, VariableDeclaration};
use jshade_ast::types::{BindingFlags, NodeId, ScopeId};
use jshade_diagnostics::{messages, Diagnostic, ObfuscationError};

/// Builds a [`ScopeTree`] from one syntax tree. One builder per run;
/// all state is owned by the instance.
pub struct ScopeBuilder<'a> {
    arena: &'a NodeArena,
    tree: ScopeTree,
    current: ScopeId,
}

impl<'a> ScopeBuilder<'a> {
    pub fn new(arena: &'a NodeArena) -> Self {
        Self {
            arena,
            tree: ScopeTree::new(),
            current: ScopeId::INVALID,
        }
    }

    /// Build the scope tree for the program rooted at `root`.
    pub fn build(mut self, root: NodeId) -> Result<ScopeTree, ObfuscationError> {
        let node = self.arena.get(root);
        match &node.kind {
            NodeKind::Program(program) => {
                let scope = self.tree.push_scope(ScopeKind::Program, None);
                self.tree.set_root(scope);
                self.current = scope;
                for &stmt in &program.body {
                    self.hoist_declarations(stmt)?;
                }
                self.prescan_lexical(&program.body)?;
                for &stmt in &program.body {
                    self.bind(stmt)?;
                }
                Ok(self.tree)
            }
            other => Err(ObfuscationError::UnsupportedNode(Diagnostic::with_span(
                node.span,
                &messages::UNSUPPORTED_NODE_KIND,
                &[other.name(), "scope builder"],
            ))),
        }
    }

    // ========================================================================
    // Hoisting pre-pass
    // ========================================================================

    /// Collect `var` declarators and function declarations from a statement
    /// into the current (function-or-program) scope, recursing through
    /// nested statement structure but never into nested functions.
    fn hoist_declarations(&mut self, id: NodeId) -> Result<(), ObfuscationError> {
        match &self.arena.get(id).kind {
            NodeKind::VariableDeclaration(decl) => {
                if !decl.kind.is_block_scoped() {
                    for &declarator in &decl.declarations {
                        let ident = self.declarator_identifier(declarator)?;
                        self.declare(ident, BindingFlags::FUNCTION_SCOPED_VARIABLE);
                    }
                }
            }
            NodeKind::FunctionDeclaration(func) => {
                // The name hoists; the body is that function's own concern
                let ident = self.expect_identifier(func.id, "FunctionDeclaration")?;
                self.declare(ident, BindingFlags::FUNCTION);
            }
            NodeKind::BlockStatement(block) => {
                for &stmt in &block.body {
                    self.hoist_declarations(stmt)?;
                }
            }
            NodeKind::IfStatement(stmt) => {
                self.hoist_declarations(stmt.consequent)?;
                if let Some(alternate) = stmt.alternate {
                    self.hoist_declarations(alternate)?;
                }
            }
            NodeKind::ForStatement(stmt) => {
                if let Some(init) = stmt.init {
                    if matches!(self.arena.get(init).kind, NodeKind::VariableDeclaration(_)) {
                        self.hoist_declarations(init)?;
                    }
                }
                self.hoist_declarations(stmt.body)?;
            }
            NodeKind::ForInStatement(stmt) => {
                if matches!(self.arena.get(stmt.left).kind, NodeKind::VariableDeclaration(_)) {
                    self.hoist_declarations(stmt.left)?;
                }
                self.hoist_declarations(stmt.body)?;
            }
            NodeKind::WhileStatement(stmt) => self.hoist_declarations(stmt.body)?,
            NodeKind::DoWhileStatement(stmt) => self.hoist_declarations(stmt.body)?,
            NodeKind::LabeledStatement(stmt) => self.hoist_declarations(stmt.body)?,
            NodeKind::SwitchStatement(stmt) => {
                for &case in &stmt.cases {
                    if let NodeKind::SwitchCase(case_node) = &self.arena.get(case).kind {
                        for &stmt in &case_node.consequent {
                            self.hoist_declarations(stmt)?;
                        }
                    }
                }
            }
            NodeKind::TryStatement(stmt) => {
                self.hoist_declarations(stmt.block)?;
                if let Some(handler) = stmt.handler {
                    if let NodeKind::CatchClause(catch) = &self.arena.get(handler).kind {
                        self.hoist_declarations(catch.body)?;
                    }
                }
                if let Some(finalizer) = stmt.finalizer {
                    self.hoist_declarations(finalizer)?;
                }
            }
            // Expressions cannot contain hoistable declarations except
            // inside nested function bodies, which hoist into themselves
            _ => {}
        }
        Ok(())
    }

    /// Shallow scan of a statement list for `let`/`const` declarations,
    /// binding them into the current scope before any statement is bound.
    fn prescan_lexical(&mut self, stmts: &[NodeId]) -> Result<(), ObfuscationError> {
        for &stmt in stmts {
            if let NodeKind::VariableDeclaration(decl) = &self.arena.get(stmt).kind {
                if decl.kind.is_block_scoped() {
                    for &declarator in &decl.declarations {
                        let ident = self.declarator_identifier(declarator)?;
                        self.declare(ident, BindingFlags::BLOCK_SCOPED_VARIABLE);
                    }
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Binding walk
    // ========================================================================

    fn bind(&mut self, id: NodeId) -> Result<(), ObfuscationError> {
        match &self.arena.get(id).kind {
            NodeKind::Program(program) => {
                for &stmt in &program.body {
                    self.bind(stmt)?;
                }
            }
            NodeKind::BlockStatement(block) => {
                self.push_scope(ScopeKind::Block);
                self.prescan_lexical(&block.body)?;
                for &stmt in &block.body {
                    self.bind(stmt)?;
                }
                self.pop_scope();
            }
            NodeKind::ExpressionStatement(stmt) => self.bind(stmt.expression)?,
            NodeKind::VariableDeclaration(decl) => self.bind_variable_declaration(decl)?,
            NodeKind::VariableDeclarator(decl) => {
                // Reached only through bind_variable_declaration; a stray
                // declarator still binds its initializer
                if let Some(init) = decl.init {
                    self.bind(init)?;
                }
            }
            NodeKind::FunctionDeclaration(func) => {
                // Name already declared by the hoisting pre-pass
                let params = func.params.clone();
                let body = func.body;
                self.bind_function_scope(None, &params, body)?;
            }
            NodeKind::IfStatement(stmt) => {
                self.bind(stmt.test)?;
                self.bind(stmt.consequent)?;
                if let Some(alternate) = stmt.alternate {
                    self.bind(alternate)?;
                }
            }
            NodeKind::ForStatement(stmt) => {
                self.push_scope(ScopeKind::Block);
                if let Some(init) = stmt.init {
                    self.bind(init)?;
                }
                if let Some(test) = stmt.test {
                    self.bind(test)?;
                }
                if let Some(update) = stmt.update {
                    self.bind(update)?;
                }
                self.bind(stmt.body)?;
                self.pop_scope();
            }
            NodeKind::ForInStatement(stmt) => {
                self.push_scope(ScopeKind::Block);
                self.bind(stmt.left)?;
                self.bind(stmt.right)?;
                self.bind(stmt.body)?;
                self.pop_scope();
            }
            NodeKind::WhileStatement(stmt) => {
                self.bind(stmt.test)?;
                self.bind(stmt.body)?;
            }
            NodeKind::DoWhileStatement(stmt) => {
                self.bind(stmt.body)?;
                self.bind(stmt.test)?;
            }
            NodeKind::ReturnStatement(stmt) => {
                if let Some(argument) = stmt.argument {
                    self.bind(argument)?;
                }
            }
            // Break/continue labels are not variable references
            NodeKind::BreakStatement(_) | NodeKind::ContinueStatement(_) => {}
            NodeKind::LabeledStatement(stmt) => self.bind(stmt.body)?,
            NodeKind::SwitchStatement(stmt) => {
                self.bind(stmt.discriminant)?;
                // All cases share one block scope
                self.push_scope(ScopeKind::Block);
                let cases = stmt.cases.clone();
                for &case in &cases {
                    if let NodeKind::SwitchCase(case_node) = &self.arena.get(case).kind {
                        self.prescan_lexical(&case_node.consequent)?;
                    }
                }
                for &case in &cases {
                    if let NodeKind::SwitchCase(case_node) = &self.arena.get(case).kind {
                        if let Some(test) = case_node.test {
                            self.bind(test)?;
                        }
                        for &stmt in &case_node.consequent.clone() {
                            self.bind(stmt)?;
                        }
                    }
                }
                self.pop_scope();
            }
            NodeKind::SwitchCase(case) => {
                if let Some(test) = case.test {
                    self.bind(test)?;
                }
                for &stmt in &case.consequent {
                    self.bind(stmt)?;
                }
            }
            NodeKind::TryStatement(stmt) => {
                self.bind(stmt.block)?;
                if let Some(handler) = stmt.handler {
                    self.bind(handler)?;
                }
                if let Some(finalizer) = stmt.finalizer {
                    self.bind(finalizer)?;
                }
            }
            NodeKind::CatchClause(catch) => {
                self.push_scope(ScopeKind::Catch);
                let ident = self.expect_identifier(catch.param, "CatchClause")?;
                self.declare(ident, BindingFlags::CATCH_PARAMETER);
                self.bind(catch.body)?;
                self.pop_scope();
            }
            NodeKind::ThrowStatement(stmt) => self.bind(stmt.argument)?,
            NodeKind::EmptyStatement => {}

            NodeKind::Identifier(ident) => {
                let name = ident.name;
                let binding = self.tree.resolve(self.current, name);
                self.tree.add_reference(id, name, binding);
            }
            NodeKind::Literal(_) | NodeKind::ThisExpression => {}
            NodeKind::BinaryExpression(expr) => {
                self.bind(expr.left)?;
                self.bind(expr.right)?;
            }
            NodeKind::LogicalExpression(expr) => {
                self.bind(expr.left)?;
                self.bind(expr.right)?;
            }
            NodeKind::UnaryExpression(expr) => self.bind(expr.argument)?,
            NodeKind::UpdateExpression(expr) => self.bind(expr.argument)?,
            NodeKind::AssignmentExpression(expr) => {
                self.bind(expr.left)?;
                self.bind(expr.right)?;
            }
            NodeKind::ConditionalExpression(expr) => {
                self.bind(expr.test)?;
                self.bind(expr.consequent)?;
                self.bind(expr.alternate)?;
            }
            NodeKind::CallExpression(expr) => {
                self.bind(expr.callee)?;
                for &arg in &expr.arguments.clone() {
                    self.bind(arg)?;
                }
            }
            NodeKind::NewExpression(expr) => {
                self.bind(expr.callee)?;
                for &arg in &expr.arguments.clone() {
                    self.bind(arg)?;
                }
            }
            NodeKind::MemberExpression(expr) => {
                self.bind(expr.object)?;
                // `a.b` names a property, not a variable; `a[b]` reads one
                if expr.computed {
                    self.bind(expr.property)?;
                }
            }
            NodeKind::FunctionExpression(func) => {
                let name = func.id;
                let params = func.params.clone();
                let body = func.body;
                self.bind_function_scope(name, &params, body)?;
            }
            NodeKind::ObjectExpression(expr) => {
                for &prop in &expr.properties.clone() {
                    self.bind(prop)?;
                }
            }
            NodeKind::Property(prop) => {
                // Non-computed keys name properties, not variables
                if prop.computed {
                    self.bind(prop.key)?;
                }
                self.bind(prop.value)?;
            }
            NodeKind::ArrayExpression(expr) => {
                for &elem in &expr.elements.clone() {
                    self.bind(elem)?;
                }
            }
            NodeKind::SequenceExpression(expr) => {
                for &e in &expr.expressions.clone() {
                    self.bind(e)?;
                }
            }
        }
        Ok(())
    }

    fn bind_variable_declaration(
        &mut self,
        decl: &VariableDeclaration,
    ) -> Result<(), ObfuscationError> {
        let flags = if decl.kind.is_block_scoped() {
            BindingFlags::BLOCK_SCOPED_VARIABLE
        } else {
            BindingFlags::FUNCTION_SCOPED_VARIABLE
        };
        for &declarator in &decl.declarations {
            let ident = self.declarator_identifier(declarator)?;
            // Re-declaring merges into the binding created by a pre-pass
            self.declare(ident, flags);
            if let NodeKind::VariableDeclarator(d) = &self.arena.get(declarator).kind {
                if let Some(init) = d.init {
                    self.bind(init)?;
                }
            }
        }
        Ok(())
    }

    /// Push a function scope, declare the optional function-expression name
    /// and the parameters, hoist the body, and bind it.
    fn bind_function_scope(
        &mut self,
        name: Option<NodeId>,
        params: &[NodeId],
        body: NodeId,
    ) -> Result<(), ObfuscationError> {
        self.push_scope(ScopeKind::Function);
        if let Some(name) = name {
            let ident = self.expect_identifier(name, "FunctionExpression")?;
            self.declare(ident, BindingFlags::FUNCTION);
        }
        for &param in params {
            let ident = self.expect_identifier(param, "Parameter")?;
            self.declare(ident, BindingFlags::PARAMETER);
        }
        match &self.arena.get(body).kind {
            NodeKind::BlockStatement(block) => {
                let stmts = block.body.clone();
                for &stmt in &stmts {
                    self.hoist_declarations(stmt)?;
                }
                self.prescan_lexical(&stmts)?;
                for &stmt in &stmts {
                    self.bind(stmt)?;
                }
            }
            other => {
                let span = self.arena.get(body).span;
                return Err(ObfuscationError::UnsupportedNode(Diagnostic::with_span(
                    span,
                    &messages::UNSUPPORTED_NODE_KIND,
                    &[other.name(), "scope builder"],
                )));
            }
        }
        self.pop_scope();
        Ok(())
    }

    // ========================================================================
    // Scope and binding management
    // ========================================================================

    fn push_scope(&mut self, kind: ScopeKind) {
        self.current = self.tree.push_scope(kind, Some(self.current));
    }

    fn pop_scope(&mut self) {
        if let Some(parent) = self.tree.scope(self.current).parent {
            self.current = parent;
        }
    }

    /// The nearest enclosing function-or-program scope.
    fn hoist_target(&self) -> ScopeId {
        let mut scope = self.current;
        loop {
            let s = self.tree.scope(scope);
            if s.kind.is_hoist_target() {
                return scope;
            }
            match s.parent {
                Some(parent) => scope = parent,
                None => return scope,
            }
        }
    }

    /// Declare `ident` with `flags`, targeting the hoist scope for hoisted
    /// kinds and the current scope otherwise.
    fn declare(&mut self, ident: NodeId, flags: BindingFlags) {
        let target = if flags.intersects(BindingFlags::HOISTED) {
            self.hoist_target()
        } else {
            self.current
        };
        let name = match &self.arena.get(ident).kind {
            NodeKind::Identifier(i) => i.name,
            // Callers verified the kind via expect_identifier
            _ => return,
        };
        self.tree.declare(target, name, flags, ident);
    }

    /// Extract the identifier node from a declarator, or fail with a
    /// scope-resolution error at the offending node.
    fn declarator_identifier(&self, declarator: NodeId) -> Result<NodeId, ObfuscationError> {
        match &self.arena.get(declarator).kind {
            NodeKind::VariableDeclarator(d) => self.expect_identifier(d.id, "VariableDeclarator"),
            other => {
                let span = self.arena.get(declarator).span;
                Err(ObfuscationError::ScopeResolution(Diagnostic::with_span(
                    span,
                    &messages::EXPECTED_BINDING_IDENTIFIER,
                    &[other.name()],
                )))
            }
        }
    }

    fn expect_identifier(
        &self,
        node: NodeId,
        context: &'static str,
    ) -> Result<NodeId, ObfuscationError> {
        match &self.arena.get(node).kind {
            NodeKind::Identifier(_) => Ok(node),
            _ => Err(ObfuscationError::ScopeResolution(Diagnostic::with_span(
                self.arena.get(node).span,
                &messages::EXPECTED_BINDING_IDENTIFIER,
                &[context],
            ))),
        }
    }
}
