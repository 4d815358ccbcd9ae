//! jshade_factory: Canonical tree-node construction.
//!
//! The factory is the sole construction point for synthesized nodes, both
//! for representing parsed input in tests and for nodes created during
//! transformation. Each constructor stamps the node's type discriminator
//! and any generator-facing metadata its kind requires; literal nodes
//! always carry an explicit verbatim rendering and precedence so the
//! generator reproduces exactly the text chosen here rather than
//! re-deriving a default. Constructors are pure and perform no validation
//! against surrounding context.

use jshade_ast::node::*;
use jshade_ast::types::{LiteralValue, NodeId, VariableKind, Verbatim};
use jshade_core::intern::StringInterner;

/// Escapes a string value for a single-quoted rendering: backslashes and
/// single quotes get a backslash, so the raw text always re-parses to the
/// original value.
fn escape_single_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// Renders an f64 the way a JS engine prints it for the common cases the
/// factory synthesizes: integral values without a trailing `.0`.
fn render_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Constructs canonical nodes into an owned arena. The interner is shared
/// with the rest of the run so identifier names compare as integers
/// everywhere.
pub struct NodeFactory {
    arena: NodeArena,
    interner: StringInterner,
}

impl NodeFactory {
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            interner: StringInterner::new(),
        }
    }

    /// Build atop an existing arena, e.g. one produced by the parser.
    pub fn with_arena(arena: NodeArena, interner: StringInterner) -> Self {
        Self { arena, interner }
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Hand the finished tree (and its interner) to the next phase.
    pub fn finish(self) -> (NodeArena, StringInterner) {
        (self.arena, self.interner)
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.arena.alloc(Node::synthesized(kind))
    }

    // ========================================================================
    // Program and statements
    // ========================================================================

    pub fn program(&mut self, body: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::Program(Program { body }))
    }

    pub fn block_statement(&mut self, body: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::BlockStatement(BlockStatement { body }))
    }

    pub fn expression_statement(&mut self, expression: NodeId) -> NodeId {
        self.alloc(NodeKind::ExpressionStatement(ExpressionStatement {
            expression,
        }))
    }

    pub fn variable_declaration(
        &mut self,
        declarations: Vec<NodeId>,
        kind: VariableKind,
    ) -> NodeId {
        self.alloc(NodeKind::VariableDeclaration(VariableDeclaration {
            declarations,
            kind,
        }))
    }

    pub fn variable_declarator(&mut self, id: NodeId, init: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::VariableDeclarator(VariableDeclarator { id, init }))
    }

    pub fn function_declaration(
        &mut self,
        name: &str,
        params: Vec<NodeId>,
        body: NodeId,
    ) -> NodeId {
        let id = self.identifier(name);
        self.alloc(NodeKind::FunctionDeclaration(FunctionDeclaration {
            id,
            params,
            body,
        }))
    }

    pub fn if_statement(
        &mut self,
        test: NodeId,
        consequent: NodeId,
        alternate: Option<NodeId>,
    ) -> NodeId {
        self.alloc(NodeKind::IfStatement(IfStatement {
            test,
            consequent,
            alternate,
        }))
    }

    pub fn for_statement(
        &mut self,
        init: Option<NodeId>,
        test: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    ) -> NodeId {
        self.alloc(NodeKind::ForStatement(ForStatement {
            init,
            test,
            update,
            body,
        }))
    }

    pub fn for_in_statement(&mut self, left: NodeId, right: NodeId, body: NodeId) -> NodeId {
        self.alloc(NodeKind::ForInStatement(ForInStatement { left, right, body }))
    }

    pub fn while_statement(&mut self, test: NodeId, body: NodeId) -> NodeId {
        self.alloc(NodeKind::WhileStatement(WhileStatement { test, body }))
    }

    pub fn do_while_statement(&mut self, body: NodeId, test: NodeId) -> NodeId {
        self.alloc(NodeKind::DoWhileStatement(DoWhileStatement { body, test }))
    }

    pub fn return_statement(&mut self, argument: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::ReturnStatement(ReturnStatement { argument }))
    }

    /// The label is attached only when present, matching the generator's
    /// expected shape for a plain `break`.
    pub fn break_statement(&mut self, label: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::BreakStatement(BreakStatement { label }))
    }

    pub fn continue_statement(&mut self, label: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::ContinueStatement(ContinueStatement { label }))
    }

    pub fn labeled_statement(&mut self, label: NodeId, body: NodeId) -> NodeId {
        self.alloc(NodeKind::LabeledStatement(LabeledStatement { label, body }))
    }

    pub fn switch_statement(&mut self, discriminant: NodeId, cases: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::SwitchStatement(SwitchStatement {
            discriminant,
            cases,
        }))
    }

    pub fn switch_case(&mut self, test: Option<NodeId>, consequent: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::SwitchCase(SwitchCase { test, consequent }))
    }

    pub fn try_statement(
        &mut self,
        block: NodeId,
        handler: Option<NodeId>,
        finalizer: Option<NodeId>,
    ) -> NodeId {
        self.alloc(NodeKind::TryStatement(TryStatement {
            block,
            handler,
            finalizer,
        }))
    }

    pub fn catch_clause(&mut self, param: NodeId, body: NodeId) -> NodeId {
        self.alloc(NodeKind::CatchClause(CatchClause { param, body }))
    }

    pub fn throw_statement(&mut self, argument: NodeId) -> NodeId {
        self.alloc(NodeKind::ThrowStatement(ThrowStatement { argument }))
    }

    pub fn empty_statement(&mut self) -> NodeId {
        self.alloc(NodeKind::EmptyStatement)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn identifier(&mut self, name: &str) -> NodeId {
        let name = self.interner.intern(name);
        self.alloc(NodeKind::Identifier(Identifier { name }))
    }

    pub fn this_expression(&mut self) -> NodeId {
        self.alloc(NodeKind::ThisExpression)
    }

    /// A string literal, rendered in single quotes by default.
    pub fn string_literal(&mut self, value: &str) -> NodeId {
        let raw = format!("'{}'", escape_single_quoted(value));
        self.alloc(NodeKind::Literal(Literal {
            value: LiteralValue::String(value.to_string()),
            verbatim: Verbatim::primary(raw.clone()),
            raw,
        }))
    }

    pub fn number_literal(&mut self, value: f64) -> NodeId {
        let raw = render_number(value);
        self.alloc(NodeKind::Literal(Literal {
            value: LiteralValue::Number(value),
            verbatim: Verbatim::primary(raw.clone()),
            raw,
        }))
    }

    pub fn boolean_literal(&mut self, value: bool) -> NodeId {
        let raw = value.to_string();
        self.alloc(NodeKind::Literal(Literal {
            value: LiteralValue::Boolean(value),
            verbatim: Verbatim::primary(raw.clone()),
            raw,
        }))
    }

    pub fn null_literal(&mut self) -> NodeId {
        self.alloc(NodeKind::Literal(Literal {
            value: LiteralValue::Null,
            verbatim: Verbatim::primary("null"),
            raw: "null".to_string(),
        }))
    }

    pub fn binary_expression(&mut self, operator: &str, left: NodeId, right: NodeId) -> NodeId {
        self.alloc(NodeKind::BinaryExpression(BinaryExpression {
            operator: operator.to_string(),
            left,
            right,
        }))
    }

    pub fn logical_expression(&mut self, operator: &str, left: NodeId, right: NodeId) -> NodeId {
        self.alloc(NodeKind::LogicalExpression(LogicalExpression {
            operator: operator.to_string(),
            left,
            right,
        }))
    }

    pub fn unary_expression(&mut self, operator: &str, argument: NodeId) -> NodeId {
        self.alloc(NodeKind::UnaryExpression(UnaryExpression {
            operator: operator.to_string(),
            argument,
            prefix: true,
        }))
    }

    pub fn update_expression(&mut self, operator: &str, argument: NodeId, prefix: bool) -> NodeId {
        self.alloc(NodeKind::UpdateExpression(UpdateExpression {
            operator: operator.to_string(),
            argument,
            prefix,
        }))
    }

    pub fn assignment_expression(&mut self, operator: &str, left: NodeId, right: NodeId) -> NodeId {
        self.alloc(NodeKind::AssignmentExpression(AssignmentExpression {
            operator: operator.to_string(),
            left,
            right,
        }))
    }

    pub fn conditional_expression(
        &mut self,
        test: NodeId,
        consequent: NodeId,
        alternate: NodeId,
    ) -> NodeId {
        self.alloc(NodeKind::ConditionalExpression(ConditionalExpression {
            test,
            consequent,
            alternate,
        }))
    }

    pub fn call_expression(&mut self, callee: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::CallExpression(CallExpression { callee, arguments }))
    }

    pub fn new_expression(&mut self, callee: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::NewExpression(NewExpression { callee, arguments }))
    }

    pub fn member_expression(&mut self, object: NodeId, property: NodeId, computed: bool) -> NodeId {
        self.alloc(NodeKind::MemberExpression(MemberExpression {
            object,
            property,
            computed,
        }))
    }

    pub fn function_expression(
        &mut self,
        id: Option<NodeId>,
        params: Vec<NodeId>,
        body: NodeId,
    ) -> NodeId {
        self.alloc(NodeKind::FunctionExpression(FunctionExpression {
            id,
            params,
            body,
        }))
    }

    pub fn object_expression(&mut self, properties: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::ObjectExpression(ObjectExpression { properties }))
    }

    pub fn property(&mut self, key: NodeId, value: NodeId, computed: bool) -> NodeId {
        self.alloc(NodeKind::Property(Property {
            key,
            value,
            computed,
        }))
    }

    pub fn array_expression(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::ArrayExpression(ArrayExpression { elements }))
    }

    pub fn sequence_expression(&mut self, expressions: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::SequenceExpression(SequenceExpression { expressions }))
    }
}

impl Default for NodeFactory {
    fn default() -> Self {
        Self::new()
    }
}
