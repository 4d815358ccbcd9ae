//! AST node definitions.
//!
//! Node payloads closely match the ESTree node interfaces the external
//! parser produces. Every node is stored in the [`NodeArena`] and addressed
//! by a [`NodeId`]; child links are handles, never owned pointers.

use crate::types::*;
use jshade_core::intern::InternedString;
use jshade_core::text::TextSpan;

// ============================================================================
// Arena
// ============================================================================

/// Flat storage for one syntax tree. `NodeId` handles stay stable for the
/// lifetime of the arena; nodes are only ever mutated in place, never
/// removed.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Store a node and return its handle.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }
}

// ============================================================================
// Node
// ============================================================================

/// A single syntax tree node: a source span plus the kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub span: TextSpan,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(span: TextSpan, kind: NodeKind) -> Self {
        Self { span, kind }
    }

    /// A node with no source location (synthesized during transformation).
    pub fn synthesized(kind: NodeKind) -> Self {
        Self {
            span: TextSpan::empty(0),
            kind,
        }
    }
}

/// The closed set of node kinds this core understands. Transformers match
/// exhaustively on this type, so adding a kind is a compile-time-checked
/// obligation for every pass.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program(Program),

    // -- Statements --
    BlockStatement(BlockStatement),
    ExpressionStatement(ExpressionStatement),
    VariableDeclaration(VariableDeclaration),
    VariableDeclarator(VariableDeclarator),
    FunctionDeclaration(FunctionDeclaration),
    IfStatement(IfStatement),
    ForStatement(ForStatement),
    ForInStatement(ForInStatement),
    WhileStatement(WhileStatement),
    DoWhileStatement(DoWhileStatement),
    ReturnStatement(ReturnStatement),
    BreakStatement(BreakStatement),
    ContinueStatement(ContinueStatement),
    LabeledStatement(LabeledStatement),
    SwitchStatement(SwitchStatement),
    SwitchCase(SwitchCase),
    TryStatement(TryStatement),
    CatchClause(CatchClause),
    ThrowStatement(ThrowStatement),
    EmptyStatement,

    // -- Expressions --
    Identifier(Identifier),
    Literal(Literal),
    BinaryExpression(BinaryExpression),
    LogicalExpression(LogicalExpression),
    UnaryExpression(UnaryExpression),
    UpdateExpression(UpdateExpression),
    AssignmentExpression(AssignmentExpression),
    ConditionalExpression(ConditionalExpression),
    CallExpression(CallExpression),
    NewExpression(NewExpression),
    MemberExpression(MemberExpression),
    FunctionExpression(FunctionExpression),
    ObjectExpression(ObjectExpression),
    Property(Property),
    ArrayExpression(ArrayExpression),
    SequenceExpression(SequenceExpression),
    ThisExpression,
}

impl NodeKind {
    /// The ESTree type name of this node kind, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program(_) => "Program",
            NodeKind::BlockStatement(_) => "BlockStatement",
            NodeKind::ExpressionStatement(_) => "ExpressionStatement",
            NodeKind::VariableDeclaration(_) => "VariableDeclaration",
            NodeKind::VariableDeclarator(_) => "VariableDeclarator",
            NodeKind::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeKind::IfStatement(_) => "IfStatement",
            NodeKind::ForStatement(_) => "ForStatement",
            NodeKind::ForInStatement(_) => "ForInStatement",
            NodeKind::WhileStatement(_) => "WhileStatement",
            NodeKind::DoWhileStatement(_) => "DoWhileStatement",
            NodeKind::ReturnStatement(_) => "ReturnStatement",
            NodeKind::BreakStatement(_) => "BreakStatement",
            NodeKind::ContinueStatement(_) => "ContinueStatement",
            NodeKind::LabeledStatement(_) => "LabeledStatement",
            NodeKind::SwitchStatement(_) => "SwitchStatement",
            NodeKind::SwitchCase(_) => "SwitchCase",
            NodeKind::TryStatement(_) => "TryStatement",
            NodeKind::CatchClause(_) => "CatchClause",
            NodeKind::ThrowStatement(_) => "ThrowStatement",
            NodeKind::EmptyStatement => "EmptyStatement",
            NodeKind::Identifier(_) => "Identifier",
            NodeKind::Literal(_) => "Literal",
            NodeKind::BinaryExpression(_) => "BinaryExpression",
            NodeKind::LogicalExpression(_) => "LogicalExpression",
            NodeKind::UnaryExpression(_) => "UnaryExpression",
            NodeKind::UpdateExpression(_) => "UpdateExpression",
            NodeKind::AssignmentExpression(_) => "AssignmentExpression",
            NodeKind::ConditionalExpression(_) => "ConditionalExpression",
            NodeKind::CallExpression(_) => "CallExpression",
            NodeKind::NewExpression(_) => "NewExpression",
            NodeKind::MemberExpression(_) => "MemberExpression",
            NodeKind::FunctionExpression(_) => "FunctionExpression",
            NodeKind::ObjectExpression(_) => "ObjectExpression",
            NodeKind::Property(_) => "Property",
            NodeKind::ArrayExpression(_) => "ArrayExpression",
            NodeKind::SequenceExpression(_) => "SequenceExpression",
            NodeKind::ThisExpression => "ThisExpression",
        }
    }
}

// ============================================================================
// Statement payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub declarations: Vec<NodeId>,
    pub kind: VariableKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// The binding target. Must be an `Identifier` node.
    pub id: NodeId,
    pub init: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    /// The function name. Must be an `Identifier` node.
    pub id: NodeId,
    pub params: Vec<NodeId>,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub test: NodeId,
    pub consequent: NodeId,
    pub alternate: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub init: Option<NodeId>,
    pub test: Option<NodeId>,
    pub update: Option<NodeId>,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForInStatement {
    pub left: NodeId,
    pub right: NodeId,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub test: NodeId,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStatement {
    pub body: NodeId,
    pub test: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub argument: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakStatement {
    /// Target label; absent for a plain `break`.
    pub label: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinueStatement {
    pub label: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStatement {
    pub label: NodeId,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub discriminant: NodeId,
    pub cases: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Absent for the `default` clause.
    pub test: Option<NodeId>,
    pub consequent: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub block: NodeId,
    pub handler: Option<NodeId>,
    pub finalizer: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// The catch parameter. Must be an `Identifier` node.
    pub param: NodeId,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    pub argument: NodeId,
}

// ============================================================================
// Expression payloads
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    /// The interned identifier text. Rewritten in place by the renamer.
    pub name: InternedString,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// The semantic value. Never changed by encoding.
    pub value: LiteralValue,
    /// The default textual rendering (quoted, for strings).
    pub raw: String,
    /// The rendering the generator must emit instead of a default one.
    pub verbatim: Verbatim,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub operator: String,
    pub left: NodeId,
    pub right: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpression {
    pub operator: String,
    pub left: NodeId,
    pub right: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: String,
    pub argument: NodeId,
    pub prefix: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub operator: String,
    pub argument: NodeId,
    pub prefix: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    pub operator: String,
    pub left: NodeId,
    pub right: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    pub test: NodeId,
    pub consequent: NodeId,
    pub alternate: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: NodeId,
    pub arguments: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpression {
    pub callee: NodeId,
    pub arguments: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: NodeId,
    /// An `Identifier` when `computed` is false, any expression otherwise.
    pub property: NodeId,
    pub computed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression {
    /// Optional function-expression name, visible only inside the function.
    pub id: Option<NodeId>,
    pub params: Vec<NodeId>,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpression {
    pub properties: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// An `Identifier` or `Literal` key when `computed` is false.
    pub key: NodeId,
    pub value: NodeId,
    pub computed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpression {
    pub elements: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceExpression {
    pub expressions: Vec<NodeId>,
}
