//! Handle types, flag sets, and literal metadata for the AST.

use std::fmt;

/// Node ID for referencing AST nodes in the arena by index.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Scope ID, a lightweight handle into the scope arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const INVALID: ScopeId = ScopeId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Binding ID, a lightweight handle into the binding arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BindingId(pub u32);

impl BindingId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Flags describing what kind of declaration produced a binding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BindingFlags: u8 {
        const NONE                     = 0;
        /// A `var` declaration, hoisted to the enclosing function scope.
        const FUNCTION_SCOPED_VARIABLE = 1 << 0;
        /// A `let`/`const` declaration, bound in its own block scope.
        const BLOCK_SCOPED_VARIABLE    = 1 << 1;
        /// A function parameter.
        const PARAMETER                = 1 << 2;
        /// A function declaration or named function expression.
        const FUNCTION                 = 1 << 3;
        /// A catch clause parameter.
        const CATCH_PARAMETER          = 1 << 4;

        const VARIABLE = Self::FUNCTION_SCOPED_VARIABLE.bits() | Self::BLOCK_SCOPED_VARIABLE.bits();
        /// Declaration kinds that attach to the nearest function-or-program scope.
        const HOISTED = Self::FUNCTION_SCOPED_VARIABLE.bits() | Self::FUNCTION.bits();
    }
}

/// The declaration keyword of a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    /// Whether declarations of this kind are block-scoped.
    pub fn is_block_scoped(self) -> bool {
        !matches!(self, VariableKind::Var)
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::Var => write!(f, "var"),
            VariableKind::Let => write!(f, "let"),
            VariableKind::Const => write!(f, "const"),
        }
    }
}

/// Expression precedence hint attached to verbatim literal renderings so
/// the generator knows when parentheses are required around the emitted
/// text. Mirrors the precedence table of the downstream code generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Precedence {
    Sequence,
    Assignment,
    Conditional,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Unary,
    Postfix,
    Call,
    New,
    Member,
    Primary,
}

/// The semantic value of a literal node. Never mutated by encoding; only
/// the verbatim rendering changes.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::String(s) => write!(f, "{}", s),
            LiteralValue::Number(n) => write!(f, "{}", n),
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::Null => write!(f, "null"),
        }
    }
}

/// Verbatim rendering metadata consumed by the code generator in place of a
/// default rendering of the literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct Verbatim {
    /// The exact text the generator must emit.
    pub content: String,
    /// Precedence of the emitted expression text.
    pub precedence: Precedence,
}

impl Verbatim {
    pub fn primary(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            precedence: Precedence::Primary,
        }
    }
}
