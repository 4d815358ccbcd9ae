//! Generic child traversal over the node arena.
//!
//! `each_child` enumerates the direct children of a node in source order
//! with an exhaustive match, so a new node kind cannot be silently skipped
//! by the transform driver.

use crate::node::{NodeArena, NodeKind};
use crate::types::NodeId;

/// Invoke `f` for every direct child of `id`, in source order.
pub fn each_child(arena: &NodeArena, id: NodeId, f: &mut impl FnMut(NodeId)) {
    match &arena.get(id).kind {
        NodeKind::Program(n) => {
            for &stmt in &n.body {
                f(stmt);
            }
        }
        NodeKind::BlockStatement(n) => {
            for &stmt in &n.body {
                f(stmt);
            }
        }
        NodeKind::ExpressionStatement(n) => f(n.expression),
        NodeKind::VariableDeclaration(n) => {
            for &decl in &n.declarations {
                f(decl);
            }
        }
        NodeKind::VariableDeclarator(n) => {
            f(n.id);
            if let Some(init) = n.init {
                f(init);
            }
        }
        NodeKind::FunctionDeclaration(n) => {
            f(n.id);
            for &param in &n.params {
                f(param);
            }
            f(n.body);
        }
        NodeKind::IfStatement(n) => {
            f(n.test);
            f(n.consequent);
            if let Some(alternate) = n.alternate {
                f(alternate);
            }
        }
        NodeKind::ForStatement(n) => {
            if let Some(init) = n.init {
                f(init);
            }
            if let Some(test) = n.test {
                f(test);
            }
            if let Some(update) = n.update {
                f(update);
            }
            f(n.body);
        }
        NodeKind::ForInStatement(n) => {
            f(n.left);
            f(n.right);
            f(n.body);
        }
        NodeKind::WhileStatement(n) => {
            f(n.test);
            f(n.body);
        }
        NodeKind::DoWhileStatement(n) => {
            f(n.body);
            f(n.test);
        }
        NodeKind::ReturnStatement(n) => {
            if let Some(argument) = n.argument {
                f(argument);
            }
        }
        NodeKind::BreakStatement(n) => {
            if let Some(label) = n.label {
                f(label);
            }
        }
        NodeKind::ContinueStatement(n) => {
            if let Some(label) = n.label {
                f(label);
            }
        }
        NodeKind::LabeledStatement(n) => {
            f(n.label);
            f(n.body);
        }
        NodeKind::SwitchStatement(n) => {
            f(n.discriminant);
            for &case in &n.cases {
                f(case);
            }
        }
        NodeKind::SwitchCase(n) => {
            if let Some(test) = n.test {
                f(test);
            }
            for &stmt in &n.consequent {
                f(stmt);
            }
        }
        NodeKind::TryStatement(n) => {
            f(n.block);
            if let Some(handler) = n.handler {
                f(handler);
            }
            if let Some(finalizer) = n.finalizer {
                f(finalizer);
            }
        }
        NodeKind::CatchClause(n) => {
            f(n.param);
            f(n.body);
        }
        NodeKind::ThrowStatement(n) => f(n.argument),
        NodeKind::EmptyStatement => {}
        NodeKind::Identifier(_) => {}
        NodeKind::Literal(_) => {}
        NodeKind::BinaryExpression(n) => {
            f(n.left);
            f(n.right);
        }
        NodeKind::LogicalExpression(n) => {
            f(n.left);
            f(n.right);
        }
        NodeKind::UnaryExpression(n) => f(n.argument),
        NodeKind::UpdateExpression(n) => f(n.argument),
        NodeKind::AssignmentExpression(n) => {
            f(n.left);
            f(n.right);
        }
        NodeKind::ConditionalExpression(n) => {
            f(n.test);
            f(n.consequent);
            f(n.alternate);
        }
        NodeKind::CallExpression(n) => {
            f(n.callee);
            for &arg in &n.arguments {
                f(arg);
            }
        }
        NodeKind::NewExpression(n) => {
            f(n.callee);
            for &arg in &n.arguments {
                f(arg);
            }
        }
        NodeKind::MemberExpression(n) => {
            f(n.object);
            f(n.property);
        }
        NodeKind::FunctionExpression(n) => {
            if let Some(name) = n.id {
                f(name);
            }
            for &param in &n.params {
                f(param);
            }
            f(n.body);
        }
        NodeKind::ObjectExpression(n) => {
            for &prop in &n.properties {
                f(prop);
            }
        }
        NodeKind::Property(n) => {
            f(n.key);
            f(n.value);
        }
        NodeKind::ArrayExpression(n) => {
            for &elem in &n.elements {
                f(elem);
            }
        }
        NodeKind::SequenceExpression(n) => {
            for &expr in &n.expressions {
                f(expr);
            }
        }
        NodeKind::ThisExpression => {}
    }
}

/// Collect the direct children of `id` into a vector. Used where the caller
/// needs to mutate the arena while iterating.
pub fn child_ids(arena: &NodeArena, id: NodeId) -> Vec<NodeId> {
    let mut children = Vec::new();
    each_child(arena, id, &mut |child| children.push(child));
    children
}
