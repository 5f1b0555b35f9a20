//! Child enumeration and traversal for DOT syntax trees
//!
//! [`for_each_child`] is the single traversal primitive: it calls back for
//! each immediate child in grammar order and stops at the first callback that
//! returns `Some`. The return value picks the mode:
//! - find first: return `Some(node)` from the match
//! - exists: return `Some(())` and test `.is_some()`
//! - collect: push into a vector and always return `None`
//!
//! Empty optional slots are skipped without a callback, and tokens return
//! immediately.

use crate::tree::{NodeData, NodeIndex, SyntaxTree};

type NodeCallback<'c, T> = &'c mut dyn FnMut(NodeIndex) -> Option<T>;
type ListCallback<'c, T> = Option<&'c mut dyn FnMut(&[NodeIndex]) -> Option<T>>;

/// Visit the immediate children of `node` in declared order.
pub fn for_each_child<T>(
    tree: &SyntaxTree,
    node: NodeIndex,
    mut cb_node: impl FnMut(NodeIndex) -> Option<T>,
) -> Option<T> {
    walk_children(tree, node, &mut cb_node, None)
}

/// Like [`for_each_child`], but sequence-valued slots are handed to `cb_nodes`
/// as a whole instead of element by element.
pub fn for_each_child_list<T>(
    tree: &SyntaxTree,
    node: NodeIndex,
    mut cb_node: impl FnMut(NodeIndex) -> Option<T>,
    mut cb_nodes: impl FnMut(&[NodeIndex]) -> Option<T>,
) -> Option<T> {
    let cb_nodes: &mut dyn FnMut(&[NodeIndex]) -> Option<T> = &mut cb_nodes;
    walk_children(tree, node, &mut cb_node, Some(cb_nodes))
}

/// Immediate children of `node` in declared order
pub fn children(tree: &SyntaxTree, node: NodeIndex) -> Vec<NodeIndex> {
    let mut out = Vec::new();
    for_each_child(tree, node, |child| {
        out.push(child);
        None::<()>
    });
    out
}

macro_rules! try_visit {
    ($e:expr) => {
        if let Some(result) = $e {
            return Some(result);
        }
    };
}

fn visit_node<T>(cb_node: NodeCallback<'_, T>, node: Option<NodeIndex>) -> Option<T> {
    node.and_then(cb_node)
}

fn visit_nodes<T>(
    cb_node: NodeCallback<'_, T>,
    cb_nodes: &mut ListCallback<'_, T>,
    nodes: &[NodeIndex],
) -> Option<T> {
    if nodes.is_empty() {
        return None;
    }
    if let Some(cb_nodes) = cb_nodes {
        return cb_nodes(nodes);
    }
    nodes.iter().find_map(|&node| cb_node(node))
}

fn walk_children<T>(
    tree: &SyntaxTree,
    node: NodeIndex,
    cb_node: NodeCallback<'_, T>,
    mut cb_nodes: ListCallback<'_, T>,
) -> Option<T> {
    let node = tree.node(node);
    if node.kind.is_token() {
        return None;
    }

    match &node.data {
        NodeData::Token | NodeData::Identifier(_) => None,
        NodeData::Graph(graph) => {
            try_visit!(visit_node(cb_node, graph.strict));
            try_visit!(visit_node(cb_node, Some(graph.keyword)));
            try_visit!(visit_node(cb_node, graph.id));
            visit_nodes(cb_node, &mut cb_nodes, &graph.statements)
        }
        NodeData::AttributeStatement(statement) => {
            try_visit!(visit_node(cb_node, Some(statement.subject)));
            try_visit!(visit_nodes(cb_node, &mut cb_nodes, &statement.attributes));
            visit_node(cb_node, statement.terminator)
        }
        NodeData::EdgeStatement(statement) => {
            try_visit!(visit_node(cb_node, Some(statement.source)));
            try_visit!(visit_nodes(cb_node, &mut cb_nodes, &statement.rhs));
            try_visit!(visit_nodes(cb_node, &mut cb_nodes, &statement.attributes));
            visit_node(cb_node, statement.terminator)
        }
        NodeData::NodeStatement(statement) => {
            try_visit!(visit_node(cb_node, Some(statement.id)));
            try_visit!(visit_nodes(cb_node, &mut cb_nodes, &statement.attributes));
            visit_node(cb_node, statement.terminator)
        }
        NodeData::IdEqualsIdStatement(statement) => {
            try_visit!(visit_node(cb_node, Some(statement.left)));
            try_visit!(visit_node(cb_node, statement.right));
            visit_node(cb_node, statement.terminator)
        }
        NodeData::SubgraphStatement(statement) => {
            try_visit!(visit_node(cb_node, Some(statement.subgraph)));
            visit_node(cb_node, statement.terminator)
        }
        NodeData::Subgraph(subgraph) => {
            try_visit!(visit_node(cb_node, subgraph.keyword));
            try_visit!(visit_node(cb_node, subgraph.id));
            visit_nodes(cb_node, &mut cb_nodes, &subgraph.statements)
        }
        NodeData::NodeId(node_id) => {
            try_visit!(visit_node(cb_node, Some(node_id.id)));
            visit_node(cb_node, node_id.port)
        }
        NodeData::PortDeclaration(port) => {
            try_visit!(visit_node(cb_node, port.id));
            visit_node(cb_node, port.compass)
        }
        NodeData::EdgeRhs(rhs) => {
            try_visit!(visit_node(cb_node, Some(rhs.operation)));
            visit_node(cb_node, rhs.target)
        }
        NodeData::AttributeContainer(container) => {
            visit_nodes(cb_node, &mut cb_nodes, &container.assignments)
        }
        NodeData::Assignment(assignment) => {
            try_visit!(visit_node(cb_node, Some(assignment.left)));
            try_visit!(visit_node(cb_node, assignment.right));
            visit_node(cb_node, assignment.terminator)
        }
    }
}

/// Depth-first, pre-order tree walker built on [`for_each_child`].
///
/// Implementors override [`Visitor::visit_node`]; returning `false` skips the
/// node's children.
pub trait Visitor {
    fn visit_node(&mut self, tree: &SyntaxTree, node: NodeIndex) -> bool;

    fn traverse(&mut self, tree: &SyntaxTree, node: NodeIndex) {
        if !self.visit_node(tree, node) {
            return;
        }
        for_each_child(tree, node, |child| {
            self.traverse(tree, child);
            None::<()>
        });
    }
}

/// Run a visitor over the subtree rooted at `root`
pub fn visit<V: Visitor>(visitor: &mut V, tree: &SyntaxTree, root: NodeIndex) {
    visitor.traverse(tree, root);
}
