//! Position and error queries over a syntax tree

use crate::kind::SyntaxKind;
use crate::span::TextRange;
use crate::tree::{NodeIndex, SyntaxTree};
use crate::visitor::{self, for_each_child, Visitor};

/// Deepest node whose range contains `offset` (end inclusive).
///
/// Descends into the first child, in declared order, whose range contains the
/// offset, so a boundary shared by two siblings resolves to the earlier one.
pub fn node_at_offset(tree: &SyntaxTree, root: NodeIndex, offset: usize) -> Option<NodeIndex> {
    if !tree.range(root).contains_inclusive(offset) {
        return None;
    }

    let mut current = root;
    while let Some(child) = for_each_child(tree, current, |child| {
        tree.range(child).contains_inclusive(offset).then_some(child)
    }) {
        current = child;
    }
    Some(current)
}

/// True if `node` or any descendant carries the error flag.
///
/// Evaluated on every call; callers only ask about statement-sized subtrees.
pub fn subtree_contains_errors(tree: &SyntaxTree, node: NodeIndex) -> bool {
    tree.has_error_flag(node)
        || for_each_child(tree, node, |child| {
            subtree_contains_errors(tree, child).then_some(())
        })
        .is_some()
}

/// First node of `kind` whose range is exactly `range`
pub fn find_node(
    tree: &SyntaxTree,
    root: NodeIndex,
    kind: SyntaxKind,
    range: TextRange,
) -> Option<NodeIndex> {
    if tree.kind(root) == kind && tree.range(root) == range {
        return Some(root);
    }
    if !(tree.range(root).start <= range.start && range.end <= tree.range(root).end) {
        return None;
    }
    for_each_child(tree, root, |child| find_node(tree, child, kind, range))
}

struct EdgeOperationCollector {
    operations: Vec<NodeIndex>,
}

impl Visitor for EdgeOperationCollector {
    fn visit_node(&mut self, tree: &SyntaxTree, node: NodeIndex) -> bool {
        if let Some(rhs) = tree.edge_rhs(node) {
            self.operations.push(rhs.operation);
        }
        true
    }
}

/// Every edge operator token under `root`, nested subgraphs included, in
/// source order.
pub fn edge_operations(tree: &SyntaxTree, root: NodeIndex) -> Vec<NodeIndex> {
    let mut collector = EdgeOperationCollector {
        operations: Vec::new(),
    };
    visitor::visit(&mut collector, tree, root);
    collector.operations
}
