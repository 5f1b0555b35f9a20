//! Refactoring: consolidate edge statements sharing a source
//!
//! The statement under the cursor is the seed. Later siblings in the same
//! body that are plain `x -> y` statements with the same literal source text
//! join it, until an attribute statement or an erroneous statement appears:
//! both can change the meaning of everything after them, so the scan stops
//! there for good.

use dotfix_core::{
    node_at_offset, subtree_contains_errors, NodeIndex, SourceFile, SyntaxKind, SyntaxTree,
    TextDocument, TextRange,
};
use log::debug;

use crate::commands::{consolidate, CodeAction, ConsolidationCandidate};

/// Source identifier node of a consolidatable edge statement.
///
/// The statement must be error-free, have exactly one target, no attribute
/// list and a source that is a plain identifier without a port.
fn plain_source(tree: &SyntaxTree, statement: NodeIndex) -> Option<NodeIndex> {
    let edge = tree.edge_statement(statement)?;
    if edge.rhs.len() != 1 || !edge.attributes.is_empty() || subtree_contains_errors(tree, statement) {
        return None;
    }
    let source = tree.node_id(edge.source)?;
    if source.port.is_some() {
        return None;
    }
    Some(source.id)
}

fn candidate(tree: &SyntaxTree, statement: NodeIndex, source: NodeIndex) -> Option<ConsolidationCandidate> {
    let rhs = tree.edge_rhs(*tree.edge_statement(statement)?.rhs.first()?)?;
    Some(ConsolidationCandidate {
        statement: tree.range(statement),
        source: tree.range(source),
        target: tree.range(rhs.target?),
    })
}

pub fn consolidate_descendants(
    document: &TextDocument,
    file: &SourceFile,
    range: TextRange,
) -> Option<CodeAction> {
    if !range.is_empty() {
        return None;
    }
    let tree = &file.tree;
    let mut node = node_at_offset(tree, file.graph?, range.start)?;
    if tree.kind(node).is_identifier() {
        node = tree.parent(node)?;
    }
    let seed = tree.parent(node)?;
    if tree.kind(seed) != SyntaxKind::EdgeStatement {
        return None;
    }
    let seed_source = plain_source(tree, seed)?;
    let source_text = document.slice(tree.range(seed_source))?;

    let body = tree.statements(tree.parent(seed)?)?;
    let position = body.iter().position(|&statement| statement == seed)?;

    let mut candidates = vec![candidate(tree, seed, seed_source)?];
    for &sibling in &body[position + 1..] {
        if tree.kind(sibling) == SyntaxKind::AttributeStatement || subtree_contains_errors(tree, sibling) {
            debug!("consolidation stops at {:?} {}", tree.kind(sibling), tree.range(sibling));
            break;
        }
        let Some(source) = plain_source(tree, sibling) else {
            continue;
        };
        if document.slice(tree.range(source)) == Some(source_text) {
            candidates.extend(candidate(tree, sibling, source));
        }
    }

    if candidates.len() < 2 {
        return None;
    }
    Some(consolidate::create(source_text, candidates))
}
