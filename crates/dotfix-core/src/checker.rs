//! Semantic checks over a parsed graph

use log::debug;

use crate::diagnostic::{CheckError, Diagnostic, DiagnosticCode};
use crate::kind::{EdgeOp, GraphKind};
use crate::query::edge_operations;
use crate::tree::{NodeIndex, SyntaxTree};

pub fn invalid_edge_operation_message(kind: GraphKind) -> String {
    let allowed = kind.allowed_op();
    let flavour = match allowed {
        EdgeOp::Directed => "directed",
        EdgeOp::Undirected => "undirected",
    };
    format!("Invalid edge operation, use \"{}\" in {} graphs", allowed.text(), flavour)
}

/// Report every edge operator that disagrees with the graph keyword.
///
/// Check diagnostics never touch the error flags; those only mark
/// malformed syntax.
pub fn check(tree: &SyntaxTree, graph: NodeIndex) -> Vec<Diagnostic> {
    let Some(kind) = tree.graph_kind(graph) else {
        return Vec::new();
    };
    let allowed = kind.allowed_op();

    let diagnostics: Vec<Diagnostic> = edge_operations(tree, graph)
        .into_iter()
        .filter(|&op| tree.edge_op(op) != Some(allowed))
        .map(|op| {
            Diagnostic::error(
                tree.range(op),
                DiagnosticCode::Check(CheckError::InvalidEdgeOperation),
                invalid_edge_operation_message(kind),
            )
        })
        .collect();

    if !diagnostics.is_empty() {
        debug!("{} invalid edge operation(s) in {} body", diagnostics.len(), kind.keyword());
    }
    diagnostics
}
