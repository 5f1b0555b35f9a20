//! Diagnostic-driven quick fixes
//!
//! Each diagnostic in the requested range is routed by phase and then by
//! sub-code. Check sub-codes are matched without a wildcard arm, so a new
//! sub-code does not compile until it has a handler here.

use dotfix_core::{
    edge_operations, CheckError, Diagnostic, DiagnosticCode, ParseError, ScanError, SourceFile,
    TextDocument, TextRange,
};
use log::debug;

use crate::commands::{change_edge_op, fix_graph, CodeAction};

/// Whether a target range qualifies for a request range.
///
/// A cursor (empty request) qualifies anywhere in `[start, end]`, both ends
/// included. A selection qualifies only when it matches the target exactly.
pub fn is_in_range(target: TextRange, request: TextRange) -> bool {
    if request.is_empty() {
        target.contains_inclusive(request.start)
    } else {
        target == request
    }
}

/// Quick fixes for every diagnostic of `file` that qualifies for `range`
pub fn quick_fixes(document: &TextDocument, file: &SourceFile, range: TextRange) -> Vec<CodeAction> {
    file.diagnostics
        .iter()
        .filter(|diagnostic| is_in_range(diagnostic.range, range))
        .flat_map(|diagnostic| fixes_for(document, file, diagnostic))
        .collect()
}

fn fixes_for(document: &TextDocument, file: &SourceFile, diagnostic: &Diagnostic) -> Vec<CodeAction> {
    match diagnostic.code {
        DiagnosticCode::Scan(code) => scan_fixes(code),
        DiagnosticCode::Parse(code) => parse_fixes(code),
        DiagnosticCode::Check(code) => match code {
            CheckError::InvalidEdgeOperation => invalid_edge_operation_fixes(document, file, diagnostic),
        },
    }
}

fn scan_fixes(code: ScanError) -> Vec<CodeAction> {
    debug!("no quick fixes for scan error {:?}", code);
    Vec::new()
}

fn parse_fixes(code: ParseError) -> Vec<CodeAction> {
    debug!("no quick fixes for parse error {:?}", code);
    Vec::new()
}

/// Three alternatives, always together: flip this operator, flip every
/// inconsistent operator keeping the keyword, or convert the graph to match
/// this operator.
fn invalid_edge_operation_fixes(
    _document: &TextDocument,
    file: &SourceFile,
    diagnostic: &Diagnostic,
) -> Vec<CodeAction> {
    let Some(graph) = file.graph else {
        return Vec::new();
    };
    let tree = &file.tree;
    let Some(current) = tree.graph_kind(graph) else {
        return Vec::new();
    };

    let operation = edge_operations(tree, graph)
        .into_iter()
        .find(|&op| tree.range(op) == diagnostic.range);
    let Some(offending) = operation.and_then(|op| tree.edge_op(op)) else {
        debug!("invalid edge operation at {} has no operator token", diagnostic.range);
        return Vec::new();
    };

    let allowed = current.allowed_op();
    let mut actions = vec![change_edge_op::create(diagnostic.range, offending, allowed).preferred()];
    actions.extend(fix_graph::create(tree, graph, current));
    actions.extend(fix_graph::create(tree, graph, offending.graph_kind()));
    actions
}
