//! Command: make every edge operator agree with a graph keyword
//!
//! With the current keyword as target this fixes all inconsistent operators
//! in place. With the opposite keyword it converts the graph type, rewriting
//! the keyword and flipping every operator that would disagree with it.

use dotfix_core::{edge_operations, Edit, GraphKind, NodeIndex, SourceFile, SyntaxTree, TextDocument, TextRange};
use serde::{Deserialize, Serialize};

use super::change_edge_op::verify_operator;
use super::{
    decode_arguments, CodeAction, Command, CommandExecutor, CHANGE_ALL_OTHER_EDGE_OPS_AND_FIX_GRAPH,
};
use crate::error::ExecuteError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixGraphArgs {
    /// Range of the `graph`/`digraph` keyword
    pub keyword: TextRange,
    pub from: GraphKind,
    pub to: GraphKind,
    /// Operators that disagree with `to`, in source order
    pub operations: Vec<TextRange>,
}

/// Build the command for `graph` with `target` as the resulting keyword.
///
/// The offending operators are collected here, once; execution only
/// replays them.
pub fn create(tree: &SyntaxTree, graph: NodeIndex, target: GraphKind) -> Option<CodeAction> {
    let keyword = tree.graph(graph)?.keyword;
    let from = tree.graph_kind(graph)?;
    let allowed = target.allowed_op();

    let operations = edge_operations(tree, graph)
        .into_iter()
        .filter(|&op| tree.edge_op(op) != Some(allowed))
        .map(|op| tree.range(op))
        .collect();

    let title = if from == target {
        format!("Change all other edge operations to \"{}\"", allowed.text())
    } else {
        format!("Convert to \"{}\"", target.keyword())
    };

    Some(CodeAction::quick_fix(
        title,
        Command::FixGraph(FixGraphArgs {
            keyword: tree.range(keyword),
            from,
            to: target,
            operations,
        }),
    ))
}

pub fn execute(
    document: &TextDocument,
    file: &SourceFile,
    args: &FixGraphArgs,
) -> Result<Vec<Edit>, ExecuteError> {
    let keyword_text = verify_keyword(document, file, args)?;
    let allowed = args.to.allowed_op();

    let mut edits = Vec::with_capacity(args.operations.len() + 1);
    for &operation in &args.operations {
        verify_operator(document, operation, allowed.opposite())?;
        edits.push(Edit::new(
            operation,
            allowed.text(),
            format!("Change \"{}\" to \"{}\"", allowed.opposite().text(), allowed.text()),
        ));
    }

    // An unchanged keyword keeps its original spelling.
    let replacement = if args.from == args.to {
        keyword_text.to_string()
    } else {
        args.to.keyword().to_string()
    };
    edits.push(Edit::new(
        args.keyword,
        replacement,
        format!("Set graph keyword to \"{}\"", args.to.keyword()),
    ));

    Ok(edits)
}

fn verify_keyword<'d>(
    document: &'d TextDocument,
    file: &SourceFile,
    args: &FixGraphArgs,
) -> Result<&'d str, ExecuteError> {
    let text = document
        .slice(args.keyword)
        .ok_or_else(|| ExecuteError::stale(format!("range {} is outside the document", args.keyword)))?;
    if GraphKind::from_text(text) != Some(args.from) {
        return Err(ExecuteError::stale(format!(
            "expected \"{}\" at {}, found \"{}\"",
            args.from.keyword(),
            args.keyword,
            text
        )));
    }

    let parsed_keyword = file
        .graph
        .and_then(|graph| file.tree.graph(graph))
        .map(|graph| file.tree.range(graph.keyword));
    if parsed_keyword != Some(args.keyword) {
        return Err(ExecuteError::stale("graph keyword moved"));
    }
    Ok(text)
}

pub struct FixGraphExecutor;

impl CommandExecutor for FixGraphExecutor {
    fn id(&self) -> &'static str {
        CHANGE_ALL_OTHER_EDGE_OPS_AND_FIX_GRAPH
    }

    fn execute(
        &self,
        document: &TextDocument,
        file: &SourceFile,
        arguments: serde_json::Value,
    ) -> Result<Vec<Edit>, ExecuteError> {
        let args: FixGraphArgs = decode_arguments(CHANGE_ALL_OTHER_EDGE_OPS_AND_FIX_GRAPH, arguments)?;
        execute(document, file, &args)
    }
}
