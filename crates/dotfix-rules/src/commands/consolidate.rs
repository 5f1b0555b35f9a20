//! Command: chain same-source edge statements into one statement
//!
//! `a -> b; a -> c;` becomes `a -> { b c };`. The seed statement's target is
//! replaced by an anonymous subgraph holding every candidate's target text in
//! candidate order, and every later candidate statement is deleted. A
//! statement alone on its line takes the whole line with it; otherwise only
//! the blanks after it on the same line go too.

use dotfix_core::{find_node, Edit, SourceFile, SyntaxKind, TextDocument, TextRange};
use serde::{Deserialize, Serialize};

use super::{decode_arguments, CodeAction, Command, CommandExecutor, CONSOLIDATE_DESCENDANTS};
use crate::error::ExecuteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationCandidate {
    /// Whole statement, terminator included
    pub statement: TextRange,
    /// Identifier of the statement's source node
    pub source: TextRange,
    /// The statement's single right-hand target
    pub target: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidateArgs {
    /// Candidates were matched on the literal text of their source
    pub literal: bool,
    /// Seed first, then matches in source order
    pub candidates: Vec<ConsolidationCandidate>,
}

pub fn create(source_text: &str, candidates: Vec<ConsolidationCandidate>) -> CodeAction {
    CodeAction::refactor(
        format!("Consolidate {} edges from \"{}\"", candidates.len(), source_text),
        Command::Consolidate(ConsolidateArgs {
            literal: true,
            candidates,
        }),
    )
}

pub fn execute(
    document: &TextDocument,
    file: &SourceFile,
    args: &ConsolidateArgs,
) -> Result<Vec<Edit>, ExecuteError> {
    let [seed, rest @ ..] = args.candidates.as_slice() else {
        return Err(ExecuteError::stale("no consolidation candidates"));
    };
    if rest.is_empty() {
        return Err(ExecuteError::stale("nothing to consolidate with"));
    }

    let mut seed_source = None;
    let mut targets = Vec::with_capacity(args.candidates.len());
    for candidate in &args.candidates {
        let source = verify_candidate(document, file, candidate)?;
        let seed_source = *seed_source.get_or_insert(source);
        if args.literal && source != seed_source {
            return Err(ExecuteError::stale(format!(
                "source \"{}\" at {} no longer matches \"{}\"",
                source, candidate.source, seed_source
            )));
        }
        let text = document
            .slice(candidate.target)
            .ok_or_else(|| ExecuteError::stale(format!("target {} is outside the document", candidate.target)))?;
        targets.push(text);
    }

    let mut edits = vec![Edit::new(
        seed.target,
        format!("{{ {} }}", targets.join(" ")),
        "Group edge targets",
    )];
    for candidate in rest {
        edits.push(Edit::delete(
            removal_range(document.text(), candidate.statement),
            "Remove consolidated edge statement",
        ));
    }

    Ok(edits)
}

/// Text removed along with a consolidated statement. Never crosses into a
/// neighbouring line, so comments around the statement stay where they are.
fn removal_range(text: &str, statement: TextRange) -> TextRange {
    let bytes = text.as_bytes();
    let is_blank = |b: u8| b == b' ' || b == b'\t';

    let mut end = statement.end;
    while end < bytes.len() && is_blank(bytes[end]) {
        end += 1;
    }
    let mut start = statement.start;
    while start > 0 && is_blank(bytes[start - 1]) {
        start -= 1;
    }

    let mut line_end = end;
    if bytes.get(line_end) == Some(&b'\r') {
        line_end += 1;
    }
    let starts_line = start == 0 || bytes[start - 1] == b'\n';
    let ends_line = bytes.get(line_end) == Some(&b'\n');
    if starts_line && ends_line {
        TextRange::new(start, line_end + 1)
    } else {
        TextRange::new(statement.start, end)
    }
}

/// The candidate must still be a plain single-target edge statement at
/// exactly the recorded ranges. Returns the current text of its source.
fn verify_candidate<'d>(
    document: &'d TextDocument,
    file: &SourceFile,
    candidate: &ConsolidationCandidate,
) -> Result<&'d str, ExecuteError> {
    let stale = || {
        ExecuteError::stale(format!(
            "no edge statement at {} from {} to {}",
            candidate.statement, candidate.source, candidate.target
        ))
    };
    let graph = file
        .graph
        .ok_or_else(|| ExecuteError::stale("document has no graph"))?;
    let tree = &file.tree;
    let edge = find_node(tree, graph, SyntaxKind::EdgeStatement, candidate.statement)
        .and_then(|node| tree.edge_statement(node))
        .ok_or_else(stale)?;

    let source = tree.node_id(edge.source).ok_or_else(stale)?;
    if source.port.is_some() || tree.range(source.id) != candidate.source || edge.rhs.len() != 1 {
        return Err(stale());
    }
    let target = tree
        .edge_rhs(edge.rhs[0])
        .and_then(|rhs| rhs.target)
        .map(|target| tree.range(target));
    if target != Some(candidate.target) {
        return Err(stale());
    }
    document.slice(candidate.source).ok_or_else(stale)
}

pub struct ConsolidateExecutor;

impl CommandExecutor for ConsolidateExecutor {
    fn id(&self) -> &'static str {
        CONSOLIDATE_DESCENDANTS
    }

    fn execute(
        &self,
        document: &TextDocument,
        file: &SourceFile,
        arguments: serde_json::Value,
    ) -> Result<Vec<Edit>, ExecuteError> {
        let args: ConsolidateArgs = decode_arguments(CONSOLIDATE_DESCENDANTS, arguments)?;
        execute(document, file, &args)
    }
}
