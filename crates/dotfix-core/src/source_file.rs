//! One immutable parse of a DOT document

use log::debug;

use crate::checker;
use crate::diagnostic::Diagnostic;
use crate::parser;
use crate::scanner;
use crate::tree::{NodeIndex, SyntaxTree};

/// Parsed snapshot: the tree, its optional root graph and every diagnostic in
/// phase order (scan, parse, check).
///
/// Edits never mutate a `SourceFile`; apply them to the text and parse again.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub tree: SyntaxTree,
    pub graph: Option<NodeIndex>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SourceFile {
    pub fn parse(text: &str) -> Self {
        let scanned = scanner::scan(text);
        let parsed = parser::parse(scanned.tokens);

        let mut diagnostics = scanned.diagnostics;
        diagnostics.extend(parsed.diagnostics);
        if let Some(graph) = parsed.graph {
            diagnostics.extend(checker::check(&parsed.tree, graph));
        }

        debug!(
            "parsed {} bytes: {} nodes, {} diagnostic(s)",
            text.len(),
            parsed.tree.len(),
            diagnostics.len()
        );

        Self {
            tree: parsed.tree,
            graph: parsed.graph,
            diagnostics,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
