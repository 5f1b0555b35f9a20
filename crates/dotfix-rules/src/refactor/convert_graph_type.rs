//! Refactoring: flip a graph between directed and undirected

use dotfix_core::{subtree_contains_errors, SourceFile, TextRange};
use log::debug;
use lsp_types::CodeActionKind;

use crate::commands::{fix_graph, CodeAction};
use crate::quick_fix::is_in_range;

/// Offered when `range` targets the graph keyword and nothing in the graph
/// has a parse error. Rewrites the keyword and every edge operator.
pub fn convert_graph_type(file: &SourceFile, range: TextRange) -> Option<CodeAction> {
    let graph = file.graph?;
    let tree = &file.tree;
    let keyword = tree.graph(graph)?.keyword;

    if !is_in_range(tree.range(keyword), range) {
        return None;
    }
    if subtree_contains_errors(tree, graph) {
        debug!("graph at {} has errors, not converting", tree.range(graph));
        return None;
    }

    let target = tree.graph_kind(graph)?.opposite();
    let mut action = fix_graph::create(tree, graph, target)?;
    action.kind = CodeActionKind::REFACTOR_REWRITE;
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{self, Command};
    use dotfix_core::{apply_edits, GraphKind, TextDocument};

    fn convert(source: &str, range: TextRange) -> Option<CodeAction> {
        convert_graph_type(&SourceFile::parse(source), range)
    }

    #[test]
    fn test_offered_on_keyword() {
        let action = convert("digraph { a -> b }", TextRange::new(0, 7)).unwrap();
        assert_eq!(action.kind, CodeActionKind::REFACTOR_REWRITE);
        assert_eq!(action.command.id(), commands::CHANGE_ALL_OTHER_EDGE_OPS_AND_FIX_GRAPH);
        match action.command {
            Command::FixGraph(args) => assert_eq!(args.to, GraphKind::Graph),
            other => panic!("unexpected command {:?}", other),
        }
        assert!(convert("digraph { a -> b }", TextRange::empty(3)).is_some());
    }

    #[test]
    fn test_not_offered_off_keyword() {
        assert!(convert("digraph { a -> b }", TextRange::new(0, 6)).is_none());
        assert!(convert("digraph { a -> b }", TextRange::new(0, 9)).is_none());
        assert!(convert("digraph { a -> b }", TextRange::empty(10)).is_none());
        assert!(convert("strict graph { a }", TextRange::new(0, 6)).is_none());
    }

    #[test]
    fn test_not_offered_when_graph_has_errors() {
        assert!(convert("digraph { a -> ; b -> c }", TextRange::new(0, 7)).is_none());
        assert!(convert("digraph { a -> b", TextRange::new(0, 7)).is_none());
    }

    #[test]
    fn test_offered_after_strict() {
        assert!(convert("strict graph { a }", TextRange::new(7, 12)).is_some());
    }

    #[test]
    fn test_rewrites_keyword_and_operators() {
        let source = "digraph { a -> b -> c }";
        let action = convert(source, TextRange::new(0, 7)).unwrap();
        let Command::FixGraph(args) = action.command else {
            panic!("expected a fix-graph command");
        };
        let edits = commands::fix_graph::execute(&TextDocument::new(source), &SourceFile::parse(source), &args).unwrap();
        assert_eq!(apply_edits(source, &edits).unwrap(), "graph { a -- b -- c }");
    }
}
