//! End-to-end tests: parse a document, ask for code actions, execute the
//! chosen command through the registry and apply the edits.

use dotfix_core::{apply_edits, CheckError, DiagnosticCode, GraphKind, SourceFile, TextDocument, TextRange};
use dotfix_rules::commands::ConsolidationCandidate;
use dotfix_rules::{code_actions, CodeAction, Command, CommandRegistry, ExecuteError};
use lsp_types::CodeActionKind;

fn actions(source: &str, range: TextRange) -> Vec<CodeAction> {
    let document = TextDocument::new(source);
    let file = SourceFile::parse(source);
    code_actions(&document, &file, range).unwrap_or_default()
}

/// Send the command through its JSON wire form, execute it and apply the edits
fn run(source: &str, command: &Command) -> Result<String, ExecuteError> {
    let wire = serde_json::to_string(command).unwrap();
    let replayed: Command = serde_json::from_str(&wire).unwrap();

    let registry = CommandRegistry::new();
    let document = TextDocument::new(source);
    let file = SourceFile::parse(source);
    let edits = registry.execute_command(&replayed, &document, &file)?;
    Ok(apply_edits(source, &edits).unwrap())
}

fn invalid_edge_operations(source: &str) -> usize {
    SourceFile::parse(source)
        .diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::Check(CheckError::InvalidEdgeOperation))
        .count()
}

fn consolidations(actions: &[CodeAction]) -> Vec<&Vec<ConsolidationCandidate>> {
    actions
        .iter()
        .filter_map(|action| match &action.command {
            Command::Consolidate(args) => Some(&args.candidates),
            _ => None,
        })
        .collect()
}

// ==================== Invalid Edge Operation ====================

#[test]
fn test_invalid_operator_offers_three_fixes() {
    let source = "digraph { a -- b }";
    let found = actions(source, TextRange::empty(12));
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|a| a.kind == CodeActionKind::QUICKFIX));

    let results: Vec<String> = found
        .iter()
        .map(|action| run(source, &action.command).unwrap())
        .collect();
    assert_eq!(
        results,
        vec![
            "digraph { a -> b }".to_string(),
            "digraph { a -> b }".to_string(),
            "graph { a -- b }".to_string(),
        ]
    );
}

#[test]
fn test_fix_all_leaves_no_invalid_operations() {
    let source = "digraph {\n  a -- b -> c\n  subgraph s { d -- e; f -> g }\n  h -- i\n}";
    assert_eq!(invalid_edge_operations(source), 3);

    let first = source.find("--").unwrap();
    let found = actions(source, TextRange::new(first, first + 2));
    assert_eq!(found.len(), 3);
    for action in &found[1..] {
        let fixed = run(source, &action.command).unwrap();
        assert_eq!(invalid_edge_operations(&fixed), 0, "after {:?}:\n{}", action.title, fixed);
    }
}

#[test]
fn test_convert_from_fix_flips_graph() {
    let source = "digraph { a -- b; c -> d }";
    let found = actions(source, TextRange::empty(13));
    let fixed = run(source, &found[2].command).unwrap();
    assert_eq!(fixed, "graph { a -- b; c -- d }");
}

// ==================== Graph Type Conversion ====================

#[test]
fn test_convert_graph_type_on_keyword_only() {
    let source = "digraph G { a -> b }";
    let on_keyword = actions(source, TextRange::new(0, 7));
    assert_eq!(on_keyword.len(), 1);
    assert_eq!(on_keyword[0].kind, CodeActionKind::REFACTOR_REWRITE);
    match &on_keyword[0].command {
        Command::FixGraph(args) => assert_eq!(args.to, GraphKind::Graph),
        other => panic!("unexpected command {:?}", other),
    }
    assert_eq!(run(source, &on_keyword[0].command).unwrap(), "graph G { a -- b }");

    assert!(actions(source, TextRange::new(0, 8)).is_empty());
    assert!(actions(source, TextRange::new(8, 9)).is_empty());
}

#[test]
fn test_convert_graph_type_needs_error_free_graph() {
    let broken = "digraph { a -> ; b -> c }";
    assert!(actions(broken, TextRange::new(0, 7)).is_empty());

    let repaired = "digraph { a -> d; b -> c }";
    let found = actions(repaired, TextRange::new(0, 7));
    assert_eq!(found.len(), 1);
    assert_eq!(run(repaired, &found[0].command).unwrap(), "graph { a -- d; b -- c }");
}

// ==================== Consolidation ====================

#[test]
fn test_consolidates_three_statements() {
    let source = "graph { a -> b; a -> c; a -> d; }";
    let found = actions(source, TextRange::empty(8));
    let candidates = consolidations(&found);
    assert_eq!(candidates.len(), 1);

    let statements: Vec<&str> = candidates[0]
        .iter()
        .map(|c| c.statement.slice(source).unwrap())
        .collect();
    assert_eq!(statements, vec!["a -> b;", "a -> c;", "a -> d;"]);

    let command = found
        .iter()
        .find(|a| matches!(a.command, Command::Consolidate(_)))
        .map(|a| a.command.clone())
        .unwrap();
    assert_eq!(run(source, &command).unwrap(), "graph { a -> { b c d }; }");
}

#[test]
fn test_consolidation_never_crosses_attribute_statement() {
    let source = "graph { a -> b; node[shape=box]; a -> c; }";
    let attribute_start = source.find("node").unwrap();
    let found = actions(source, TextRange::empty(8));
    for candidates in consolidations(&found) {
        assert!(candidates.iter().all(|c| c.statement.end <= attribute_start));
    }
    assert!(consolidations(&found).is_empty());
}

#[test]
fn test_consolidation_with_multiline_layout() {
    let source = "digraph {\n  a -> b;\n  a -> \"c d\";\n  a -> e;\n}\n";
    let cursor = source.find("a ->").unwrap();
    let found = actions(source, TextRange::empty(cursor));
    let action = found
        .iter()
        .find(|a| matches!(a.command, Command::Consolidate(_)))
        .unwrap();
    let result = run(source, &action.command).unwrap();
    assert_eq!(result, "digraph {\n  a -> { b \"c d\" e };\n}\n");
    assert!(SourceFile::parse(&result).diagnostics.is_empty());
}

#[test]
fn test_consolidation_keeps_comments_in_place() {
    let source = "graph {\n  a -- b; // first\n  a -- c; // second\n  a -- d;\n}\n";
    let cursor = source.find("a --").unwrap();
    let action = actions(source, TextRange::empty(cursor))
        .into_iter()
        .find(|a| matches!(a.command, Command::Consolidate(_)))
        .unwrap();
    let result = run(source, &action.command).unwrap();
    assert_eq!(result, "graph {\n  a -- { b c d }; // first\n  // second\n}\n");
    assert!(SourceFile::parse(&result).diagnostics.is_empty());
}

#[test]
fn test_consolidation_keeps_same_line_statements() {
    let source = "digraph {\n  a -> b\n  a -> c; x -> y\n}";
    let action = actions(source, TextRange::empty(12))
        .into_iter()
        .find(|a| matches!(a.command, Command::Consolidate(_)))
        .unwrap();
    assert_eq!(run(source, &action.command).unwrap(), "digraph {\n  a -> { b c }\n  x -> y\n}");
}

#[test]
fn test_consolidation_from_terminator() {
    let source = "graph { a -- b; a -- c; }";
    let found = actions(source, TextRange::empty(15));
    assert_eq!(consolidations(&found).len(), 1);
}

// ==================== Stale Commands ====================

#[test]
fn test_stale_command_is_rejected() {
    let source = "digraph { a -- b }";
    let found = actions(source, TextRange::empty(12));
    let edited = "graph { a -- b }";
    for action in &found {
        let result = run(edited, &action.command);
        assert!(
            matches!(result, Err(ExecuteError::StaleDocument(_))),
            "{} applied to a changed document",
            action.title
        );
    }
}

#[test]
fn test_stale_consolidation_is_rejected() {
    let source = "graph { a -> b; a -> c; }";
    let found = actions(source, TextRange::empty(8));
    let command = found
        .iter()
        .find(|a| matches!(a.command, Command::Consolidate(_)))
        .map(|a| a.command.clone())
        .unwrap();
    let result = run("graph { a -> b; a -> c [x=y]; }", &command);
    assert!(matches!(result, Err(ExecuteError::StaleDocument(_))));
}

#[test]
fn test_stale_consolidation_with_same_ranges_is_rejected() {
    let source = "graph { a -- b; a -- c; }";
    let command = actions(source, TextRange::empty(8))
        .into_iter()
        .find(|a| matches!(a.command, Command::Consolidate(_)))
        .map(|a| a.command)
        .unwrap();
    let result = run("graph { a -- b; z -- c; }", &command);
    assert!(matches!(result, Err(ExecuteError::StaleDocument(_))));
}

#[test]
fn test_protocol_command_round_trip() {
    let source = "graph { a -- b; a -- c; }";
    let action = actions(source, TextRange::empty(8))
        .into_iter()
        .find(|a| matches!(a.command, Command::Consolidate(_)))
        .unwrap()
        .to_lsp();
    let wire = serde_json::to_string(&action).unwrap();
    let replayed: lsp_types::CodeAction = serde_json::from_str(&wire).unwrap();
    let command = replayed.command.unwrap();

    let document = TextDocument::new(source);
    let file = SourceFile::parse(source);
    let edits = CommandRegistry::new().execute_lsp(&command, &document, &file).unwrap();
    assert_eq!(apply_edits(source, &edits).unwrap(), "graph { a -- { b c }; }");
}

// ==================== Nothing Applicable ====================

#[test]
fn test_nothing_applicable_is_none() {
    let source = "digraph { a -> b }";
    let document = TextDocument::new(source);
    let file = SourceFile::parse(source);
    assert!(code_actions(&document, &file, TextRange::empty(16)).is_none());
}

#[test]
fn test_erroneous_region_does_not_block_other_regions() {
    let source = "digraph { a -> ; x -> y; x -> z }";
    let cursor = source.find("x ->").unwrap();
    let found = actions(source, TextRange::empty(cursor));
    assert_eq!(consolidations(&found).len(), 1);
}
