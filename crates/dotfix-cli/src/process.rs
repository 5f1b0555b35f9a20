//! File processing logic for dotfix

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use dotfix_core::{apply_edits, CheckError, DiagnosticCode, Edit, SourceFile, TextDocument, TextRange};
use dotfix_rules::{code_actions, convert_diagnostics, quick_fixes, CodeAction, Command, CommandRegistry};
use lsp_types::Diagnostic;

use crate::config::Config;
use crate::output::EditInfo;

/// Result of fixing a single document
pub struct FixResult {
    pub edits: Vec<EditInfo>,
    pub new_source: String,
}

pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Write the processed result to the file
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Every diagnostic of the document, shaped for editor hosts
pub fn check_source(source: &str) -> Vec<Diagnostic> {
    let document = TextDocument::new(source);
    let file = SourceFile::parse(source);
    convert_diagnostics(&document, &file.diagnostics)
}

pub fn check_file(path: &Path) -> Result<Vec<Diagnostic>> {
    Ok(check_source(&read_file(path)?))
}

/// Make every edge operator agree with the graph keyword.
///
/// Returns `None` when the document has no invalid edge operation.
pub fn fix_source(source: &str, registry: &CommandRegistry) -> Result<Option<FixResult>> {
    let document = TextDocument::new(source);
    let file = SourceFile::parse(source);

    let Some(diagnostic) = file
        .diagnostics
        .iter()
        .find(|d| d.code == DiagnosticCode::Check(CheckError::InvalidEdgeOperation))
    else {
        return Ok(None);
    };

    // One graph-wide fix covers every invalid operator in the file
    let Some(command) = quick_fixes(&document, &file, diagnostic.range)
        .into_iter()
        .map(|action| action.command)
        .find(|command| matches!(command, Command::FixGraph(args) if args.from == args.to))
    else {
        debug!("no keep-keyword fix offered at {}", diagnostic.range);
        return Ok(None);
    };

    let edits = registry.execute_command(&command, &document, &file)?;
    let new_source = apply_edits(source, &edits)?;

    Ok(Some(FixResult {
        edits: edit_infos(&document, command.id(), &edits),
        new_source,
    }))
}

pub fn fix_file(path: &Path, registry: &CommandRegistry) -> Result<(String, Option<FixResult>)> {
    let source = read_file(path)?;
    let fixed = fix_source(&source, registry)
        .with_context(|| format!("Failed to fix {}", path.display()))?;
    Ok((source, fixed))
}

/// Code actions for `range`, minus the commands disabled in config
pub fn actions_for(source: &str, range: TextRange, config: &Config) -> Vec<CodeAction> {
    let document = TextDocument::new(source);
    let file = SourceFile::parse(source);
    code_actions(&document, &file, range)
        .unwrap_or_default()
        .into_iter()
        .filter(|action| config.is_action_enabled(action.command.id()))
        .collect()
}

/// Run a command by id against `source` and return the edited text.
///
/// `arguments` is either the payload itself or the protocol's argument array.
pub fn execute_command(
    source: &str,
    command_id: &str,
    arguments: serde_json::Value,
    registry: &CommandRegistry,
) -> Result<String> {
    let arguments = match arguments {
        serde_json::Value::Array(items) => items,
        payload => vec![payload],
    };
    let command = lsp_types::Command {
        title: command_id.to_string(),
        command: command_id.to_string(),
        arguments: Some(arguments),
    };
    let document = TextDocument::new(source);
    let file = SourceFile::parse(source);
    let edits = registry.execute_lsp(&command, &document, &file)?;
    Ok(apply_edits(source, &edits)?)
}

/// Reported edits, skipping replacements that leave the text as it was
fn edit_infos(document: &TextDocument, command_id: &str, edits: &[Edit]) -> Vec<EditInfo> {
    edits
        .iter()
        .filter(|edit| document.slice(edit.range) != Some(edit.replacement.as_str()))
        .map(|edit| {
            // Columns are UTF-16 units, shown 1-based like diagnostics
            let position = document.position_at(edit.start_offset());
            EditInfo {
                command: command_id.to_string(),
                line: position.line as usize + 1,
                column: position.character as usize + 1,
                message: edit.message.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ActionsConfig;
    use serde_json::json;
    use tempfile::TempDir;

    // ==================== Check ====================

    #[test]
    fn test_check_source() {
        assert!(check_source("digraph { a -> b }").is_empty());

        let diagnostics = check_source("digraph {\n  a -- b\n}");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].code,
            Some(lsp_types::NumberOrString::String("DOT3001".to_string()))
        );
        assert_eq!(diagnostics[0].range.start.line, 1);
    }

    #[test]
    fn test_check_file_missing() {
        let temp = TempDir::new().unwrap();
        let err = check_file(&temp.path().join("missing.dot")).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.dot"));
    }

    // ==================== Fix ====================

    #[test]
    fn test_fix_source_keeps_keyword() {
        let registry = CommandRegistry::new();
        let source = "digraph {\n  a -- b\n  c -- d -> e\n}\n";
        let fixed = fix_source(source, &registry).unwrap().unwrap();
        assert_eq!(fixed.new_source, "digraph {\n  a -> b\n  c -> d -> e\n}\n");
        assert_eq!(fixed.edits.len(), 2);
        assert_eq!(fixed.edits[0].command, "DOT.changeAllOtherEdgeOpsAndFixGraph");
        assert_eq!((fixed.edits[0].line, fixed.edits[0].column), (2, 5));
        assert!(check_source(&fixed.new_source).is_empty());
    }

    #[test]
    fn test_fix_source_reports_one_based_positions() {
        let registry = CommandRegistry::new();
        let source = "digraph {\n\"\u{e9}\" -- b\n}";
        let fixed = fix_source(source, &registry).unwrap().unwrap();
        assert_eq!(fixed.edits.len(), 1);
        assert_eq!((fixed.edits[0].line, fixed.edits[0].column), (2, 5));
    }

    #[test]
    fn test_fix_source_nothing_to_do() {
        let registry = CommandRegistry::new();
        assert!(fix_source("graph { a -- b }", &registry).unwrap().is_none());
        assert!(fix_source("graph { a -- ", &registry).unwrap().is_none());
    }

    #[test]
    fn test_fix_file_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("g.gv");
        std::fs::write(&path, "graph { a -> b }").unwrap();

        let registry = CommandRegistry::new();
        let (source, fixed) = fix_file(&path, &registry).unwrap();
        let fixed = fixed.unwrap();
        write_file(&path, &fixed.new_source).unwrap();

        assert_eq!(source, "graph { a -> b }");
        assert_eq!(read_file(&path).unwrap(), "graph { a -- b }");
    }

    // ==================== Actions ====================

    #[test]
    fn test_actions_respect_disabled_commands() {
        let source = "digraph { a -- b }";
        let all = actions_for(source, TextRange::empty(12), &Config::default());
        assert_eq!(all.len(), 3);

        let config = Config {
            actions: ActionsConfig {
                disabled: vec!["DOT.changeEdgeOp".to_string()],
            },
            ..Default::default()
        };
        let filtered = actions_for(source, TextRange::empty(12), &config);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|a| a.command.id() != "DOT.changeEdgeOp"));
    }

    #[test]
    fn test_execute_command_by_id() {
        let registry = CommandRegistry::new();
        let result = execute_command(
            "digraph { a -- b }",
            "DOT.changeEdgeOp",
            json!({"operation": {"start": 12, "end": 14}, "from": "undirected", "to": "directed"}),
            &registry,
        )
        .unwrap();
        assert_eq!(result, "digraph { a -> b }");

        let stale = execute_command(
            "digraph { a -> b }",
            "DOT.changeEdgeOp",
            json!({"operation": {"start": 12, "end": 14}, "from": "undirected", "to": "directed"}),
            &registry,
        );
        assert!(stale.is_err());
    }

    #[test]
    fn test_execute_command_with_protocol_arguments() {
        let registry = CommandRegistry::new();
        let source = "graph { a -- b; a -- c; }";
        let action = actions_for(source, TextRange::empty(8), &Config::default())
            .into_iter()
            .find(|action| action.command.id() == "DOT.consolidateDescendants")
            .unwrap();
        let lsp_command = action.to_lsp().command.unwrap();
        let arguments = serde_json::Value::Array(lsp_command.arguments.unwrap());

        let result = execute_command(source, &lsp_command.command, arguments.clone(), &registry).unwrap();
        assert_eq!(result, "graph { a -- { b c }; }");

        let renamed = execute_command("graph { a -- b; z -- c; }", &lsp_command.command, arguments, &registry);
        assert!(renamed.is_err());
    }
}
