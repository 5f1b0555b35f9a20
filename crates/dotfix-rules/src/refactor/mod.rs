//! Refactorings offered independently of diagnostics

use dotfix_core::{SourceFile, TextDocument, TextRange};

use crate::commands::CodeAction;

pub mod consolidate;
pub mod convert_graph_type;

/// Every general refactoring available for `range`
pub fn refactorings(document: &TextDocument, file: &SourceFile, range: TextRange) -> Vec<CodeAction> {
    let mut actions = Vec::new();
    actions.extend(convert_graph_type::convert_graph_type(file, range));
    actions.extend(consolidate::consolidate_descendants(document, file, range));
    actions
}
