//! dotfix-rules: Code actions for DOT documents
//!
//! Available commands:
//! - DOT.changeEdgeOp: Flip a single edge operator to the allowed one
//! - DOT.changeAllOtherEdgeOpsAndFixGraph: Make every operator agree with a
//!   graph keyword, optionally converting the keyword
//! - DOT.consolidateDescendants: Chain same-source edges into one statement

pub mod commands;
mod error;
pub mod host;
pub mod quick_fix;
pub mod refactor;
pub mod registry;

pub use commands::{CodeAction, Command};
pub use error::ExecuteError;
pub use host::{convert_diagnostics, to_lsp_diagnostic, to_text_edit};
pub use quick_fix::{is_in_range, quick_fixes};
pub use refactor::refactorings;
pub use registry::{all_command_ids, CommandRegistry};

use dotfix_core::{SourceFile, TextDocument, TextRange};

/// Quick fixes followed by refactorings for `range`.
///
/// `None` means nothing applies, as opposed to an empty list.
pub fn code_actions(document: &TextDocument, file: &SourceFile, range: TextRange) -> Option<Vec<CodeAction>> {
    let mut actions = quick_fixes(document, file, range);
    actions.extend(refactorings(document, file, range));
    if actions.is_empty() {
        None
    } else {
        Some(actions)
    }
}
