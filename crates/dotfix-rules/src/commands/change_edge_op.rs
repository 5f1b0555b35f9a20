//! Command: replace one edge operator with the other flavour

use dotfix_core::{EdgeOp, Edit, SourceFile, TextDocument, TextRange};
use serde::{Deserialize, Serialize};

use super::{decode_arguments, CodeAction, Command, CommandExecutor, CHANGE_EDGE_OP};
use crate::error::ExecuteError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEdgeOpArgs {
    /// Range of the operator token
    pub operation: TextRange,
    pub from: EdgeOp,
    pub to: EdgeOp,
}

pub fn create(operation: TextRange, from: EdgeOp, to: EdgeOp) -> CodeAction {
    CodeAction::quick_fix(
        format!("Change \"{}\" to \"{}\"", from.text(), to.text()),
        Command::ChangeEdgeOp(ChangeEdgeOpArgs {
            operation,
            from,
            to,
        }),
    )
}

pub fn execute(
    document: &TextDocument,
    _file: &SourceFile,
    args: &ChangeEdgeOpArgs,
) -> Result<Vec<Edit>, ExecuteError> {
    verify_operator(document, args.operation, args.from)?;
    Ok(vec![Edit::new(
        args.operation,
        args.to.text(),
        format!("Change \"{}\" to \"{}\"", args.from.text(), args.to.text()),
    )])
}

/// Check that `range` still holds an operator of the recorded flavour
pub(crate) fn verify_operator(
    document: &TextDocument,
    range: TextRange,
    expected: EdgeOp,
) -> Result<(), ExecuteError> {
    match document.slice(range) {
        Some(text) if EdgeOp::from_text(text) == Some(expected) => Ok(()),
        Some(text) => Err(ExecuteError::stale(format!(
            "expected \"{}\" at {}, found \"{}\"",
            expected.text(),
            range,
            text
        ))),
        None => Err(ExecuteError::stale(format!("range {} is outside the document", range))),
    }
}

pub struct ChangeEdgeOpExecutor;

impl CommandExecutor for ChangeEdgeOpExecutor {
    fn id(&self) -> &'static str {
        CHANGE_EDGE_OP
    }

    fn execute(
        &self,
        document: &TextDocument,
        file: &SourceFile,
        arguments: serde_json::Value,
    ) -> Result<Vec<Edit>, ExecuteError> {
        let args: ChangeEdgeOpArgs = decode_arguments(CHANGE_EDGE_OP, arguments)?;
        execute(document, file, &args)
    }
}
