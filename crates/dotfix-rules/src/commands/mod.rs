//! Data-only command model
//!
//! A [`Command`] records the offsets and enumerations needed to regenerate
//! its edits later. It never holds a tree reference, so it stays valid to
//! store and replay after the tree that produced it is gone.

use dotfix_core::{Edit, SourceFile, TextDocument};
use lsp_types::CodeActionKind;
use serde::{Deserialize, Serialize};

use crate::error::ExecuteError;

pub mod change_edge_op;
pub mod consolidate;
pub mod fix_graph;

pub use change_edge_op::ChangeEdgeOpArgs;
pub use consolidate::{ConsolidateArgs, ConsolidationCandidate};
pub use fix_graph::FixGraphArgs;

pub const CHANGE_EDGE_OP: &str = "DOT.changeEdgeOp";
pub const CHANGE_ALL_OTHER_EDGE_OPS_AND_FIX_GRAPH: &str = "DOT.changeAllOtherEdgeOpsAndFixGraph";
pub const CONSOLIDATE_DESCENDANTS: &str = "DOT.consolidateDescendants";

/// Executes one command kind against a document and its parse
pub trait CommandExecutor: Send + Sync {
    /// The stable wire identifier (e.g. "DOT.changeEdgeOp")
    fn id(&self) -> &'static str;

    /// Turn the command's JSON arguments back into text edits
    fn execute(
        &self,
        document: &TextDocument,
        file: &SourceFile,
        arguments: serde_json::Value,
    ) -> Result<Vec<Edit>, ExecuteError>;
}

/// Decode the arguments of `command` into its payload type
pub(crate) fn decode_arguments<T: serde::de::DeserializeOwned>(
    command: &'static str,
    arguments: serde_json::Value,
) -> Result<T, ExecuteError> {
    serde_json::from_value(arguments)
        .map_err(|source| ExecuteError::InvalidArguments { command, source })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "arguments")]
pub enum Command {
    #[serde(rename = "DOT.changeEdgeOp")]
    ChangeEdgeOp(ChangeEdgeOpArgs),
    #[serde(rename = "DOT.changeAllOtherEdgeOpsAndFixGraph")]
    FixGraph(FixGraphArgs),
    #[serde(rename = "DOT.consolidateDescendants")]
    Consolidate(ConsolidateArgs),
}

impl Command {
    pub fn id(&self) -> &'static str {
        match self {
            Command::ChangeEdgeOp(_) => CHANGE_EDGE_OP,
            Command::FixGraph(_) => CHANGE_ALL_OTHER_EDGE_OPS_AND_FIX_GRAPH,
            Command::Consolidate(_) => CONSOLIDATE_DESCENDANTS,
        }
    }

    /// The payload alone, as sent in the wire form's `arguments` field
    pub fn arguments(&self) -> serde_json::Value {
        let value = match self {
            Command::ChangeEdgeOp(args) => serde_json::to_value(args),
            Command::FixGraph(args) => serde_json::to_value(args),
            Command::Consolidate(args) => serde_json::to_value(args),
        };
        // Payloads are plain structs of integers, booleans and enums.
        value.unwrap_or(serde_json::Value::Null)
    }

    /// Protocol command carrying the payload as its only argument
    pub fn to_lsp(&self, title: &str) -> lsp_types::Command {
        lsp_types::Command {
            title: title.to_string(),
            command: self.id().to_string(),
            arguments: Some(vec![self.arguments()]),
        }
    }
}

/// A titled command offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAction {
    pub title: String,
    pub kind: CodeActionKind,
    pub is_preferred: bool,
    pub command: Command,
}

impl CodeAction {
    pub fn quick_fix(title: impl Into<String>, command: Command) -> Self {
        Self {
            title: title.into(),
            kind: CodeActionKind::QUICKFIX,
            is_preferred: false,
            command,
        }
    }

    pub fn refactor(title: impl Into<String>, command: Command) -> Self {
        Self {
            title: title.into(),
            kind: CodeActionKind::REFACTOR_REWRITE,
            is_preferred: false,
            command,
        }
    }

    pub fn preferred(mut self) -> Self {
        self.is_preferred = true;
        self
    }

    pub fn to_lsp(&self) -> lsp_types::CodeAction {
        lsp_types::CodeAction {
            title: self.title.clone(),
            kind: Some(self.kind.clone()),
            diagnostics: None,
            edit: None,
            command: Some(self.command.to_lsp(&self.title)),
            is_preferred: Some(self.is_preferred),
            disabled: None,
            data: None,
        }
    }
}
