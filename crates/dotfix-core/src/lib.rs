//! dotfix-core: Syntax tree and editing primitives for the DOT language
//!
//! This crate provides:
//! - `SourceFile`: One parse of a DOT document (tree, root graph, diagnostics)
//! - `SyntaxTree`: Arena of kind-tagged nodes with parent links and error flags
//! - `for_each_child()`: Short-circuiting child enumeration in grammar order
//! - `node_at_offset()` / `subtree_contains_errors()`: Position and error queries
//! - `TextDocument`: Offset to line/column conversion
//! - `Edit` / `apply_edits()`: Byte-range replacements

pub mod checker;
pub mod diagnostic;
mod document;
mod edit;
pub mod kind;
pub mod parser;
pub mod query;
pub mod scanner;
mod source_file;
mod span;
pub mod tree;
pub mod visitor;

pub use diagnostic::{
    CheckError, Diagnostic, DiagnosticCategory, DiagnosticCode, ParseError, Phase, ScanError,
};
pub use document::TextDocument;
pub use edit::{apply_edits, Edit, EditError};
pub use kind::{EdgeOp, GraphKind, SyntaxKind};
pub use lsp_types::{Position, Range};
pub use query::{edge_operations, find_node, node_at_offset, subtree_contains_errors};
pub use source_file::SourceFile;
pub use span::TextRange;
pub use tree::{NodeData, NodeIndex, SyntaxTree};
pub use visitor::{children, for_each_child, for_each_child_list, visit, Visitor};
