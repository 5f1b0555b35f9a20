//! Conversions into the protocol shapes editor hosts expect

use dotfix_core::{Diagnostic, DiagnosticCategory, Edit, TextDocument};
use lsp_types::{DiagnosticSeverity, NumberOrString, TextEdit};

/// Source tag attached to every host diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "dot";

pub fn severity(category: DiagnosticCategory) -> DiagnosticSeverity {
    match category {
        DiagnosticCategory::Error => DiagnosticSeverity::ERROR,
        DiagnosticCategory::Warning => DiagnosticSeverity::WARNING,
        DiagnosticCategory::Message => DiagnosticSeverity::INFORMATION,
        DiagnosticCategory::Suggestion => DiagnosticSeverity::HINT,
    }
}

pub fn to_lsp_diagnostic(document: &TextDocument, diagnostic: &Diagnostic) -> lsp_types::Diagnostic {
    lsp_types::Diagnostic {
        range: document.range_of(diagnostic.range),
        severity: Some(severity(diagnostic.category)),
        code: Some(NumberOrString::String(diagnostic.code.to_string())),
        code_description: None,
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: diagnostic.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}

pub fn convert_diagnostics(document: &TextDocument, diagnostics: &[Diagnostic]) -> Vec<lsp_types::Diagnostic> {
    diagnostics
        .iter()
        .map(|diagnostic| to_lsp_diagnostic(document, diagnostic))
        .collect()
}

pub fn to_text_edit(document: &TextDocument, edit: &Edit) -> TextEdit {
    TextEdit {
        range: document.range_of(edit.range),
        new_text: edit.replacement.clone(),
    }
}
