//! Output formatting for dotfix
//!
//! Supports text (colored terminal), JSON and unified diff output formats.

use anyhow::Result;
use colored::*;
use lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString};
use serde::Serialize;
use std::path::Path;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Diff,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "diff" => Some(OutputFormat::Diff),
            _ => None,
        }
    }
}

/// Information about a single applied edit
#[derive(Debug, Clone, Serialize)]
pub struct EditInfo {
    pub command: String,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Result of processing a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<EditInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    fn new(path: &Path) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics: Vec::new(),
            edits: Vec::new(),
            error: None,
        }
    }

    pub fn checked(path: &Path, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            ..Self::new(path)
        }
    }

    pub fn fixed(path: &Path, edits: Vec<EditInfo>) -> Self {
        Self {
            edits,
            ..Self::new(path)
        }
    }

    pub fn error(path: &Path, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(path)
        }
    }

    #[allow(dead_code)]
    pub fn has_changes(&self) -> bool {
        !self.edits.is_empty()
    }

    #[allow(dead_code)]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub files_processed: usize,
    pub files_with_diagnostics: usize,
    pub total_diagnostics: usize,
    /// Diagnostics with error severity
    pub error_diagnostics: usize,
    pub files_with_changes: usize,
    pub total_edits: usize,
    pub errors: usize,
}

/// Full JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub summary: Summary,
    pub files: Vec<FileResult>,
}

/// Reporter for accumulating and outputting results
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
    results: Vec<FileResult>,
    summary: Summary,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            results: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Report the diagnostics of a checked file
    pub fn report_diagnostics(&mut self, path: &Path, diagnostics: Vec<Diagnostic>) {
        self.summary.files_processed += 1;

        if diagnostics.is_empty() {
            if self.verbose && self.format == OutputFormat::Text {
                println!("{}: No problems found", path.display());
            }
            self.results.push(FileResult::checked(path, diagnostics));
            return;
        }

        self.summary.files_with_diagnostics += 1;
        self.summary.total_diagnostics += diagnostics.len();
        self.summary.error_diagnostics += diagnostics.iter().filter(|d| d.severity == Some(DiagnosticSeverity::ERROR)).count();

        if self.format != OutputFormat::Json {
            println!("{}", path.display().to_string().bold());
            for diagnostic in &diagnostics {
                println!("{}", format_diagnostic(diagnostic));
            }
            println!();
        }

        self.results.push(FileResult::checked(path, diagnostics));
    }

    /// Report a file whose fix was computed; `applied` is false in dry-run mode
    pub fn report_fix(
        &mut self,
        path: &Path,
        edits: Vec<EditInfo>,
        old_source: &str,
        new_source: &str,
        applied: bool,
    ) {
        self.summary.files_processed += 1;

        if edits.is_empty() {
            self.report_unchanged(path);
            return;
        }

        self.summary.files_with_changes += 1;
        self.summary.total_edits += edits.len();

        match (self.format, applied) {
            (OutputFormat::Text, true) => {
                println!("{}", path.display().to_string().bold());
                println!("  {} Applied {} change(s)", "OK".green(), edits.len());
                println!();
            }
            (OutputFormat::Text, false) => {
                println!("{}", path.display().to_string().bold());
                print_diff(old_source, new_source);
                println!();
                for edit in &edits {
                    println!("  {} {}", "->".green(), edit.message);
                }
                println!();
            }
            (OutputFormat::Diff, _) => {
                print_unified_diff(path, old_source, new_source);
            }
            (OutputFormat::Json, _) => {
                // JSON output is handled in finish()
            }
        }

        self.results.push(FileResult::fixed(path, edits));
    }

    fn report_unchanged(&mut self, path: &Path) {
        if self.verbose && self.format == OutputFormat::Text {
            println!("{}: No changes needed", path.display());
        }
        self.results.push(FileResult::fixed(path, vec![]));
    }

    /// Report an error processing a file
    pub fn report_error(&mut self, path: &Path, error: &str) {
        self.summary.files_processed += 1;
        self.summary.errors += 1;

        if self.format == OutputFormat::Text {
            eprintln!("{}: {} - {}", "Warning".yellow(), path.display(), error);
        }

        self.results.push(FileResult::error(path, error.to_string()));
    }

    /// Print final summary/output
    pub fn finish(self, pending_hint: bool) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!("{}", "Summary".bold().underline());
                println!("  Files processed: {}", self.summary.files_processed);
                if self.summary.total_diagnostics > 0 {
                    println!("  Files with problems: {}", self.summary.files_with_diagnostics);
                    println!("  Total problems: {}", self.summary.total_diagnostics);
                }
                if self.summary.total_edits > 0 {
                    println!("  Files with changes: {}", self.summary.files_with_changes);
                    println!("  Total edits: {}", self.summary.total_edits);
                }
                if self.summary.errors > 0 {
                    println!("  Errors: {}", self.summary.errors);
                }

                if pending_hint && self.summary.total_edits > 0 {
                    println!();
                    println!("{}", "Run without --dry-run to apply changes".yellow());
                }
            }
            OutputFormat::Json => {
                let output = JsonOutput {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    summary: self.summary,
                    files: self.results,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Diff => {
                // Patch-compatible output carries no summary
            }
        }
        Ok(())
    }

    /// Get summary for exit code determination
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

fn severity_label(severity: Option<DiagnosticSeverity>) -> ColoredString {
    match severity {
        Some(DiagnosticSeverity::ERROR) => "error".red().bold(),
        Some(DiagnosticSeverity::WARNING) => "warning".yellow().bold(),
        Some(DiagnosticSeverity::INFORMATION) => "info".blue(),
        _ => "hint".dimmed(),
    }
}

fn code_label(code: Option<&NumberOrString>) -> String {
    match code {
        Some(NumberOrString::String(code)) => code.clone(),
        Some(NumberOrString::Number(code)) => code.to_string(),
        None => String::new(),
    }
}

/// One line per diagnostic, positions shown 1-based
fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    format!(
        "  {}:{}  {}  {}  {}",
        diagnostic.range.start.line + 1,
        diagnostic.range.start.character + 1,
        severity_label(diagnostic.severity),
        code_label(diagnostic.code.as_ref()).dimmed(),
        diagnostic.message
    )
}

/// Print a colored diff between old and new content
fn print_diff(old: &str, new: &str) {
    for diff_result in diff::lines(old, new) {
        match diff_result {
            diff::Result::Left(l) => {
                println!("  {}", format!("- {}", l).red());
            }
            diff::Result::Right(r) => {
                println!("  {}", format!("+ {}", r).green());
            }
            diff::Result::Both(_, _) => {}
        }
    }
}

/// Print unified diff format (standard diff -u compatible)
fn print_unified_diff(path: &Path, old: &str, new: &str) {
    print!("{}", unified_diff(path, old, new));
}

fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    use similar::{ChangeTag, TextDiff};

    let diff = TextDiff::from_lines(old, new);
    let path_str = path.display().to_string();

    let mut out = format!("--- a/{}\n+++ b/{}\n", path_str, path_str);
    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        out.push_str(&format!("{}\n", hunk.header()));
        for change in hunk.iter_changes() {
            let sign = match change.tag() {
                ChangeTag::Delete => "-",
                ChangeTag::Insert => "+",
                ChangeTag::Equal => " ",
            };
            out.push_str(&format!("{}{}", sign, change));
            if change.missing_newline() {
                out.push('\n');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsp_types::{Position, Range};

    fn diagnostic(severity: DiagnosticSeverity) -> Diagnostic {
        Diagnostic {
            range: Range::new(Position::new(2, 4), Position::new(2, 6)),
            severity: Some(severity),
            code: Some(NumberOrString::String("DOT3001".to_string())),
            code_description: None,
            source: Some("dot".to_string()),
            message: "Invalid edge operation, use \"->\" in directed graph".to_string(),
            related_information: None,
            tags: None,
            data: None,
        }
    }

    // ==================== Format Selection ====================

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("diff"), Some(OutputFormat::Diff));
        assert_eq!(OutputFormat::from_str("xml"), None);
    }

    // ==================== File Results ====================

    #[test]
    fn test_file_result_states() {
        let checked = FileResult::checked(Path::new("a.dot"), vec![diagnostic(DiagnosticSeverity::ERROR)]);
        assert!(!checked.has_changes());
        assert!(!checked.has_error());

        let fixed = FileResult::fixed(
            Path::new("a.dot"),
            vec![EditInfo {
                command: "DOT.changeAllOtherEdgeOpsAndFixGraph".to_string(),
                line: 2,
                column: 5,
                message: "Change \"--\" to \"->\"".to_string(),
            }],
        );
        assert!(fixed.has_changes());

        let failed = FileResult::error(Path::new("a.dot"), "unreadable".to_string());
        assert!(failed.has_error());
    }

    #[test]
    fn test_counts_error_diagnostics() {
        colored::control::set_override(false);
        let mut reporter = Reporter::new(OutputFormat::Json, false);
        reporter.report_diagnostics(Path::new("a.dot"), vec![diagnostic(DiagnosticSeverity::ERROR), diagnostic(DiagnosticSeverity::WARNING)]);
        reporter.report_diagnostics(Path::new("b.dot"), vec![]);
        let summary = reporter.summary();
        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.files_with_diagnostics, 1);
        assert_eq!(summary.total_diagnostics, 2);
        assert_eq!(summary.error_diagnostics, 1);
    }

    // ==================== Rendering ====================

    #[test]
    fn test_format_diagnostic_is_one_based() {
        colored::control::set_override(false);
        let line = format_diagnostic(&diagnostic(DiagnosticSeverity::ERROR));
        assert!(line.starts_with("  3:5  error  DOT3001  "), "{}", line);
    }

    #[test]
    fn test_unified_diff() {
        let diff = unified_diff(
            Path::new("g.dot"),
            "digraph {\n  a -- b\n}\n",
            "digraph {\n  a -> b\n}\n",
        );
        assert!(diff.starts_with("--- a/g.dot\n+++ b/g.dot\n@@"));
        assert!(diff.contains("-  a -- b\n"));
        assert!(diff.contains("+  a -> b\n"));
        assert!(diff.contains(" digraph {\n"));
    }

    #[test]
    fn test_json_serialization() {
        let output = JsonOutput {
            version: "0.1.0".to_string(),
            summary: Summary {
                files_processed: 1,
                files_with_diagnostics: 1,
                total_diagnostics: 1,
                error_diagnostics: 1,
                ..Default::default()
            },
            files: vec![FileResult::checked(Path::new("a.dot"), vec![diagnostic(DiagnosticSeverity::ERROR)])],
        };

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"version\":\"0.1.0\""));
        assert!(json.contains("\"files_processed\":1"));
        assert!(json.contains("\"code\":\"DOT3001\""));
        assert!(!json.contains("\"edits\""));
        assert!(!json.contains("\"error\":"));
    }
}
