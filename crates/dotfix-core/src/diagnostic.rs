//! Located diagnostics with a two-level (phase, sub-code) taxonomy

use serde::{Deserialize, Serialize};

use crate::span::TextRange;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Message,
    Suggestion,
}

/// Analysis phase that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Scan,
    Parse,
    Check,
}

impl Phase {
    pub fn number(self) -> u32 {
        match self {
            Phase::Scan => 1,
            Phase::Parse => 2,
            Phase::Check => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScanError {
    Unterminated,
    UnexpectedCharacter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParseError {
    ExpectationFailed,
    TrailingData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckError {
    /// An edge operator that the enclosing graph's keyword does not allow
    InvalidEdgeOperation,
}

/// Phase-tagged diagnostic code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "code", rename_all = "camelCase")]
pub enum DiagnosticCode {
    Scan(ScanError),
    Parse(ParseError),
    Check(CheckError),
}

impl DiagnosticCode {
    pub fn phase(self) -> Phase {
        match self {
            DiagnosticCode::Scan(_) => Phase::Scan,
            DiagnosticCode::Parse(_) => Phase::Parse,
            DiagnosticCode::Check(_) => Phase::Check,
        }
    }

    /// Sub-code number within the phase, starting at 1
    pub fn sub_code(self) -> u32 {
        match self {
            DiagnosticCode::Scan(ScanError::Unterminated) => 1,
            DiagnosticCode::Scan(ScanError::UnexpectedCharacter) => 2,
            DiagnosticCode::Parse(ParseError::ExpectationFailed) => 1,
            DiagnosticCode::Parse(ParseError::TrailingData) => 2,
            DiagnosticCode::Check(CheckError::InvalidEdgeOperation) => 1,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DOT{}{:03}", self.phase().number(), self.sub_code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: TextRange,
    pub category: DiagnosticCategory,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn error(range: TextRange, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            range,
            category: DiagnosticCategory::Error,
            code,
            message: message.into(),
        }
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }
}
