//! DOT tokenizer
//!
//! Produces a flat token list terminated by an `EndOfFile` token, plus the
//! scan-phase diagnostics. Trivia (whitespace and comments) is dropped.
//! Offsets are byte offsets; every non-ASCII byte is treated as an identifier
//! byte, so token boundaries always fall on UTF-8 character boundaries.

use crate::diagnostic::{Diagnostic, DiagnosticCode, ScanError};
use crate::kind::SyntaxKind;
use crate::span::TextRange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
    /// Decoded value for identifiers: quotes and escapes removed for quoted
    /// strings, angle brackets removed for HTML strings
    pub value: String,
    /// Set on malformed tokens, e.g. an unterminated string
    pub has_error: bool,
}

pub struct ScanResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn scan(text: &str) -> ScanResult {
    let mut scanner = Scanner {
        text,
        bytes: text.as_bytes(),
        pos: 0,
        tokens: Vec::new(),
        diagnostics: Vec::new(),
    };
    scanner.run();
    ScanResult {
        tokens: scanner.tokens,
        diagnostics: scanner.diagnostics,
    }
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte >= 0x80
}

fn is_identifier_part(byte: u8) -> bool {
    is_identifier_start(byte) || byte.is_ascii_digit()
}

impl<'a> Scanner<'a> {
    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn run(&mut self) {
        while let Some(byte) = self.peek(0) {
            let start = self.pos;
            match byte {
                b' ' | b'\t' | b'\r' | b'\n' | 0x0c => self.pos += 1,
                b'/' if self.peek(1) == Some(b'/') => self.skip_line(),
                b'#' if self.at_line_start() => self.skip_line(),
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment(),
                b'{' => self.punct(SyntaxKind::OpenBraceToken, 1),
                b'}' => self.punct(SyntaxKind::CloseBraceToken, 1),
                b'[' => self.punct(SyntaxKind::OpenBracketToken, 1),
                b']' => self.punct(SyntaxKind::CloseBracketToken, 1),
                b':' => self.punct(SyntaxKind::ColonToken, 1),
                b';' => self.punct(SyntaxKind::SemicolonToken, 1),
                b',' => self.punct(SyntaxKind::CommaToken, 1),
                b'=' => self.punct(SyntaxKind::EqualsToken, 1),
                b'+' => self.punct(SyntaxKind::PlusToken, 1),
                b'-' if self.peek(1) == Some(b'>') => self.punct(SyntaxKind::DirectedEdgeOp, 2),
                b'-' if self.peek(1) == Some(b'-') => self.punct(SyntaxKind::UndirectedEdgeOp, 2),
                b'-' | b'.' | b'0'..=b'9' if self.numeral_len() > 0 => {
                    let len = self.numeral_len();
                    self.pos += len;
                    self.push_value(SyntaxKind::NumericIdentifier, start, false);
                }
                b'"' => self.quoted_string(),
                b'<' => self.html_string(),
                _ if is_identifier_start(byte) => {
                    while self.peek(0).is_some_and(is_identifier_part) {
                        self.pos += 1;
                    }
                    let word = &self.text[start..self.pos];
                    match SyntaxKind::keyword(word) {
                        Some(keyword) => self.push(keyword, start, String::new(), false),
                        None => self.push_value(SyntaxKind::TextIdentifier, start, false),
                    }
                }
                _ => {
                    // Only ASCII bytes reach this arm.
                    self.pos += 1;
                    let range = TextRange::new(start, self.pos);
                    self.diagnostics.push(Diagnostic::error(
                        range,
                        DiagnosticCode::Scan(ScanError::UnexpectedCharacter),
                        format!("Unexpected character '{}'", byte as char),
                    ));
                    self.push(SyntaxKind::Unknown, start, String::new(), true);
                }
            }
        }
        let end = self.text.len();
        self.tokens.push(Token {
            kind: SyntaxKind::EndOfFile,
            range: TextRange::empty(end),
            value: String::new(),
            has_error: false,
        });
    }

    fn push(&mut self, kind: SyntaxKind, start: usize, value: String, has_error: bool) {
        self.tokens.push(Token {
            kind,
            range: TextRange::new(start, self.pos),
            value,
            has_error,
        });
    }

    fn push_value(&mut self, kind: SyntaxKind, start: usize, has_error: bool) {
        let value = self.text[start..self.pos].to_string();
        self.push(kind, start, value, has_error);
    }

    fn punct(&mut self, kind: SyntaxKind, len: usize) {
        let start = self.pos;
        self.pos += len;
        self.push(kind, start, String::new(), false);
    }

    /// Preprocessor output lines start with `#` in the first column
    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.bytes[self.pos - 1] == b'\n'
    }

    fn skip_line(&mut self) {
        while self.peek(0).is_some_and(|b| b != b'\n') {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.pos;
        match self.text[start + 2..].find("*/") {
            Some(close) => self.pos = start + 2 + close + 2,
            None => {
                self.pos = self.text.len();
                self.unterminated(start, "Unterminated comment");
            }
        }
    }

    /// Length of the numeral at the cursor, or 0 if there is none
    fn numeral_len(&self) -> usize {
        let mut len = 0;
        if self.peek(0) == Some(b'-') {
            len += 1;
        }
        let digits = |from: usize| {
            self.bytes[self.pos + from..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
        };
        let integral = digits(len);
        len += integral;
        if self.peek(len) == Some(b'.') {
            let fraction = digits(len + 1);
            if integral == 0 && fraction == 0 {
                return 0;
            }
            len += 1 + fraction;
        } else if integral == 0 {
            return 0;
        }
        len
    }

    fn quoted_string(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        let mut segment = self.pos;
        loop {
            match self.peek(0) {
                None => {
                    value.push_str(&self.text[segment..self.pos]);
                    self.unterminated(start, "Unterminated string");
                    self.push(SyntaxKind::QuotedTextIdentifier, start, value, true);
                    return;
                }
                Some(b'"') => {
                    value.push_str(&self.text[segment..self.pos]);
                    self.pos += 1;
                    self.push(SyntaxKind::QuotedTextIdentifier, start, value, false);
                    return;
                }
                Some(b'\\') if self.peek(1) == Some(b'"') => {
                    value.push_str(&self.text[segment..self.pos]);
                    value.push('"');
                    self.pos += 2;
                    segment = self.pos;
                }
                Some(b'\\') if self.peek(1) == Some(b'\n') => {
                    value.push_str(&self.text[segment..self.pos]);
                    self.pos += 2;
                    segment = self.pos;
                }
                Some(b'\\') if self.peek(1) == Some(b'\r') && self.peek(2) == Some(b'\n') => {
                    value.push_str(&self.text[segment..self.pos]);
                    self.pos += 3;
                    segment = self.pos;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn html_string(&mut self) {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(byte) = self.peek(0) {
            self.pos += 1;
            match byte {
                b'<' => depth += 1,
                b'>' => {
                    depth -= 1;
                    if depth == 0 {
                        let value = self.text[start + 1..self.pos - 1].to_string();
                        self.push(SyntaxKind::HtmlIdentifier, start, value, false);
                        return;
                    }
                }
                _ => {}
            }
        }
        let value = self.text[start + 1..].to_string();
        self.unterminated(start, "Unterminated HTML string");
        self.push(SyntaxKind::HtmlIdentifier, start, value, true);
    }

    fn unterminated(&mut self, start: usize, message: &str) {
        self.diagnostics.push(Diagnostic::error(
            TextRange::new(start, self.pos),
            DiagnosticCode::Scan(ScanError::Unterminated),
            message,
        ));
    }
}
