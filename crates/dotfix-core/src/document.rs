//! Text document with line/column conversion
//!
//! Positions follow the editor protocol convention: zero-based lines and
//! character columns counted in UTF-16 code units. Out-of-range input is
//! clamped to the document instead of rejected.

use lsp_types::{Position, Range};

use crate::span::TextRange;

#[derive(Debug, Clone)]
pub struct TextDocument {
    text: String,
    /// Byte offset of the first character of every line
    line_starts: Vec<usize>,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn slice(&self, range: TextRange) -> Option<&str> {
        range.slice(&self.text)
    }

    /// Byte range of a line's content, without its line break
    fn line_range(&self, line: usize) -> TextRange {
        let start = self.line_starts[line];
        let mut end = self
            .line_starts
            .get(line + 1)
            .map_or(self.text.len(), |&next| next - 1);
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        TextRange::new(start, end)
    }

    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let character: usize = self.text[line_start..offset]
            .chars()
            .map(char::len_utf16)
            .sum();
        Position::new(line as u32, character as u32)
    }

    pub fn offset_at(&self, position: Position) -> usize {
        let line = position.line as usize;
        if line >= self.line_starts.len() {
            return self.text.len();
        }
        let line_range = self.line_range(line);
        let content = &self.text[line_range.start..line_range.end];

        let mut units = 0usize;
        for (index, ch) in content.char_indices() {
            if units >= position.character as usize {
                return line_range.start + index;
            }
            units += ch.len_utf16();
        }
        line_range.end
    }

    pub fn range_of(&self, range: TextRange) -> Range {
        Range::new(self.position_at(range.start), self.position_at(range.end))
    }

    pub fn text_range(&self, range: Range) -> TextRange {
        let start = self.offset_at(range.start);
        let end = self.offset_at(range.end).max(start);
        TextRange::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_round_trip_on_multiple_lines() {
        let doc = TextDocument::new("graph {\n  a -- b\n}");
        let offset = doc.text().find('b').unwrap();
        let position = doc.position_at(offset);
        assert_eq!(position, Position::new(1, 7));
        assert_eq!(doc.offset_at(position), offset);
    }

    #[test]
    fn test_utf16_columns() {
        let doc = TextDocument::new("graph { \"😀\" -- b }");
        let offset = doc.text().find(" --").unwrap();
        // the emoji is two UTF-16 units and four bytes
        assert_eq!(doc.position_at(offset), Position::new(0, 12));
        assert_eq!(doc.offset_at(Position::new(0, 12)), offset);
    }

    #[test]
    fn test_clamping() {
        let doc = TextDocument::new("ab\r\ncd");
        assert_eq!(doc.offset_at(Position::new(0, 99)), 2);
        assert_eq!(doc.offset_at(Position::new(7, 0)), 6);
        assert_eq!(doc.position_at(100), Position::new(1, 2));
    }

    #[test]
    fn test_offset_inside_character_snaps_back() {
        let doc = TextDocument::new("ü");
        assert_eq!(doc.position_at(1), Position::new(0, 0));
    }

    #[test]
    fn test_position_serialization() {
        let json = serde_json::to_string(&Position::new(2, 4)).unwrap();
        assert_eq!(json, r#"{"line":2,"character":4}"#);
    }
}
