//! Recursive-descent DOT parser
//!
//! Builds the arena tree bottom-up: children are allocated before their
//! parent, so [`SyntaxTree::alloc`] can link parents and fold error flags in a
//! single pass. Every parse function tracks whether it recorded an error
//! itself and hands that to `alloc`.
//!
//! Recovery is local. A missing piece becomes an empty slot plus an
//! `ExpectationFailed` diagnostic on the enclosing node; a token that cannot
//! start a statement is skipped with a diagnostic on the enclosing body.

use log::trace;

use crate::diagnostic::{Diagnostic, DiagnosticCode, ParseError};
use crate::kind::SyntaxKind;
use crate::scanner::Token;
use crate::span::TextRange;
use crate::tree::{
    Assignment, AttributeContainer, AttributeStatement, EdgeRhs, EdgeStatement, Graph,
    IdEqualsIdStatement, Identifier, NodeData, NodeId, NodeIndex, NodeStatement,
    PortDeclaration, Subgraph, SubgraphStatement, SyntaxTree,
};

pub struct ParseResult {
    pub tree: SyntaxTree,
    pub graph: Option<NodeIndex>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn parse(mut tokens: Vec<Token>) -> ParseResult {
    if tokens.last().map(|t| t.kind) != Some(SyntaxKind::EndOfFile) {
        let end = tokens.last().map_or(0, |t| t.range.end);
        tokens.push(Token {
            kind: SyntaxKind::EndOfFile,
            range: TextRange::empty(end),
            value: String::new(),
            has_error: false,
        });
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        tree: SyntaxTree::new(),
        diagnostics: Vec::new(),
    };
    let graph = parser.parse_source();
    ParseResult {
        tree: parser.tree,
        graph,
        diagnostics: parser.diagnostics,
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    tree: SyntaxTree,
    diagnostics: Vec<Diagnostic>,
}

fn can_start_identifier(kind: SyntaxKind) -> bool {
    kind.is_identifier()
}

impl Parser {
    // ==================== Token cursor ====================

    fn current(&self) -> &Token {
        // The list always ends with EndOfFile and the cursor never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> SyntaxKind {
        self.current().kind
    }

    fn nth_kind(&self, ahead: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + ahead)
            .map_or(SyntaxKind::EndOfFile, |t| t.kind)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.kind() == kind
    }

    fn at_eof(&self) -> bool {
        self.at(SyntaxKind::EndOfFile)
    }

    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if !self.at_eof() {
            self.pos += 1;
        }
        token
    }

    /// End of the most recently consumed token
    fn last_end(&self) -> usize {
        match self.pos {
            0 => 0,
            pos => self.tokens[pos - 1].range.end,
        }
    }

    fn expected(&mut self, what: &str) {
        let token = self.current();
        let range = token.range;
        let found = match token.kind {
            SyntaxKind::EndOfFile => "end of file".to_string(),
            _ => format!("{:?}", token.kind),
        };
        trace!("expected {} at {}, found {}", what, range, found);
        self.diagnostics.push(Diagnostic::error(
            range,
            DiagnosticCode::Parse(ParseError::ExpectationFailed),
            format!("Expected {}", what),
        ));
    }

    // ==================== Leaves ====================

    /// Allocate the current token as a leaf node
    fn token_node(&mut self) -> NodeIndex {
        let token = self.bump();
        self.tree
            .alloc(token.kind, token.range, NodeData::Token, token.has_error)
    }

    fn optional_token(&mut self, kind: SyntaxKind) -> Option<NodeIndex> {
        self.at(kind).then(|| self.token_node())
    }

    /// Identifier leaf; quoted strings joined with `+` become one node.
    fn identifier(&mut self) -> NodeIndex {
        let first = self.bump();
        let mut text = first.value;
        let mut range = first.range;
        let mut has_error = first.has_error;

        if first.kind == SyntaxKind::QuotedTextIdentifier {
            while self.at(SyntaxKind::PlusToken) {
                self.bump();
                if self.at(SyntaxKind::QuotedTextIdentifier) {
                    let part = self.bump();
                    text.push_str(&part.value);
                    range = range.cover(part.range);
                    has_error |= part.has_error;
                } else {
                    self.expected("a quoted string after '+'");
                    range = TextRange::new(range.start, self.last_end());
                    has_error = true;
                    break;
                }
            }
        }

        self.tree.alloc(
            first.kind,
            range,
            NodeData::Identifier(Identifier { text }),
            has_error,
        )
    }

    // ==================== Graph ====================

    fn parse_source(&mut self) -> Option<NodeIndex> {
        if self.at_eof() {
            return None;
        }
        let start = self.current().range.start;
        let strict = self.optional_token(SyntaxKind::StrictKeyword);
        if !matches!(self.kind(), SyntaxKind::GraphKeyword | SyntaxKind::DigraphKeyword) {
            self.expected("'graph' or 'digraph'");
            return None;
        }
        let keyword = self.token_node();
        let id = can_start_identifier(self.kind()).then(|| self.identifier());

        let mut has_error = false;
        let statements = self.braced_body(&mut has_error);
        let range = TextRange::new(start, self.last_end());
        let graph = self.tree.alloc(
            SyntaxKind::Graph,
            range,
            NodeData::Graph(Graph {
                strict,
                keyword,
                id,
                statements,
            }),
            has_error,
        );

        if !self.at_eof() {
            let first = self.current().range.start;
            // last token before EndOfFile
            let last = self.tokens[self.tokens.len() - 2].range.end;
            self.diagnostics.push(Diagnostic::error(
                TextRange::new(first, last),
                DiagnosticCode::Parse(ParseError::TrailingData),
                "Content after the end of the graph",
            ));
        }
        Some(graph)
    }

    /// `{ stmt_list }`, reporting a missing brace on the caller's node
    fn braced_body(&mut self, has_error: &mut bool) -> Vec<NodeIndex> {
        if !self.at(SyntaxKind::OpenBraceToken) {
            self.expected("'{'");
            *has_error = true;
            return Vec::new();
        }
        self.bump();
        let statements = self.statement_list(has_error);
        if self.at(SyntaxKind::CloseBraceToken) {
            self.bump();
        } else {
            self.expected("'}'");
            *has_error = true;
        }
        statements
    }

    fn statement_list(&mut self, has_error: &mut bool) -> Vec<NodeIndex> {
        let mut statements = Vec::new();
        loop {
            match self.kind() {
                SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFile => break,
                // stray separators between statements
                SyntaxKind::SemicolonToken => {
                    self.bump();
                }
                kind if kind.is_identifier()
                    || matches!(
                        kind,
                        SyntaxKind::GraphKeyword
                            | SyntaxKind::NodeKeyword
                            | SyntaxKind::EdgeKeyword
                            | SyntaxKind::SubgraphKeyword
                            | SyntaxKind::OpenBraceToken
                    ) =>
                {
                    statements.push(self.statement());
                }
                _ => {
                    self.expected("a statement");
                    self.bump();
                    *has_error = true;
                }
            }
        }
        statements
    }

    // ==================== Statements ====================

    fn statement(&mut self) -> NodeIndex {
        let start = self.current().range.start;
        match self.kind() {
            SyntaxKind::GraphKeyword | SyntaxKind::NodeKeyword | SyntaxKind::EdgeKeyword => {
                self.attribute_statement(start)
            }
            SyntaxKind::SubgraphKeyword | SyntaxKind::OpenBraceToken => {
                let subgraph = self.subgraph();
                if self.kind().is_edge_op() {
                    self.edge_statement(start, subgraph)
                } else {
                    let terminator = self.optional_token(SyntaxKind::SemicolonToken);
                    self.tree.alloc(
                        SyntaxKind::SubgraphStatement,
                        TextRange::new(start, self.last_end()),
                        NodeData::SubgraphStatement(SubgraphStatement {
                            subgraph,
                            terminator,
                        }),
                        false,
                    )
                }
            }
            _ if self.nth_kind(1) == SyntaxKind::EqualsToken => self.id_equals_id_statement(start),
            _ => {
                let node_id = self.node_id();
                if self.kind().is_edge_op() {
                    self.edge_statement(start, node_id)
                } else {
                    let attributes = self.attribute_lists();
                    let terminator = self.optional_token(SyntaxKind::SemicolonToken);
                    self.tree.alloc(
                        SyntaxKind::NodeStatement,
                        TextRange::new(start, self.last_end()),
                        NodeData::NodeStatement(NodeStatement {
                            id: node_id,
                            attributes,
                            terminator,
                        }),
                        false,
                    )
                }
            }
        }
    }

    fn attribute_statement(&mut self, start: usize) -> NodeIndex {
        let subject = self.token_node();
        let mut has_error = false;
        if !self.at(SyntaxKind::OpenBracketToken) {
            self.expected("'['");
            has_error = true;
        }
        let attributes = self.attribute_lists();
        let terminator = self.optional_token(SyntaxKind::SemicolonToken);
        self.tree.alloc(
            SyntaxKind::AttributeStatement,
            TextRange::new(start, self.last_end()),
            NodeData::AttributeStatement(AttributeStatement {
                subject,
                attributes,
                terminator,
            }),
            has_error,
        )
    }

    fn id_equals_id_statement(&mut self, start: usize) -> NodeIndex {
        let left = self.identifier();
        self.bump();
        let mut has_error = false;
        let right = if can_start_identifier(self.kind()) {
            Some(self.identifier())
        } else {
            self.expected("an identifier");
            has_error = true;
            None
        };
        let terminator = self.optional_token(SyntaxKind::SemicolonToken);
        self.tree.alloc(
            SyntaxKind::IdEqualsIdStatement,
            TextRange::new(start, self.last_end()),
            NodeData::IdEqualsIdStatement(IdEqualsIdStatement {
                left,
                right,
                terminator,
            }),
            has_error,
        )
    }

    /// Edge chain after an already parsed source (node id or subgraph)
    fn edge_statement(&mut self, start: usize, source: NodeIndex) -> NodeIndex {
        let mut rhs = Vec::new();
        while self.kind().is_edge_op() {
            rhs.push(self.edge_rhs());
        }
        let attributes = self.attribute_lists();
        let terminator = self.optional_token(SyntaxKind::SemicolonToken);
        self.tree.alloc(
            SyntaxKind::EdgeStatement,
            TextRange::new(start, self.last_end()),
            NodeData::EdgeStatement(EdgeStatement {
                source,
                rhs,
                attributes,
                terminator,
            }),
            false,
        )
    }

    fn edge_rhs(&mut self) -> NodeIndex {
        let start = self.current().range.start;
        let operation = self.token_node();
        let mut has_error = false;
        let target = match self.kind() {
            SyntaxKind::SubgraphKeyword | SyntaxKind::OpenBraceToken => Some(self.subgraph()),
            kind if can_start_identifier(kind) => Some(self.node_id()),
            _ => {
                self.expected("a node or subgraph");
                has_error = true;
                None
            }
        };
        self.tree.alloc(
            SyntaxKind::EdgeRhs,
            TextRange::new(start, self.last_end()),
            NodeData::EdgeRhs(EdgeRhs { operation, target }),
            has_error,
        )
    }

    fn subgraph(&mut self) -> NodeIndex {
        let start = self.current().range.start;
        let keyword = self.optional_token(SyntaxKind::SubgraphKeyword);
        let id = if keyword.is_some() && can_start_identifier(self.kind()) {
            Some(self.identifier())
        } else {
            None
        };
        let mut has_error = false;
        let statements = self.braced_body(&mut has_error);
        self.tree.alloc(
            SyntaxKind::Subgraph,
            TextRange::new(start, self.last_end()),
            NodeData::Subgraph(Subgraph {
                keyword,
                id,
                statements,
            }),
            has_error,
        )
    }

    fn node_id(&mut self) -> NodeIndex {
        let start = self.current().range.start;
        let id = self.identifier();
        let port = self.at(SyntaxKind::ColonToken).then(|| self.port());
        self.tree.alloc(
            SyntaxKind::NodeId,
            TextRange::new(start, self.last_end()),
            NodeData::NodeId(NodeId { id, port }),
            false,
        )
    }

    /// `:id`, `:compass` or `:id:compass`
    fn port(&mut self) -> NodeIndex {
        let start = self.current().range.start;
        self.bump();
        let mut has_error = false;
        let id = if can_start_identifier(self.kind()) {
            Some(self.identifier())
        } else {
            self.expected("a port name");
            has_error = true;
            None
        };
        let mut compass = None;
        if !has_error && self.at(SyntaxKind::ColonToken) {
            self.bump();
            if can_start_identifier(self.kind()) {
                compass = Some(self.identifier());
            } else {
                self.expected("a compass point");
                has_error = true;
            }
        }
        self.tree.alloc(
            SyntaxKind::PortDeclaration,
            TextRange::new(start, self.last_end()),
            NodeData::PortDeclaration(PortDeclaration { id, compass }),
            has_error,
        )
    }

    // ==================== Attributes ====================

    fn attribute_lists(&mut self) -> Vec<NodeIndex> {
        let mut lists = Vec::new();
        while self.at(SyntaxKind::OpenBracketToken) {
            lists.push(self.attribute_container());
        }
        lists
    }

    fn attribute_container(&mut self) -> NodeIndex {
        let start = self.current().range.start;
        self.bump();
        let mut assignments = Vec::new();
        let mut has_error = false;
        loop {
            match self.kind() {
                SyntaxKind::CloseBracketToken => {
                    self.bump();
                    break;
                }
                // A closing brace or end of input ends the list unclosed.
                SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFile => {
                    self.expected("']'");
                    has_error = true;
                    break;
                }
                kind if can_start_identifier(kind) => assignments.push(self.assignment()),
                _ => {
                    self.expected("an attribute");
                    self.bump();
                    has_error = true;
                }
            }
        }
        self.tree.alloc(
            SyntaxKind::AttributeContainer,
            TextRange::new(start, self.last_end()),
            NodeData::AttributeContainer(AttributeContainer { assignments }),
            has_error,
        )
    }

    fn assignment(&mut self) -> NodeIndex {
        let start = self.current().range.start;
        let left = self.identifier();
        let mut has_error = false;
        let mut right = None;
        if self.at(SyntaxKind::EqualsToken) {
            self.bump();
            if can_start_identifier(self.kind()) {
                right = Some(self.identifier());
            } else {
                self.expected("an attribute value");
                has_error = true;
            }
        } else {
            self.expected("'='");
            has_error = true;
        }
        let terminator = match self.kind() {
            SyntaxKind::SemicolonToken | SyntaxKind::CommaToken => Some(self.token_node()),
            _ => None,
        };
        self.tree.alloc(
            SyntaxKind::Assignment,
            TextRange::new(start, self.last_end()),
            NodeData::Assignment(Assignment {
                left,
                right,
                terminator,
            }),
            has_error,
        )
    }
}
