//! Syntax kinds for the DOT grammar
//!
//! Kinds are ordered: every token kind sorts before [`SyntaxKind::FIRST_NODE`].
//! Token nodes never have children.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SyntaxKind {
    Unknown,
    EndOfFile,

    OpenBraceToken,
    CloseBraceToken,
    OpenBracketToken,
    CloseBracketToken,
    ColonToken,
    SemicolonToken,
    CommaToken,
    EqualsToken,
    PlusToken,

    DirectedEdgeOp,
    UndirectedEdgeOp,

    StrictKeyword,
    GraphKeyword,
    DigraphKeyword,
    NodeKeyword,
    EdgeKeyword,
    SubgraphKeyword,

    // Identifiers are leaves but carry their decoded text.
    TextIdentifier,
    QuotedTextIdentifier,
    HtmlIdentifier,
    NumericIdentifier,

    Graph,
    AttributeStatement,
    EdgeStatement,
    NodeStatement,
    IdEqualsIdStatement,
    SubgraphStatement,
    Subgraph,
    NodeId,
    PortDeclaration,
    EdgeRhs,
    AttributeContainer,
    Assignment,
}

impl SyntaxKind {
    /// Lowest kind that is not a token
    pub const FIRST_NODE: SyntaxKind = SyntaxKind::TextIdentifier;

    pub fn is_token(self) -> bool {
        self < Self::FIRST_NODE
    }

    pub fn is_identifier(self) -> bool {
        matches!(
            self,
            SyntaxKind::TextIdentifier
                | SyntaxKind::QuotedTextIdentifier
                | SyntaxKind::HtmlIdentifier
                | SyntaxKind::NumericIdentifier
        )
    }

    pub fn is_edge_op(self) -> bool {
        matches!(self, SyntaxKind::DirectedEdgeOp | SyntaxKind::UndirectedEdgeOp)
    }

    /// Map a word to its keyword kind; DOT keywords are case-insensitive.
    pub fn keyword(word: &str) -> Option<SyntaxKind> {
        const KEYWORDS: [(&str, SyntaxKind); 6] = [
            ("strict", SyntaxKind::StrictKeyword),
            ("graph", SyntaxKind::GraphKeyword),
            ("digraph", SyntaxKind::DigraphKeyword),
            ("node", SyntaxKind::NodeKeyword),
            ("edge", SyntaxKind::EdgeKeyword),
            ("subgraph", SyntaxKind::SubgraphKeyword),
        ];
        KEYWORDS
            .iter()
            .find(|(text, _)| text.eq_ignore_ascii_case(word))
            .map(|(_, kind)| *kind)
    }
}

/// Edge operator flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeOp {
    Directed,
    Undirected,
}

impl EdgeOp {
    pub fn from_kind(kind: SyntaxKind) -> Option<EdgeOp> {
        match kind {
            SyntaxKind::DirectedEdgeOp => Some(EdgeOp::Directed),
            SyntaxKind::UndirectedEdgeOp => Some(EdgeOp::Undirected),
            _ => None,
        }
    }

    pub fn from_text(text: &str) -> Option<EdgeOp> {
        match text {
            "->" => Some(EdgeOp::Directed),
            "--" => Some(EdgeOp::Undirected),
            _ => None,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            EdgeOp::Directed => "->",
            EdgeOp::Undirected => "--",
        }
    }

    pub fn opposite(self) -> EdgeOp {
        match self {
            EdgeOp::Directed => EdgeOp::Undirected,
            EdgeOp::Undirected => EdgeOp::Directed,
        }
    }

    /// The graph keyword under which this operator is valid
    pub fn graph_kind(self) -> GraphKind {
        match self {
            EdgeOp::Directed => GraphKind::Digraph,
            EdgeOp::Undirected => GraphKind::Graph,
        }
    }
}

/// Graph directedness, as written by the `graph` / `digraph` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GraphKind {
    Graph,
    Digraph,
}

impl GraphKind {
    pub fn from_kind(kind: SyntaxKind) -> Option<GraphKind> {
        match kind {
            SyntaxKind::GraphKeyword => Some(GraphKind::Graph),
            SyntaxKind::DigraphKeyword => Some(GraphKind::Digraph),
            _ => None,
        }
    }

    pub fn from_text(text: &str) -> Option<GraphKind> {
        if text.eq_ignore_ascii_case("graph") {
            Some(GraphKind::Graph)
        } else if text.eq_ignore_ascii_case("digraph") {
            Some(GraphKind::Digraph)
        } else {
            None
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            GraphKind::Graph => "graph",
            GraphKind::Digraph => "digraph",
        }
    }

    pub fn opposite(self) -> GraphKind {
        match self {
            GraphKind::Graph => GraphKind::Digraph,
            GraphKind::Digraph => GraphKind::Graph,
        }
    }

    /// The only edge operator allowed in a graph of this kind
    pub fn allowed_op(self) -> EdgeOp {
        match self {
            GraphKind::Graph => EdgeOp::Undirected,
            GraphKind::Digraph => EdgeOp::Directed,
        }
    }
}
