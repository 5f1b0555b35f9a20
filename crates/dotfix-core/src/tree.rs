//! Arena-allocated DOT syntax tree
//!
//! Nodes are owned by the [`SyntaxTree`] arena and addressed by [`NodeIndex`].
//! Ownership is top-down through the kind-specific child slots in [`NodeData`];
//! the `parent` index on each node only serves upward lookups.

use crate::kind::{EdgeOp, GraphKind, SyntaxKind};
use crate::span::TextRange;
use crate::visitor;

/// Index of a node inside its [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(u32);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-node bit flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeFlags(u8);

impl NodeFlags {
    pub const NONE: NodeFlags = NodeFlags(0);
    /// Set when the node recorded an error or any child has this flag.
    pub const CONTAINS_ERROR: NodeFlags = NodeFlags(1);

    pub fn contains(self, other: NodeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: NodeFlags) {
        self.0 |= other.0;
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub flags: NodeFlags,
    pub parent: Option<NodeIndex>,
    pub data: NodeData,
}

/// Kind-specific payload. Child slots are named, not a uniform list.
#[derive(Debug, Clone)]
pub enum NodeData {
    Token,
    Identifier(Identifier),
    Graph(Graph),
    AttributeStatement(AttributeStatement),
    EdgeStatement(EdgeStatement),
    NodeStatement(NodeStatement),
    IdEqualsIdStatement(IdEqualsIdStatement),
    SubgraphStatement(SubgraphStatement),
    Subgraph(Subgraph),
    NodeId(NodeId),
    PortDeclaration(PortDeclaration),
    EdgeRhs(EdgeRhs),
    AttributeContainer(AttributeContainer),
    Assignment(Assignment),
}

#[derive(Debug, Clone)]
pub struct Identifier {
    /// Decoded text: quotes removed and `+` concatenations joined
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Graph {
    pub strict: Option<NodeIndex>,
    pub keyword: NodeIndex,
    pub id: Option<NodeIndex>,
    pub statements: Vec<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct AttributeStatement {
    /// `graph`, `node` or `edge` keyword
    pub subject: NodeIndex,
    pub attributes: Vec<NodeIndex>,
    pub terminator: Option<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct EdgeStatement {
    /// A `NodeId` or a `Subgraph`
    pub source: NodeIndex,
    pub rhs: Vec<NodeIndex>,
    pub attributes: Vec<NodeIndex>,
    pub terminator: Option<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct NodeStatement {
    pub id: NodeIndex,
    pub attributes: Vec<NodeIndex>,
    pub terminator: Option<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct IdEqualsIdStatement {
    pub left: NodeIndex,
    pub right: Option<NodeIndex>,
    pub terminator: Option<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct SubgraphStatement {
    pub subgraph: NodeIndex,
    pub terminator: Option<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct Subgraph {
    pub keyword: Option<NodeIndex>,
    pub id: Option<NodeIndex>,
    pub statements: Vec<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct NodeId {
    pub id: NodeIndex,
    pub port: Option<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct PortDeclaration {
    pub id: Option<NodeIndex>,
    pub compass: Option<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct EdgeRhs {
    pub operation: NodeIndex,
    /// A `NodeId` or a `Subgraph`
    pub target: Option<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct AttributeContainer {
    pub assignments: Vec<NodeIndex>,
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub left: NodeIndex,
    pub right: Option<NodeIndex>,
    pub terminator: Option<NodeIndex>,
}

/// Arena holding every node of one parse
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node whose children are already in the arena.
    ///
    /// Links every child back to the new node and folds the children's error
    /// flags into it, so the flag is maintained bottom-up as the tree grows.
    pub(crate) fn alloc(
        &mut self,
        kind: SyntaxKind,
        range: TextRange,
        data: NodeData,
        has_error: bool,
    ) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        let mut flags = NodeFlags::NONE;
        if has_error {
            flags.insert(NodeFlags::CONTAINS_ERROR);
        }
        self.nodes.push(Node {
            kind,
            range,
            flags,
            parent: None,
            data,
        });

        for child in visitor::children(self, index) {
            let child_flags = self.nodes[child.index()].flags;
            self.nodes[child.index()].parent = Some(index);
            self.nodes[index.index()].flags.insert(child_flags);
        }

        index
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node index in allocation order (children before parents)
    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        (0..self.nodes.len()).map(|i| NodeIndex(i as u32))
    }

    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.index()]
    }

    pub fn kind(&self, index: NodeIndex) -> SyntaxKind {
        self.node(index).kind
    }

    pub fn range(&self, index: NodeIndex) -> TextRange {
        self.node(index).range
    }

    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.node(index).parent
    }

    pub fn has_error_flag(&self, index: NodeIndex) -> bool {
        self.node(index).flags.contains(NodeFlags::CONTAINS_ERROR)
    }

    pub fn graph(&self, index: NodeIndex) -> Option<&Graph> {
        match &self.node(index).data {
            NodeData::Graph(graph) => Some(graph),
            _ => None,
        }
    }

    pub fn edge_statement(&self, index: NodeIndex) -> Option<&EdgeStatement> {
        match &self.node(index).data {
            NodeData::EdgeStatement(statement) => Some(statement),
            _ => None,
        }
    }

    pub fn edge_rhs(&self, index: NodeIndex) -> Option<&EdgeRhs> {
        match &self.node(index).data {
            NodeData::EdgeRhs(rhs) => Some(rhs),
            _ => None,
        }
    }

    pub fn node_id(&self, index: NodeIndex) -> Option<&NodeId> {
        match &self.node(index).data {
            NodeData::NodeId(node_id) => Some(node_id),
            _ => None,
        }
    }

    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        match &self.node(index).data {
            NodeData::Identifier(identifier) => Some(&identifier.text),
            _ => None,
        }
    }

    /// Statement list of a graph or subgraph body
    pub fn statements(&self, index: NodeIndex) -> Option<&[NodeIndex]> {
        match &self.node(index).data {
            NodeData::Graph(graph) => Some(&graph.statements),
            NodeData::Subgraph(subgraph) => Some(&subgraph.statements),
            _ => None,
        }
    }

    /// Directedness declared by a graph node's keyword
    pub fn graph_kind(&self, graph: NodeIndex) -> Option<GraphKind> {
        self.graph(graph)
            .and_then(|g| GraphKind::from_kind(self.kind(g.keyword)))
    }

    /// Operator flavour of an edge operation token
    pub fn edge_op(&self, token: NodeIndex) -> Option<EdgeOp> {
        EdgeOp::from_kind(self.kind(token))
    }
}
