use crate::types::NodeType;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DomError {
    /// Inserting the node would break the document structure rules.
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(&'static str),
    #[error("reference node is not a child of the target parent")]
    NotAChild,
    #[error("{0:?} nodes cannot have children")]
    LeafNode(NodeType),
    #[error("inserting the node would create a cycle")]
    Cycle,
    #[error("cannot materialize a {0:?} node as a child")]
    Unmaterializable(NodeType),
    #[error("unknown node {0}")]
    UnknownNode(u32),
    #[error("node is not an element")]
    NotAnElement,
    #[error("element is not a {0} element")]
    WrongElementKind(&'static str),
    #[error("tree is deeper than the configured limit of {0}")]
    DepthLimit(usize),
    /// Rejection reported by a host tree implementation.
    #[error("host error: {0}")]
    Host(String),
}
