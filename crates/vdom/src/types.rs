use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside one [`Dom`](crate::Dom) arena.
///
/// Handles are only meaningful for the `Dom` that created them and are
/// invalidated by [`Dom::destroy_tree`](crate::Dom::destroy_tree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    DocumentType,
    Element,
    Text,
    Comment,
    CData,
    ShadowRoot,
}

impl NodeType {
    /// Whether nodes of this type own a child list.
    pub fn allows_children(self) -> bool {
        matches!(
            self,
            NodeType::Document | NodeType::Element | NodeType::ShadowRoot
        )
    }

    pub fn is_character_data(self) -> bool {
        matches!(self, NodeType::Text | NodeType::Comment | NodeType::CData)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    #[default]
    Html,
    Svg,
}

impl Namespace {
    pub fn uri(self) -> &'static str {
        match self {
            Namespace::Html => "http://www.w3.org/1999/xhtml",
            Namespace::Svg => "http://www.w3.org/2000/svg",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompatMode {
    #[default]
    #[serde(rename = "CSS1Compat")]
    Standards,
    #[serde(rename = "BackCompat")]
    Quirks,
}

impl CompatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CompatMode::Standards => "CSS1Compat",
            CompatMode::Quirks => "BackCompat",
        }
    }
}
