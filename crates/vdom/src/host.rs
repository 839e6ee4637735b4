//! Seams to the live document tree.
//!
//! The builder reads a live tree through [`HostTree`]; the reconciler also
//! mutates it through [`HostTreeMut`]. [`Dom`](crate::Dom) implements both,
//! so the same arena can stand in for a live document.

use crate::error::DomError;
use crate::types::{CompatMode, Namespace, NodeType};
use core_types::{DialogMode, MediaState};
use cssom::StyleSheet;
use std::fmt::Debug;
use std::hash::Hash;

/// Doctype fields as reported by a host tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentTypeParts {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
}

pub trait HostTree {
    type Node: Copy + Eq + Hash + Debug;

    /// `None` for host node kinds the virtual model does not represent.
    fn node_type(&self, node: Self::Node) -> Option<NodeType>;
    fn tag_name(&self, node: Self::Node) -> Option<&str>;
    fn namespace(&self, node: Self::Node) -> Namespace;
    /// Attributes in host order.
    fn attributes(&self, node: Self::Node) -> Vec<(String, String)>;
    /// Payload of text, comment and CDATA nodes.
    fn character_data(&self, node: Self::Node) -> Option<&str>;
    fn document_type(&self, node: Self::Node) -> Option<DocumentTypeParts>;
    fn compat_mode(&self, node: Self::Node) -> CompatMode;
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;
    fn shadow_root(&self, node: Self::Node) -> Option<Self::Node>;
    fn content_document(&self, node: Self::Node) -> Option<Self::Node>;
    /// `(left, top)`.
    fn scroll_offsets(&self, node: Self::Node) -> (f64, f64);
    fn dialog_mode(&self, node: Self::Node) -> Option<DialogMode>;
    /// Inclusive: a node contains itself.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool;
}

pub trait HostTreeMut: HostTree {
    fn create_element(
        &mut self,
        tag_name: &str,
        namespace: Namespace,
    ) -> Result<Self::Node, DomError>;
    fn create_text_node(&mut self, data: &str) -> Result<Self::Node, DomError>;
    fn create_comment(&mut self, data: &str) -> Result<Self::Node, DomError>;
    fn create_cdata_section(&mut self, data: &str) -> Result<Self::Node, DomError>;
    fn create_document_type(
        &mut self,
        name: &str,
        public_id: &str,
        system_id: &str,
    ) -> Result<Self::Node, DomError>;

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str)
    -> Result<(), DomError>;
    fn set_attribute_ns(
        &mut self,
        node: Self::Node,
        namespace: &str,
        name: &str,
        value: &str,
    ) -> Result<(), DomError>;
    fn remove_attribute(&mut self, node: Self::Node, name: &str) -> Result<(), DomError>;
    fn set_character_data(&mut self, node: Self::Node, data: &str) -> Result<(), DomError>;

    /// Insert `child` before `reference` (append when `None`). A child that
    /// is already attached somewhere is moved.
    fn insert_before(
        &mut self,
        parent: Self::Node,
        child: Self::Node,
        reference: Option<Self::Node>,
    ) -> Result<(), DomError>;
    fn remove_child(&mut self, parent: Self::Node, child: Self::Node) -> Result<(), DomError>;
    /// Returns the existing shadow root when one is already attached.
    fn attach_shadow(&mut self, host: Self::Node) -> Result<Self::Node, DomError>;

    fn set_scroll_offsets(&mut self, node: Self::Node, left: f64, top: f64)
    -> Result<(), DomError>;
    fn apply_media(&mut self, node: Self::Node, state: &MediaState) -> Result<(), DomError>;
    fn show_dialog(&mut self, node: Self::Node, mode: DialogMode) -> Result<(), DomError>;
    fn close_dialog(&mut self, node: Self::Node) -> Result<(), DomError>;
    /// Live sheet backing a style element.
    fn style_sheet_mut(&mut self, node: Self::Node) -> Option<&mut StyleSheet>;
}

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XMLNS_NS: &str = "http://www.w3.org/2000/xmlns/";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace an SVG attribute has to be set in, if any.
pub fn attribute_namespace(name: &str) -> Option<&'static str> {
    if name.starts_with("xlink:") {
        Some(XLINK_NS)
    } else if name == "xmlns" || name.starts_with("xmlns:") {
        Some(XMLNS_NS)
    } else if name.starts_with("xml:") {
        Some(XML_NS)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaced_attribute_names() {
        assert_eq!(attribute_namespace("xlink:href"), Some(XLINK_NS));
        assert_eq!(attribute_namespace("xmlns"), Some(XMLNS_NS));
        assert_eq!(attribute_namespace("xmlns:xlink"), Some(XMLNS_NS));
        assert_eq!(attribute_namespace("xml:lang"), Some(XML_NS));
        assert_eq!(attribute_namespace("href"), None);
        assert_eq!(attribute_namespace("xmlnsfoo"), None);
    }
}
