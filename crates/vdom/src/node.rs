//! Node records stored in the [`Dom`](crate::Dom) arena.
//!
//! Specialized element kinds are a tag on the element record
//! ([`ElementKind`]) rather than separate node types; everything that
//! dispatches on an element's kind matches on that tag.

use crate::types::{CompatMode, Namespace, NodeId, NodeType};
use core_types::{CanvasMutation, DialogMode, InputData, MediaState, ScrollData, VirtualStyleRule};
use cssom::StyleSheet;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
pub struct NodeRecord {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) data: NodeData,
}

impl NodeRecord {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }
}

#[derive(Clone, Debug)]
pub enum NodeData {
    Document(DocumentData),
    DocumentType {
        name: String,
        public_id: String,
        system_id: String,
    },
    Element(ElementData),
    /// Root of an element's shadow subtree. Attached through the host's
    /// shadow slot, never through a child list.
    ShadowRoot {
        host: Option<NodeId>,
    },
    Text(String),
    Comment(String),
    CData(String),
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeData::Document(_) => NodeType::Document,
            NodeData::DocumentType { .. } => NodeType::DocumentType,
            NodeData::Element(_) => NodeType::Element,
            NodeData::ShadowRoot { .. } => NodeType::ShadowRoot,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::CData(_) => NodeType::CData,
        }
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match self {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn character_data(&self) -> Option<&str> {
        match self {
            NodeData::Text(data) | NodeData::Comment(data) | NodeData::CData(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DocumentData {
    pub compat_mode: CompatMode,
    /// Frame element whose content this document is.
    pub frame: Option<NodeId>,
    pub scroll_left: f64,
    pub scroll_top: f64,
    /// Pending scroll side-data, replayed by the reconciler.
    pub scroll_data: Option<ScrollData>,
}

#[derive(Clone, Debug)]
pub struct ElementData {
    pub tag_name: String,
    pub namespace: Namespace,
    pub attributes: BTreeMap<String, String>,
    pub shadow_root: Option<NodeId>,
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub input_data: Option<InputData>,
    pub scroll_data: Option<ScrollData>,
    pub kind: ElementKind,
}

impl ElementData {
    pub(crate) fn new(tag_name: String, namespace: Namespace, kind: ElementKind) -> Self {
        Self {
            tag_name,
            namespace,
            attributes: BTreeMap::new(),
            shadow_root: None,
            scroll_left: 0.0,
            scroll_top: 0.0,
            input_data: None,
            scroll_data: None,
            kind,
        }
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn is_svg(&self) -> bool {
        self.namespace == Namespace::Svg
    }

    pub fn content_document(&self) -> Option<NodeId> {
        match self.kind {
            ElementKind::Frame { content_document } => Some(content_document),
            _ => None,
        }
    }

    pub fn dialog_mode(&self) -> Option<DialogMode> {
        match self.kind {
            ElementKind::Dialog(mode) => mode,
            _ => None,
        }
    }

    pub fn style_sheet(&self) -> Option<&StyleSheet> {
        match &self.kind {
            ElementKind::Style { sheet, .. } => Some(sheet),
            _ => None,
        }
    }

    // `open` plus `rr_open_mode` fully determine a dialog's mode.
    pub(crate) fn sync_dialog_mode(&mut self) {
        let open = self.attributes.contains_key("open");
        let modal = self.get_attribute("rr_open_mode") == Some("modal");
        if let ElementKind::Dialog(mode) = &mut self.kind {
            *mode = match (open, modal) {
                (false, _) => None,
                (true, true) => Some(DialogMode::Modal),
                (true, false) => Some(DialogMode::NonModal),
            };
        }
    }
}

/// Kind-specific payload of an element.
#[derive(Clone, Debug, Default)]
pub enum ElementKind {
    #[default]
    Plain,
    /// `audio` / `video`.
    Media(MediaState),
    Canvas {
        mutations: Vec<CanvasMutation>,
    },
    /// `rules` is the queued batch on virtual nodes; `sheet` is the live
    /// style sheet on live nodes.
    Style {
        rules: Vec<VirtualStyleRule>,
        sheet: StyleSheet,
    },
    Dialog(Option<DialogMode>),
    /// `iframe`; owns its nested content document.
    Frame {
        content_document: NodeId,
    },
}

/// Which specialized kind an element with this normalized tag gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindTag {
    Plain,
    Media,
    Canvas,
    Style,
    Dialog,
    Frame,
}

impl KindTag {
    pub fn for_tag(tag_name: &str, namespace: Namespace) -> Self {
        if namespace == Namespace::Svg {
            // SVG has its own <style>, but it still backs a sheet.
            return if tag_name.eq_ignore_ascii_case("style") {
                KindTag::Style
            } else {
                KindTag::Plain
            };
        }
        match tag_name {
            "audio" | "video" => KindTag::Media,
            "canvas" => KindTag::Canvas,
            "style" => KindTag::Style,
            "dialog" => KindTag::Dialog,
            "iframe" => KindTag::Frame,
            _ => KindTag::Plain,
        }
    }
}

// input: "DIV" -> "div", "my-el" -> "my-el", "a b" -> "div"
pub fn valid_tag_name(name: &str) -> String {
    let name = name.trim();
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':'));
    if valid {
        name.to_ascii_lowercase()
    } else {
        "div".to_string()
    }
}

/// Case-sensitive SVG element names, keyed by their lowercased form.
const SVG_CAMEL_CASE_TAGS: &[(&str, &str)] = &[
    ("altglyph", "altGlyph"),
    ("altglyphdef", "altGlyphDef"),
    ("altglyphitem", "altGlyphItem"),
    ("animatecolor", "animateColor"),
    ("animatemotion", "animateMotion"),
    ("animatetransform", "animateTransform"),
    ("clippath", "clipPath"),
    ("feblend", "feBlend"),
    ("fecolormatrix", "feColorMatrix"),
    ("fecomponenttransfer", "feComponentTransfer"),
    ("fecomposite", "feComposite"),
    ("feconvolvematrix", "feConvolveMatrix"),
    ("fediffuselighting", "feDiffuseLighting"),
    ("fedisplacementmap", "feDisplacementMap"),
    ("fedistantlight", "feDistantLight"),
    ("fedropshadow", "feDropShadow"),
    ("feflood", "feFlood"),
    ("fefunca", "feFuncA"),
    ("fefuncb", "feFuncB"),
    ("fefuncg", "feFuncG"),
    ("fefuncr", "feFuncR"),
    ("fegaussianblur", "feGaussianBlur"),
    ("feimage", "feImage"),
    ("femerge", "feMerge"),
    ("femergenode", "feMergeNode"),
    ("femorphology", "feMorphology"),
    ("feoffset", "feOffset"),
    ("fepointlight", "fePointLight"),
    ("fespecularlighting", "feSpecularLighting"),
    ("fespotlight", "feSpotLight"),
    ("fetile", "feTile"),
    ("feturbulence", "feTurbulence"),
    ("foreignobject", "foreignObject"),
    ("glyphref", "glyphRef"),
    ("lineargradient", "linearGradient"),
    ("radialgradient", "radialGradient"),
    ("textpath", "textPath"),
];

/// Restore the canonical spelling of an SVG element name.
pub fn svg_tag_name(tag_name: &str) -> &str {
    SVG_CAMEL_CASE_TAGS
        .iter()
        .find(|(lower, _)| lower.eq_ignore_ascii_case(tag_name))
        .map(|(_, camel)| *camel)
        .unwrap_or(tag_name)
}
