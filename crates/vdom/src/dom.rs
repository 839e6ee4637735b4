//! Arena-backed document tree.
//!
//! Every node of one tree lives in a single `Vec<NodeRecord>` addressed by
//! [`NodeId`]. Parent/child links are indices. Removing a node only detaches
//! it; a detached node stays in the arena until [`Dom::destroy_tree`].
//!
//! Structural rules enforced on insertion:
//! - leaf nodes (text, comment, CDATA, doctype) cannot have children;
//! - a document holds at most one doctype and one element, and no text;
//! - doctypes only live under documents;
//! - documents and shadow roots are never inserted as children;
//! - a node cannot become its own (shadow- or frame-including) descendant.
//!
//! Every failing operation leaves the tree unchanged.

use crate::error::DomError;
use crate::host::{DocumentTypeParts, HostTree, HostTreeMut};
use crate::mirror::Mirror;
use crate::node::{
    DocumentData, ElementData, ElementKind, KindTag, NodeData, NodeRecord, valid_tag_name,
};
use crate::types::{CompatMode, Namespace, NodeId, NodeType};
use core_types::{
    CanvasMutation, DialogMode, InputData, MediaState, ScrollData, SerializedId, VirtualStyleRule,
};
use cssom::StyleSheet;

#[derive(Clone, Debug)]
pub struct Dom {
    nodes: Vec<NodeRecord>,
    document: NodeId,
    mirror: Mirror<NodeId>,
    /// `None` once every negative id has been handed out.
    next_unserialized: Option<i32>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId(0),
            mirror: Mirror::new(),
            next_unserialized: Some(SerializedId::FIRST_UNSERIALIZED.0),
        };
        dom.document = dom.push(NodeData::Document(DocumentData::default()));
        dom
    }

    /// The top-level document.
    pub fn document(&self) -> NodeId {
        self.document
    }

    pub fn mirror(&self) -> &Mirror<NodeId> {
        &self.mirror
    }

    pub fn mirror_mut(&mut self) -> &mut Mirror<NodeId> {
        &mut self.mirror
    }

    /// Next identity for a node the recorder never serialized: -2, -3, ...
    /// Returns `None` once the range down to `i32::MIN` is used up; ids are
    /// never handed out twice.
    pub fn unserialized_id(&mut self) -> Option<SerializedId> {
        let Some(next) = self.next_unserialized else {
            log::error!(target: "vdom.builder", "unserialized id range exhausted");
            return None;
        };
        self.next_unserialized = next.checked_sub(1);
        Some(SerializedId(next))
    }

    /// Number of nodes in the arena, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Drop every node, the identity table and the id counter, leaving a
    /// fresh empty document. Previously handed out `NodeId`s are invalid.
    pub fn destroy_tree(&mut self) {
        self.nodes.clear();
        self.document = self.push(NodeData::Document(DocumentData::default()));
        self.mirror.reset();
        self.next_unserialized = Some(SerializedId::FIRST_UNSERIALIZED.0);
    }

    pub fn open(&mut self) {
        self.destroy_tree();
    }

    /// Cascading removal of `node`'s subtree from this tree's identity table.
    pub fn remove_from_mirror(&mut self, node: NodeId) {
        let mut mirror = std::mem::take(&mut self.mirror);
        mirror.remove_node_from_map(node, &*self);
        self.mirror = mirror;
    }

    // --- factory ---

    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.create_element_ns(tag_name, Namespace::Html)
    }

    pub fn create_element_ns(&mut self, tag_name: &str, namespace: Namespace) -> NodeId {
        let tag_name = normalized_tag(tag_name, namespace);
        let kind = match KindTag::for_tag(&tag_name, namespace) {
            KindTag::Plain => ElementKind::Plain,
            KindTag::Media => ElementKind::Media(MediaState::default()),
            KindTag::Canvas => ElementKind::Canvas {
                mutations: Vec::new(),
            },
            KindTag::Style => ElementKind::Style {
                rules: Vec::new(),
                sheet: StyleSheet::new(),
            },
            KindTag::Dialog => ElementKind::Dialog(None),
            KindTag::Frame => ElementKind::Frame {
                content_document: self.create_document(),
            },
        };
        let frame_doc = match kind {
            ElementKind::Frame { content_document } => Some(content_document),
            _ => None,
        };
        let el = self.push(NodeData::Element(ElementData::new(tag_name, namespace, kind)));
        if let Some(doc) = frame_doc {
            if let NodeData::Document(data) = &mut self.nodes[doc.index()].data {
                data.frame = Some(el);
            }
        }
        el
    }

    pub fn create_text_node(&mut self, data: &str) -> NodeId {
        self.push(NodeData::Text(data.to_string()))
    }

    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.push(NodeData::Comment(data.to_string()))
    }

    pub fn create_cdata_section(&mut self, data: &str) -> NodeId {
        self.push(NodeData::CData(data.to_string()))
    }

    pub fn create_document_type(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(NodeData::DocumentType {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })
    }

    /// A detached document, not owned by any frame.
    pub fn create_document(&mut self) -> NodeId {
        self.push(NodeData::Document(DocumentData::default()))
    }

    /// A shadow root without a host, used when a shadow subtree is built on
    /// its own.
    pub fn create_shadow_root(&mut self) -> NodeId {
        self.push(NodeData::ShadowRoot { host: None })
    }

    // --- read access ---

    pub fn get(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(id.index())
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.get(id).map(NodeRecord::data)
    }

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get(id).map(NodeRecord::node_type)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.data(id).and_then(NodeData::as_element)
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag_name.as_str())
    }

    pub fn parent_node(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(NodeRecord::parent)
    }

    /// Empty for unknown and leaf nodes.
    pub fn child_nodes(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(NodeRecord::children).unwrap_or(&[])
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.child_nodes(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.child_nodes(id).last().copied()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.child_nodes(self.parent_node(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.child_nodes(self.parent_node(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        pos.checked_sub(1).and_then(|p| siblings.get(p).copied())
    }

    /// Inclusive ancestor check along parent links.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_node(id);
        }
        false
    }

    pub fn shadow_root(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).and_then(|el| el.shadow_root)
    }

    pub fn content_document(&self, id: NodeId) -> Option<NodeId> {
        self.element(id).and_then(ElementData::content_document)
    }

    /// Document a node belongs to. Nodes inside a frame belong to the frame's
    /// content document; detached nodes belong to the top-level document.
    pub fn owner_document(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let record = self.get(current)?;
            match (&record.data, record.parent) {
                (NodeData::Document(_), _) => return Some(current),
                (_, Some(parent)) => current = parent,
                (NodeData::ShadowRoot { host: Some(host) }, None) => current = *host,
                _ => return Some(self.document),
            }
        }
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.get_attribute(name))
    }

    /// `None` for documents and doctypes, the payload for character data,
    /// and the concatenated descendant text for elements and shadow roots.
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        match self.data(id)? {
            NodeData::Document(_) | NodeData::DocumentType { .. } => None,
            NodeData::Text(data) | NodeData::Comment(data) | NodeData::CData(data) => {
                Some(data.clone())
            }
            NodeData::Element(_) | NodeData::ShadowRoot { .. } => {
                let mut out = String::new();
                let mut stack: Vec<NodeId> = self.child_nodes(id).iter().rev().copied().collect();
                while let Some(current) = stack.pop() {
                    match self.data(current) {
                        Some(NodeData::Text(data) | NodeData::CData(data)) => out.push_str(data),
                        _ => stack.extend(self.child_nodes(current).iter().rev().copied()),
                    }
                }
                Some(out)
            }
        }
    }

    pub fn compat_mode(&self, id: NodeId) -> CompatMode {
        match self.data(id) {
            Some(NodeData::Document(doc)) => doc.compat_mode,
            _ => CompatMode::default(),
        }
    }

    pub fn scroll_offsets(&self, id: NodeId) -> (f64, f64) {
        match self.data(id) {
            Some(NodeData::Element(el)) => (el.scroll_left, el.scroll_top),
            Some(NodeData::Document(doc)) => (doc.scroll_left, doc.scroll_top),
            _ => (0.0, 0.0),
        }
    }

    pub fn dialog_mode(&self, id: NodeId) -> Option<DialogMode> {
        self.element(id).and_then(ElementData::dialog_mode)
    }

    pub fn style_sheet(&self, id: NodeId) -> Option<&StyleSheet> {
        self.element(id).and_then(ElementData::style_sheet)
    }

    pub fn style_sheet_mut(&mut self, id: NodeId) -> Option<&mut StyleSheet> {
        match self.nodes.get_mut(id.index()).map(|r| &mut r.data) {
            Some(NodeData::Element(ElementData {
                kind: ElementKind::Style { sheet, .. },
                ..
            })) => Some(sheet),
            _ => None,
        }
    }

    // --- structure ---

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference`, or append it when `reference` is
    /// `None`. An attached `child` is moved.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<NodeId, DomError> {
        let parent_type = self.record(parent)?.node_type();
        let child_type = self.record(child)?.node_type();
        if !parent_type.allows_children() {
            return Err(DomError::LeafNode(parent_type));
        }
        if matches!(child_type, NodeType::Document | NodeType::ShadowRoot) {
            return Err(DomError::HierarchyRequest(
                "documents and shadow roots cannot be inserted as children",
            ));
        }
        if self.is_host_including_ancestor(child, parent) {
            return Err(DomError::Cycle);
        }
        if let Some(reference) = reference {
            if self.record(reference)?.parent != Some(parent) {
                return Err(DomError::NotAChild);
            }
        }
        if parent_type == NodeType::Document {
            self.check_document_child(parent, child, child_type)?;
        } else if child_type == NodeType::DocumentType {
            return Err(DomError::HierarchyRequest(
                "a doctype can only be a child of a document",
            ));
        }

        let reference = match reference {
            Some(r) if r == child => self.next_sibling(child),
            other => other,
        };
        self.detach(child);
        let siblings = &mut self.nodes[parent.index()].children;
        let pos = match reference {
            Some(r) => siblings
                .iter()
                .position(|&c| c == r)
                .ok_or(DomError::NotAChild)?,
            None => siblings.len(),
        };
        siblings.insert(pos, child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(child)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        let parent_type = self.record(parent)?.node_type();
        if !parent_type.allows_children() {
            return Err(DomError::LeafNode(parent_type));
        }
        if self.record(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild);
        }
        self.detach(child);
        Ok(child)
    }

    /// Returns the existing shadow root if `host` already has one.
    pub fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, DomError> {
        let el = self.element(host).ok_or(DomError::NotAnElement)?;
        if let Some(shadow) = el.shadow_root {
            return Ok(shadow);
        }
        let shadow = self.push(NodeData::ShadowRoot { host: Some(host) });
        self.element_mut(host)?.shadow_root = Some(shadow);
        Ok(shadow)
    }

    // --- content ---

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        el.attributes.insert(name.to_string(), value.to_string());
        if is_dialog_attribute(name) {
            el.sync_dialog_mode();
        }
        Ok(())
    }

    /// Removing an absent attribute is not an error.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        if el.attributes.remove(name).is_some() && is_dialog_attribute(name) {
            el.sync_dialog_mode();
        }
        Ok(())
    }

    /// Replace the payload of a text, comment or CDATA node.
    pub fn set_data(&mut self, id: NodeId, data: &str) -> Result<(), DomError> {
        match &mut self.record_mut(id)?.data {
            NodeData::Text(current) | NodeData::Comment(current) | NodeData::CData(current) => {
                data.clone_into(current);
                Ok(())
            }
            other => Err(DomError::HierarchyRequest(match other.node_type() {
                NodeType::Element => "elements have no character data",
                _ => "node has no character data",
            })),
        }
    }

    pub fn set_compat_mode(&mut self, doc: NodeId, mode: CompatMode) -> Result<(), DomError> {
        match &mut self.record_mut(doc)?.data {
            NodeData::Document(data) => {
                data.compat_mode = mode;
                Ok(())
            }
            _ => Err(DomError::HierarchyRequest("compat mode is set on documents")),
        }
    }

    /// Scroll offsets of an element or document.
    pub fn set_scroll_offsets(&mut self, id: NodeId, left: f64, top: f64) -> Result<(), DomError> {
        match &mut self.record_mut(id)?.data {
            NodeData::Element(el) => {
                el.scroll_left = left;
                el.scroll_top = top;
                Ok(())
            }
            NodeData::Document(doc) => {
                doc.scroll_left = left;
                doc.scroll_top = top;
                Ok(())
            }
            _ => Err(DomError::NotAnElement),
        }
    }

    /// Attach pending scroll side-data to an element or document.
    pub fn set_scroll_data(&mut self, id: NodeId, data: ScrollData) -> Result<(), DomError> {
        match &mut self.record_mut(id)?.data {
            NodeData::Element(el) => el.scroll_data = Some(data),
            NodeData::Document(doc) => doc.scroll_data = Some(data),
            _ => return Err(DomError::NotAnElement),
        }
        Ok(())
    }

    pub fn set_input_data(&mut self, id: NodeId, data: InputData) -> Result<(), DomError> {
        self.element_mut(id)?.input_data = Some(data);
        Ok(())
    }

    /// Queue a canvas mutation on a canvas element.
    pub fn push_canvas_mutation(
        &mut self,
        id: NodeId,
        mutation: CanvasMutation,
    ) -> Result<(), DomError> {
        match &mut self.element_mut(id)?.kind {
            ElementKind::Canvas { mutations } => {
                mutations.push(mutation);
                Ok(())
            }
            _ => Err(DomError::WrongElementKind("canvas")),
        }
    }

    /// Queue a style sheet operation on a style element.
    pub fn push_style_rule(&mut self, id: NodeId, rule: VirtualStyleRule) -> Result<(), DomError> {
        match &mut self.element_mut(id)?.kind {
            ElementKind::Style { rules, .. } => {
                rules.push(rule);
                Ok(())
            }
            _ => Err(DomError::WrongElementKind("style")),
        }
    }

    /// Merge `state` into a media element's playback state.
    pub fn apply_media(&mut self, id: NodeId, state: &MediaState) -> Result<(), DomError> {
        match &mut self.element_mut(id)?.kind {
            ElementKind::Media(current) => {
                current.merge(state);
                Ok(())
            }
            _ => Err(DomError::WrongElementKind("media")),
        }
    }

    pub fn media_state(&self, id: NodeId) -> Option<&MediaState> {
        match &self.element(id)?.kind {
            ElementKind::Media(state) => Some(state),
            _ => None,
        }
    }

    pub fn canvas_mutations(&self, id: NodeId) -> &[CanvasMutation] {
        match self.element(id).map(|el| &el.kind) {
            Some(ElementKind::Canvas { mutations }) => mutations,
            _ => &[],
        }
    }

    pub fn style_rules(&self, id: NodeId) -> &[VirtualStyleRule] {
        match self.element(id).map(|el| &el.kind) {
            Some(ElementKind::Style { rules, .. }) => rules,
            _ => &[],
        }
    }

    /// Open the dialog in `mode`, setting its `open` attribute.
    pub fn show_dialog(&mut self, id: NodeId, mode: DialogMode) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        if !matches!(el.kind, ElementKind::Dialog(_)) {
            return Err(DomError::WrongElementKind("dialog"));
        }
        el.attributes.insert("open".to_string(), String::new());
        el.kind = ElementKind::Dialog(Some(mode));
        Ok(())
    }

    pub fn close_dialog(&mut self, id: NodeId) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        if !matches!(el.kind, ElementKind::Dialog(_)) {
            return Err(DomError::WrongElementKind("dialog"));
        }
        el.attributes.remove("open");
        el.kind = ElementKind::Dialog(None);
        Ok(())
    }

    // --- internals ---

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeRecord::new(data));
        id
    }

    fn record(&self, id: NodeId) -> Result<&NodeRecord, DomError> {
        self.nodes.get(id.index()).ok_or(DomError::UnknownNode(id.0))
    }

    fn record_mut(&mut self, id: NodeId) -> Result<&mut NodeRecord, DomError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(DomError::UnknownNode(id.0))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        self.record_mut(id)?
            .data
            .as_element_mut()
            .ok_or(DomError::NotAnElement)
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.nodes[child.index()].parent.take() else {
            return;
        };
        self.nodes[parent.index()].children.retain(|&c| c != child);
    }

    // Walks parents, shadow hosts and frame elements.
    fn is_host_including_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = match self.get(id) {
                Some(NodeRecord {
                    parent: Some(parent),
                    ..
                }) => Some(*parent),
                Some(NodeRecord {
                    data: NodeData::ShadowRoot { host },
                    ..
                }) => *host,
                Some(NodeRecord {
                    data: NodeData::Document(doc),
                    ..
                }) => doc.frame,
                _ => None,
            };
        }
        false
    }

    fn check_document_child(
        &self,
        doc: NodeId,
        child: NodeId,
        child_type: NodeType,
    ) -> Result<(), DomError> {
        let has_other = |wanted: NodeType| {
            self.child_nodes(doc)
                .iter()
                .any(|&c| c != child && self.node_type(c) == Some(wanted))
        };
        match child_type {
            NodeType::Text | NodeType::CData => Err(DomError::HierarchyRequest(
                "text cannot be a child of a document",
            )),
            NodeType::DocumentType if has_other(NodeType::DocumentType) => Err(
                DomError::HierarchyRequest("document already has a doctype"),
            ),
            NodeType::Element if has_other(NodeType::Element) => Err(DomError::HierarchyRequest(
                "document already has a document element",
            )),
            _ => Ok(()),
        }
    }
}

fn normalized_tag(tag_name: &str, namespace: Namespace) -> String {
    let lower = valid_tag_name(tag_name);
    match namespace {
        Namespace::Html => lower,
        // SVG names are case-sensitive; keep the given spelling when valid.
        Namespace::Svg if lower.eq_ignore_ascii_case(tag_name.trim()) => {
            tag_name.trim().to_string()
        }
        Namespace::Svg => lower,
    }
}

fn is_dialog_attribute(name: &str) -> bool {
    name == "open" || name == "rr_open_mode"
}

impl HostTree for Dom {
    type Node = NodeId;

    fn node_type(&self, node: NodeId) -> Option<NodeType> {
        Dom::node_type(self, node)
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        Dom::tag_name(self, node)
    }

    fn namespace(&self, node: NodeId) -> Namespace {
        self.element(node)
            .map(|el| el.namespace)
            .unwrap_or_default()
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.element(node)
            .map(|el| {
                el.attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn character_data(&self, node: NodeId) -> Option<&str> {
        self.data(node).and_then(NodeData::character_data)
    }

    fn document_type(&self, node: NodeId) -> Option<DocumentTypeParts> {
        match self.data(node)? {
            NodeData::DocumentType {
                name,
                public_id,
                system_id,
            } => Some(DocumentTypeParts {
                name: name.clone(),
                public_id: public_id.clone(),
                system_id: system_id.clone(),
            }),
            _ => None,
        }
    }

    fn compat_mode(&self, node: NodeId) -> CompatMode {
        Dom::compat_mode(self, node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_node(node)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.child_nodes(node).to_vec()
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        Dom::next_sibling(self, node)
    }

    fn shadow_root(&self, node: NodeId) -> Option<NodeId> {
        Dom::shadow_root(self, node)
    }

    fn content_document(&self, node: NodeId) -> Option<NodeId> {
        Dom::content_document(self, node)
    }

    fn scroll_offsets(&self, node: NodeId) -> (f64, f64) {
        Dom::scroll_offsets(self, node)
    }

    fn dialog_mode(&self, node: NodeId) -> Option<DialogMode> {
        Dom::dialog_mode(self, node)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        Dom::contains(self, ancestor, node)
    }
}

impl HostTreeMut for Dom {
    fn create_element(&mut self, tag_name: &str, namespace: Namespace) -> Result<NodeId, DomError> {
        Ok(self.create_element_ns(tag_name, namespace))
    }

    fn create_text_node(&mut self, data: &str) -> Result<NodeId, DomError> {
        Ok(Dom::create_text_node(self, data))
    }

    fn create_comment(&mut self, data: &str) -> Result<NodeId, DomError> {
        Ok(Dom::create_comment(self, data))
    }

    fn create_cdata_section(&mut self, data: &str) -> Result<NodeId, DomError> {
        Ok(Dom::create_cdata_section(self, data))
    }

    fn create_document_type(
        &mut self,
        name: &str,
        public_id: &str,
        system_id: &str,
    ) -> Result<NodeId, DomError> {
        Ok(Dom::create_document_type(self, name, public_id, system_id))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        Dom::set_attribute(self, node, name, value)
    }

    // Qualified names are stored as-is.
    fn set_attribute_ns(
        &mut self,
        node: NodeId,
        _namespace: &str,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        Dom::set_attribute(self, node, name, value)
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError> {
        Dom::remove_attribute(self, node, name)
    }

    fn set_character_data(&mut self, node: NodeId, data: &str) -> Result<(), DomError> {
        self.set_data(node, data)
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        Dom::insert_before(self, parent, child, reference).map(|_| ())
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        Dom::remove_child(self, parent, child).map(|_| ())
    }

    fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, DomError> {
        Dom::attach_shadow(self, host)
    }

    fn set_scroll_offsets(&mut self, node: NodeId, left: f64, top: f64) -> Result<(), DomError> {
        Dom::set_scroll_offsets(self, node, left, top)
    }

    fn apply_media(&mut self, node: NodeId, state: &MediaState) -> Result<(), DomError> {
        Dom::apply_media(self, node, state)
    }

    fn show_dialog(&mut self, node: NodeId, mode: DialogMode) -> Result<(), DomError> {
        Dom::show_dialog(self, node, mode)
    }

    fn close_dialog(&mut self, node: NodeId) -> Result<(), DomError> {
        Dom::close_dialog(self, node)
    }

    fn style_sheet_mut(&mut self, node: NodeId) -> Option<&mut StyleSheet> {
        Dom::style_sheet_mut(self, node)
    }
}
