//! Host and replay doubles that log every call the reconciler makes.

use core_types::{
    CanvasEvent, CanvasMutationData, DialogMode, InputData, MediaState, ScrollData, SerializedId,
    VirtualStyleRule,
};
use cssom::StyleSheet;
use vdom::style_rules;
use vdom::{
    CompatMode, DocumentTypeParts, Dom, DomError, HostTree, HostTreeMut, Mirror, Namespace, NodeId,
    NodeType, ReplayHandler,
};

#[derive(Clone, Debug, PartialEq)]
pub enum HostOp {
    Create(NodeType),
    /// `child` had no parent before the call.
    Insert {
        parent: NodeId,
        child: NodeId,
        before: Option<NodeId>,
    },
    /// `child` was attached somewhere before the call.
    Move {
        parent: NodeId,
        child: NodeId,
        before: Option<NodeId>,
    },
    Remove {
        parent: NodeId,
        child: NodeId,
    },
    SetAttribute {
        node: NodeId,
        name: String,
        value: String,
    },
    SetAttributeNs {
        node: NodeId,
        namespace: String,
        name: String,
        value: String,
    },
    RemoveAttribute {
        node: NodeId,
        name: String,
    },
    SetCharacterData {
        node: NodeId,
        data: String,
    },
    AttachShadow(NodeId),
    SetScrollOffsets {
        node: NodeId,
        left: f64,
        top: f64,
    },
    ApplyMedia(NodeId),
    ShowDialog(NodeId, DialogMode),
    CloseDialog(NodeId),
}

impl HostOp {
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            HostOp::Insert { .. } | HostOp::Move { .. } | HostOp::Remove { .. }
        )
    }

    pub fn is_attribute_write(&self) -> bool {
        matches!(
            self,
            HostOp::SetAttribute { .. } | HostOp::SetAttributeNs { .. } | HostOp::RemoveAttribute { .. }
        )
    }
}

/// A [`Dom`] standing in for a live tree, with an operation log.
#[derive(Debug, Default)]
pub struct RecordingHost {
    dom: Dom,
    ops: Vec<HostOp>,
}

impl RecordingHost {
    pub fn new(dom: Dom) -> Self {
        Self {
            dom,
            ops: Vec::new(),
        }
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Direct access for test setup; nothing done here is logged.
    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn inserts(&self) -> usize {
        self.count(|op| matches!(op, HostOp::Insert { .. }))
    }

    pub fn moves(&self) -> usize {
        self.count(|op| matches!(op, HostOp::Move { .. }))
    }

    pub fn removes(&self) -> usize {
        self.count(|op| matches!(op, HostOp::Remove { .. }))
    }

    pub fn structural_ops(&self) -> usize {
        self.count(HostOp::is_structural)
    }

    pub fn attribute_writes(&self) -> usize {
        self.count(HostOp::is_attribute_write)
    }

    fn count(&self, pred: impl Fn(&HostOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl HostTree for RecordingHost {
    type Node = NodeId;

    fn node_type(&self, node: NodeId) -> Option<NodeType> {
        HostTree::node_type(&self.dom, node)
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        HostTree::tag_name(&self.dom, node)
    }

    fn namespace(&self, node: NodeId) -> Namespace {
        HostTree::namespace(&self.dom, node)
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        HostTree::attributes(&self.dom, node)
    }

    fn character_data(&self, node: NodeId) -> Option<&str> {
        HostTree::character_data(&self.dom, node)
    }

    fn document_type(&self, node: NodeId) -> Option<DocumentTypeParts> {
        HostTree::document_type(&self.dom, node)
    }

    fn compat_mode(&self, node: NodeId) -> CompatMode {
        HostTree::compat_mode(&self.dom, node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        HostTree::parent(&self.dom, node)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        HostTree::children(&self.dom, node)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        HostTree::next_sibling(&self.dom, node)
    }

    fn shadow_root(&self, node: NodeId) -> Option<NodeId> {
        HostTree::shadow_root(&self.dom, node)
    }

    fn content_document(&self, node: NodeId) -> Option<NodeId> {
        HostTree::content_document(&self.dom, node)
    }

    fn scroll_offsets(&self, node: NodeId) -> (f64, f64) {
        HostTree::scroll_offsets(&self.dom, node)
    }

    fn dialog_mode(&self, node: NodeId) -> Option<DialogMode> {
        HostTree::dialog_mode(&self.dom, node)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        HostTree::contains(&self.dom, ancestor, node)
    }
}

impl HostTreeMut for RecordingHost {
    fn create_element(&mut self, tag_name: &str, namespace: Namespace) -> Result<NodeId, DomError> {
        self.ops.push(HostOp::Create(NodeType::Element));
        HostTreeMut::create_element(&mut self.dom, tag_name, namespace)
    }

    fn create_text_node(&mut self, data: &str) -> Result<NodeId, DomError> {
        self.ops.push(HostOp::Create(NodeType::Text));
        HostTreeMut::create_text_node(&mut self.dom, data)
    }

    fn create_comment(&mut self, data: &str) -> Result<NodeId, DomError> {
        self.ops.push(HostOp::Create(NodeType::Comment));
        HostTreeMut::create_comment(&mut self.dom, data)
    }

    fn create_cdata_section(&mut self, data: &str) -> Result<NodeId, DomError> {
        self.ops.push(HostOp::Create(NodeType::CData));
        HostTreeMut::create_cdata_section(&mut self.dom, data)
    }

    fn create_document_type(
        &mut self,
        name: &str,
        public_id: &str,
        system_id: &str,
    ) -> Result<NodeId, DomError> {
        self.ops.push(HostOp::Create(NodeType::DocumentType));
        HostTreeMut::create_document_type(&mut self.dom, name, public_id, system_id)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.ops.push(HostOp::SetAttribute {
            node,
            name: name.to_string(),
            value: value.to_string(),
        });
        HostTreeMut::set_attribute(&mut self.dom, node, name, value)
    }

    fn set_attribute_ns(
        &mut self,
        node: NodeId,
        namespace: &str,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.ops.push(HostOp::SetAttributeNs {
            node,
            namespace: namespace.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        });
        HostTreeMut::set_attribute_ns(&mut self.dom, node, namespace, name, value)
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<(), DomError> {
        self.ops.push(HostOp::RemoveAttribute {
            node,
            name: name.to_string(),
        });
        HostTreeMut::remove_attribute(&mut self.dom, node, name)
    }

    fn set_character_data(&mut self, node: NodeId, data: &str) -> Result<(), DomError> {
        self.ops.push(HostOp::SetCharacterData {
            node,
            data: data.to_string(),
        });
        HostTreeMut::set_character_data(&mut self.dom, node, data)
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: Option<NodeId>,
    ) -> Result<(), DomError> {
        let op = if self.dom.parent_node(child).is_some() {
            HostOp::Move {
                parent,
                child,
                before,
            }
        } else {
            HostOp::Insert {
                parent,
                child,
                before,
            }
        };
        HostTreeMut::insert_before(&mut self.dom, parent, child, before)?;
        self.ops.push(op);
        Ok(())
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        HostTreeMut::remove_child(&mut self.dom, parent, child)?;
        self.ops.push(HostOp::Remove { parent, child });
        Ok(())
    }

    fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, DomError> {
        self.ops.push(HostOp::AttachShadow(host));
        HostTreeMut::attach_shadow(&mut self.dom, host)
    }

    fn set_scroll_offsets(&mut self, node: NodeId, left: f64, top: f64) -> Result<(), DomError> {
        self.ops.push(HostOp::SetScrollOffsets { node, left, top });
        HostTreeMut::set_scroll_offsets(&mut self.dom, node, left, top)
    }

    fn apply_media(&mut self, node: NodeId, state: &MediaState) -> Result<(), DomError> {
        self.ops.push(HostOp::ApplyMedia(node));
        HostTreeMut::apply_media(&mut self.dom, node, state)
    }

    fn show_dialog(&mut self, node: NodeId, mode: DialogMode) -> Result<(), DomError> {
        self.ops.push(HostOp::ShowDialog(node, mode));
        HostTreeMut::show_dialog(&mut self.dom, node, mode)
    }

    fn close_dialog(&mut self, node: NodeId) -> Result<(), DomError> {
        self.ops.push(HostOp::CloseDialog(node));
        HostTreeMut::close_dialog(&mut self.dom, node)
    }

    fn style_sheet_mut(&mut self, node: NodeId) -> Option<&mut StyleSheet> {
        HostTreeMut::style_sheet_mut(&mut self.dom, node)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReplayEvent {
    Canvas {
        target: NodeId,
        mutation: CanvasMutationData,
    },
    Input(InputData),
    Scroll {
        data: ScrollData,
        is_sync: bool,
    },
    StyleRule(VirtualStyleRule),
    AfterAppend {
        node: NodeId,
        id: SerializedId,
    },
    CanvasSnapshot {
        target: NodeId,
        data_url: String,
    },
}

/// Replay handler for a [`RecordingHost`]. Input and scroll side-data are
/// written onto the target like `DomReplay` does; every call is logged.
#[derive(Debug, Default)]
pub struct RecordingReplay {
    mirror: Mirror<NodeId>,
    events: Vec<ReplayEvent>,
}

impl RecordingReplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ReplayEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<ReplayEvent> {
        std::mem::take(&mut self.events)
    }
}

impl ReplayHandler<RecordingHost> for RecordingReplay {
    fn mirror(&self) -> &Mirror<NodeId> {
        &self.mirror
    }

    fn mirror_mut(&mut self) -> &mut Mirror<NodeId> {
        &mut self.mirror
    }

    fn apply_canvas(
        &mut self,
        _host: &mut RecordingHost,
        _event: &CanvasEvent,
        mutation: &CanvasMutationData,
        target: NodeId,
    ) {
        self.events.push(ReplayEvent::Canvas {
            target,
            mutation: mutation.clone(),
        });
    }

    fn apply_input(&mut self, host: &mut RecordingHost, data: &InputData) {
        self.events.push(ReplayEvent::Input(data.clone()));
        if let Some(target) = self.mirror.get_node(data.id) {
            host.dom.set_input_data(target, data.clone()).ok();
        }
    }

    fn apply_scroll(&mut self, host: &mut RecordingHost, data: &ScrollData, is_sync: bool) {
        self.events.push(ReplayEvent::Scroll {
            data: data.clone(),
            is_sync,
        });
        if let Some(target) = self.mirror.get_node(data.id) {
            host.dom.set_scroll_offsets(target, data.x, data.y).ok();
        }
    }

    fn apply_style_sheet_mutation(&mut self, rule: &VirtualStyleRule, sheet: &mut StyleSheet) {
        self.events.push(ReplayEvent::StyleRule(rule.clone()));
        style_rules::apply_rule(sheet, rule);
    }

    fn after_append(&mut self, _host: &mut RecordingHost, node: NodeId, id: SerializedId) {
        self.events.push(ReplayEvent::AfterAppend { node, id });
    }

    fn apply_canvas_snapshot(&mut self, _host: &mut RecordingHost, data_url: &str, target: NodeId) {
        self.events.push(ReplayEvent::CanvasSnapshot {
            target,
            data_url: data_url.to_string(),
        });
    }
}
