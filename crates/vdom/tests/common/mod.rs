#![allow(dead_code)]

use core_types::SerializedId;
use dom_test_support::{RecordingHost, RecordingReplay};
use vdom::dom_snapshot::{DomSnapshot, DomSnapshotOptions, compare_snapshots};
use vdom::{Dom, DomError, NodeId, ReplayHandler, diff_dom};

pub const DOC_ID: i32 = 0;

/// A live tree and a virtual tree whose documents share an identity.
pub struct Trees {
    pub host: RecordingHost,
    pub replay: RecordingReplay,
    pub vdom: Dom,
}

impl Trees {
    pub fn new() -> Self {
        let host = RecordingHost::new(Dom::new());
        let mut replay = RecordingReplay::new();
        replay
            .mirror_mut()
            .add(host.dom().document(), SerializedId(DOC_ID));
        let mut vdom = Dom::new();
        let vdoc = vdom.document();
        vdom.mirror_mut().add(vdoc, SerializedId(DOC_ID));
        Self { host, replay, vdom }
    }

    pub fn live_doc(&self) -> NodeId {
        self.host.dom().document()
    }

    pub fn virtual_doc(&self) -> NodeId {
        self.vdom.document()
    }

    /// Element bound to `id` in the live mirror, appended under `parent`.
    pub fn live_element(&mut self, parent: NodeId, tag: &str, id: i32) -> NodeId {
        let dom = self.host.dom_mut();
        let el = dom.create_element(tag);
        dom.append_child(parent, el)
            .unwrap_or_else(|err| panic!("append live <{tag}>: {err}"));
        self.replay.mirror_mut().add(el, SerializedId(id));
        el
    }

    pub fn live_text(&mut self, parent: NodeId, data: &str, id: i32) -> NodeId {
        let dom = self.host.dom_mut();
        let text = dom.create_text_node(data);
        dom.append_child(parent, text)
            .unwrap_or_else(|err| panic!("append live text: {err}"));
        self.replay.mirror_mut().add(text, SerializedId(id));
        text
    }

    /// Element bound to `id` in the virtual mirror, appended under `parent`.
    pub fn virtual_element(&mut self, parent: NodeId, tag: &str, id: i32) -> NodeId {
        let el = self.vdom.create_element(tag);
        self.vdom
            .append_child(parent, el)
            .unwrap_or_else(|err| panic!("append virtual <{tag}>: {err}"));
        self.vdom.mirror_mut().add(el, SerializedId(id));
        el
    }

    pub fn virtual_text(&mut self, parent: NodeId, data: &str, id: i32) -> NodeId {
        let text = self.vdom.create_text_node(data);
        self.vdom
            .append_child(parent, text)
            .unwrap_or_else(|err| panic!("append virtual text: {err}"));
        self.vdom.mirror_mut().add(text, SerializedId(id));
        text
    }

    /// The same element on both sides.
    pub fn element(&mut self, parents: (NodeId, NodeId), tag: &str, id: i32) -> (NodeId, NodeId) {
        (
            self.live_element(parents.0, tag, id),
            self.virtual_element(parents.1, tag, id),
        )
    }

    pub fn text(&mut self, parents: (NodeId, NodeId), data: &str, id: i32) -> (NodeId, NodeId) {
        (
            self.live_text(parents.0, data, id),
            self.virtual_text(parents.1, data, id),
        )
    }

    /// `<html><body>` on both sides; returns the two bodies.
    pub fn body(&mut self) -> (NodeId, NodeId) {
        let docs = (self.live_doc(), self.virtual_doc());
        let html = self.element(docs, "html", 1);
        self.element(html, "body", 2)
    }

    pub fn diff(&mut self) -> Result<NodeId, DomError> {
        let (live, virt) = (self.live_doc(), self.virtual_doc());
        diff_dom(live, virt, &mut self.host, &self.vdom, &mut self.replay)
    }

    pub fn live_id(&self, node: NodeId) -> i32 {
        self.replay.mirror().get_id(node).0
    }

    pub fn live_node(&self, id: i32) -> Option<NodeId> {
        self.replay.mirror().get_node(SerializedId(id))
    }

    /// Panics with both renderings unless the trees and their ids agree.
    pub fn assert_converged(&self) {
        let options = DomSnapshotOptions { ignore_ids: false };
        let live = DomSnapshot::new(
            self.host.dom(),
            self.live_doc(),
            self.replay.mirror(),
            options,
        );
        let virt = DomSnapshot::new(&self.vdom, self.virtual_doc(), self.vdom.mirror(), options);
        if let Err(mismatch) = compare_snapshots(virt, live) {
            panic!("{mismatch}");
        }
    }
}
