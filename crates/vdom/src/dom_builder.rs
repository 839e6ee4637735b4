//! Builds a virtual tree from a live tree.
//!
//! Walk order is pre-order: a node, then its frame content document, then its
//! shadow root, then its children. Host node kinds the model does not
//! represent are dropped together with their subtree. The builder never
//! fails: a node that cannot be attached is logged and skipped.
//!
//! Live nodes without an identity get a synthesized one from the virtual
//! document's counter, written back into the live mirror so that building
//! the same live node again resolves to the same identity.

use crate::config::BuildConfig;
use crate::dom::Dom;
use crate::host::HostTree;
use crate::mirror::{Mirror, NodeMeta};
use crate::types::{Namespace, NodeId, NodeType};

/// Build the whole live subtree under `root` into `vdom`. Returns the
/// virtual node for `root`.
pub fn build_from_dom<H: HostTree>(
    host: &H,
    root: H::Node,
    host_mirror: &mut Mirror<H::Node>,
    vdom: &mut Dom,
) -> Option<NodeId> {
    build_from_dom_with_config(host, root, host_mirror, vdom, None, &BuildConfig::default())
}

/// Like [`build_from_dom`], optionally attaching the result under `parent`.
pub fn build_from_dom_with_config<H: HostTree>(
    host: &H,
    root: H::Node,
    host_mirror: &mut Mirror<H::Node>,
    vdom: &mut Dom,
    parent: Option<NodeId>,
    config: &BuildConfig,
) -> Option<NodeId> {
    let mut builder = Builder {
        host,
        host_mirror,
        vdom,
        config,
    };
    builder.walk(root, parent, 0)
}

/// Build a single virtual node for `node` (no recursion) and attach it under
/// `parent` when one is given.
pub fn build_from_node<H: HostTree>(
    host: &H,
    node: H::Node,
    vdom: &mut Dom,
    host_mirror: &mut Mirror<H::Node>,
    parent: Option<NodeId>,
) -> Option<NodeId> {
    let Some(node_type) = host.node_type(node) else {
        log::trace!(target: "vdom.builder", "skipping unsupported host node {node:?}");
        return None;
    };

    let meta = match host_mirror.get_meta(node) {
        Some(meta) => *meta,
        None => {
            let Some(id) = vdom.unserialized_id() else {
                log::warn!(target: "vdom.builder", "no identity left for {node:?}; skipped");
                return None;
            };
            let meta = NodeMeta {
                id,
                is_svg: host.namespace(node) == Namespace::Svg,
            };
            host_mirror.add(node, meta);
            meta
        }
    };

    // Only a document under a frame element maps onto its content document.
    let parent_frame_doc = parent
        .filter(|_| node_type == NodeType::Document)
        .and_then(|p| vdom.content_document(p));
    let vnode = match node_type {
        NodeType::Document => {
            let doc = parent_frame_doc.unwrap_or_else(|| vdom.document());
            vdom.set_compat_mode(doc, host.compat_mode(node)).ok()?;
            doc
        }
        NodeType::DocumentType => {
            let parts = host.document_type(node)?;
            vdom.create_document_type(&parts.name, &parts.public_id, &parts.system_id)
        }
        NodeType::Element => build_element(host, node, vdom)?,
        NodeType::Text => vdom.create_text_node(host.character_data(node)?),
        NodeType::Comment => vdom.create_comment(host.character_data(node)?),
        NodeType::CData => vdom.create_cdata_section(host.character_data(node)?),
        NodeType::ShadowRoot => match parent {
            Some(p) => match vdom.attach_shadow(p) {
                Ok(shadow) => shadow,
                Err(err) => {
                    log::warn!(target: "vdom.builder", "cannot attach shadow root to {p}: {err}");
                    return None;
                }
            },
            None => vdom.create_shadow_root(),
        },
    };

    vdom.mirror_mut().add(vnode, meta);

    let attaches_as_child = !matches!(node_type, NodeType::Document | NodeType::ShadowRoot);
    if let Some(p) = parent.filter(|_| attaches_as_child) {
        if let Err(err) = vdom.append_child(p, vnode) {
            log::warn!(
                target: "vdom.builder",
                "dropping {node_type:?} (id {}) under {p}: {err}",
                meta.id.0
            );
            vdom.remove_from_mirror(vnode);
            return None;
        }
    }
    Some(vnode)
}

fn build_element<H: HostTree>(host: &H, node: H::Node, vdom: &mut Dom) -> Option<NodeId> {
    let tag_name = host.tag_name(node)?;
    let el = vdom.create_element_ns(tag_name, host.namespace(node));
    for (name, value) in host.attributes(node) {
        vdom.set_attribute(el, &name, &value).ok()?;
    }
    let (left, top) = host.scroll_offsets(node);
    if left != 0.0 || top != 0.0 {
        vdom.set_scroll_offsets(el, left, top).ok()?;
    }
    if let Some(mode) = host.dialog_mode(node) {
        vdom.show_dialog(el, mode).ok()?;
    }
    Some(el)
}

struct Builder<'a, H: HostTree> {
    host: &'a H,
    host_mirror: &'a mut Mirror<H::Node>,
    vdom: &'a mut Dom,
    config: &'a BuildConfig,
}

impl<H: HostTree> Builder<'_, H> {
    fn walk(&mut self, node: H::Node, parent: Option<NodeId>, depth: usize) -> Option<NodeId> {
        if depth > self.config.max_depth {
            log::warn!(
                target: "vdom.builder",
                "subtree at {node:?} exceeds max depth {}; skipped",
                self.config.max_depth
            );
            return None;
        }
        let vnode = build_from_node(self.host, node, self.vdom, self.host_mirror, parent)?;

        if let Some(doc) = self.host.content_document(node) {
            self.walk(doc, Some(vnode), depth + 1);
        }
        if let Some(shadow) = self.host.shadow_root(node) {
            self.walk(shadow, Some(vnode), depth + 1);
        }
        for child in self.host.children(node) {
            self.walk(child, Some(vnode), depth + 1);
        }
        Some(vnode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CompatMode;
    use core_types::{DialogMode, SerializedId};

    fn live_page() -> (Dom, NodeId, NodeId, NodeId) {
        let mut live = Dom::new();
        let doc = live.document();
        let html = live.create_element("html");
        let body = live.create_element("body");
        let p = live.create_element("p");
        let text = live.create_text_node("hi");
        live.append_child(doc, html).expect("html");
        live.append_child(html, body).expect("body");
        live.append_child(body, p).expect("p");
        live.append_child(p, text).expect("text");
        live.set_attribute(p, "class", "lead").expect("class");
        (live, doc, body, p)
    }

    #[test]
    fn synthesized_ids_are_written_back() {
        let (live, doc, _, p) = live_page();
        let mut host_mirror = Mirror::new();
        let mut vdom = Dom::new();
        let root = build_from_dom(&live, doc, &mut host_mirror, &mut vdom).expect("root");
        assert_eq!(root, vdom.document());

        assert_eq!(host_mirror.get_id(doc), SerializedId(-2));
        assert_eq!(host_mirror.len(), 5);
        assert_eq!(vdom.mirror().len(), 5);
        let vp = vdom.mirror().get_node(host_mirror.get_id(p)).expect("virtual p");
        assert_eq!(vdom.get_attribute(vp, "class"), Some("lead"));
        assert_eq!(vdom.text_content(vp).as_deref(), Some("hi"));

        // A second build reuses the patched identities.
        let mut again = Dom::new();
        build_from_dom(&live, doc, &mut host_mirror, &mut again).expect("root");
        assert_eq!(again.mirror().get_ids(), vdom.mirror().get_ids());
    }

    #[test]
    fn recorded_ids_are_used_as_is() {
        let (live, doc, body, p) = live_page();
        let mut host_mirror = Mirror::new();
        host_mirror.add(body, SerializedId(7));
        host_mirror.add(p, NodeMeta::new(SerializedId(8)));
        let mut vdom = Dom::new();
        build_from_dom(&live, doc, &mut host_mirror, &mut vdom).expect("root");

        let vbody = vdom.mirror().get_node(SerializedId(7)).expect("body");
        let vp = vdom.mirror().get_node(SerializedId(8)).expect("p");
        assert_eq!(vdom.parent_node(vp), Some(vbody));
        assert_eq!(vdom.tag_name(vbody), Some("body"));
    }

    #[test]
    fn frames_shadows_and_dialogs() {
        let mut live = Dom::new();
        let doc = live.document();
        let html = live.create_element("html");
        let frame = live.create_element("iframe");
        let frame_doc = live.content_document(frame).expect("frame doc");
        let inner = live.create_element("html");
        let host_el = live.create_element("div");
        let shadow = live.attach_shadow(host_el).expect("shadow");
        let slot = live.create_element("slot");
        let dialog = live.create_element("dialog");
        live.append_child(doc, html).expect("html");
        live.append_child(html, frame).expect("frame");
        live.append_child(frame_doc, inner).expect("inner");
        live.append_child(html, host_el).expect("host");
        live.append_child(shadow, slot).expect("slot");
        live.append_child(html, dialog).expect("dialog");
        live.show_dialog(dialog, DialogMode::Modal).expect("show");

        let mut host_mirror = Mirror::new();
        let mut vdom = Dom::new();
        build_from_dom(&live, doc, &mut host_mirror, &mut vdom).expect("root");

        let vframe = vdom.mirror().get_node(host_mirror.get_id(frame)).expect("frame");
        let vframe_doc = vdom.content_document(vframe).expect("virtual frame doc");
        assert_eq!(
            vdom.mirror().get_node(host_mirror.get_id(frame_doc)),
            Some(vframe_doc)
        );
        let vinner = vdom.first_child(vframe_doc).expect("inner html");
        assert_eq!(vdom.tag_name(vinner), Some("html"));
        assert_eq!(vdom.child_nodes(vframe), &[] as &[NodeId]);

        let vhost = vdom.mirror().get_node(host_mirror.get_id(host_el)).expect("host");
        let vshadow = vdom.shadow_root(vhost).expect("virtual shadow");
        assert_eq!(vdom.node_type(vshadow), Some(NodeType::ShadowRoot));
        assert_eq!(vdom.child_nodes(vshadow).len(), 1);
        assert_eq!(vdom.child_nodes(vhost), &[] as &[NodeId]);

        let vdialog = vdom.mirror().get_node(host_mirror.get_id(dialog)).expect("dialog");
        assert_eq!(vdom.dialog_mode(vdialog), Some(DialogMode::Modal));
    }

    #[test]
    fn frame_documents_keep_their_compat_mode() {
        let mut live = Dom::new();
        let doc = live.document();
        let html = live.create_element("html");
        let frame = live.create_element("iframe");
        let frame_doc = live.content_document(frame).expect("frame doc");
        live.append_child(doc, html).expect("html");
        live.append_child(html, frame).expect("frame");
        live.set_compat_mode(frame_doc, CompatMode::Quirks).expect("quirks");

        let mut host_mirror = Mirror::new();
        let mut vdom = Dom::new();
        build_from_dom(&live, doc, &mut host_mirror, &mut vdom).expect("root");

        let vframe = vdom.mirror().get_node(host_mirror.get_id(frame)).expect("frame");
        let vframe_doc = vdom.content_document(vframe).expect("virtual frame doc");
        assert_eq!(vdom.compat_mode(vframe_doc), CompatMode::Quirks);
        assert_eq!(vdom.compat_mode(vdom.document()), CompatMode::Standards);
    }

    #[test]
    fn frame_fallback_children_stay_under_the_frame() {
        let mut live = Dom::new();
        let doc = live.document();
        let html = live.create_element("html");
        let frame = live.create_element("iframe");
        let fallback = live.create_text_node("fallback");
        live.append_child(doc, html).expect("html");
        live.append_child(html, frame).expect("frame");
        live.append_child(frame, fallback).expect("fallback");

        let mut host_mirror = Mirror::new();
        let mut vdom = Dom::new();
        build_from_dom(&live, doc, &mut host_mirror, &mut vdom).expect("root");

        let vframe = vdom.mirror().get_node(host_mirror.get_id(frame)).expect("frame");
        let vtext = vdom.mirror().get_node(host_mirror.get_id(fallback)).expect("text");
        assert_eq!(vdom.child_nodes(vframe), &[vtext]);
        assert_eq!(vdom.parent_node(vtext), Some(vframe));
    }

    #[test]
    fn depth_limit_truncates() {
        let (live, doc, _, _) = live_page();
        let mut host_mirror = Mirror::new();
        let mut vdom = Dom::new();
        let config = BuildConfig { max_depth: 2 };
        build_from_dom_with_config(&live, doc, &mut host_mirror, &mut vdom, None, &config)
            .expect("root");
        // document(0) > html(1) > body(2); p and its text are skipped.
        assert_eq!(vdom.mirror().len(), 3);
    }

    #[test]
    fn unattachable_nodes_are_skipped() {
        let mut live = Dom::new();
        let div = live.create_element("div");
        let mut host_mirror = Mirror::new();
        let mut vdom = Dom::new();
        let vdoc = vdom.document();
        let first = vdom.create_element("html");
        vdom.append_child(vdoc, first).expect("existing root element");

        // A second element under the virtual document cannot attach.
        let built = build_from_dom_with_config(
            &live,
            div,
            &mut host_mirror,
            &mut vdom,
            Some(vdoc),
            &BuildConfig::default(),
        );
        assert_eq!(built, None);
        assert!(vdom.mirror().is_empty());
    }
}
