//! Reconciles a live tree against a virtual tree, in place.
//!
//! Contract:
//! - A live node and a virtual node match when both identity tables bind
//!   them to the same known id and they have the same node type (and, for
//!   elements, the same tag name ignoring ASCII case).
//! - Per-node work (attributes, character data, side-data replay) runs before
//!   the node's children are reconciled.
//! - Children are reconciled structurally first (four-cursor keyed diff),
//!   then every resulting (live, virtual) pair is diffed recursively in final
//!   virtual order. Shadow subtrees and frame content documents follow.
//! - Reconciling identical trees performs no structural operation and no
//!   attribute write.
//! - Live nodes without a virtual counterpart are removed from the tree and,
//!   together with their subtree, from the live identity table.
//! - Structural and host errors propagate; style rule failures do not.
//!
//! Complexity: O(n) matching per child list plus an id index built at most
//! once per list, the first time neither end of the window matches.

use crate::config::DiffConfig;
use crate::dom::Dom;
use crate::error::DomError;
use crate::host::{HostTreeMut, attribute_namespace};
use crate::mirror::Mirror;
use crate::node::{ElementData, ElementKind, NodeData, svg_tag_name};
use crate::replay::ReplayHandler;
use crate::types::{Namespace, NodeId, NodeType};
use core_types::SerializedId;
use std::collections::HashMap;
use std::hash::Hash;

/// Attribute holding a recorded canvas image; replayed, never set.
pub const CANVAS_SNAPSHOT_ATTRIBUTE: &str = "rr_dataURL";

/// Reconcile `live` against `virt`. Returns the live node that corresponds to
/// `virt` afterwards (a replacement when `live` did not match).
pub fn diff_dom<H, R>(
    live: H::Node,
    virt: NodeId,
    host: &mut H,
    vdom: &Dom,
    replay: &mut R,
) -> Result<H::Node, DomError>
where
    H: HostTreeMut,
    R: ReplayHandler<H>,
{
    diff_dom_with_config(live, virt, host, vdom, replay, &DiffConfig::default())
}

pub fn diff_dom_with_config<H, R>(
    live: H::Node,
    virt: NodeId,
    host: &mut H,
    vdom: &Dom,
    replay: &mut R,
    config: &DiffConfig,
) -> Result<H::Node, DomError>
where
    H: HostTreeMut,
    R: ReplayHandler<H>,
{
    let mut reconciler = Reconciler {
        host,
        vdom,
        replay,
        config,
    };
    let (root, created) = reconciler.match_root(live, virt)?;
    reconciler.diff_node(root, virt, 0)?;
    if created {
        let id = vdom.mirror().get_id(virt);
        reconciler.replay.after_append(reconciler.host, root, id);
    }
    Ok(root)
}

struct Reconciler<'a, H, R> {
    host: &'a mut H,
    vdom: &'a Dom,
    replay: &'a mut R,
    config: &'a DiffConfig,
}

impl<'a, H, R> Reconciler<'a, H, R>
where
    H: HostTreeMut,
    R: ReplayHandler<H>,
{
    fn match_root(&mut self, live: H::Node, virt: NodeId) -> Result<(H::Node, bool), DomError> {
        if self.same_node(live, virt) {
            return Ok((live, false));
        }
        let Some(parent) = self.host.parent(live) else {
            if !self.kinds_match(live, virt) {
                return Err(DomError::HierarchyRequest(
                    "unmatched root without a parent cannot be replaced",
                ));
            }
            if !self.replay.mirror().has_node(live) {
                if let Some(meta) = self.vdom.mirror().get_meta(virt) {
                    self.replay.mirror_mut().add(live, *meta);
                }
            }
            return Ok((live, false));
        };

        let (node, created) = self.create_or_get(virt, parent)?;
        log::trace!(target: "vdom.diff", "replacing root {live:?} with {node:?}");
        let mut before = self.host.next_sibling(live);
        if before == Some(node) {
            before = self.host.next_sibling(node);
        }
        self.remove_live(parent, live)?;
        self.insert_live(parent, node, before)?;
        if let Some(meta) = self.vdom.mirror().get_meta(virt) {
            self.replay.mirror_mut().add(node, *meta);
        }
        Ok((node, created))
    }

    fn diff_node(&mut self, live: H::Node, virt: NodeId, depth: usize) -> Result<(), DomError> {
        if depth > self.config.max_depth {
            return Err(DomError::DepthLimit(self.config.max_depth));
        }
        let vdom: &'a Dom = self.vdom;
        let data = vdom.data(virt).ok_or(DomError::UnknownNode(virt.0))?;
        match data {
            NodeData::Document(doc) => {
                if let Some(scroll) = &doc.scroll_data {
                    self.replay.apply_scroll(self.host, scroll, true);
                }
            }
            NodeData::Element(el) => self.diff_element(live, virt, el)?,
            NodeData::Text(text) | NodeData::Comment(text) | NodeData::CData(text) => {
                if self.host.character_data(live) != Some(text.as_str()) {
                    self.host.set_character_data(live, text)?;
                }
            }
            NodeData::DocumentType { .. } | NodeData::ShadowRoot { .. } => {}
        }

        self.diff_children(live, virt, depth)?;

        if let NodeData::Element(el) = data {
            if let Some(shadow) = el.shadow_root {
                self.diff_shadow(live, shadow, depth)?;
            }
            if let Some(doc) = el.content_document() {
                self.diff_frame(live, doc, depth)?;
            }
        }
        Ok(())
    }

    fn diff_element(
        &mut self,
        live: H::Node,
        virt: NodeId,
        el: &'a ElementData,
    ) -> Result<(), DomError> {
        let is_svg = el.is_svg() || self.vdom.mirror().get_meta(virt).is_some_and(|m| m.is_svg);
        self.diff_attributes(live, el, is_svg)?;

        let (left, top) = (el.scroll_left, el.scroll_top);
        if (left != 0.0 || top != 0.0) && self.host.scroll_offsets(live) != (left, top) {
            self.host.set_scroll_offsets(live, left, top)?;
        }
        if let Some(input) = &el.input_data {
            self.replay.apply_input(self.host, input);
        }
        if let Some(scroll) = &el.scroll_data {
            self.replay.apply_scroll(self.host, scroll, true);
        }

        match &el.kind {
            ElementKind::Style { rules, .. } if !rules.is_empty() => {
                match self.host.style_sheet_mut(live) {
                    Some(sheet) => {
                        for rule in rules {
                            self.replay.apply_style_sheet_mutation(rule, sheet);
                        }
                    }
                    None => {
                        log::debug!(target: "vdom.diff", "style element {live:?} has no live sheet");
                    }
                }
            }
            ElementKind::Canvas { mutations } => {
                for queued in mutations {
                    self.replay
                        .apply_canvas(self.host, &queued.event, &queued.mutation, live);
                }
            }
            ElementKind::Media(state) if !state.is_empty() => {
                self.host.apply_media(live, state)?;
            }
            ElementKind::Dialog(desired) => {
                let current = self.host.dialog_mode(live);
                if *desired != current {
                    if current.is_some() {
                        self.host.close_dialog(live)?;
                    }
                    if let Some(mode) = desired {
                        self.host.show_dialog(live, *mode)?;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn diff_attributes(
        &mut self,
        live: H::Node,
        el: &ElementData,
        is_svg: bool,
    ) -> Result<(), DomError> {
        let is_frame = matches!(el.kind, ElementKind::Frame { .. });
        let is_canvas = matches!(el.kind, ElementKind::Canvas { .. });
        let current = self.host.attributes(live);
        let current_map: HashMap<&str, &str> = current
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();

        for (name, value) in &el.attributes {
            // Frame content is reconciled through the content document.
            if is_frame && name == "srcdoc" {
                continue;
            }
            if is_canvas && name == CANVAS_SNAPSHOT_ATTRIBUTE {
                self.replay.apply_canvas_snapshot(self.host, value, live);
                continue;
            }
            if current_map.get(name.as_str()) == Some(&value.as_str()) {
                continue;
            }
            match attribute_namespace(name).filter(|_| is_svg) {
                Some(namespace) => self.host.set_attribute_ns(live, namespace, name, value)?,
                None => self.host.set_attribute(live, name, value)?,
            }
        }
        for (name, _) in &current {
            if !el.attributes.contains_key(name) {
                self.host.remove_attribute(live, name)?;
            }
        }
        Ok(())
    }

    fn diff_children(
        &mut self,
        live_parent: H::Node,
        virt_parent: NodeId,
        depth: usize,
    ) -> Result<(), DomError> {
        let vdom: &'a Dom = self.vdom;
        let new_children = vdom.child_nodes(virt_parent);
        let mut old: Vec<Option<H::Node>> = self
            .host
            .children(live_parent)
            .into_iter()
            .map(Some)
            .collect();
        if old.is_empty() && new_children.is_empty() {
            return Ok(());
        }

        // Live counterpart of each virtual child, and whether it was created.
        let mut pairs: Vec<Option<(H::Node, bool)>> = vec![None; new_children.len()];
        let mut old_index: Option<HashMap<SerializedId, Vec<usize>>> = None;
        let mut old_start: isize = 0;
        let mut old_end = old.len() as isize - 1;
        let mut new_start: isize = 0;
        let mut new_end = new_children.len() as isize - 1;

        while old_start <= old_end && new_start <= new_end {
            let (os, oe) = (old_start as usize, old_end as usize);
            let (ns, ne) = (new_start as usize, new_end as usize);
            let Some(old_start_node) = old[os] else {
                old_start += 1;
                continue;
            };
            let Some(old_end_node) = old[oe] else {
                old_end -= 1;
                continue;
            };
            let new_start_node = new_children[ns];
            let new_end_node = new_children[ne];

            if self.same_node(old_start_node, new_start_node) {
                pairs[ns] = Some((old_start_node, false));
                old_start += 1;
                new_start += 1;
            } else if self.same_node(old_end_node, new_end_node) {
                pairs[ne] = Some((old_end_node, false));
                old_end -= 1;
                new_end -= 1;
            } else if self.same_node(old_start_node, new_end_node) {
                let before = self.host.next_sibling(old_end_node);
                self.move_live(live_parent, old_start_node, before)?;
                pairs[ne] = Some((old_start_node, false));
                old_start += 1;
                new_end -= 1;
            } else if self.same_node(old_end_node, new_start_node) {
                self.move_live(live_parent, old_end_node, Some(old_start_node))?;
                pairs[ns] = Some((old_end_node, false));
                old_end -= 1;
                new_start += 1;
            } else {
                let index = old_index.get_or_insert_with(|| index_by_id(&old, self.replay.mirror()));
                match self.lookup(index, &old, new_start_node, os, oe) {
                    Some((i, node)) => {
                        old[i] = None;
                        self.move_live(live_parent, node, Some(old_start_node))?;
                        pairs[ns] = Some((node, false));
                    }
                    None => {
                        let (node, created) = self.create_or_get(new_start_node, live_parent)?;
                        let removed = self.insert_live(live_parent, node, Some(old_start_node))?;
                        consume(&mut old, removed);
                        pairs[ns] = Some((node, created));
                    }
                }
                new_start += 1;
            }
        }

        if old_start > old_end {
            // Every virtual child after `new_end` is already paired.
            let before = pairs
                .get((new_end + 1) as usize)
                .copied()
                .flatten()
                .map(|(node, _)| node);
            for i in new_start..=new_end {
                let i = i as usize;
                let (node, created) = self.create_or_get(new_children[i], live_parent)?;
                let removed = self.insert_live(live_parent, node, before)?;
                consume(&mut old, removed);
                pairs[i] = Some((node, created));
            }
        } else if new_start > new_end {
            for i in old_start..=old_end {
                if let Some(node) = old[i as usize].take() {
                    self.remove_live(live_parent, node)?;
                }
            }
        }

        for (&virt, pair) in new_children.iter().zip(pairs) {
            let Some((live, created)) = pair else {
                continue;
            };
            self.diff_node(live, virt, depth + 1)?;
            if created {
                let id = vdom.mirror().get_id(virt);
                self.replay.after_append(self.host, live, id);
            }
        }
        Ok(())
    }

    fn diff_shadow(
        &mut self,
        live_host: H::Node,
        virt_shadow: NodeId,
        depth: usize,
    ) -> Result<(), DomError> {
        let live_shadow = match self.host.shadow_root(live_host) {
            Some(shadow) => shadow,
            None => self.host.attach_shadow(live_host)?,
        };
        if let Some(meta) = self.vdom.mirror().get_meta(virt_shadow) {
            self.replay.mirror_mut().add(live_shadow, *meta);
        }
        self.diff_children(live_shadow, virt_shadow, depth + 1)
    }

    fn diff_frame(
        &mut self,
        live_frame: H::Node,
        virt_doc: NodeId,
        depth: usize,
    ) -> Result<(), DomError> {
        let Some(live_doc) = self.host.content_document(live_frame) else {
            log::debug!(target: "vdom.diff", "frame {live_frame:?} has no content document");
            return Ok(());
        };
        if let Some(meta) = self.vdom.mirror().get_meta(virt_doc) {
            self.replay.mirror_mut().add(live_doc, *meta);
        }
        self.diff_node(live_doc, virt_doc, depth + 1)
    }

    fn same_node(&self, live: H::Node, virt: NodeId) -> bool {
        let live_id = self.replay.mirror().get_id(live);
        live_id.is_known()
            && live_id == self.vdom.mirror().get_id(virt)
            && self.kinds_match(live, virt)
    }

    fn kinds_match(&self, live: H::Node, virt: NodeId) -> bool {
        let Some(node_type) = self.vdom.node_type(virt) else {
            return false;
        };
        if self.host.node_type(live) != Some(node_type) {
            return false;
        }
        if node_type != NodeType::Element {
            return true;
        }
        match (self.host.tag_name(live), self.vdom.tag_name(virt)) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }

    // First unconsumed old position inside the window bound to the same id.
    fn lookup(
        &self,
        index: &HashMap<SerializedId, Vec<usize>>,
        old: &[Option<H::Node>],
        virt: NodeId,
        old_start: usize,
        old_end: usize,
    ) -> Option<(usize, H::Node)> {
        let id = self.vdom.mirror().get_id(virt);
        if !id.is_known() {
            return None;
        }
        index.get(&id)?.iter().find_map(|&i| {
            let node = old[i].filter(|&n| self.kinds_match(n, virt))?;
            (old_start..=old_end).contains(&i).then_some((i, node))
        })
    }

    /// Live node for `virt`: the one already bound to its id when it can be
    /// moved under `parent`, otherwise a new node bound to the virtual meta.
    fn create_or_get(&mut self, virt: NodeId, parent: H::Node) -> Result<(H::Node, bool), DomError> {
        let vdom: &'a Dom = self.vdom;
        let data = vdom.data(virt).ok_or(DomError::UnknownNode(virt.0))?;
        let meta = vdom.mirror().get_meta(virt).copied();

        if let Some(meta) = meta.filter(|m| m.id.is_known()) {
            if let Some(existing) = self.replay.mirror().get_node(meta.id) {
                if self.kinds_match(existing, virt)
                    && self.host.parent(existing) != Some(parent)
                    && !self.host.contains(existing, parent)
                {
                    return Ok((existing, false));
                }
            }
        }

        let node = match data {
            NodeData::Document(_) | NodeData::ShadowRoot { .. } => {
                return Err(DomError::Unmaterializable(data.node_type()));
            }
            NodeData::DocumentType {
                name,
                public_id,
                system_id,
            } => self.host.create_document_type(name, public_id, system_id)?,
            NodeData::Element(el) => {
                if el.is_svg() || meta.is_some_and(|m| m.is_svg) {
                    self.host
                        .create_element(svg_tag_name(&el.tag_name), Namespace::Svg)?
                } else {
                    self.host.create_element(&el.tag_name, Namespace::Html)?
                }
            }
            NodeData::Text(text) => self.host.create_text_node(text)?,
            NodeData::Comment(text) => self.host.create_comment(text)?,
            NodeData::CData(text) => self.host.create_cdata_section(text)?,
        };
        if let Some(meta) = meta {
            self.replay.mirror_mut().add(node, meta);
        }
        log::trace!(target: "vdom.diff", "created {node:?} for {virt}");
        Ok((node, true))
    }

    /// Insert a new or foreign node. A document's existing doctype or element
    /// is removed first when `child` would be a second one; the removed node
    /// is returned.
    fn insert_live(
        &mut self,
        parent: H::Node,
        child: H::Node,
        before: Option<H::Node>,
    ) -> Result<Option<H::Node>, DomError> {
        let mut before = before;
        let mut removed = None;
        if self.host.node_type(parent) == Some(NodeType::Document) {
            let child_type = self.host.node_type(child);
            if matches!(child_type, Some(NodeType::DocumentType | NodeType::Element)) {
                let conflict = self
                    .host
                    .children(parent)
                    .into_iter()
                    .find(|&c| c != child && self.host.node_type(c) == child_type);
                if let Some(existing) = conflict {
                    if before == Some(existing) {
                        before = self.host.next_sibling(existing);
                    }
                    self.remove_live(parent, existing)?;
                    removed = Some(existing);
                }
            }
        }
        log::trace!(target: "vdom.diff", "insert {child:?} before {before:?}");
        self.host.insert_before(parent, child, before)?;
        Ok(removed)
    }

    fn move_live(
        &mut self,
        parent: H::Node,
        node: H::Node,
        before: Option<H::Node>,
    ) -> Result<(), DomError> {
        log::trace!(target: "vdom.diff", "move {node:?} before {before:?}");
        self.host.insert_before(parent, node, before)
    }

    fn remove_live(&mut self, parent: H::Node, node: H::Node) -> Result<(), DomError> {
        log::trace!(target: "vdom.diff", "remove {node:?}");
        self.replay.mirror_mut().remove_node_from_map(node, &*self.host);
        self.host.remove_child(parent, node)
    }
}

fn index_by_id<N: Copy + Eq + Hash>(
    old: &[Option<N>],
    mirror: &Mirror<N>,
) -> HashMap<SerializedId, Vec<usize>> {
    let mut index: HashMap<SerializedId, Vec<usize>> = HashMap::new();
    for (i, node) in old.iter().enumerate() {
        let Some(node) = node else {
            continue;
        };
        let id = mirror.get_id(*node);
        if id.is_known() {
            index.entry(id).or_default().push(i);
        }
    }
    index
}

fn consume<N: PartialEq>(old: &mut [Option<N>], removed: Option<N>) {
    let Some(removed) = removed else {
        return;
    };
    if let Some(slot) = old.iter_mut().find(|slot| slot.as_ref() == Some(&removed)) {
        *slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::DomReplay;
    use core_types::SerializedId;

    fn keyed(dom: &mut Dom, parent: NodeId, ids: &[i32]) -> Vec<NodeId> {
        ids.iter()
            .map(|&id| {
                let el = dom.create_element("li");
                dom.mirror_mut().add(el, SerializedId(id));
                dom.append_child(parent, el).expect("append");
                el
            })
            .collect()
    }

    fn live_ids(live: &Dom, replay: &DomReplay, parent: NodeId) -> Vec<i32> {
        live.child_nodes(parent)
            .iter()
            .map(|&n| ReplayHandler::<Dom>::mirror(replay).get_id(n).0)
            .collect()
    }

    fn setup(old: &[i32], new: &[i32]) -> (Dom, NodeId, DomReplay, Dom, NodeId) {
        let mut live = Dom::new();
        let live_ul = live.create_element("ul");
        let mut replay = DomReplay::new();
        for id in old {
            let el = live.create_element("li");
            live.append_child(live_ul, el).expect("append");
            replay.mirror_mut().add(el, SerializedId(*id));
        }
        replay.mirror_mut().add(live_ul, SerializedId(0));

        let mut vdom = Dom::new();
        let ul = vdom.create_element("ul");
        vdom.mirror_mut().add(ul, SerializedId(0));
        keyed(&mut vdom, ul, new);
        (live, live_ul, replay, vdom, ul)
    }

    #[test]
    fn rotate_moves_one_node() {
        let (mut live, live_ul, mut replay, vdom, ul) = setup(&[1, 2, 3, 4], &[2, 3, 4, 1]);
        let before: Vec<NodeId> = live.child_nodes(live_ul).to_vec();
        diff_dom(live_ul, ul, &mut live, &vdom, &mut replay).expect("diff");
        assert_eq!(live_ids(&live, &replay, live_ul), vec![2, 3, 4, 1]);
        // Same nodes, reordered.
        let mut after: Vec<NodeId> = live.child_nodes(live_ul).to_vec();
        after.sort();
        assert_eq!(after, before);
    }

    #[test]
    fn duplicate_old_ids_take_first_unconsumed() {
        let (mut live, live_ul, mut replay, vdom, ul) = setup(&[1, 5, 5, 2], &[9, 5, 3]);
        let old = live.child_nodes(live_ul).to_vec();
        diff_dom(live_ul, ul, &mut live, &vdom, &mut replay).expect("diff");
        assert_eq!(live_ids(&live, &replay, live_ul), vec![9, 5, 3]);
        assert_eq!(live.child_nodes(live_ul)[1], old[1]);
        assert!(!live.child_nodes(live_ul).contains(&old[2]));
    }

    #[test]
    fn unknown_ids_never_match() {
        let (mut live, live_ul, mut replay, mut vdom, ul) = setup(&[], &[]);
        let stale = live.create_element("li");
        live.append_child(live_ul, stale).expect("append");
        let fresh = vdom.create_element("li");
        vdom.append_child(ul, fresh).expect("append");

        diff_dom(live_ul, ul, &mut live, &vdom, &mut replay).expect("diff");
        let children = live.child_nodes(live_ul);
        assert_eq!(children.len(), 1);
        assert_ne!(children[0], stale);
    }

    #[test]
    fn replaces_unmatched_root_in_place() {
        let mut live = Dom::new();
        let body = live.create_element("body");
        let a = live.create_element("div");
        let b = live.create_element("span");
        live.append_child(body, a).expect("a");
        live.append_child(body, b).expect("b");
        let mut replay = DomReplay::new();
        replay.mirror_mut().add(a, SerializedId(1));
        replay.mirror_mut().add(b, SerializedId(2));

        let mut vdom = Dom::new();
        let p = vdom.create_element("p");
        vdom.mirror_mut().add(p, SerializedId(3));

        let root = diff_dom(a, p, &mut live, &vdom, &mut replay).expect("diff");
        assert_eq!(live.tag_name(root), Some("p"));
        assert_eq!(live.child_nodes(body), &[root, b]);
        assert_eq!(ReplayHandler::<Dom>::mirror(&replay).get_id(root), SerializedId(3));
        assert!(!ReplayHandler::<Dom>::mirror(&replay).has(SerializedId(1)));
    }

    #[test]
    fn shadow_roots_cannot_be_materialized() {
        let mut live = Dom::new();
        let ul = live.create_element("ul");
        let li = live.create_element("li");
        live.append_child(ul, li).expect("append");
        let mut replay = DomReplay::new();

        let mut vdom = Dom::new();
        let shadow = vdom.create_shadow_root();
        vdom.mirror_mut().add(shadow, SerializedId(50));
        assert_eq!(
            diff_dom(li, shadow, &mut live, &vdom, &mut replay),
            Err(DomError::Unmaterializable(NodeType::ShadowRoot))
        );
    }

    #[test]
    fn depth_limit_is_reported() {
        let mut live = Dom::new();
        let root = live.create_element("div");
        let mut replay = DomReplay::new();
        replay.mirror_mut().add(root, SerializedId(1));

        let mut vdom = Dom::new();
        let vroot = vdom.create_element("div");
        vdom.mirror_mut().add(vroot, SerializedId(1));
        let mut parent = vroot;
        for id in 2..6 {
            let child = vdom.create_element("div");
            vdom.mirror_mut().add(child, SerializedId(id));
            vdom.append_child(parent, child).expect("append");
            parent = child;
        }

        let config = DiffConfig { max_depth: 2 };
        assert_eq!(
            diff_dom_with_config(root, vroot, &mut live, &vdom, &mut replay, &config),
            Err(DomError::DepthLimit(2))
        );
    }
}
