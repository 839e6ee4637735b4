//! Identity table ("mirror") between serialized ids and node handles.
//!
//! One mirror tracks the live tree and another the virtual tree. The two are
//! never linked directly: a live node and a virtual node represent the same
//! entity exactly when both tables bind them to the same [`SerializedId`].

use crate::host::HostTree;
use core_types::SerializedId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Metadata recorded for a node alongside its identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMeta {
    pub id: SerializedId,
    /// The node lives in the SVG namespace.
    #[serde(default)]
    pub is_svg: bool,
}

impl NodeMeta {
    #[inline]
    pub const fn new(id: SerializedId) -> Self {
        Self { id, is_svg: false }
    }

    #[inline]
    pub const fn svg(id: SerializedId) -> Self {
        Self { id, is_svg: true }
    }
}

impl From<SerializedId> for NodeMeta {
    fn from(id: SerializedId) -> Self {
        Self::new(id)
    }
}

/// Bidirectional map between identities and node handles `N`.
#[derive(Clone, Debug)]
pub struct Mirror<N> {
    id_map: HashMap<SerializedId, N>,
    meta_map: HashMap<N, NodeMeta>,
}

impl<N> Default for Mirror<N> {
    fn default() -> Self {
        Self {
            id_map: HashMap::new(),
            meta_map: HashMap::new(),
        }
    }
}

impl<N: Copy + Eq + Hash> Mirror<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: N, meta: impl Into<NodeMeta>) {
        let meta = meta.into();
        self.id_map.insert(meta.id, node);
        self.meta_map.insert(node, meta);
    }

    /// Returns [`SerializedId::UNKNOWN`] for nodes that are not registered.
    pub fn get_id(&self, node: N) -> SerializedId {
        self.meta_map
            .get(&node)
            .map(|meta| meta.id)
            .unwrap_or(SerializedId::UNKNOWN)
    }

    pub fn get_node(&self, id: SerializedId) -> Option<N> {
        self.id_map.get(&id).copied()
    }

    pub fn get_meta(&self, node: N) -> Option<&NodeMeta> {
        self.meta_map.get(&node)
    }

    /// All bound identities, sorted.
    pub fn get_ids(&self) -> Vec<SerializedId> {
        let mut ids: Vec<_> = self.id_map.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn has(&self, id: SerializedId) -> bool {
        self.id_map.contains_key(&id)
    }

    pub fn has_node(&self, node: N) -> bool {
        self.meta_map.contains_key(&node)
    }

    /// Re-point `id` at `node`, carrying over the metadata recorded for the
    /// node previously bound to `id`.
    pub fn replace(&mut self, id: SerializedId, node: N) {
        if let Some(old) = self.id_map.get(&id).copied() {
            if let Some(meta) = self.meta_map.get(&old).copied() {
                self.meta_map.insert(node, meta);
            }
        }
        self.id_map.insert(id, node);
    }

    /// Drop `node` and its whole subtree (children, shadow roots and frame
    /// content documents) from the table. The tree itself is not touched.
    pub fn remove_node_from_map<T>(&mut self, node: N, tree: &T)
    where
        T: HostTree<Node = N> + ?Sized,
    {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            self.unbind(current);
            stack.extend(tree.children(current));
            if let Some(shadow) = tree.shadow_root(current) {
                stack.push(shadow);
            }
            if let Some(doc) = tree.content_document(current) {
                stack.push(doc);
            }
        }
    }

    /// Drop a single binding without touching descendants.
    pub fn remove(&mut self, node: N) {
        self.unbind(node);
    }

    pub fn reset(&mut self) {
        self.id_map.clear();
        self.meta_map.clear();
    }

    pub fn len(&self) -> usize {
        self.id_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_map.is_empty()
    }

    fn unbind(&mut self, node: N) {
        let Some(meta) = self.meta_map.remove(&node) else {
            return;
        };
        // The id may already have been re-bound to a newer node.
        if self.id_map.get(&meta.id) == Some(&node) {
            self.id_map.remove(&meta.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dom;

    #[test]
    fn add_and_lookup_both_directions() {
        let mut mirror: Mirror<u32> = Mirror::new();
        mirror.add(10, SerializedId(1));
        mirror.add(11, NodeMeta::svg(SerializedId(2)));

        assert_eq!(mirror.get_id(10), SerializedId(1));
        assert_eq!(mirror.get_node(SerializedId(2)), Some(11));
        assert!(mirror.get_meta(11).is_some_and(|m| m.is_svg));
        assert_eq!(mirror.get_id(99), SerializedId::UNKNOWN);
        assert_eq!(mirror.get_node(SerializedId(3)), None);
        assert_eq!(mirror.get_ids(), vec![SerializedId(1), SerializedId(2)]);
        assert!(mirror.has(SerializedId(1)));
        assert!(mirror.has_node(11));
        assert_eq!(mirror.len(), 2);

        mirror.reset();
        assert!(mirror.is_empty());
        assert!(!mirror.has_node(10));
    }

    #[test]
    fn replace_keeps_previous_meta() {
        let mut mirror: Mirror<u32> = Mirror::new();
        mirror.add(1, NodeMeta::svg(SerializedId(5)));
        mirror.replace(SerializedId(5), 2);
        assert_eq!(mirror.get_node(SerializedId(5)), Some(2));
        assert_eq!(mirror.get_meta(2), Some(&NodeMeta::svg(SerializedId(5))));
    }

    #[test]
    fn removal_cascades_through_subtree() {
        let mut dom = Dom::new();
        let root = dom.create_element("div");
        let child = dom.create_element("span");
        let text = dom.create_text_node("hi");
        let frame = dom.create_element("iframe");
        let frame_doc = dom.content_document(frame).expect("frame document");
        let shadow = dom.attach_shadow(root).expect("shadow root");
        let shadow_child = dom.create_element("p");
        dom.append_child(root, child).expect("append");
        dom.append_child(child, text).expect("append");
        dom.append_child(root, frame).expect("append");
        dom.append_child(shadow, shadow_child).expect("append");

        let unrelated = dom.create_element("b");
        let mut mirror: Mirror<crate::NodeId> = Mirror::new();
        for (i, node) in [root, child, text, frame, frame_doc, shadow, shadow_child, unrelated]
            .into_iter()
            .enumerate()
        {
            mirror.add(node, SerializedId(i as i32));
        }

        mirror.remove_node_from_map(root, &dom);
        assert_eq!(mirror.get_ids(), vec![SerializedId(7)]);
        assert_eq!(mirror.get_id(text), SerializedId::UNKNOWN);
        // The tree is untouched.
        assert_eq!(dom.child_nodes(root), &[child, frame]);
    }

    #[test]
    fn removal_leaves_rebound_ids_alone() {
        let mut dom = Dom::new();
        let old = dom.create_element("div");
        let new = dom.create_element("div");
        let mut mirror: Mirror<crate::NodeId> = Mirror::new();
        mirror.add(old, SerializedId(3));
        mirror.add(new, SerializedId(3));

        mirror.remove_node_from_map(old, &dom);
        assert_eq!(mirror.get_node(SerializedId(3)), Some(new));
        assert!(!mirror.has_node(old));
    }
}
