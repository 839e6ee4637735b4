//! Keyed child-list fixtures shared by the reconciler tests and benches.
//!
//! A list is a `<ul>` whose children are `<li data-id="N">` elements bound to
//! serialized id `N`. The `<ul>` itself is bound to [`LIST_ID`] on both sides
//! so the reconciler pairs the roots.

use crate::recording::{RecordingHost, RecordingReplay};
use core_types::SerializedId;
use vdom::{Dom, HostTree, Mirror, NodeId, ReplayHandler};

pub const LIST_ID: SerializedId = SerializedId(1_000_000);

/// Virtual `<ul>` holding one keyed child per id.
pub fn virtual_list(ids: &[i32]) -> (Dom, NodeId) {
    let mut vdom = Dom::new();
    let ul = vdom.create_element("ul");
    vdom.mirror_mut().add(ul, LIST_ID);
    for &id in ids {
        let li = keyed_item(&mut vdom, id);
        vdom.mirror_mut().add(li, SerializedId(id));
        vdom.append_child(ul, li)
            .unwrap_or_else(|err| panic!("append virtual child {id}: {err}"));
    }
    (vdom, ul)
}

/// Live counterpart of [`virtual_list`]; ids are bound in the replay mirror.
pub fn live_list(ids: &[i32]) -> (RecordingHost, NodeId, RecordingReplay) {
    let mut dom = Dom::new();
    let mut replay = RecordingReplay::new();
    let ul = dom.create_element("ul");
    replay.mirror_mut().add(ul, LIST_ID);
    for &id in ids {
        let li = keyed_item(&mut dom, id);
        replay.mirror_mut().add(li, SerializedId(id));
        dom.append_child(ul, li)
            .unwrap_or_else(|err| panic!("append live child {id}: {err}"));
    }
    (RecordingHost::new(dom), ul, replay)
}

/// Serialized ids of `parent`'s children, in order. Unbound children read as
/// `-1`.
pub fn child_ids<H: HostTree>(host: &H, mirror: &Mirror<H::Node>, parent: H::Node) -> Vec<i32> {
    host.children(parent)
        .into_iter()
        .map(|child| mirror.get_id(child).0)
        .collect()
}

/// `data-id` attributes of `parent`'s children, in order.
pub fn data_ids(dom: &Dom, parent: NodeId) -> Vec<String> {
    dom.child_nodes(parent)
        .iter()
        .map(|&child| dom.get_attribute(child, "data-id").unwrap_or("").to_string())
        .collect()
}

fn keyed_item(dom: &mut Dom, id: i32) -> NodeId {
    let li = dom.create_element("li");
    dom.set_attribute(li, "data-id", &id.to_string())
        .unwrap_or_else(|err| panic!("set data-id on {id}: {err}"));
    li
}
