//! Side channel the reconciler calls for state that is not tree shape.
//!
//! A [`ReplayHandler`] owns the live-side identity table and applies input
//! values, scroll positions and canvas commands to the live tree. Style sheet
//! mutations default to the built-in interpreter in [`crate::style_rules`].

use crate::dom::Dom;
use crate::host::HostTreeMut;
use crate::mirror::Mirror;
use crate::style_rules;
use crate::types::NodeId;
use core_types::{
    CanvasEvent, CanvasMutationData, InputData, ScrollData, SerializedId, VirtualStyleRule,
};
use cssom::StyleSheet;
use std::collections::HashMap;

pub trait ReplayHandler<H: HostTreeMut> {
    /// Identity table of the live tree.
    fn mirror(&self) -> &Mirror<H::Node>;
    fn mirror_mut(&mut self) -> &mut Mirror<H::Node>;

    /// Called once per queued canvas mutation, in queue order.
    fn apply_canvas(
        &mut self,
        host: &mut H,
        event: &CanvasEvent,
        mutation: &CanvasMutationData,
        target: H::Node,
    );

    fn apply_input(&mut self, host: &mut H, data: &InputData);

    /// `is_sync` is true when called from inside a reconciliation pass.
    fn apply_scroll(&mut self, host: &mut H, data: &ScrollData, is_sync: bool);

    fn apply_style_sheet_mutation(&mut self, rule: &VirtualStyleRule, sheet: &mut StyleSheet) {
        style_rules::apply_rule(sheet, rule);
    }

    /// Called after a newly created live node has been inserted and its
    /// subtree reconciled.
    fn after_append(&mut self, _host: &mut H, _node: H::Node, _id: SerializedId) {}

    /// Static image recorded for a canvas (`rr_dataURL`).
    fn apply_canvas_snapshot(&mut self, _host: &mut H, _data_url: &str, _target: H::Node) {}
}

/// Replay handler for a [`Dom`] used as the live tree.
///
/// Input and scroll side-data are written onto the target nodes. A `Dom`
/// cannot draw, so canvas commands and snapshots are kept per target for
/// inspection.
#[derive(Debug, Default)]
pub struct DomReplay {
    mirror: Mirror<NodeId>,
    canvas_log: Vec<(NodeId, CanvasMutationData)>,
    canvas_snapshots: HashMap<NodeId, String>,
}

impl DomReplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mirror(mirror: Mirror<NodeId>) -> Self {
        Self {
            mirror,
            ..Self::default()
        }
    }

    pub fn canvas_log(&self) -> &[(NodeId, CanvasMutationData)] {
        &self.canvas_log
    }

    pub fn canvas_snapshot(&self, target: NodeId) -> Option<&str> {
        self.canvas_snapshots.get(&target).map(String::as_str)
    }

    fn target(&self, id: SerializedId) -> Option<NodeId> {
        let target = self.mirror.get_node(id);
        if target.is_none() {
            log::debug!(target: "vdom.replay", "no live node for id {}", id.0);
        }
        target
    }
}

impl ReplayHandler<Dom> for DomReplay {
    fn mirror(&self) -> &Mirror<NodeId> {
        &self.mirror
    }

    fn mirror_mut(&mut self) -> &mut Mirror<NodeId> {
        &mut self.mirror
    }

    fn apply_canvas(
        &mut self,
        _host: &mut Dom,
        _event: &CanvasEvent,
        mutation: &CanvasMutationData,
        target: NodeId,
    ) {
        self.canvas_log.push((target, mutation.clone()));
    }

    fn apply_input(&mut self, host: &mut Dom, data: &InputData) {
        let Some(target) = self.target(data.id) else {
            return;
        };
        if let Err(err) = host.set_input_data(target, data.clone()) {
            log::debug!(target: "vdom.replay", "input on {target}: {err}");
        }
    }

    fn apply_scroll(&mut self, host: &mut Dom, data: &ScrollData, _is_sync: bool) {
        let Some(target) = self.target(data.id) else {
            return;
        };
        if let Err(err) = host.set_scroll_offsets(target, data.x, data.y) {
            log::debug!(target: "vdom.replay", "scroll on {target}: {err}");
        }
    }

    fn apply_canvas_snapshot(&mut self, _host: &mut Dom, data_url: &str, target: NodeId) {
        self.canvas_snapshots.insert(target, data_url.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_and_scroll_land_on_mirrored_nodes() {
        let mut host = Dom::new();
        let input = host.create_element("input");
        let mut replay = DomReplay::new();
        replay.mirror_mut().add(input, SerializedId(3));

        let data = InputData {
            id: SerializedId(3),
            text: "hello".to_string(),
            is_checked: false,
            user_triggered: None,
        };
        replay.apply_input(&mut host, &data);
        replay.apply_scroll(
            &mut host,
            &ScrollData {
                id: SerializedId(3),
                x: 4.0,
                y: 8.0,
            },
            true,
        );
        // Unknown ids are ignored.
        replay.apply_scroll(
            &mut host,
            &ScrollData {
                id: SerializedId(99),
                x: 1.0,
                y: 1.0,
            },
            true,
        );

        let el = host.element(input).expect("input element");
        assert_eq!(el.input_data.as_ref(), Some(&data));
        assert_eq!(host.scroll_offsets(input), (4.0, 8.0));
    }

    #[test]
    fn default_style_mutation_uses_interpreter() {
        let mut replay = DomReplay::new();
        let mut sheet = StyleSheet::new();
        <DomReplay as ReplayHandler<Dom>>::apply_style_sheet_mutation(
            &mut replay,
            &VirtualStyleRule::Insert {
                css_text: "a { top: 0; }".to_string(),
                index: None,
            },
            &mut sheet,
        );
        assert_eq!(sheet.css_rules().len(), 1);
    }
}
