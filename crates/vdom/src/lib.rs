//! Virtual document tree for session replay.
//!
//! Recorded mutations are applied to a virtual [`Dom`] first; the
//! reconciler in [`dom_diff`] then brings a live tree in line with it using
//! as few structural operations as it can. Nodes on both sides are matched
//! through their recorded identity, kept in a [`Mirror`] per tree.
//!
//! Live trees are reached through the [`HostTree`] / [`HostTreeMut`] seams;
//! state that is not tree shape (canvas, input, scroll, style sheets) goes
//! through a [`ReplayHandler`].

pub mod config;
pub mod dom_builder;
pub mod dom_diff;
#[cfg(any(test, feature = "dom-snapshot"))]
pub mod dom_snapshot;
pub mod host;
pub mod mirror;
pub mod replay;
pub mod style_rules;
pub mod traverse;

mod dom;
mod error;
mod node;
mod types;

pub use crate::config::{BuildConfig, DEFAULT_MAX_DEPTH, DiffConfig};
pub use crate::dom::Dom;
pub use crate::dom_builder::{build_from_dom, build_from_dom_with_config, build_from_node};
pub use crate::dom_diff::{CANVAS_SNAPSHOT_ATTRIBUTE, diff_dom, diff_dom_with_config};
pub use crate::error::DomError;
pub use crate::host::{DocumentTypeParts, HostTree, HostTreeMut};
pub use crate::mirror::{Mirror, NodeMeta};
pub use crate::node::{
    DocumentData, ElementData, ElementKind, KindTag, NodeData, NodeRecord, svg_tag_name,
    valid_tag_name,
};
pub use crate::replay::{DomReplay, ReplayHandler};
pub use crate::types::{CompatMode, Namespace, NodeId, NodeType};
