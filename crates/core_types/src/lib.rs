//! Side-data shared by the recording and replay halves.
//!
//! Everything here is plain data: it is serialized next to virtual-tree
//! snapshots and consumed by the reconciler through the replay side channel.

use serde::{Deserialize, Serialize};

/// Structural identity assigned to a node by the recorder.
///
/// Recorded nodes carry non-negative ids. `-1` is the "unknown" sentinel and
/// ids at or below `-2` are synthesized locally for nodes the recorder never
/// serialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializedId(pub i32);

impl SerializedId {
    pub const UNKNOWN: SerializedId = SerializedId(-1);
    /// First id handed out for nodes without a recorded identity.
    pub const FIRST_UNSERIALIZED: SerializedId = SerializedId(-2);

    #[inline]
    pub const fn is_known(self) -> bool {
        self.0 != Self::UNKNOWN.0
    }

    #[inline]
    pub const fn is_unserialized(self) -> bool {
        self.0 <= Self::FIRST_UNSERIALIZED.0
    }
}

impl From<i32> for SerializedId {
    #[inline]
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

/// Scroll position recorded for a document or element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollData {
    pub id: SerializedId,
    pub x: f64,
    pub y: f64,
}

/// Form control state recorded for an input-like element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputData {
    pub id: SerializedId,
    pub text: String,
    pub is_checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_triggered: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialogMode {
    Modal,
    NonModal,
}

/// Playback state of an audio/video element. `None` fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_rate: Option<f64>,
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
}

impl MediaState {
    pub fn is_empty(&self) -> bool {
        self.paused.is_none()
            && self.muted.is_none()
            && self.volume.is_none()
            && self.current_time.is_none()
            && self.playback_rate.is_none()
            && self.looping.is_none()
    }

    /// Overwrite every field that is set on `other`.
    pub fn merge(&mut self, other: &MediaState) {
        if other.paused.is_some() {
            self.paused = other.paused;
        }
        if other.muted.is_some() {
            self.muted = other.muted;
        }
        if other.volume.is_some() {
            self.volume = other.volume;
        }
        if other.current_time.is_some() {
            self.current_time = other.current_time;
        }
        if other.playback_rate.is_some() {
            self.playback_rate = other.playback_rate;
        }
        if other.looping.is_some() {
            self.looping = other.looping;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanvasContext {
    #[serde(rename = "2d")]
    TwoD,
    #[serde(rename = "webgl")]
    WebGl,
    #[serde(rename = "webgl2")]
    WebGl2,
}

/// One recorded call or property assignment on a rendering context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasCommand {
    pub property: String,
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
    #[serde(default)]
    pub setter: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasMutationData {
    pub id: SerializedId,
    #[serde(rename = "type")]
    pub context: CanvasContext,
    pub commands: Vec<CanvasCommand>,
}

/// Envelope of the incremental event a canvas mutation arrived in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasEvent {
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasMutation {
    pub event: CanvasEvent,
    pub mutation: CanvasMutationData,
}

/// Address of a rule inside a style sheet.
///
/// A path addresses a rule nested inside grouping rules: every element but the
/// last selects a grouping rule, the last is the index inside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RulePosition {
    Index(usize),
    Path(Vec<usize>),
}

/// Queued style sheet operation attached to a virtual style element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VirtualStyleRule {
    Insert {
        #[serde(rename = "cssText")]
        css_text: String,
        #[serde(default)]
        index: Option<RulePosition>,
    },
    Remove {
        index: RulePosition,
    },
    SetProperty {
        index: Vec<usize>,
        property: String,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        priority: Option<String>,
    },
    RemoveProperty {
        index: Vec<usize>,
        property: String,
    },
}
