//! Test helpers for the `vdom` crate: a host wrapper that records every
//! operation the reconciler performs, a replay handler that records every
//! side-channel call, list fixtures and TOML scenario manifests.

pub mod fixtures;
pub mod recording;
pub mod scenarios;

pub use crate::recording::{HostOp, RecordingHost, RecordingReplay, ReplayEvent};

use std::fmt::Write;

/// Side-by-side rendering of two sequences around their first divergence,
/// for assertion messages.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    const CONTEXT: usize = 2;
    let mut out = String::new();
    let len = expected.len().max(actual.len());
    let Some(first) = (0..len).find(|&i| expected.get(i) != actual.get(i)) else {
        let _ = writeln!(out, "sequences are equal ({len} entries)");
        return out;
    };

    let _ = writeln!(out, "diverges at entry {first}:");
    let from = first.saturating_sub(CONTEXT);
    let to = (first + CONTEXT + 1).min(len);
    for i in from..to {
        let cell = |side: &[String]| side.get(i).map_or("-", String::as_str).to_string();
        let marker = if i == first { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker}{i:>4} | {:<16} | {}",
            cell(expected),
            cell(actual)
        );
    }
    let _ = writeln!(out, "lengths: expected {}, actual {}", expected.len(), actual.len());
    out
}
