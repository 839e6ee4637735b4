use crate::host::HostTree;
use crate::mirror::Mirror;
use crate::types::{CompatMode, Namespace, NodeType};
use std::fmt::{self, Write};

/// Deterministic tree rendering for tests and debugging.
/// Not a stable format.
///
/// One line per node, indented two spaces per level. Under an element the
/// frame content document comes first, then the shadow root, then children.
/// Attributes render in host order. Ids are the identity table's serialized
/// ids and can be left out by options.
#[derive(Clone, Copy, Debug)]
pub struct DomSnapshotOptions {
    pub ignore_ids: bool,
}

impl Default for DomSnapshotOptions {
    fn default() -> Self {
        Self { ignore_ids: true }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new<H: HostTree>(
        host: &H,
        root: H::Node,
        mirror: &Mirror<H::Node>,
        options: DomSnapshotOptions,
    ) -> Self {
        let mut lines = Vec::new();
        walk_snapshot(host, root, mirror, &options, 0, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct DomMismatch {
    line: usize,
    expected: DomSnapshot,
    actual: DomSnapshot,
}

impl DomMismatch {
    /// Zero-based index of the first differing line.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for DomMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing = "<missing>".to_string();
        let expected = self.expected.lines.get(self.line).unwrap_or(&missing);
        let actual = self.actual.lines.get(self.line).unwrap_or(&missing);
        writeln!(f, "tree mismatch at line {}", self.line + 1)?;
        writeln!(f, "expected: {}", expected.trim_start())?;
        writeln!(f, "actual:   {}", actual.trim_start())?;
        writeln!(f, "expected tree:\n{}", self.expected)?;
        writeln!(f, "actual tree:\n{}", self.actual)?;
        Ok(())
    }
}

impl std::error::Error for DomMismatch {}

pub fn compare_snapshots(expected: DomSnapshot, actual: DomSnapshot) -> Result<(), Box<DomMismatch>> {
    let line = expected
        .lines
        .iter()
        .zip(&actual.lines)
        .position(|(e, a)| e != a)
        .or_else(|| {
            (expected.lines.len() != actual.lines.len())
                .then(|| expected.lines.len().min(actual.lines.len()))
        });
    match line {
        None => Ok(()),
        Some(line) => Err(Box::new(DomMismatch {
            line,
            expected,
            actual,
        })),
    }
}

pub fn assert_snapshot_eq(expected: DomSnapshot, actual: DomSnapshot) {
    if let Err(mismatch) = compare_snapshots(expected, actual) {
        panic!("{mismatch}");
    }
}

fn walk_snapshot<H: HostTree>(
    host: &H,
    node: H::Node,
    mirror: &Mirror<H::Node>,
    options: &DomSnapshotOptions,
    indent_level: usize,
    out: &mut Vec<String>,
) {
    const INDENT_STEP: usize = 2;
    let mut line = " ".repeat(indent_level.saturating_mul(INDENT_STEP));
    write_node_line(&mut line, host, node);
    if !options.ignore_ids {
        let id = mirror.get_id(node);
        if id.is_known() {
            write!(line, " id={}", id.0).ok();
        }
    }
    out.push(line);

    if let Some(doc) = host.content_document(node) {
        walk_snapshot(host, doc, mirror, options, indent_level + 1, out);
    }
    if let Some(shadow) = host.shadow_root(node) {
        walk_snapshot(host, shadow, mirror, options, indent_level + 1, out);
    }
    for child in host.children(node) {
        walk_snapshot(host, child, mirror, options, indent_level + 1, out);
    }
}

fn write_node_line<H: HostTree>(out: &mut String, host: &H, node: H::Node) {
    match host.node_type(node) {
        Some(NodeType::Document) => {
            out.push_str("#document");
            if host.compat_mode(node) == CompatMode::Quirks {
                out.push_str(" quirks");
            }
        }
        Some(NodeType::DocumentType) => {
            let parts = host.document_type(node).unwrap_or_default();
            out.push_str("<!DOCTYPE ");
            out.push_str(&parts.name);
            if !parts.public_id.is_empty() || !parts.system_id.is_empty() {
                out.push_str(" \"");
                write_escaped(out, &parts.public_id);
                out.push_str("\" \"");
                write_escaped(out, &parts.system_id);
                out.push('"');
            }
            out.push('>');
        }
        Some(NodeType::Element) => {
            out.push('<');
            if host.namespace(node) == Namespace::Svg {
                out.push_str("svg:");
            }
            out.push_str(host.tag_name(node).unwrap_or_default());
            for (name, value) in host.attributes(node) {
                out.push(' ');
                out.push_str(&name);
                out.push_str("=\"");
                write_escaped(out, &value);
                out.push('"');
            }
            if let Some(mode) = host.dialog_mode(node) {
                write!(out, " [{mode:?}]").ok();
            }
            out.push('>');
        }
        Some(NodeType::Text) => {
            out.push('"');
            write_escaped(out, host.character_data(node).unwrap_or_default());
            out.push('"');
        }
        Some(NodeType::Comment) => {
            out.push_str("<!-- ");
            write_escaped(out, host.character_data(node).unwrap_or_default());
            out.push_str(" -->");
        }
        Some(NodeType::CData) => {
            out.push_str("<![CDATA[");
            write_escaped(out, host.character_data(node).unwrap_or_default());
            out.push_str("]]>");
        }
        Some(NodeType::ShadowRoot) => out.push_str("#shadow-root"),
        None => out.push_str("#unsupported"),
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                let _ = write!(out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dom;
    use core_types::SerializedId;

    #[test]
    fn renders_nested_structure() {
        let mut dom = Dom::new();
        let doc = dom.document();
        let doctype = dom.create_document_type("html", "", "");
        let html = dom.create_element("html");
        let host = dom.create_element("div");
        let shadow = dom.attach_shadow(host).expect("shadow");
        let slot = dom.create_text_node("in\nshadow");
        let svg = dom.create_element_ns("svg", Namespace::Svg);
        dom.append_child(doc, doctype).expect("doctype");
        dom.append_child(doc, html).expect("html");
        dom.append_child(html, host).expect("host");
        dom.append_child(shadow, slot).expect("slot");
        dom.append_child(html, svg).expect("svg");
        dom.set_attribute(host, "class", "a \"b\"").expect("class");
        dom.mirror_mut().add(host, SerializedId(4));

        let snapshot = DomSnapshot::new(&dom, doc, dom.mirror(), DomSnapshotOptions { ignore_ids: false });
        assert_eq!(
            snapshot.as_lines(),
            &[
                "#document",
                "  <!DOCTYPE html>",
                "  <html>",
                "    <div class=\"a \\\"b\\\"\"> id=4",
                "      #shadow-root",
                "        \"in\\nshadow\"",
                "    <svg:svg>",
            ]
        );
    }

    #[test]
    fn mismatch_reports_first_differing_line() {
        let mut a = Dom::new();
        let mut b = Dom::new();
        for (dom, text) in [(&mut a, "x"), (&mut b, "y")] {
            let doc = dom.document();
            let html = dom.create_element("html");
            let t = dom.create_text_node(text);
            dom.append_child(doc, html).expect("html");
            dom.append_child(html, t).expect("text");
        }
        let options = DomSnapshotOptions::default();
        let err = compare_snapshots(
            DomSnapshot::new(&a, a.document(), a.mirror(), options),
            DomSnapshot::new(&b, b.document(), b.mirror(), options),
        )
        .expect_err("expected mismatch");
        assert_eq!(err.line(), 2);
        assert!(err.to_string().contains("expected: \"x\""));
    }
}
