use crate::dom::Dom;
use crate::types::NodeId;

/// Pre-order walk over the descendants of a node, excluding the node itself.
/// Shadow roots and frame documents are separate trees and are not entered.
pub struct Descendants<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.dom.child_nodes(node).iter().rev().copied());
        Some(node)
    }
}

pub fn descendants(dom: &Dom, root: NodeId) -> Descendants<'_> {
    Descendants {
        dom,
        stack: dom.child_nodes(root).iter().rev().copied().collect(),
    }
}

/// First element in tree order whose `id` attribute equals `id`.
pub fn get_element_by_id(dom: &Dom, root: NodeId, id: &str) -> Option<NodeId> {
    descendants(dom, root).find(|&node| dom.get_attribute(node, "id") == Some(id))
}

/// `"*"` matches every element. HTML tag names compare ignoring ASCII case.
pub fn get_elements_by_tag_name(dom: &Dom, root: NodeId, tag_name: &str) -> Vec<NodeId> {
    descendants(dom, root)
        .filter(|&node| match dom.tag_name(node) {
            Some(tag) => tag_name == "*" || tag.eq_ignore_ascii_case(tag_name),
            None => false,
        })
        .collect()
}

/// Elements carrying every class in the whitespace-separated `class_names`.
pub fn get_elements_by_class_name(dom: &Dom, root: NodeId, class_names: &str) -> Vec<NodeId> {
    let wanted: Vec<&str> = class_names.split_ascii_whitespace().collect();
    if wanted.is_empty() {
        return Vec::new();
    }
    descendants(dom, root)
        .filter(|&node| {
            let Some(class) = dom.get_attribute(node, "class") else {
                return false;
            };
            wanted
                .iter()
                .all(|w| class.split_ascii_whitespace().any(|c| c == *w))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (Dom, NodeId) {
        let mut dom = Dom::new();
        let doc = dom.document();
        let html = dom.create_element("html");
        let body = dom.create_element("body");
        let a = dom.create_element("div");
        let b = dom.create_element("DIV");
        let p = dom.create_element("p");
        dom.append_child(doc, html).expect("html");
        dom.append_child(html, body).expect("body");
        dom.append_child(body, a).expect("a");
        dom.append_child(a, p).expect("p");
        dom.append_child(body, b).expect("b");
        dom.set_attribute(a, "class", "card  wide").expect("class");
        dom.set_attribute(b, "class", "card").expect("class");
        dom.set_attribute(p, "id", "lead").expect("id");
        (dom, doc)
    }

    #[test]
    fn walks_in_tree_order() {
        let (dom, doc) = page();
        let tags: Vec<&str> = descendants(&dom, doc)
            .filter_map(|n| dom.tag_name(n))
            .collect();
        assert_eq!(tags, ["html", "body", "div", "p", "div"]);
    }

    #[test]
    fn lookups() {
        let (dom, doc) = page();
        let lead = get_element_by_id(&dom, doc, "lead").expect("lead");
        assert_eq!(dom.tag_name(lead), Some("p"));
        assert_eq!(get_element_by_id(&dom, doc, "missing"), None);
        assert_eq!(get_elements_by_tag_name(&dom, doc, "Div").len(), 2);
        assert_eq!(get_elements_by_tag_name(&dom, doc, "*").len(), 5);
        assert_eq!(get_elements_by_class_name(&dom, doc, "card").len(), 2);
        assert_eq!(get_elements_by_class_name(&dom, doc, "wide card").len(), 1);
        assert!(get_elements_by_class_name(&dom, doc, " ").is_empty());
    }
}
