mod common;

use common::Trees;
use core_types::{DialogMode, SerializedId};
use dom_test_support::HostOp;
use vdom::traverse::{get_element_by_id, get_elements_by_tag_name};
use vdom::{HostTree, Namespace, NodeId, ReplayHandler, build_from_dom};

/// A live page covering every node kind, then a virtual copy built from it.
fn built_page() -> Trees {
    let mut trees = Trees::new();
    let live = trees.host.dom_mut();
    let doc = live.document();
    let doctype = live.create_document_type("html", "", "");
    let html = live.create_element("html");
    let head = live.create_element("head");
    let style = live.create_element("style");
    let body = live.create_element("body");
    let main = live.create_element("div");
    let text = live.create_text_node("hello");
    let comment = live.create_comment("note");
    let svg = live.create_element_ns("svg", Namespace::Svg);
    let circle = live.create_element_ns("circle", Namespace::Svg);
    let frame = live.create_element("iframe");
    let frame_doc = live.content_document(frame).expect("frame doc");
    let frame_html = live.create_element("html");
    let shadow_host = live.create_element("x-card");
    let shadow = live.attach_shadow(shadow_host).expect("shadow");
    let slot = live.create_element("slot");
    let dialog = live.create_element("dialog");

    for (parent, child) in [
        (doc, doctype),
        (doc, html),
        (html, head),
        (head, style),
        (html, body),
        (body, main),
        (main, text),
        (main, comment),
        (body, svg),
        (svg, circle),
        (body, frame),
        (frame_doc, frame_html),
        (body, shadow_host),
        (shadow, slot),
        (body, dialog),
    ] {
        live.append_child(parent, child).expect("append");
    }
    live.set_attribute(main, "id", "main").expect("id");
    live.set_attribute(main, "class", "wide").expect("class");
    live.set_attribute(circle, "r", "4").expect("r");
    live.set_scroll_offsets(main, 0.0, 40.0).expect("scroll");
    live.show_dialog(dialog, DialogMode::Modal).expect("dialog");

    let mut vdom = vdom::Dom::new();
    build_from_dom(&trees.host, doc, trees.replay.mirror_mut(), &mut vdom).expect("built");
    trees.vdom = vdom;
    trees
}

#[test]
fn built_tree_reconciles_as_a_no_op() {
    let mut trees = built_page();
    let bound = trees.replay.mirror().len();
    assert_eq!(trees.vdom.mirror().len(), bound);

    trees.diff().expect("diff");
    assert_eq!(trees.host.ops(), &[] as &[HostOp]);
    assert_eq!(trees.replay.mirror().len(), bound);
    trees.assert_converged();
}

#[test]
fn virtual_edits_replay_onto_the_live_page() {
    let mut trees = built_page();
    let vdoc = trees.vdom.document();
    let vmain = get_element_by_id(&trees.vdom, vdoc, "main").expect("main");
    let vbody = trees.vdom.parent_node(vmain).expect("body");
    let vdialog = get_elements_by_tag_name(&trees.vdom, vdoc, "dialog")[0];
    let vcomment = trees.vdom.last_child(vmain).expect("comment");

    // Move the dialog to the front, drop the comment, add a footer, edit text.
    trees.vdom.insert_before(vbody, vdialog, Some(vmain)).expect("move");
    trees.vdom.remove_child(vmain, vcomment).expect("remove");
    let footer = trees.vdom.create_element("footer");
    trees.vdom.append_child(vbody, footer).expect("footer");
    trees.vdom.mirror_mut().add(footer, SerializedId(500));
    let vtext = trees.vdom.first_child(vmain).expect("text");
    trees.vdom.set_data(vtext, "bye").expect("text");
    trees.vdom.remove_attribute(vmain, "class").expect("class");
    let comment_id = trees.vdom.mirror().get_id(vcomment);

    trees.diff().expect("diff");
    trees.assert_converged();
    assert!(!trees.replay.mirror().has(comment_id));
    let footer = trees.live_node(500).expect("footer");
    let live_body = trees.host.parent(footer).expect("body");
    let first: NodeId = trees.host.children(live_body)[0];
    assert_eq!(trees.host.tag_name(first), Some("dialog"));
    assert_eq!(trees.host.dialog_mode(first), Some(DialogMode::Modal));
    assert_eq!(trees.host.moves(), 1);
    assert_eq!(trees.host.inserts(), 1);
    assert_eq!(trees.host.removes(), 1);
}

#[test]
fn frame_fallback_content_survives_build_then_diff() {
    let mut trees = Trees::new();
    let live = trees.host.dom_mut();
    let doc = live.document();
    let html = live.create_element("html");
    let body = live.create_element("body");
    let frame = live.create_element("iframe");
    let fallback = live.create_text_node("fallback");
    for (parent, child) in [(doc, html), (html, body), (body, frame), (frame, fallback)] {
        live.append_child(parent, child).expect("append");
    }

    let mut vdom = vdom::Dom::new();
    build_from_dom(&trees.host, doc, trees.replay.mirror_mut(), &mut vdom).expect("built");
    trees.vdom = vdom;
    let vframe = get_elements_by_tag_name(&trees.vdom, trees.vdom.document(), "iframe")[0];
    let vtext = trees.vdom.first_child(vframe).expect("virtual fallback");
    assert_eq!(trees.vdom.text_content(vtext).as_deref(), Some("fallback"));

    trees.diff().expect("diff");
    assert_eq!(trees.host.ops(), &[] as &[HostOp]);
    assert_eq!(trees.host.children(frame), vec![fallback]);
    trees.assert_converged();
}
