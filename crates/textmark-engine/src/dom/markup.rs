//! Markup fragment loader
//!
//! Builds a [`Dom`] from an HTML fragment such as
//! `<p>The <b>quick</b> fox</p>`. The fragment is parsed by `html5ever` as
//! the body of a document, so malformed input is repaired the way a browser
//! would repair it. The children of `<body>` become the children of the
//! document node. Only structure and text matter to the engine: attributes
//! and doctypes are dropped, entities are decoded, and whitespace-only text
//! is preserved verbatim.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::{Dom, DomError, NodeId};

/// Parse a markup fragment into a fresh tree rooted at a document node.
pub fn parse(input: &str) -> Result<Dom, DomError> {
    let parsed = parse_document(RcDom::default(), ParseOpts::default()).one(input);

    let mut dom = Dom::new();
    let root = dom.root();
    match body(&parsed.document) {
        Some(body) => append_children(&mut dom, root, &body)?,
        None => append_children(&mut dom, root, &parsed.document)?,
    }
    Ok(dom)
}

/// The `<body>` element under the document's `<html>` element.
fn body(document: &Handle) -> Option<Handle> {
    let html = child_element(document, "html")?;
    child_element(&html, "body")
}

fn child_element(parent: &Handle, local: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| matches!(&child.data, NodeData::Element { name, .. } if &*name.local == local))
        .cloned()
}

fn append_children(dom: &mut Dom, parent: NodeId, handle: &Handle) -> Result<(), DomError> {
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Element { name, .. } => {
                let id = dom.append_element(parent, &name.local)?;
                append_children(dom, id, child)?;
            }
            NodeData::Text { contents } => {
                dom.append_text(parent, &contents.borrow())?;
            }
            NodeData::Comment { contents } => {
                dom.append_comment(parent, contents)?;
            }
            NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {}
        }
    }
    Ok(())
}
