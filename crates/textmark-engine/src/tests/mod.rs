use crate::content::TextContent;
use crate::dom::{Dom, NodeId, markup, walk};
use crate::markers::Placement;

/// Parse `src` and flatten the whole document
pub fn setup(src: &str) -> (Dom, TextContent) {
    let dom = markup::parse(src).unwrap();
    let content = TextContent::new(&dom, dom.root());
    (dom, content)
}

/// The `n`-th text leaf of the document, in document order
pub fn leaf(dom: &Dom, n: usize) -> NodeId {
    walk::text_leaves(dom, dom.root())[n]
}

/// Minimal placed highlight for marker index tests
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub id: u32,
    pub group: String,
    pub enabled: bool,
    pub active: bool,
}

impl Highlight {
    pub fn new(id: u32, group: &str) -> Self {
        Self {
            id,
            group: group.to_string(),
            enabled: true,
            active: true,
        }
    }
}

impl Placement for Highlight {
    fn group(&self) -> &str {
        &self.group
    }

    fn group_enabled(&self) -> bool {
        self.enabled
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
