//! # Document Tree
//!
//! The engine never owns the document it addresses. It reads a host tree
//! through [`DocumentTree`], which is small enough to implement over any
//! arena or pointer-based DOM.
//!
//! - **`arena`**: [`Dom`], an arena-allocated tree usable as a host tree
//! - **`markup`**: loads a markup fragment into a [`Dom`]
//! - **`walk`**: document-order traversal helpers over any [`DocumentTree`]

pub mod arena;
pub mod markup;
pub mod walk;

pub use arena::{Dom, DomError};

/// Compact node identifier (index into the host's arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Type of a host tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Tree root; never carries text.
    Document,
    /// Element with a name and children.
    Element,
    /// Text-bearing leaf.
    Text,
    /// Comment; neither text-bearing nor a container.
    Comment,
}

/// Read access to a host document tree.
pub trait DocumentTree {
    /// Kind of `node`, or `None` if the id is not part of this tree.
    fn kind(&self, node: NodeId) -> Option<NodeKind>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children of `node` in document order.
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Text of a text node; `None` for every other kind.
    fn text(&self, node: NodeId) -> Option<&str>;

    /// Element name; `None` for every other kind.
    fn name(&self, node: NodeId) -> Option<&str>;

    fn is_text(&self, node: NodeId) -> bool {
        self.kind(node) == Some(NodeKind::Text)
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.kind(node) == Some(NodeKind::Element)
    }

    /// Byte length of a text node, 0 for anything else.
    fn text_len(&self, node: NodeId) -> usize {
        self.text(node).map_or(0, str::len)
    }

    fn child_at(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.children(node).get(index).copied()
    }

    fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }

    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        index
            .checked_sub(1)
            .and_then(|i| self.child_at(parent, i))
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let index = self.index_in_parent(node)?;
        self.child_at(parent, index + 1)
    }
}
