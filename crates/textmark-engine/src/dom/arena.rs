//! Arena-based document tree
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`].
//! Detached nodes stay in the arena; they simply stop being reachable from
//! the document node.

use thiserror::Error;

use super::{DocumentTree, NodeId, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),
    #[error("Node {0:?} cannot hold children")]
    NotAContainer(NodeId),
    #[error("Node {0:?} is not a text node")]
    NotText(NodeId),
    #[error("Split offset {offset} outside text of length {len}")]
    SplitOutOfBounds { offset: usize, len: usize },
    #[error("Split offset {0} is not on a character boundary")]
    SplitInsideChar(usize),
}

#[derive(Debug, Clone)]
struct DomNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Element name for elements, text content for text and comment nodes.
    value: String,
}

impl DomNode {
    fn new(kind: NodeKind, parent: Option<NodeId>, value: String) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            value,
        }
    }
}

/// An arena-allocated document tree.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<DomNode>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create a tree holding only a document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![DomNode::new(NodeKind::Document, None, String::new())],
        }
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn append_element(&mut self, parent: NodeId, name: &str) -> Result<NodeId, DomError> {
        self.append(parent, NodeKind::Element, name.to_string())
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, DomError> {
        self.append(parent, NodeKind::Text, text.to_string())
    }

    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> Result<NodeId, DomError> {
        self.append(parent, NodeKind::Comment, text.to_string())
    }

    /// Replace the content of a text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        let data = self.node_mut(node)?;
        if data.kind != NodeKind::Text {
            return Err(DomError::NotText(node));
        }
        data.value = text.to_string();
        Ok(())
    }

    /// Split a text node in two at byte offset `at`.
    ///
    /// The original node keeps `[..at]`; a new text node holding `[at..]` is
    /// inserted as its next sibling and returned. This is the physical split
    /// a renderer performs when it wraps part of a text run in markup.
    pub fn split_text(&mut self, node: NodeId, at: usize) -> Result<NodeId, DomError> {
        let data = self.node(node)?;
        if data.kind != NodeKind::Text {
            return Err(DomError::NotText(node));
        }
        let len = data.value.len();
        if at > len {
            return Err(DomError::SplitOutOfBounds { offset: at, len });
        }
        if !data.value.is_char_boundary(at) {
            return Err(DomError::SplitInsideChar(at));
        }

        let parent = data.parent;
        let tail = self.node_mut(node)?.value.split_off(at);
        let id = self.alloc(DomNode::new(NodeKind::Text, parent, tail));

        if let Some(parent) = parent {
            let siblings = &mut self.node_mut(parent)?.children;
            match siblings.iter().position(|&c| c == node) {
                Some(index) => siblings.insert(index + 1, id),
                None => siblings.push(id),
            }
        }

        Ok(id)
    }

    /// Detach `node` (and its subtree) from its parent.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        let parent = self.node_mut(node)?.parent.take();
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.retain(|&c| c != node);
        }
        Ok(())
    }

    /// Concatenated text of every text node under `node`, in document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(node.index()) else {
            return;
        };
        match data.kind {
            NodeKind::Text => out.push_str(&data.value),
            NodeKind::Comment => {}
            NodeKind::Document | NodeKind::Element => {
                for &child in &data.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn append(&mut self, parent: NodeId, kind: NodeKind, value: String) -> Result<NodeId, DomError> {
        match self.node(parent)?.kind {
            NodeKind::Document | NodeKind::Element => {}
            NodeKind::Text | NodeKind::Comment => return Err(DomError::NotAContainer(parent)),
        }

        let id = self.alloc(DomNode::new(kind, Some(parent), value));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    fn alloc(&mut self, node: DomNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn node(&self, id: NodeId) -> Result<&DomNode, DomError> {
        self.nodes.get(id.index()).ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut DomNode, DomError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(DomError::UnknownNode(id))
    }
}

impl DocumentTree for Dom {
    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.nodes.get(node.index()).map(|n| n.kind)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index()).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.index())
            .map_or(&[], |n| n.children.as_slice())
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes
            .get(node.index())
            .filter(|n| n.kind == NodeKind::Text)
            .map(|n| n.value.as_str())
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes
            .get(node.index())
            .filter(|n| n.kind == NodeKind::Element)
            .map(|n| n.value.as_str())
    }
}
