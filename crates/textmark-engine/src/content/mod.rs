//! # Text Content
//!
//! Flattens a subtree into one linear string plus a dense, offset-ascending
//! marker per text leaf. The markers are a snapshot: after any structural edit
//! of the host tree the caller must [`TextContent::reflatten`].
//!
//! - **`path`**: structural paths that address leaves durably across reloads

pub mod path;

pub use path::PathResolver;

use crate::dom::{DocumentTree, NodeId, walk};

/// Index entry binding a text leaf to its flattened start offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub node: NodeId,
    /// Flattened byte offset of the leaf's first byte.
    pub offset: usize,
    /// Byte length of the leaf's text at flatten time.
    pub len: usize,
}

impl Marker {
    /// Flattened offset one past the leaf's last byte.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Flattened text of a subtree with its leaf markers.
#[derive(Debug, Clone)]
pub struct TextContent {
    root: NodeId,
    text: String,
    markers: Vec<Marker>,
}

impl TextContent {
    pub fn new<T: DocumentTree + ?Sized>(tree: &T, root: NodeId) -> Self {
        let mut content = Self {
            root,
            text: String::new(),
            markers: Vec::new(),
        };
        content.reflatten(tree);
        content
    }

    /// Rebuild text and markers from the current state of the tree.
    pub fn reflatten<T: DocumentTree + ?Sized>(&mut self, tree: &T) {
        self.text.clear();
        self.markers.clear();

        for node in walk::text_leaves(tree, self.root) {
            let Some(text) = tree.text(node) else {
                continue;
            };
            if text.is_empty() {
                continue;
            }
            self.markers.push(Marker {
                node,
                offset: self.text.len(),
                len: text.len(),
            });
            self.text.push_str(text);
        }

        log::trace!(
            "flattened {} leaves ({} bytes) under {:?}",
            self.markers.len(),
            self.text.len(),
            self.root
        );
    }

    /// Bind to a different root and flatten it.
    pub fn set_root<T: DocumentTree + ?Sized>(&mut self, tree: &T, root: NodeId) {
        self.root = root;
        self.reflatten(tree);
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Length of the flattened text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Position of `node` in the marker sequence.
    pub fn find(&self, node: NodeId) -> Option<usize> {
        self.markers.iter().position(|m| m.node == node)
    }

    pub fn at(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    /// Index of the marker whose leaf contains flattened offset `offset`.
    pub fn index_at_offset(&self, offset: usize) -> Option<usize> {
        if offset >= self.text.len() {
            return None;
        }
        // Markers are contiguous, so the containing one is the last that starts
        // at or before `offset`.
        let index = self.markers.partition_point(|m| m.offset <= offset);
        index.checked_sub(1)
    }

    /// Marker whose leaf contains flattened offset `offset`.
    pub fn marker_at_offset(&self, offset: usize) -> Option<&Marker> {
        self.index_at_offset(offset).and_then(|i| self.markers.get(i))
    }

    /// `len` bytes of flattened text starting at `offset`.
    pub fn substring(&self, offset: usize, len: usize) -> Option<&str> {
        self.text.get(offset..offset.checked_add(len)?)
    }

    /// Drop all references to leaves.
    pub fn dispose(&mut self) {
        self.text = String::new();
        self.markers = Vec::new();
    }
}
