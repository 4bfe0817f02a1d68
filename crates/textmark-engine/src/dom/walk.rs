//! Document-order traversal over any [`DocumentTree`].
//!
//! Every walk is bounded by a root: nothing outside the root's subtree is
//! ever returned.

use super::{DocumentTree, NodeId};

/// Whether `node` is `root` or one of its descendants.
pub fn contains<T: DocumentTree + ?Sized>(tree: &T, root: NodeId, node: NodeId) -> bool {
    let mut it = Some(node);
    while let Some(current) = it {
        if current == root {
            return true;
        }
        it = tree.parent(current);
    }
    false
}

/// All text nodes under `root` in document order, `root` included if it is text.
pub fn text_leaves<T: DocumentTree + ?Sized>(tree: &T, root: NodeId) -> Vec<NodeId> {
    let mut leaves = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if tree.is_text(node) {
            leaves.push(node);
        } else {
            stack.extend(tree.children(node).iter().rev());
        }
    }
    leaves
}

/// First text node in the subtree of `container`.
pub fn first_text_node<T: DocumentTree + ?Sized>(tree: &T, container: NodeId) -> Option<NodeId> {
    if tree.is_text(container) {
        return Some(container);
    }
    tree.children(container)
        .iter()
        .find_map(|&child| first_text_node(tree, child))
}

/// Last text node in the subtree of `container`.
pub fn last_text_node<T: DocumentTree + ?Sized>(tree: &T, container: NodeId) -> Option<NodeId> {
    if tree.is_text(container) {
        return Some(container);
    }
    tree.children(container)
        .iter()
        .rev()
        .find_map(|&child| last_text_node(tree, child))
}

/// The text node preceding `from` in document order, without leaving `root`.
///
/// Climbs to the parent whenever there is no previous sibling, and descends
/// into the last text node of each previous sibling element.
pub fn previous_text_node<T: DocumentTree + ?Sized>(
    tree: &T,
    from: NodeId,
    root: NodeId,
) -> Option<NodeId> {
    let mut it = from;
    loop {
        if it == root {
            return None;
        }
        match tree.previous_sibling(it) {
            Some(prev) => {
                it = prev;
                if let Some(text) = last_text_node(tree, prev) {
                    return Some(text);
                }
            }
            None => it = tree.parent(it)?,
        }
    }
}

/// The text node following `from` in document order, without leaving `root`.
///
/// Descendants of `from` are skipped: `from` is treated as a leaf.
pub fn next_text_node<T: DocumentTree + ?Sized>(
    tree: &T,
    from: NodeId,
    root: NodeId,
) -> Option<NodeId> {
    let mut it = from;
    loop {
        if it == root {
            return None;
        }
        match tree.next_sibling(it) {
            Some(next) => {
                it = next;
                if let Some(text) = first_text_node(tree, next) {
                    return Some(text);
                }
            }
            None => it = tree.parent(it)?,
        }
    }
}
