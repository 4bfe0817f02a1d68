//! Structural paths for text leaves.
//!
//! A path locates a node relative to a root as a sequence of `name[i]`
//! element steps, ending in `text()[k]` for text. Element indices count
//! same-named element siblings; text indices count *logical runs*, i.e.
//! maximal sequences of adjacent text siblings. A run that a renderer has
//! split into several leaves therefore keeps its path, and offsets into it
//! are measured from the start of the run.
//!
//! Element names are percent-encoded so that any name a host reports
//! survives the round trip. The empty path addresses the root itself.

use std::sync::OnceLock;

use regex::Regex;

use crate::dom::{DocumentTree, NodeId, walk};

const TEXT_STEP: &str = "text()";

fn segment_regex() -> &'static Regex {
    static SEGMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    SEGMENT_REGEX.get_or_init(|| {
        Regex::new(r"^(text\(\)|[A-Za-z0-9._~%-]*)\[([1-9][0-9]*)\]$")
            .expect("Invalid path segment regex")
    })
}

/// Computes and resolves structural paths below a fixed root.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver {
    root: NodeId,
}

impl PathResolver {
    pub fn new(root: NodeId) -> Self {
        Self { root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Path of `node` relative to the root, or `None` if it lies outside it.
    pub fn path_of<T: DocumentTree + ?Sized>(&self, tree: &T, node: NodeId) -> Option<String> {
        let mut steps = Vec::new();
        let mut it = node;
        while it != self.root {
            let parent = tree.parent(it)?;
            steps.push(self.step_of(tree, parent, it)?);
            it = parent;
        }

        let mut path = String::new();
        for step in steps.iter().rev() {
            path.push('/');
            path.push_str(step);
        }
        Some(path)
    }

    fn step_of<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        parent: NodeId,
        node: NodeId,
    ) -> Option<String> {
        let siblings = tree.children(parent);
        let position = siblings.iter().position(|&c| c == node)?;
        let preceding = &siblings[..position];

        if tree.is_text(node) {
            let starts = run_starts(tree, preceding);
            let run = if is_run_start(tree, preceding) {
                starts + 1
            } else {
                starts
            };
            Some(format!("{TEXT_STEP}[{run}]"))
        } else {
            let name = tree.name(node)?;
            let index = 1 + preceding
                .iter()
                .filter(|&&s| tree.name(s) == Some(name))
                .count();
            Some(format!("{}[{index}]", urlencoding::encode(name)))
        }
    }

    /// Offset of `node` within its logical run: the total length of the text
    /// siblings immediately before it.
    pub fn logical_offset<T: DocumentTree + ?Sized>(&self, tree: &T, node: NodeId) -> usize {
        if node == self.root {
            return 0;
        }
        let mut offset = 0;
        let mut it = tree.previous_sibling(node);
        while let Some(prev) = it.filter(|&p| tree.is_text(p)) {
            offset += tree.text_len(prev);
            it = tree.previous_sibling(prev);
        }
        offset
    }

    /// Every leaf of the logical run containing `node`, in document order.
    pub fn run_of<T: DocumentTree + ?Sized>(&self, tree: &T, node: NodeId) -> Vec<NodeId> {
        if !tree.is_text(node) {
            return Vec::new();
        }
        if node == self.root {
            return vec![node];
        }
        let Some(parent) = tree.parent(node) else {
            return vec![node];
        };

        let siblings = tree.children(parent);
        let Some(position) = siblings.iter().position(|&c| c == node) else {
            return vec![node];
        };
        let start = siblings[..position]
            .iter()
            .rposition(|&s| !tree.is_text(s))
            .map_or(0, |i| i + 1);
        let end = siblings[position..]
            .iter()
            .position(|&s| !tree.is_text(s))
            .map_or(siblings.len(), |i| position + i);
        siblings[start..end].to_vec()
    }

    /// Resolve a path produced by [`PathResolver::path_of`].
    ///
    /// Text paths resolve to the first leaf of the addressed run. Returns
    /// `None` for malformed, foreign or stale paths.
    pub fn resolve<T: DocumentTree + ?Sized>(&self, tree: &T, path: &str) -> Option<NodeId> {
        if path.is_empty() {
            return Some(self.root);
        }
        let Some(rest) = path.strip_prefix('/') else {
            log::debug!("path not rooted: {path:?}");
            return None;
        };

        let mut node = self.root;
        let mut steps = rest.split('/').peekable();
        while let Some(step) = steps.next() {
            let Some(caps) = segment_regex().captures(step) else {
                log::debug!("malformed path step {step:?} in {path:?}");
                return None;
            };
            let index: usize = caps[2].parse().ok()?;

            if &caps[1] == TEXT_STEP {
                if steps.peek().is_some() {
                    log::debug!("text step is not last in {path:?}");
                    return None;
                }
                return self.nth_run(tree, node, index);
            }

            let Ok(name) = urlencoding::decode(&caps[1]) else {
                log::debug!("undecodable element name {step:?} in {path:?}");
                return None;
            };
            node = tree
                .children(node)
                .iter()
                .copied()
                .filter(|&c| tree.name(c) == Some(&*name))
                .nth(index - 1)?;
        }

        Some(node)
    }

    fn nth_run<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        parent: NodeId,
        index: usize,
    ) -> Option<NodeId> {
        let children = tree.children(parent);
        children
            .iter()
            .enumerate()
            .filter(|&(i, &c)| tree.is_text(c) && is_run_start(tree, &children[..i]))
            .map(|(_, &c)| c)
            .nth(index - 1)
    }

    /// Whether `node` lies under the root this resolver is bound to.
    pub fn covers<T: DocumentTree + ?Sized>(&self, tree: &T, node: NodeId) -> bool {
        walk::contains(tree, self.root, node)
    }
}

/// Whether a text node placed after `preceding` starts a new run.
fn is_run_start<T: DocumentTree + ?Sized>(tree: &T, preceding: &[NodeId]) -> bool {
    preceding.last().is_none_or(|&prev| !tree.is_text(prev))
}

/// Number of runs that start within `siblings`.
fn run_starts<T: DocumentTree + ?Sized>(tree: &T, siblings: &[NodeId]) -> usize {
    siblings
        .iter()
        .enumerate()
        .filter(|&(i, &s)| tree.is_text(s) && is_run_start(tree, &siblings[..i]))
        .count()
}
