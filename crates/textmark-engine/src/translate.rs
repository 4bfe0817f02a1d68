//! Translation of native selection boundaries into [`TextRange`]s.
//!
//! Hosts report selections as `(container, offset)` pairs where the container
//! may be an element (the offset then counts children) and where the end may
//! sit after whitespace the host collapsed away when rendering. The
//! translator normalises both ends onto text leaves before building a range.

use thiserror::Error;

use crate::content::TextContent;
use crate::dom::{DocumentTree, NodeId, walk};
use crate::range::{RangeDescriptor, TextRange};

/// A `(container, offset)` pair as reported by a host selection API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryPoint {
    pub container: NodeId,
    /// Byte offset into a text container, or child index into an element.
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(container: NodeId, offset: usize) -> Self {
        Self { container, offset }
    }
}

/// A raw selection. `start` is where the selection began, so it may lie
/// after `end` in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeRange {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
}

impl NativeRange {
    pub fn new(start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Error)]
enum TranslateError {
    #[error("Invalid boundary: {0}")]
    InvalidBoundary(String),
    #[error("No text content before boundary")]
    NoContent,
}

/// Translates native selections against one flattened content.
#[derive(Debug, Clone, Copy)]
pub struct RangeTranslator<'c> {
    content: &'c TextContent,
}

impl<'c> RangeTranslator<'c> {
    pub fn new(content: &'c TextContent) -> Self {
        Self { content }
    }

    /// Exact range covered by `native`, or `None` when the selection is
    /// empty, has no text, or cannot be mapped onto the flattened content.
    pub fn translate<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        native: &NativeRange,
    ) -> Option<TextRange> {
        let boundaries = normalised_start(tree, native.start).and_then(|start| {
            normalised_end(tree, native.end, self.content.root()).map(|end| (start, end))
        });
        let (start, end) = match boundaries {
            Ok(points) => points,
            Err(err @ TranslateError::InvalidBoundary(_)) => {
                log::warn!("unable to compute boundary points: {err}");
                return None;
            }
            Err(err) => {
                log::debug!("unable to compute boundary points: {err}");
                return None;
            }
        };

        let (Some(start_index), Some(end_index)) = (
            self.content.find(start.container),
            self.content.find(end.container),
        ) else {
            log::error!(
                "selection boundaries {:?} and {:?} are not indexed leaves",
                start.container,
                end.container
            );
            return None;
        };
        let first = *self.content.at(start_index)?;
        let last = *self.content.at(end_index)?;

        if self.is_forward(native) && (end_index, end.offset) <= (start_index, start.offset) {
            log::debug!("selection holds only collapsed whitespace");
            return None;
        }

        let same_node = start.container == end.container;
        let (start_global, end_global) = (first.offset + start.offset, last.offset + end.offset);
        let len = if same_node {
            start.offset.abs_diff(end.offset)
        } else {
            start_global.abs_diff(end_global)
        };
        if len == 0 {
            return None;
        }

        let forward = start_index < end_index || (same_node && start.offset < end.offset);
        let (from, to) = match (forward, same_node) {
            (true, true) => (start_global, start_global + len - 1),
            (true, false) => (start_global, end_global.checked_sub(1)?),
            (false, true) => (end_global, end_global + len - 1),
            (false, false) => (end_global, start_global.checked_sub(1)?),
        };

        let range = TextRange::new(self.descriptor_at(from)?, self.descriptor_at(to)?);
        range
            .inspect_err(|err| log::warn!("selection did not form a range: {err}"))
            .ok()
    }

    /// Whether the raw selection runs forward. Only known when both
    /// boundaries sit in indexed leaves.
    fn is_forward(&self, native: &NativeRange) -> bool {
        match (
            self.content.find(native.start.container),
            self.content.find(native.end.container),
        ) {
            (Some(start), Some(end)) => (start, native.start.offset) < (end, native.end.offset),
            _ => false,
        }
    }

    fn descriptor_at(&self, global: usize) -> Option<RangeDescriptor> {
        let marker = *self.content.marker_at_offset(global)?;
        Some(RangeDescriptor::absolute(marker, global))
    }
}

fn normalised_start<T: DocumentTree + ?Sized>(
    tree: &T,
    point: BoundaryPoint,
) -> Result<BoundaryPoint, TranslateError> {
    if let Some(text) = tree.text(point.container) {
        if !text.is_char_boundary(point.offset) {
            return Err(TranslateError::InvalidBoundary(format!(
                "start offset {} out of range for {:?}",
                point.offset, point.container
            )));
        }
        return Ok(point);
    }

    let child = tree.child_at(point.container, point.offset).ok_or_else(|| {
        TranslateError::InvalidBoundary(format!(
            "start offset {} out of range for {:?}",
            point.offset, point.container
        ))
    })?;
    let leaf = walk::first_text_node(tree, child).unwrap_or(child);
    Ok(BoundaryPoint::new(leaf, 0))
}

fn normalised_end<T: DocumentTree + ?Sized>(
    tree: &T,
    point: BoundaryPoint,
    root: NodeId,
) -> Result<BoundaryPoint, TranslateError> {
    if tree.is_text(point.container) {
        return skip_end_whitespace(tree, point, root);
    }

    let container = point.container;
    let child_count = tree.children(container).len();
    let point = if point.offset > child_count {
        return Err(TranslateError::InvalidBoundary(format!(
            "end offset {} exceeds {child_count} children of {container:?}",
            point.offset
        )));
    } else if point.offset == child_count {
        match walk::last_text_node(tree, container) {
            Some(leaf) => BoundaryPoint::new(leaf, tree.text_len(leaf)),
            None => BoundaryPoint::new(container, 0),
        }
    } else if point.offset == 0 {
        let leaf = walk::previous_text_node(tree, container, root).ok_or_else(|| {
            TranslateError::InvalidBoundary(format!("no text before {container:?}"))
        })?;
        BoundaryPoint::new(leaf, tree.text_len(leaf))
    } else {
        let child = tree.child_at(container, point.offset).ok_or_else(|| {
            TranslateError::InvalidBoundary(format!("no child {} in {container:?}", point.offset))
        })?;
        BoundaryPoint::new(child, 0)
    };

    skip_end_whitespace(tree, point, root)
}

/// Move an end boundary back to just past the last non-whitespace character
/// at or before it, crossing into previous leaves when needed.
fn skip_end_whitespace<T: DocumentTree + ?Sized>(
    tree: &T,
    point: BoundaryPoint,
    root: NodeId,
) -> Result<BoundaryPoint, TranslateError> {
    if let Some(text) = tree.text(point.container) {
        let before = text.get(..point.offset).ok_or_else(|| {
            TranslateError::InvalidBoundary(format!(
                "offset {} is not a character boundary of {:?}",
                point.offset, point.container
            ))
        })?;
        if let Some(offset) = end_of_content(before) {
            return Ok(BoundaryPoint::new(point.container, offset));
        }
    } else if point.offset != 0 {
        return Err(TranslateError::InvalidBoundary(format!(
            "{:?} is not text",
            point.container
        )));
    }

    let mut it = walk::previous_text_node(tree, point.container, root);
    while let Some(leaf) = it {
        if let Some(offset) = tree.text(leaf).and_then(end_of_content) {
            return Ok(BoundaryPoint::new(leaf, offset));
        }
        it = walk::previous_text_node(tree, leaf, root);
    }
    Err(TranslateError::NoContent)
}

/// Byte offset just past the last non-whitespace character of `text`.
fn end_of_content(text: &str) -> Option<usize> {
    text.char_indices()
        .rev()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
}
