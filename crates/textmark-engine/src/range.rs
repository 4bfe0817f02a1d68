//! Ranges over flattened text and their persisted path form.

use serde::{Deserialize, Serialize};

use crate::content::{Marker, PathResolver, TextContent};
use crate::dom::{DocumentTree, walk};
use crate::error::{EngineError, Result};

/// A position inside one text leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeDescriptor {
    pub marker: Marker,
    /// Byte offset relative to the start of the marker's leaf.
    pub offset: usize,
}

impl RangeDescriptor {
    /// Descriptor for a flattened offset inside `marker`'s leaf.
    pub fn absolute(marker: Marker, offset: usize) -> Self {
        Self {
            marker,
            offset: offset.saturating_sub(marker.offset),
        }
    }

    /// Descriptor for an offset already relative to `marker`'s leaf.
    pub fn relative(marker: Marker, offset: usize) -> Self {
        Self { marker, offset }
    }

    /// Flattened offset this descriptor points at.
    pub fn global(&self) -> usize {
        self.marker.offset + self.offset
    }
}

/// One end of a persisted range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathPoint {
    pub path: String,
    /// Byte offset from the start of the logical run addressed by `path`.
    pub offset: usize,
}

/// Durable, serializable form of a [`TextRange`].
///
/// `end.offset` is exclusive: it names the byte after the last one included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathRange {
    pub start: PathPoint,
    pub end: PathPoint,
}

/// A range between two leaf positions; both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    start: RangeDescriptor,
    end: RangeDescriptor,
}

impl TextRange {
    pub fn new(start: RangeDescriptor, end: RangeDescriptor) -> Result<Self> {
        if start.global() > end.global() {
            return Err(EngineError::InvalidRange {
                start: start.global(),
                end: end.global(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> &RangeDescriptor {
        &self.start
    }

    pub fn end(&self) -> &RangeDescriptor {
        &self.end
    }

    pub fn absolute_start_offset(&self) -> usize {
        self.start.global()
    }

    /// Flattened offset of the last byte in the range.
    pub fn absolute_end_offset(&self) -> usize {
        self.end.global()
    }

    /// Move the start to the beginning of its leaf.
    pub fn clear_start_offset(&mut self) {
        self.start.offset = 0;
    }

    /// Number of bytes covered by the range.
    ///
    /// Ranges spanning several leaves are measured by walking the live tree
    /// from the start leaf to the end leaf, so intermediate leaves count with
    /// their current length.
    pub fn length<T: DocumentTree + ?Sized>(&self, tree: &T, content: &TextContent) -> usize {
        let (first, last) = (self.start.marker.node, self.end.marker.node);
        if first == last {
            return self.end.offset - self.start.offset + 1;
        }

        let mut length =
            tree.text_len(first).saturating_sub(self.start.offset) + self.end.offset + 1;
        let mut it = walk::next_text_node(tree, first, content.root());
        while let Some(node) = it {
            if node == last {
                break;
            }
            length += tree.text_len(node);
            it = walk::next_text_node(tree, node, content.root());
        }
        length
    }

    /// The text covered by the range.
    pub fn to_text<'c, T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        content: &'c TextContent,
    ) -> Option<&'c str> {
        content.substring(self.absolute_start_offset(), self.length(tree, content))
    }

    /// Persisted form of the range, relative to `content`'s root.
    pub fn to_path_range<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        content: &TextContent,
    ) -> Option<PathRange> {
        let resolver = PathResolver::new(content.root());
        let (first, last) = (self.start.marker.node, self.end.marker.node);

        Some(PathRange {
            start: PathPoint {
                path: resolver.path_of(tree, first)?,
                offset: self.start.offset + resolver.logical_offset(tree, first),
            },
            end: PathPoint {
                path: resolver.path_of(tree, last)?,
                offset: self.end.offset + resolver.logical_offset(tree, last) + 1,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::setup;
    use pretty_assertions::assert_eq;

    fn range(content: &TextContent, start: usize, end: usize) -> TextRange {
        let first = *content.marker_at_offset(start).unwrap();
        let last = *content.marker_at_offset(end).unwrap();
        TextRange::new(
            RangeDescriptor::absolute(first, start),
            RangeDescriptor::absolute(last, end),
        )
        .unwrap()
    }

    #[test]
    fn test_descriptor_modes_agree() {
        let marker = Marker {
            node: crate::dom::NodeId(3),
            offset: 10,
            len: 5,
        };
        assert_eq!(
            RangeDescriptor::absolute(marker, 12),
            RangeDescriptor::relative(marker, 2)
        );
        assert_eq!(RangeDescriptor::relative(marker, 2).global(), 12);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let (_, content) = setup("<p>hello</p>");
        let marker = content.markers()[0];

        let err = TextRange::new(
            RangeDescriptor::relative(marker, 3),
            RangeDescriptor::relative(marker, 1),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::InvalidRange { start: 3, end: 1 });
    }

    #[test]
    fn test_single_leaf_length_and_text() {
        let (dom, content) = setup("<p>hello world</p>");
        let r = range(&content, 6, 10);

        assert_eq!(r.length(&dom, &content), 5);
        assert_eq!(r.to_text(&dom, &content), Some("world"));
        assert_eq!(r.absolute_start_offset(), 6);
        assert_eq!(r.absolute_end_offset(), 10);
    }

    #[test]
    fn test_multi_leaf_length_walks_tree() {
        let (dom, content) = setup("<p>The <b>quick</b> brown<i>!</i></p>");
        let r = range(&content, 2, 12);

        assert_eq!(r.length(&dom, &content), 11);
        assert_eq!(r.to_text(&dom, &content), Some("e quick bro"));
    }

    #[test]
    fn test_to_path_range_uses_exclusive_end() {
        let (dom, content) = setup("<p>The <b>quick</b> fox</p>");
        let r = range(&content, 4, 8);

        assert_eq!(
            r.to_path_range(&dom, &content).unwrap(),
            PathRange {
                start: PathPoint {
                    path: "/p[1]/b[1]/text()[1]".to_string(),
                    offset: 0,
                },
                end: PathPoint {
                    path: "/p[1]/b[1]/text()[1]".to_string(),
                    offset: 5,
                },
            }
        );
    }

    #[test]
    fn test_to_path_range_measures_from_logical_run() {
        let (mut dom, _) = setup("<p>hello world</p>");
        let p = dom.children(dom.root())[0];
        let text = dom.children(p)[0];
        dom.split_text(text, 6).unwrap();
        let content = TextContent::new(&dom, dom.root());

        let r = range(&content, 6, 10);
        assert_eq!(r.start().marker.node, dom.children(p)[1]);

        let persisted = r.to_path_range(&dom, &content).unwrap();
        assert_eq!(persisted.start.path, "/p[1]/text()[1]");
        assert_eq!(persisted.start.offset, 6);
        assert_eq!(persisted.end.offset, 11);
    }

    #[test]
    fn test_path_range_wire_shape() {
        let persisted = PathRange {
            start: PathPoint {
                path: "/p[1]/text()[1]".to_string(),
                offset: 0,
            },
            end: PathPoint {
                path: "/p[1]/text()[1]".to_string(),
                offset: 3,
            },
        };

        let json = serde_json::to_string(&persisted).unwrap();
        assert_eq!(
            json,
            r#"{"start":{"path":"/p[1]/text()[1]","offset":0},"end":{"path":"/p[1]/text()[1]","offset":3}}"#
        );
        let back: PathRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, persisted);
    }

    #[test]
    fn test_clear_start_offset() {
        let (dom, content) = setup("<p>hello</p>");
        let mut r = range(&content, 2, 4);
        r.clear_start_offset();
        assert_eq!(r.to_text(&dom, &content), Some("hello"));
    }
}
