//! Restores a persisted [`PathRange`] against the current tree.

use crate::content::{PathResolver, TextContent};
use crate::dom::{DocumentTree, NodeId};
use crate::error::{EngineError, Result};
use crate::range::{PathPoint, PathRange, RangeDescriptor, TextRange};

/// Yields the single range addressed by a [`PathRange`], then stops.
#[derive(Debug)]
pub struct PathFinder<'c> {
    content: &'c TextContent,
    start: usize,
    end: usize,
    done: bool,
}

impl<'c> PathFinder<'c> {
    /// Resolve `range` against `tree`.
    ///
    /// Fails with [`EngineError::RangeResolution`] when either path no longer
    /// addresses flattened text, and with [`EngineError::InvalidRange`] when
    /// the resolved start lies after the resolved end.
    pub fn new<T: DocumentTree + ?Sized>(
        tree: &T,
        content: &'c TextContent,
        range: &PathRange,
    ) -> Result<Self> {
        if range.end.offset == 0 {
            return Err(EngineError::InvalidQuery(format!(
                "end offset of {} must be positive",
                range.end.path
            )));
        }

        let resolver = PathResolver::new(content.root());
        let start = run_start(tree, content, &resolver, &range.start)? + range.start.offset;
        let end = run_start(tree, content, &resolver, &range.end)? + range.end.offset - 1;

        if start > end {
            return Err(EngineError::InvalidRange { start, end });
        }
        if end >= content.len() {
            log::debug!(
                "{} offset {} runs past the flattened text",
                range.end.path,
                range.end.offset
            );
            return Err(EngineError::RangeResolution {
                path: range.end.path.clone(),
            });
        }

        Ok(Self {
            content,
            start,
            end,
            done: false,
        })
    }

    fn range(&self) -> Option<TextRange> {
        let first = *self.content.marker_at_offset(self.start)?;
        let last = *self.content.marker_at_offset(self.end)?;
        TextRange::new(
            RangeDescriptor::absolute(first, self.start),
            RangeDescriptor::absolute(last, self.end),
        )
        .ok()
    }
}

/// Flattened offset at which the logical run addressed by `point` begins.
fn run_start<T: DocumentTree + ?Sized>(
    tree: &T,
    content: &TextContent,
    resolver: &PathResolver,
    point: &PathPoint,
) -> Result<usize> {
    let unresolved = || EngineError::RangeResolution {
        path: point.path.clone(),
    };

    let node: NodeId = resolver.resolve(tree, &point.path).ok_or_else(unresolved)?;
    // Empty leaves have no marker; any indexed leaf of the run locates it.
    resolver
        .run_of(tree, node)
        .into_iter()
        .find_map(|leaf| {
            let marker = content.at(content.find(leaf)?)?;
            marker
                .offset
                .checked_sub(resolver.logical_offset(tree, leaf))
        })
        .ok_or_else(unresolved)
}

impl Iterator for PathFinder<'_> {
    type Item = TextRange;

    fn next(&mut self) -> Option<TextRange> {
        if self.done {
            return None;
        }
        self.done = true;
        self.range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::setup;
    use crate::dom::markup;
    use pretty_assertions::assert_eq;

    fn path_range(start: (&str, usize), end: (&str, usize)) -> PathRange {
        PathRange {
            start: PathPoint {
                path: start.0.to_string(),
                offset: start.1,
            },
            end: PathPoint {
                path: end.0.to_string(),
                offset: end.1,
            },
        }
    }

    #[test]
    fn test_yields_one_range_then_stops() {
        let (dom, content) = setup("<p>The <b>quick</b> fox</p>");
        let query = path_range(("/p[1]/b[1]/text()[1]", 0), ("/p[1]/text()[2]", 4));
        let mut finder = PathFinder::new(&dom, &content, &query).unwrap();

        let hit = finder.next().unwrap();
        assert_eq!(hit.to_text(&dom, &content), Some("quick fox"));
        assert!(finder.next().is_none());
        assert!(finder.next().is_none());
    }

    #[test]
    fn test_zero_end_offset_is_invalid() {
        let (dom, content) = setup("<p>abc</p>");
        let query = path_range(("/p[1]/text()[1]", 0), ("/p[1]/text()[1]", 0));
        assert!(matches!(
            PathFinder::new(&dom, &content, &query),
            Err(EngineError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_unresolvable_path_names_the_path() {
        let (dom, content) = setup("<p>abc</p>");
        let query = path_range(("/p[1]/text()[1]", 0), ("/p[3]/text()[1]", 2));
        assert_eq!(
            PathFinder::new(&dom, &content, &query).unwrap_err(),
            EngineError::RangeResolution {
                path: "/p[3]/text()[1]".to_string()
            }
        );
    }

    #[test]
    fn test_reversed_points_are_an_invalid_range() {
        let (dom, content) = setup("<p>abcdef</p>");
        let query = path_range(("/p[1]/text()[1]", 4), ("/p[1]/text()[1]", 2));
        assert_eq!(
            PathFinder::new(&dom, &content, &query).unwrap_err(),
            EngineError::InvalidRange { start: 4, end: 1 }
        );
    }

    #[test]
    fn test_offset_past_text_does_not_resolve() {
        let (dom, content) = setup("<p>abc</p>");
        let query = path_range(("/p[1]/text()[1]", 0), ("/p[1]/text()[1]", 9));
        assert!(matches!(
            PathFinder::new(&dom, &content, &query),
            Err(EngineError::RangeResolution { .. })
        ));
    }

    #[test]
    fn test_offsets_cross_split_leaves() {
        let mut dom = markup::parse("<p>hello world</p>").unwrap();
        let p = dom.children(dom.root())[0];
        let text = dom.children(p)[0];
        let tail = dom.split_text(text, 6).unwrap();
        let content = TextContent::new(&dom, dom.root());

        let query = path_range(("/p[1]/text()[1]", 6), ("/p[1]/text()[1]", 11));
        let hit = PathFinder::new(&dom, &content, &query)
            .unwrap()
            .next()
            .unwrap();

        assert_eq!(hit.start().marker.node, tail);
        assert_eq!(hit.start().offset, 0);
        assert_eq!(hit.to_text(&dom, &content), Some("world"));
    }
}
