//! Entry point bundling the flattened content of one root with the
//! configuration that drives queries and notifications.

use textmark_config::EngineConfig;

use crate::content::TextContent;
use crate::dom::{DocumentTree, NodeId};
use crate::error::Result;
use crate::finder::{Finder, LiteralOptions, Query, create_finder_with};
use crate::markers::{MarkerIndex, Placement};
use crate::range::TextRange;
use crate::translate::{NativeRange, RangeTranslator};

#[derive(Debug)]
pub struct Engine {
    content: TextContent,
    config: EngineConfig,
    literal: LiteralOptions,
}

impl Engine {
    pub fn new<T: DocumentTree + ?Sized>(tree: &T, root: NodeId, config: EngineConfig) -> Self {
        let literal = LiteralOptions::from(&config);
        Self {
            content: TextContent::new(tree, root),
            config,
            literal,
        }
    }

    pub fn content(&self) -> &TextContent {
        &self.content
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Re-flatten after the host tree changed structurally.
    pub fn refresh<T: DocumentTree + ?Sized>(&mut self, tree: &T) {
        self.content.reflatten(tree);
    }

    pub fn finder<T: DocumentTree + ?Sized>(&self, tree: &T, query: &Query) -> Result<Finder<'_>> {
        create_finder_with(tree, &self.content, query, &self.literal)
    }

    /// Visit every hit of `query` with its position.
    ///
    /// Stops as soon as `visit` returns `false` and reports whether every hit
    /// was visited.
    pub fn query<T, F>(&self, tree: &T, query: &Query, mut visit: F) -> Result<bool>
    where
        T: DocumentTree + ?Sized,
        F: FnMut(TextRange, usize) -> bool,
    {
        for (index, range) in self.finder(tree, query)?.enumerate() {
            if !visit(range, index) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn translate<T: DocumentTree + ?Sized>(
        &self,
        tree: &T,
        native: &NativeRange,
    ) -> Option<TextRange> {
        RangeTranslator::new(&self.content).translate(tree, native)
    }

    /// An empty marker index using the configured notification delay.
    pub fn marker_index<H: Placement + PartialEq>(&self) -> MarkerIndex<H> {
        MarkerIndex::new(self.config.notify_delay())
    }

    pub fn dispose(&mut self) {
        self.content.dispose();
    }
}
