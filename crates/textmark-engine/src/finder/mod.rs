//! # Finders
//!
//! A finder turns a query into a sequence of [`TextRange`]s over one
//! [`TextContent`]. Build one with [`create_finder`]; the kind is chosen by
//! the query variant.
//!
//! - **`text`**: literal and pattern search over the flattened text
//! - **`path`**: restores a persisted [`PathRange`]

pub mod path;
pub mod text;

pub use path::PathFinder;
pub use text::{Pattern, PatternFlags, TextFinder, normalise_literal};

use textmark_config::{DEFAULT_LITERAL_FLAGS, EngineConfig};

use crate::content::TextContent;
use crate::dom::DocumentTree;
use crate::error::Result;
use crate::range::{PathRange, TextRange};

/// What to search for.
#[derive(Debug, Clone)]
pub enum Query {
    Text(TextQuery),
    PathRange(PathRange),
}

/// A text query: either a literal string or a compiled [`Pattern`].
#[derive(Debug, Clone)]
pub enum TextQuery {
    /// Matched literally; surrounding whitespace is ignored.
    Literal(String),
    Pattern(Pattern),
}

impl From<&str> for Query {
    fn from(literal: &str) -> Self {
        Query::Text(TextQuery::Literal(literal.to_string()))
    }
}

impl From<String> for Query {
    fn from(literal: String) -> Self {
        Query::Text(TextQuery::Literal(literal))
    }
}

impl From<Pattern> for Query {
    fn from(pattern: Pattern) -> Self {
        Query::Text(TextQuery::Pattern(pattern))
    }
}

impl From<PathRange> for Query {
    fn from(range: PathRange) -> Self {
        Query::PathRange(range)
    }
}

/// How literal queries are compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralOptions {
    pub flags: String,
    pub collapse_whitespace: bool,
}

impl Default for LiteralOptions {
    fn default() -> Self {
        Self {
            flags: DEFAULT_LITERAL_FLAGS.to_string(),
            collapse_whitespace: true,
        }
    }
}

impl From<&EngineConfig> for LiteralOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            flags: config.literal_flags.clone(),
            collapse_whitespace: config.collapse_whitespace,
        }
    }
}

/// A finder of either kind.
#[derive(Debug)]
pub enum Finder<'c> {
    Text(TextFinder<'c>),
    Path(PathFinder<'c>),
}

impl Iterator for Finder<'_> {
    type Item = TextRange;

    fn next(&mut self) -> Option<TextRange> {
        match self {
            Finder::Text(finder) => finder.next(),
            Finder::Path(finder) => finder.next(),
        }
    }
}

/// Build the finder matching `query`, compiling literals with the default
/// options (case-insensitive, whitespace collapsed).
pub fn create_finder<'c, T: DocumentTree + ?Sized>(
    tree: &T,
    content: &'c TextContent,
    query: &Query,
) -> Result<Finder<'c>> {
    create_finder_with(tree, content, query, &LiteralOptions::default())
}

pub fn create_finder_with<'c, T: DocumentTree + ?Sized>(
    tree: &T,
    content: &'c TextContent,
    query: &Query,
    options: &LiteralOptions,
) -> Result<Finder<'c>> {
    match query {
        Query::Text(TextQuery::Literal(literal)) => {
            let pattern =
                Pattern::literal_with(literal, &options.flags, options.collapse_whitespace)?;
            Ok(Finder::Text(TextFinder::new(content, &pattern)?))
        }
        Query::Text(TextQuery::Pattern(pattern)) => {
            Ok(Finder::Text(TextFinder::new(content, pattern)?))
        }
        Query::PathRange(range) => Ok(Finder::Path(PathFinder::new(tree, content, range)?)),
    }
}
