pub mod content;
pub mod dom;
pub mod engine;
pub mod error;
pub mod finder;
pub mod markers;
pub mod range;
pub mod translate;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use content::{Marker, PathResolver, TextContent};
pub use dom::{DocumentTree, Dom, NodeId, NodeKind};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use finder::{
    Finder, LiteralOptions, Pattern, Query, TextQuery, create_finder, create_finder_with,
};
pub use markers::{Cursor, Entry, MarkerIndex, Placement, Subscription};
pub use range::{PathPoint, PathRange, RangeDescriptor, TextRange};
pub use translate::{BoundaryPoint, NativeRange, RangeTranslator};

pub use textmark_config::EngineConfig;
