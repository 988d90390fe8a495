//! Domain layer: the node tree and its operations
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
mod file;
mod link;
mod search;

pub use arena::{NodeTree, TreeIterator};
pub use builder::{BuiltTree, Layout, LayoutKind, LayoutNode, TreeBuilder};
pub use entities::*;
pub use error::{LayoutError, NodeError, NodeResult, SEARCH_FAILED};
