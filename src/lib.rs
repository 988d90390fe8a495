//! In-memory trees of directories, files and links, addressable by base name.
//!
//! All nodes of a hierarchy live in a [`domain::NodeTree`] arena. Searching
//! with [`domain::NodeTree::find_nodes`] reports structural defects found
//! anywhere below the start node as a single service failure.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree_traits;
pub mod util;
