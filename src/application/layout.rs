//! Layout files: TOML descriptions of a node tree

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{BuiltTree, Layout, TreeBuilder};

/// Parse a layout from TOML text.
pub fn parse_layout(content: &str, path: &Path) -> ApplicationResult<Layout> {
    toml::from_str(content).map_err(|source| ApplicationError::LayoutSyntax {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse a layout file.
#[instrument(level = "debug")]
pub fn load_layout(path: &Path) -> ApplicationResult<Layout> {
    let content = std::fs::read_to_string(path).with_path_context("read layout", path)?;
    parse_layout(&content, path)
}

/// Read a layout file and build its tree.
pub fn build_from_file(path: &Path) -> ApplicationResult<BuiltTree> {
    let layout = load_layout(path)?;
    let built = TreeBuilder::new()
        .build(&layout)
        .map_err(|source| ApplicationError::Layout {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(nodes = built.tree.len(), "tree built from layout");
    Ok(built)
}
