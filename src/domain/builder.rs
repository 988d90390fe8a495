//! Tree builder turning a declarative layout into a node tree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::LayoutError;
use crate::domain::{FileState, NodeId, NodeTree};

/// Result type for layout building.
pub type BuildResult<T> = Result<T, LayoutError>;

/// Declarative description of a tree; top-level entries hang off the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Node,
    Directory,
    File,
    Link,
}

/// One node of a layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutNode {
    pub name: String,
    pub kind: LayoutKind,
    /// Handle that links can target
    pub label: Option<String>,
    /// Label of the link target (links only)
    pub target: Option<String>,
    /// Initial file state (files only)
    pub state: Option<FileState>,
    /// Create outside the root's subtree (nodes and directories only)
    pub detached: bool,
    pub children: Vec<LayoutNode>,
}

/// A built tree together with its labelled nodes.
#[derive(Debug)]
pub struct BuiltTree {
    pub tree: NodeTree,
    pub labels: HashMap<String, NodeId>,
}

impl BuiltTree {
    pub fn label(&self, label: &str) -> Option<NodeId> {
        self.labels.get(label).copied()
    }
}

/// Constructs node trees from layouts.
///
/// Links are wired in a second pass so they may target nodes declared
/// after them.
pub struct TreeBuilder {
    labels: HashMap<String, NodeId>,
    pending_links: Vec<(NodeId, String, String)>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            labels: HashMap::new(),
            pending_links: Vec::new(),
        }
    }

    #[instrument(level = "debug", skip_all)]
    pub fn build(&mut self, layout: &Layout) -> BuildResult<BuiltTree> {
        // Reset state for a fresh build
        self.labels.clear();
        self.pending_links.clear();

        let mut tree = NodeTree::new();
        let root = tree.root();
        for node in &layout.nodes {
            self.insert(&mut tree, node, Some(root))?;
        }

        for (link, name, label) in self.pending_links.drain(..) {
            let target = *self
                .labels
                .get(&label)
                .ok_or(LayoutError::UnknownTarget { link: name, label })?;
            tree.set_target_node(link, Some(target))?;
        }

        debug!(nodes = tree.len(), labels = self.labels.len(), "layout built");
        Ok(BuiltTree {
            tree,
            labels: std::mem::take(&mut self.labels),
        })
    }

    fn insert(
        &mut self,
        tree: &mut NodeTree,
        node: &LayoutNode,
        parent: Option<NodeId>,
    ) -> BuildResult<NodeId> {
        validate(node)?;
        let parent = if node.detached { None } else { parent };

        let id = match node.kind {
            LayoutKind::Node => tree.create_node(&node.name, parent)?,
            LayoutKind::Directory => tree.create_directory(&node.name, parent)?,
            LayoutKind::File => {
                let id = tree.create_file(&node.name, required(node, parent)?)?;
                match node.state.unwrap_or_default() {
                    FileState::Closed => {}
                    FileState::Open => tree.open(id)?,
                    FileState::Deleted => tree.delete(id)?,
                }
                id
            }
            LayoutKind::Link => {
                let id = tree.create_link(&node.name, required(node, parent)?, None)?;
                if let Some(label) = &node.target {
                    self.pending_links
                        .push((id, node.name.clone(), label.clone()));
                }
                id
            }
        };

        if let Some(label) = &node.label {
            if self.labels.insert(label.clone(), id).is_some() {
                return Err(LayoutError::DuplicateLabel(label.clone()));
            }
        }

        for child in &node.children {
            self.insert(tree, child, Some(id))?;
        }
        Ok(id)
    }
}

fn validate(node: &LayoutNode) -> BuildResult<()> {
    let reason = match node.kind {
        _ if !node.children.is_empty() && node.kind != LayoutKind::Directory => {
            Some("only directories have children")
        }
        _ if node.state.is_some() && node.kind != LayoutKind::File => {
            Some("only files have a state")
        }
        _ if node.target.is_some() && node.kind != LayoutKind::Link => {
            Some("only links have a target")
        }
        LayoutKind::File | LayoutKind::Link if node.detached => {
            Some("files and links always live in a directory")
        }
        _ => None,
    };
    match reason {
        Some(reason) => Err(invalid(node, reason)),
        None => Ok(()),
    }
}

fn required(node: &LayoutNode, parent: Option<NodeId>) -> BuildResult<NodeId> {
    parent.ok_or_else(|| invalid(node, "missing parent directory"))
}

fn invalid(node: &LayoutNode, reason: &str) -> LayoutError {
    LayoutError::InvalidEntry {
        name: node.name.clone(),
        reason: reason.to_string(),
    }
}
