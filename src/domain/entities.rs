//! Domain entities: core data structures

use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

/// Stable handle of a node inside a [`NodeTree`](crate::domain::NodeTree).
///
/// Generational: once a node is released its id never resolves again,
/// even if the slot gets reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) Index);

impl NodeId {
    pub(crate) fn index(self) -> Index {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}.{}", slot, generation)
    }
}

/// Lifecycle state of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileState {
    Open,
    #[default]
    Closed,
    Deleted,
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileState::Open => write!(f, "open"),
            FileState::Closed => write!(f, "closed"),
            FileState::Deleted => write!(f, "deleted"),
        }
    }
}

/// Variant-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Bare node without children, state or target
    Plain,
    /// Container owning its children (the root is a directory too)
    Directory { children: Vec<NodeId> },
    File { state: FileState },
    /// Non-owning reference, `None` while unset
    Link { target: Option<NodeId> },
}

impl NodeKind {
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Directory { .. })
    }
}

/// Arena entry for one node.
#[derive(Debug, Clone)]
pub struct NodeEntry {
    /// Stored base name; links and the root do not expose it directly
    pub(crate) base_name: String,
    /// Containing directory, None for the root and detached nodes
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl NodeEntry {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Raw stored name, bypassing link delegation and file checks.
    pub fn stored_name(&self) -> &str {
        &self.base_name
    }
}
