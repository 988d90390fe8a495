use generational_arena::Arena;
use tracing::{debug, instrument, trace};

use crate::domain::{NodeEntry, NodeError, NodeId, NodeKind, NodeResult};

/// Arena-based node tree.
///
/// Owns every node of one hierarchy together with its root directory.
/// Parent back-references and link targets are plain [`NodeId`]s, so
/// neither keeps its referent alive.
#[derive(Debug)]
pub struct NodeTree {
    /// Arena storage for all nodes, attached or detached
    arena: Arena<NodeEntry>,
    /// Index of the root directory
    root: NodeId,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    /// Create a tree holding only its root directory.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = NodeId(arena.insert(NodeEntry {
            base_name: String::new(),
            parent: None,
            kind: NodeKind::Directory {
                children: Vec::new(),
            },
        }));
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.root
    }

    /// Whether `id` still refers to a live node of this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.index())
    }

    /// Number of live nodes, root and detached nodes included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn entry(&self, id: NodeId) -> NodeResult<&NodeEntry> {
        self.arena.get(id.index()).ok_or(NodeError::UnknownNode(id))
    }

    pub(crate) fn entry_mut(&mut self, id: NodeId) -> NodeResult<&mut NodeEntry> {
        self.arena.get_mut(id.index()).ok_or(NodeError::UnknownNode(id))
    }

    // ---------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------

    /// Create a bare node, registered with `parent` if one is given.
    pub fn create_node(&mut self, name: &str, parent: Option<NodeId>) -> NodeResult<NodeId> {
        self.insert_node(name, parent, NodeKind::Plain)
    }

    pub fn create_directory(&mut self, name: &str, parent: Option<NodeId>) -> NodeResult<NodeId> {
        self.insert_node(
            name,
            parent,
            NodeKind::Directory {
                children: Vec::new(),
            },
        )
    }

    /// Create a file in `parent`, starting out closed.
    pub fn create_file(&mut self, name: &str, parent: NodeId) -> NodeResult<NodeId> {
        self.insert_node(
            name,
            Some(parent),
            NodeKind::File {
                state: Default::default(),
            },
        )
    }

    /// Create a link in `parent`; an absent target is legal until the link is used.
    pub fn create_link(
        &mut self,
        name: &str,
        parent: NodeId,
        target: Option<NodeId>,
    ) -> NodeResult<NodeId> {
        if let Some(target) = target {
            self.entry(target)?;
        }
        self.insert_node(name, Some(parent), NodeKind::Link { target })
    }

    #[instrument(level = "trace", skip(self, kind))]
    fn insert_node(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        kind: NodeKind,
    ) -> NodeResult<NodeId> {
        if let Some(parent) = parent {
            self.ensure_container(parent)?;
        }
        let node = NodeId(self.arena.insert(NodeEntry {
            base_name: name.to_string(),
            parent,
            kind,
        }));
        if let Some(parent) = parent {
            self.children_mut(parent)?.push(node);
        }
        trace!(%node, "node created");
        Ok(node)
    }

    fn ensure_container(&self, id: NodeId) -> NodeResult<()> {
        if self.entry(id)?.kind.is_container() {
            Ok(())
        } else {
            Err(NodeError::argument(format!("node {} is not a directory", id)))
        }
    }

    fn children_mut(&mut self, dir: NodeId) -> NodeResult<&mut Vec<NodeId>> {
        match &mut self.entry_mut(dir)?.kind {
            NodeKind::Directory { children } => Ok(children),
            _ => Err(NodeError::argument(format!("node {} is not a directory", dir))),
        }
    }

    // ---------------------------------------------------------------
    // Containment
    // ---------------------------------------------------------------

    /// Register `node` as a child of `dir`.
    ///
    /// Membership is a set: adding a present child again changes nothing.
    /// A detached node is adopted and gets `dir` as its parent. Nodes owned
    /// by another directory, the root, and anything that would close a
    /// containment cycle are refused.
    #[instrument(level = "trace", skip(self))]
    pub fn add_child_node(&mut self, dir: NodeId, node: NodeId) -> NodeResult<()> {
        self.ensure_container(dir)?;
        let current_parent = self.entry(node)?.parent;

        if self.child_nodes(dir)?.contains(&node) {
            return Ok(());
        }
        if self.is_root(node) {
            return Err(NodeError::argument("the root cannot be a child node"));
        }
        if let Some(owner) = current_parent {
            if owner != dir {
                return Err(NodeError::argument(format!(
                    "node {} already belongs to directory {}",
                    node, owner
                )));
            }
        }
        if self.ancestors(dir).any(|a| a == node) {
            return Err(NodeError::argument(format!(
                "adding {} to {} would create a containment cycle",
                node, dir
            )));
        }

        self.entry_mut(node)?.parent = Some(dir);
        self.children_mut(dir)?.push(node);
        debug!(%dir, %node, "child node added");
        Ok(())
    }

    /// Read-only view of a directory's children.
    ///
    /// The borrow ties the view to the tree, so it cannot outlive a later
    /// mutation; callers wanting a snapshot copy it with `to_vec()`.
    pub fn child_nodes(&self, dir: NodeId) -> NodeResult<&[NodeId]> {
        match &self.entry(dir)?.kind {
            NodeKind::Directory { children } => Ok(children),
            _ => Err(NodeError::argument(format!("node {} is not a directory", dir))),
        }
    }

    /// Containing directory; None for the root and for detached nodes.
    pub fn parent_node(&self, id: NodeId) -> NodeResult<Option<NodeId>> {
        Ok(self.entry(id)?.parent)
    }

    /// `id` itself followed by every directory above it.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&current| {
            self.arena.get(current.index()).and_then(|e| e.parent)
        })
    }

    // ---------------------------------------------------------------
    // Naming
    // ---------------------------------------------------------------

    /// Effective base name of a node.
    ///
    /// The root always answers the empty string, links answer their
    /// target's name and files insist on a non-empty name.
    #[instrument(level = "trace", skip(self))]
    pub fn base_name(&self, id: NodeId) -> NodeResult<String> {
        if self.is_root(id) {
            return Ok(String::new());
        }
        let entry = self.entry(id)?;
        match &entry.kind {
            NodeKind::Link { .. } => self.link_base_name(id),
            NodeKind::File { .. } => self.file_base_name(entry),
            NodeKind::Plain | NodeKind::Directory { .. } => Ok(entry.base_name.clone()),
        }
    }

    /// Replace the base name without validation. Renaming a link renames
    /// its target; renaming the root has no visible effect.
    #[instrument(level = "trace", skip(self))]
    pub fn rename(&mut self, id: NodeId, name: &str) -> NodeResult<()> {
        if self.is_root(id) {
            trace!("root keeps its empty base name");
            return Ok(());
        }
        if let NodeKind::Link { .. } = self.entry(id)?.kind {
            let target = self.resolve_target(id)?;
            return self.rename(target, name);
        }
        self.entry_mut(id)?.base_name = name.to_string();
        Ok(())
    }

    // ---------------------------------------------------------------
    // Lifetime
    // ---------------------------------------------------------------

    /// Drop a detached node together with everything below it.
    ///
    /// Links elsewhere that pointed into the released subtree end up with
    /// an absent target.
    #[instrument(level = "debug", skip(self))]
    pub fn release(&mut self, id: NodeId) -> NodeResult<()> {
        if self.is_root(id) {
            return Err(NodeError::argument("the root cannot be released"));
        }
        if let Some(parent) = self.entry(id)?.parent {
            return Err(NodeError::argument(format!(
                "node {} is still attached to directory {}",
                id, parent
            )));
        }

        let mut stack = vec![id];
        let mut released = 0usize;
        while let Some(current) = stack.pop() {
            if let Some(entry) = self.arena.remove(current.index()) {
                if let NodeKind::Directory { children } = entry.kind {
                    stack.extend(children);
                }
                released += 1;
            }
        }
        debug!(released, "released detached subtree");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Traversal
    // ---------------------------------------------------------------

    /// Pre-order walk over the root's subtree.
    pub fn iter(&self) -> TreeIterator<'_> {
        self.iter_from(self.root)
    }

    /// Pre-order walk over the subtree below `start`.
    pub fn iter_from(&self, start: NodeId) -> TreeIterator<'_> {
        TreeIterator {
            tree: self,
            stack: vec![start],
        }
    }

    /// Number of levels below and including the root.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, id: NodeId) -> usize {
        match self.arena.get(id.index()).map(|e| &e.kind) {
            Some(NodeKind::Directory { children }) => {
                1 + children
                    .iter()
                    .map(|&child| self.calculate_depth(child))
                    .max()
                    .unwrap_or(0)
            }
            Some(_) => 1,
            None => 0,
        }
    }
}

pub struct TreeIterator<'a> {
    tree: &'a NodeTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a NodeEntry);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(entry) = self.tree.arena.get(current.index()) {
                if let NodeKind::Directory { children } = &entry.kind {
                    // Push children in reverse order for left-to-right traversal
                    self.stack.extend(children.iter().rev());
                }
                return Some((current, entry));
            }
        }
        None
    }
}
