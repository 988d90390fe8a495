//! Recursive lookup by base name with fault translation
//!
//! Every frame, leaf or directory, funnels faults through
//! [`NodeError::into_service_failure`]: invariant faults are wrapped the
//! first time a frame sees them and service failures pass through.
//! The first fault aborts the whole search; matches gathered from earlier
//! siblings are dropped.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::{NodeError, NodeId, NodeKind, NodeResult, NodeTree};

impl NodeTree {
    /// All nodes at or below `start` whose base name equals `name`.
    ///
    /// A link matches under its target's name and reports itself, so a
    /// directory holding a file and a link to it yields both.
    #[instrument(level = "trace", skip(self))]
    pub fn find_nodes(&self, start: NodeId, name: &str) -> NodeResult<HashSet<NodeId>> {
        match &self.entry(start)?.kind {
            NodeKind::Directory { children } => self.find_in_directory(start, children, name),
            NodeKind::Plain | NodeKind::File { .. } | NodeKind::Link { .. } => {
                self.find_in_leaf(start, name)
            }
        }
    }

    fn find_in_leaf(&self, id: NodeId, name: &str) -> NodeResult<HashSet<NodeId>> {
        let mut result = HashSet::new();
        if self.base_name(id).map_err(|e| translate(id, e))? == name {
            result.insert(id);
        }
        Ok(result)
    }

    fn find_in_directory(
        &self,
        dir: NodeId,
        children: &[NodeId],
        name: &str,
    ) -> NodeResult<HashSet<NodeId>> {
        let mut result = HashSet::new();
        if self.base_name(dir).map_err(|e| translate(dir, e))? == name {
            result.insert(dir);
        }
        for &child in children {
            let found = self
                .find_nodes(child, name)
                .map_err(|e| translate(child, e))?;
            result.extend(found);
        }
        Ok(result)
    }
}

fn translate(node: NodeId, err: NodeError) -> NodeError {
    if err.is_invalid_state() {
        debug!(%node, error = %err, "translating invariant fault");
    }
    err.into_service_failure()
}
