//! Links: non-owning references that delegate naming to their target

use tracing::{debug, instrument};

use crate::domain::{NodeError, NodeId, NodeKind, NodeResult, NodeTree};

impl NodeTree {
    /// Current target of a link, None when unset or no longer live.
    pub fn target_node(&self, link: NodeId) -> NodeResult<Option<NodeId>> {
        match self.entry(link)?.kind {
            NodeKind::Link { target } => Ok(target.filter(|&t| self.contains(t))),
            _ => Err(not_a_link(link)),
        }
    }

    /// Point a link somewhere else; `None` clears it.
    #[instrument(level = "trace", skip(self))]
    pub fn set_target_node(&mut self, link: NodeId, target: Option<NodeId>) -> NodeResult<()> {
        if let Some(target) = target {
            self.entry(target)?;
        }
        match &mut self.entry_mut(link)?.kind {
            NodeKind::Link { target: slot } => {
                *slot = target;
                debug!(%link, ?target, "link retargeted");
                Ok(())
            }
            _ => Err(not_a_link(link)),
        }
    }

    /// Follow `link` until a node that is not itself a link.
    ///
    /// An unset, released or looping target is an invariant violation.
    pub fn resolve_target(&self, link: NodeId) -> NodeResult<NodeId> {
        let mut visited = vec![link];
        let mut current = link;
        while let NodeKind::Link { target } = self.entry(current)?.kind {
            let next = target
                .filter(|&t| self.contains(t))
                .ok_or_else(|| NodeError::invalid_state("link has no target node"))?;
            if visited.contains(&next) {
                return Err(NodeError::invalid_state(format!(
                    "link {} resolves back onto itself",
                    link
                )));
            }
            visited.push(next);
            current = next;
        }
        Ok(current)
    }

    pub(crate) fn link_base_name(&self, link: NodeId) -> NodeResult<String> {
        let target = self.resolve_target(link)?;
        self.base_name(target)
    }
}

fn not_a_link(id: NodeId) -> NodeError {
    NodeError::argument(format!("node {} is not a link", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing;
    use rstest::rstest;

    fn docs_tree() -> (NodeTree, NodeId, NodeId) {
        testing::init_test_setup();
        let mut tree = NodeTree::new();
        let root = tree.root();
        let docs = tree.create_directory("docs", Some(root)).unwrap();
        let file = tree.create_file("a.txt", docs).unwrap();
        (tree, docs, file)
    }

    #[rstest]
    fn given_target_then_base_name_is_delegated() {
        let (mut tree, docs, file) = docs_tree();
        let link = tree.create_link("b.txt", docs, Some(file)).unwrap();

        assert_eq!(tree.target_node(link).unwrap(), Some(file));
        assert_eq!(tree.base_name(link).unwrap(), "a.txt");
    }

    #[rstest]
    fn given_target_when_link_renamed_then_target_renamed() {
        let (mut tree, docs, file) = docs_tree();
        let link = tree.create_link("b.txt", docs, Some(file)).unwrap();

        tree.rename(link, "c.txt").unwrap();
        assert_eq!(tree.base_name(file).unwrap(), "c.txt");
        assert_eq!(tree.entry(link).unwrap().stored_name(), "b.txt");
    }

    #[rstest]
    fn given_absent_target_then_naming_is_invalid_state() {
        let (mut tree, docs, file) = docs_tree();
        let link = tree.create_link("b.txt", docs, Some(file)).unwrap();
        tree.set_target_node(link, None).unwrap();

        assert_eq!(tree.target_node(link).unwrap(), None);
        assert!(tree.base_name(link).unwrap_err().is_invalid_state());
        assert!(tree.rename(link, "x").unwrap_err().is_invalid_state());
        assert_eq!(tree.base_name(file).unwrap(), "a.txt");
    }

    #[rstest]
    fn given_released_target_then_link_is_dangling() {
        let (mut tree, docs, _) = docs_tree();
        let outside = tree.create_node("elsewhere", None).unwrap();
        let link = tree.create_link("l", docs, Some(outside)).unwrap();
        assert_eq!(tree.base_name(link).unwrap(), "elsewhere");

        tree.release(outside).unwrap();
        assert_eq!(tree.target_node(link).unwrap(), None);
        assert!(tree.base_name(link).unwrap_err().is_invalid_state());
    }

    #[rstest]
    fn given_chain_of_links_then_resolves_to_final_target() {
        let (mut tree, docs, file) = docs_tree();
        let first = tree.create_link("first", docs, Some(file)).unwrap();
        let second = tree.create_link("second", docs, Some(first)).unwrap();

        assert_eq!(tree.resolve_target(second).unwrap(), file);
        assert_eq!(tree.base_name(second).unwrap(), "a.txt");
    }

    #[rstest]
    fn given_looping_links_then_invalid_state() {
        let (mut tree, docs, _) = docs_tree();
        let a = tree.create_link("a", docs, None).unwrap();
        let b = tree.create_link("b", docs, Some(a)).unwrap();
        tree.set_target_node(a, Some(b)).unwrap();

        assert!(tree.base_name(a).unwrap_err().is_invalid_state());
        tree.set_target_node(a, Some(a)).unwrap();
        assert!(tree.base_name(a).unwrap_err().is_invalid_state());
    }

    #[rstest]
    fn given_non_link_when_targeted_then_argument_fault() {
        let (mut tree, docs, file) = docs_tree();
        assert!(tree.set_target_node(file, Some(docs)).unwrap_err().is_argument());
        assert!(tree.target_node(docs).unwrap_err().is_argument());
    }
}
