use termtree::Tree;
use tracing::instrument;

use crate::domain::{NodeId, NodeKind, NodeTree};

/// Rendering of node trees for terminal display.
pub trait TreeRender {
    /// Render the root's subtree. With `annotate`, node kinds, file states
    /// and link targets are appended to each label.
    fn to_tree_string(&self, annotate: bool) -> Tree<String>;

    fn node_label(&self, id: NodeId, annotate: bool) -> String;
}

impl TreeRender for NodeTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, annotate: bool) -> Tree<String> {
        fn build_tree(tree: &NodeTree, id: NodeId, annotate: bool) -> Tree<String> {
            let leaves: Vec<_> = tree
                .child_nodes(id)
                .unwrap_or_default()
                .iter()
                .map(|&child| build_tree(tree, child, annotate))
                .collect();
            Tree::new(tree.node_label(id, annotate)).with_leaves(leaves)
        }

        build_tree(self, self.root(), annotate)
    }

    fn node_label(&self, id: NodeId, annotate: bool) -> String {
        if self.is_root(id) {
            return "/".to_string();
        }
        let Ok(entry) = self.entry(id) else {
            return format!("<released {}>", id);
        };
        let name = match entry.stored_name() {
            "" => "<unnamed>",
            name => name,
        };
        if !annotate {
            return name.to_string();
        }
        match entry.kind() {
            NodeKind::Plain => name.to_string(),
            NodeKind::Directory { .. } => format!("{}/", name),
            NodeKind::File { state } => format!("{} [{}]", name, state),
            NodeKind::Link { .. } => {
                let target = self
                    .resolve_target(id)
                    .and_then(|t| self.base_name(t))
                    .unwrap_or_else(|_| "<dangling>".to_string());
                format!("{} -> {}", name, target)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_annotated_render_then_kinds_states_and_targets_shown() {
        let mut tree = NodeTree::new();
        let root = tree.root();
        let docs = tree.create_directory("docs", Some(root)).unwrap();
        let file = tree.create_file("a.txt", docs).unwrap();
        tree.create_link("b.txt", docs, Some(file)).unwrap();
        tree.create_link("c.txt", docs, None).unwrap();

        let rendered = tree.to_tree_string(true).to_string();
        assert!(rendered.starts_with("/\n"));
        assert!(rendered.contains("docs/"));
        assert!(rendered.contains("a.txt [closed]"));
        assert!(rendered.contains("b.txt -> a.txt"));
        assert!(rendered.contains("c.txt -> <dangling>"));
    }

    #[test]
    fn given_plain_render_then_only_names() {
        let mut tree = NodeTree::new();
        let root = tree.root();
        tree.create_file("", root).unwrap();

        let rendered = tree.to_tree_string(false).to_string();
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.contains("<unnamed>"));
    }
}
