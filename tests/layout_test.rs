//! Tests for building trees from TOML layout files

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use nodetree::application::layout::{build_from_file, parse_layout};
use nodetree::application::ApplicationError;
use nodetree::domain::{FileState, LayoutKind, NodeKind};
use nodetree::tree_traits::TreeRender;

const DOCS_LAYOUT: &str = r#"
[[nodes]]
name = "docs"
kind = "directory"
label = "docs"

[[nodes.children]]
name = "a.txt"
kind = "file"
label = "a"
state = "open"

[[nodes.children]]
name = "b.txt"
kind = "link"
target = "a"

[[nodes]]
name = "spare"
kind = "node"
detached = true
label = "spare"
"#;

fn write_layout(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("layout.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_docs_layout_when_parsed_then_structure_matches() {
    let layout = parse_layout(DOCS_LAYOUT, Path::new("inline.toml")).unwrap();
    assert_eq!(layout.nodes.len(), 2);
    assert_eq!(layout.nodes[0].kind, LayoutKind::Directory);
    assert_eq!(layout.nodes[0].children[0].state, Some(FileState::Open));
    assert_eq!(layout.nodes[0].children[1].target.as_deref(), Some("a"));
}

#[test]
fn given_layout_file_when_built_then_tree_is_searchable() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(&dir, DOCS_LAYOUT);

    let built = build_from_file(&path).unwrap();
    let tree = &built.tree;
    let root = tree.root();
    let file = built.label("a").unwrap();
    let docs = built.label("docs").unwrap();

    assert_eq!(tree.file_state(file).unwrap(), FileState::Open);
    assert_eq!(tree.find_nodes(root, "a.txt").unwrap().len(), 2);
    assert!(tree.find_nodes(root, "a.txt").unwrap().contains(&file));
    assert_eq!(tree.child_nodes(docs).unwrap().len(), 2);

    let spare = built.label("spare").unwrap();
    assert_eq!(tree.parent_node(spare).unwrap(), None);
    assert!(matches!(tree.entry(spare).unwrap().kind(), NodeKind::Plain));
    assert!(tree.find_nodes(root, "spare").unwrap().is_empty());

    let rendered = tree.to_tree_string(true).to_string();
    assert!(rendered.contains("b.txt -> a.txt"));
}

#[test]
fn given_missing_file_then_operation_failed() {
    let dir = TempDir::new().unwrap();
    let err = build_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}

#[test]
fn given_unknown_field_then_syntax_error() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(&dir, "[[nodes]]\nname = \"x\"\ncolour = \"red\"\n");
    let err = build_from_file(&path).unwrap_err();
    assert!(matches!(err, ApplicationError::LayoutSyntax { .. }));
}

#[test]
fn given_dangling_target_label_then_layout_error() {
    let dir = TempDir::new().unwrap();
    let path = write_layout(
        &dir,
        "[[nodes]]\nname = \"l\"\nkind = \"link\"\ntarget = \"nowhere\"\n",
    );
    let err = build_from_file(&path).unwrap_err();
    assert!(matches!(err, ApplicationError::Layout { .. }));
    assert!(err.to_string().contains("nowhere"));
}
