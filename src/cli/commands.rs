//! Command dispatch

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::layout::build_from_file;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{NodeId, NodeTree};
use crate::tree_traits::TreeRender;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Commands::Completion { shell } = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    if !settings.color {
        colored::control::set_override(false);
    }

    match &cli.command {
        Commands::Show { annotate } => cmd_show(cli, &settings, *annotate || settings.annotate),
        Commands::Find { name, from } => cmd_find(cli, &settings, name, from.as_deref()),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cmd_config_show(&settings),
            ConfigCommands::Path => cmd_config_path(cli),
        },
        Commands::Completion { .. } => Ok(()),
    }
}

fn layout_path(cli: &Cli, settings: &Settings) -> CliResult<PathBuf> {
    cli.layout
        .clone()
        .or_else(|| settings.layout.clone())
        .ok_or(CliError::Application(ApplicationError::NoLayout))
}

#[instrument(skip(cli, settings))]
fn cmd_show(cli: &Cli, settings: &Settings, annotate: bool) -> CliResult<()> {
    let path = layout_path(cli, settings)?;
    let built = build_from_file(&path)?;
    output::info(&built.tree.to_tree_string(annotate));
    Ok(())
}

#[instrument(skip(cli, settings))]
fn cmd_find(cli: &Cli, settings: &Settings, name: &str, from: Option<&str>) -> CliResult<()> {
    let path = layout_path(cli, settings)?;
    let built = build_from_file(&path)?;
    let start = match from {
        Some(label) => built
            .label(label)
            .ok_or_else(|| CliError::InvalidArgs(format!("unknown label: {}", label)))?,
        None => built.tree.root(),
    };
    debug!(%start, name, "searching");

    let found = built.tree.find_nodes(start, name)?;
    if found.is_empty() {
        output::warning(&format!("no node named '{}'", name));
        return Ok(());
    }
    for line in found
        .iter()
        .map(|&id| display_path(&built.tree, id))
        .sorted()
    {
        output::info(&line);
    }
    Ok(())
}

fn cmd_config_show(settings: &Settings) -> CliResult<()> {
    output::header("Effective settings");
    output::info(&settings.to_toml()?);
    Ok(())
}

fn cmd_config_path(cli: &Cli) -> CliResult<()> {
    match global_config_path() {
        Some(path) => output::action("global", &path.display()),
        None => output::warning("no global config directory on this platform"),
    }
    if let Some(path) = &cli.config {
        output::action("extra", &path.display());
    }
    Ok(())
}

/// Slash-joined stored names from the topmost ancestor down to `id`.
///
/// Nodes under the root start with `/`; detached nodes have no leading slash.
fn display_path(tree: &NodeTree, id: NodeId) -> String {
    if tree.is_root(id) {
        return "/".to_string();
    }
    let chain: Vec<NodeId> = tree.ancestors(id).collect();
    chain
        .iter()
        .rev()
        .map(|&a| {
            if tree.is_root(a) {
                String::new()
            } else {
                tree.entry(a)
                    .map(|e| e.stored_name().to_string())
                    .unwrap_or_default()
            }
        })
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_nested_and_detached_nodes_then_paths_rendered() {
        let mut tree = NodeTree::new();
        let root = tree.root();
        let docs = tree.create_directory("docs", Some(root)).unwrap();
        let file = tree.create_file("a.txt", docs).unwrap();
        let loose = tree.create_directory("loose", None).unwrap();
        let inner = tree.create_node("inner", Some(loose)).unwrap();

        assert_eq!(display_path(&tree, root), "/");
        assert_eq!(display_path(&tree, file), "/docs/a.txt");
        assert_eq!(display_path(&tree, inner), "loose/inner");
    }

    #[test]
    fn given_missing_layout_then_usage_exit_code() {
        let cli = Cli {
            debug: 0,
            layout: None,
            config: None,
            command: Commands::Show { annotate: false },
        };
        let err = layout_path(&cli, &Settings::default()).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }
}
