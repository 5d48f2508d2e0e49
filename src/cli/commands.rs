//! Command dispatch: fixture in, hierarchy query or edit out.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::BuiltHierarchy;
use crate::cli::args::{Cli, Commands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{HierarchyDisplay, NodeId};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let mut settings = Settings::load()?;
    if cli.flatten {
        settings.flatten = true;
    }
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Tree { fixture, frames } => cmd_tree(&container, fixture, *frames),
        Commands::Lca { fixture, a, b } => cmd_lca(&container, fixture, a, b),
        Commands::Hit { fixture, x, y } => cmd_hit(&container, fixture, *x, *y),
        Commands::Move {
            fixture,
            node,
            parent,
            index,
        } => cmd_move(&container, fixture, node, parent.as_deref(), *index),
        Commands::Remove {
            fixture,
            node,
            keep_children,
        } => cmd_remove(&container, fixture, node, *keep_children),
        Commands::Stats { fixture } => cmd_stats(&container, fixture),
        Commands::Config => cmd_config(&container),
        Commands::Completion { .. } => Ok(()),
    }
}

fn build(container: &ServiceContainer, fixture: &Path) -> CliResult<BuiltHierarchy> {
    let fixture = container.loader().load(fixture)?;
    Ok(container.builder().build(&fixture)?)
}

fn lookup(built: &BuiltHierarchy, key: &str) -> CliResult<NodeId> {
    built
        .id(key)
        .ok_or_else(|| CliError::UnknownNode(key.to_string()))
}

fn key_or_none(built: &BuiltHierarchy, id: Option<NodeId>) -> String {
    id.and_then(|id| built.key_of(id))
        .unwrap_or("none")
        .to_string()
}

fn print_tree(container: &ServiceContainer, built: &BuiltHierarchy, frames: bool) {
    let with_frames = frames || container.settings.show_frames;
    output::info(&built.hierarchy.to_tree_string(with_frames));
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, fixture: &Path, frames: bool) -> CliResult<()> {
    let built = build(container, fixture)?;
    print_tree(container, &built, frames);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_lca(container: &ServiceContainer, fixture: &Path, a: &str, b: &str) -> CliResult<()> {
    let built = build(container, fixture)?;
    let (a, b) = (lookup(&built, a)?, lookup(&built, b)?);
    let common = built.hierarchy.lowest_common_ancestor(Some(a), Some(b));
    output::info(&key_or_none(&built, common));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_hit(container: &ServiceContainer, fixture: &Path, x: f32, y: f32) -> CliResult<()> {
    if !x.is_finite() || !y.is_finite() {
        return Err(CliError::InvalidArgs(format!(
            "hit point must be finite, got ({}, {})",
            x, y
        )));
    }
    let built = build(container, fixture)?;
    let hit = built.hierarchy.find_at(x, y);
    output::info(&key_or_none(&built, hit));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_move(
    container: &ServiceContainer,
    fixture: &Path,
    node: &str,
    parent: Option<&str>,
    index: Option<usize>,
) -> CliResult<()> {
    let mut built = build(container, fixture)?;
    let id = lookup(&built, node)?;
    let parent = parent.map(|key| lookup(&built, key)).transpose()?;
    let changed = built
        .hierarchy
        .move_node(id, parent, index.unwrap_or(usize::MAX))
        .map_err(CliError::from_edit)?;
    debug!(changed, "move applied");

    if changed {
        output::action("moved", &node);
    } else {
        output::action("unchanged", &node);
    }
    print_tree(container, &built, false);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_remove(
    container: &ServiceContainer,
    fixture: &Path,
    node: &str,
    keep_children: bool,
) -> CliResult<()> {
    let mut built = build(container, fixture)?;
    let id = lookup(&built, node)?;
    built
        .hierarchy
        .remove(id, !keep_children)
        .map_err(CliError::from_edit)?;

    let freed = built.hierarchy.projection().freed().len();
    output::action("removed", &format!("{} ({} node(s) released)", node, freed));
    print_tree(container, &built, false);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_stats(container: &ServiceContainer, fixture: &Path) -> CliResult<()> {
    let built = build(container, fixture)?;
    let hierarchy = &built.hierarchy;
    let roots = hierarchy
        .roots()
        .iter()
        .map(|&id| key_or_none(&built, Some(id)))
        .join(", ");

    output::header(&fixture.display());
    output::detail(&format!("nodes: {}", hierarchy.len()));
    output::detail(&format!("roots: {}", roots));
    output::detail(&format!("depth: {}", hierarchy.depth()));
    Ok(())
}

fn cmd_config(container: &ServiceContainer) -> CliResult<()> {
    let path = global_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<no config dir>".to_string());
    output::header(&format!("# {}", path));
    output::info(&container.settings.to_toml()?);
    Ok(())
}
