//! Node management commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{assign_codes, compare_codes, Node, NodeId, NodeKind, Position};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum NodeCommands {
    /// Add a node to the diagram
    Add {
        /// Node label
        label: String,

        /// Node kind
        #[arg(long, value_enum, default_value_t = NodeKind::Task)]
        kind: NodeKind,

        /// Canvas position as x,y
        #[arg(long = "at", default_value = "0,0")]
        position: Position,

        /// Optional description
        #[arg(long)]
        description: Option<String>,

        /// Completion percentage
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        progress: Option<u8>,
    },

    /// List all nodes
    List,

    /// Show one node in detail
    Show {
        /// Node ID
        id: String,
    },

    /// Remove a node and its incident edges
    Rm {
        /// Node ID
        id: String,
    },

    /// Move a node to a new position
    Move {
        /// Node ID
        id: String,

        /// New canvas position as x,y
        #[arg(long = "to")]
        position: Position,
    },

    /// Edit node properties (does not renumber the hierarchy)
    Set {
        /// Node ID
        id: String,

        /// New label
        #[arg(long)]
        label: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New completion percentage
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        progress: Option<u8>,
    },
}

pub fn run(cmd: NodeCommands, output: &Output) -> Result<()> {
    match cmd {
        NodeCommands::Add {
            label,
            kind,
            position,
            description,
            progress,
        } => add(output, label, kind, position, description, progress),
        NodeCommands::List => list(output),
        NodeCommands::Show { id } => show(output, &id),
        NodeCommands::Rm { id } => remove(output, &id),
        NodeCommands::Move { id, position } => move_node(output, &id, position),
        NodeCommands::Set {
            id,
            label,
            description,
            progress,
        } => set(output, &id, label, description, progress),
    }
}

fn add(
    output: &Output,
    label: String,
    kind: NodeKind,
    position: Position,
    description: Option<String>,
    progress: Option<u8>,
) -> Result<()> {
    let project = Project::open_current()?;
    let (mut nodes, edges) = project.load_snapshot()?;

    let mut node = Node::new(label, kind, position);
    if let Some(description) = description {
        node.set_description(description);
    }
    if let Some(progress) = progress {
        node.set_progress(progress);
    }
    let id = node.id.clone();

    output.verbose_ctx("node", &format!("Adding node {} at {}", id, position));

    nodes.push(node);
    let refreshed = project.refresh_and_save(&nodes, &edges)?;

    let created = find(&refreshed, &id)?;
    if output.is_json() {
        output.data(&created);
    } else {
        output.success(&format!(
            "Created {} {} with code {}",
            created.kind, created.id, created.hierarchy_code
        ));
    }

    Ok(())
}

fn list(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let (nodes, edges) = project.load_snapshot()?;

    // Fresh codes for display only; the store is untouched
    let mut nodes = assign_codes(&nodes, &edges);
    nodes.sort_by(|a, b| display_order(a, b));

    if output.is_json() {
        output.data(&nodes);
        return Ok(());
    }

    if nodes.is_empty() {
        println!("No nodes. Add one with 'wbs node add'.");
        return Ok(());
    }

    println!("{:<8} {:<10} {:<10} LABEL", "CODE", "ID", "KIND");
    println!("{}", "-".repeat(60));
    for node in &nodes {
        let code = if node.hierarchy_code.is_empty() {
            "-"
        } else {
            node.hierarchy_code.as_str()
        };
        let progress = node
            .progress
            .map(|p| format!(" ({}%)", p))
            .unwrap_or_default();
        println!(
            "{:<8} {:<10} {:<10} {}{}",
            code, node.id, node.kind, node.label, progress
        );
    }

    Ok(())
}

fn show(output: &Output, id: &str) -> Result<()> {
    let project = Project::open_current()?;
    let (nodes, edges) = project.load_snapshot()?;
    let nodes = assign_codes(&nodes, &edges);

    let id: NodeId = id.parse()?;
    let node = find(&nodes, &id)?;

    if output.is_json() {
        output.data(&node);
        return Ok(());
    }

    println!("{} ({})", node.label, node.id);
    println!("  kind:     {}", node.kind);
    println!("  position: {}", node.position);
    let code = if node.hierarchy_code.is_empty() {
        "(none)"
    } else {
        node.hierarchy_code.as_str()
    };
    println!("  code:     {}", code);
    if let Some(description) = &node.description {
        println!("  notes:    {}", description);
    }
    if let Some(progress) = node.progress {
        println!("  progress: {}%", progress);
    }

    Ok(())
}

fn remove(output: &Output, id: &str) -> Result<()> {
    let project = Project::open_current()?;
    let (mut nodes, mut edges) = project.load_snapshot()?;

    let id: NodeId = id.parse()?;
    let before = nodes.len();
    nodes.retain(|n| n.id != id);
    if nodes.len() == before {
        anyhow::bail!("Node not found: {}", id);
    }

    let edges_before = edges.len();
    edges.retain(|e| !e.touches(&id));
    let dropped = edges_before - edges.len();

    output.verbose_ctx(
        "node",
        &format!("Removing {} and {} incident edge(s)", id, dropped),
    );

    project.refresh_and_save(&nodes, &edges)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "removed": id.to_string(),
            "droppedEdges": dropped,
        }));
    } else {
        output.success(&format!("Removed {} ({} edge(s) dropped)", id, dropped));
    }

    Ok(())
}

fn move_node(output: &Output, id: &str, position: Position) -> Result<()> {
    let project = Project::open_current()?;
    let (mut nodes, edges) = project.load_snapshot()?;

    let id: NodeId = id.parse()?;
    let node = nodes
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or_else(|| anyhow::anyhow!("Node not found: {}", id))?;
    node.move_to(position);

    // A horizontal move can reorder siblings, so this is a structural change
    let refreshed = project.refresh_and_save(&nodes, &edges)?;

    let moved = find(&refreshed, &id)?;
    if output.is_json() {
        output.data(&moved);
    } else {
        output.success(&format!(
            "Moved {} to {}; code is now {}",
            id, position, moved.hierarchy_code
        ));
    }

    Ok(())
}

fn set(
    output: &Output,
    id: &str,
    label: Option<String>,
    description: Option<String>,
    progress: Option<u8>,
) -> Result<()> {
    if label.is_none() && description.is_none() && progress.is_none() {
        anyhow::bail!("Nothing to change: pass --label, --description, or --progress");
    }

    let project = Project::open_current()?;
    let (mut nodes, _) = project.load_snapshot()?;

    let id: NodeId = id.parse()?;
    let node = nodes
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or_else(|| anyhow::anyhow!("Node not found: {}", id))?;

    if let Some(label) = label {
        node.set_label(label);
    }
    if let Some(description) = description {
        node.set_description(description);
    }
    if let Some(progress) = progress {
        node.set_progress(progress);
    }
    let updated = node.clone();

    // Property edits do not change the graph shape; codes stay as they are
    project.node_store().write_all(&nodes)?;

    if output.is_json() {
        output.data(&updated);
    } else {
        output.success(&format!("Updated {}", id));
    }

    Ok(())
}

fn find<'a>(nodes: &'a [Node], id: &NodeId) -> Result<&'a Node> {
    nodes
        .iter()
        .find(|n| &n.id == id)
        .ok_or_else(|| anyhow::anyhow!("Node not found: {}", id))
}

/// Coded nodes first in numeric code order, uncoded nodes last by label
pub(crate) fn display_order(a: &Node, b: &Node) -> std::cmp::Ordering {
    match (a.hierarchy_code.is_empty(), b.hierarchy_code.is_empty()) {
        (false, false) => compare_codes(&a.hierarchy_code, &b.hierarchy_code),
        (false, true) => std::cmp::Ordering::Less,
        (true, false) => std::cmp::Ordering::Greater,
        (true, true) => a.label.cmp(&b.label),
    }
}
