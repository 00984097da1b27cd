//! Edge management commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Edge, Node, NodeId};
use crate::storage::Project;

#[derive(Subcommand)]
pub enum EdgeCommands {
    /// Connect a parent node to a child node
    Add {
        /// Parent node ID
        source: String,

        /// Child node ID
        target: String,
    },

    /// Remove a parent/child connection
    Rm {
        /// Parent node ID
        source: String,

        /// Child node ID
        target: String,
    },
}

pub fn run(cmd: EdgeCommands, output: &Output) -> Result<()> {
    match cmd {
        EdgeCommands::Add { source, target } => add(output, &source, &target),
        EdgeCommands::Rm { source, target } => remove(output, &source, &target),
    }
}

fn add(output: &Output, source: &str, target: &str) -> Result<()> {
    let project = Project::open_current()?;
    let (nodes, mut edges) = project.load_snapshot()?;

    let source: NodeId = source.parse()?;
    let target: NodeId = target.parse()?;
    require(&nodes, &source)?;
    require(&nodes, &target)?;

    let edge = Edge::new(source.clone(), target.clone());
    if project.config().dedupe_edges() && edges.contains(&edge) {
        anyhow::bail!("Edge already exists: {} -> {}", source, target);
    }

    output.verbose_ctx("edge", &format!("Connecting {} -> {}", source, target));

    edges.push(edge);
    let refreshed = project.refresh_and_save(&nodes, &edges)?;

    let child_code = refreshed
        .iter()
        .find(|n| n.id == target)
        .map(|n| n.hierarchy_code.clone())
        .unwrap_or_default();

    if output.is_json() {
        output.data(&serde_json::json!({
            "sourceId": source.to_string(),
            "targetId": target.to_string(),
            "targetCode": child_code,
        }));
    } else if child_code.is_empty() {
        // Data-quality signal, not an error: the child sits in a cycle
        output.success(&format!(
            "Connected {} -> {}; the child is unreachable from any root and has no code",
            source, target
        ));
    } else {
        output.success(&format!(
            "Connected {} -> {}; child code is {}",
            source, target, child_code
        ));
    }

    Ok(())
}

fn remove(output: &Output, source: &str, target: &str) -> Result<()> {
    let project = Project::open_current()?;
    let (nodes, mut edges) = project.load_snapshot()?;

    let source: NodeId = source.parse()?;
    let target: NodeId = target.parse()?;

    let before = edges.len();
    edges.retain(|e| !(e.source_id == source && e.target_id == target));
    if edges.len() == before {
        anyhow::bail!("No edge {} -> {}", source, target);
    }

    project.refresh_and_save(&nodes, &edges)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "removed": before - edges.len(),
        }));
    } else {
        output.success(&format!("Disconnected {} -> {}", source, target));
    }

    Ok(())
}

fn require(nodes: &[Node], id: &NodeId) -> Result<()> {
    if nodes.iter().any(|n| &n.id == id) {
        Ok(())
    } else {
        anyhow::bail!("Node not found: {}", id)
    }
}
