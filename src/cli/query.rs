//! Read-only diagram views
//!
//! `tree` renders the hierarchy, `check` reports structural issues the
//! engine degrades on instead of rejecting, `status` summarizes the
//! diagram. All three recompute codes in memory and never write.

use std::collections::HashMap;

use anyhow::Result;

use super::node_cmd::display_order;
use super::output::Output;
use crate::domain::{assign_codes, DiagramGraph, Node, NodeKind};
use crate::export::{build_tree, TreeItem};
use crate::storage::Project;

/// Render the hierarchy with codes
pub fn tree(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let (nodes, edges) = project.load_snapshot()?;

    let coded = assign_codes(&nodes, &edges);
    let forest = build_tree(&nodes, &edges);

    if output.is_json() {
        let items: Vec<_> = forest.iter().map(item_json).collect();
        output.data(&items);
        return Ok(());
    }

    if coded.is_empty() {
        println!("Empty diagram. Add a node with 'wbs node add'.");
        return Ok(());
    }

    let by_id: HashMap<_, _> = coded.iter().map(|n| (n.id.clone(), n)).collect();
    for item in &forest {
        print_item(item, &by_id, 0);
    }

    // Nodes the traversal never reached are real data, so they still show up
    let unreachable: Vec<&Node> = coded.iter().filter(|n| n.hierarchy_code.is_empty()).collect();
    if !unreachable.is_empty() {
        println!();
        println!("Unreachable (no code):");
        for node in unreachable {
            println!("  {} {} [{}]", node.id, node.label, node.kind);
        }
    }

    Ok(())
}

fn print_item(item: &TreeItem, by_id: &HashMap<crate::domain::NodeId, &Node>, depth: usize) {
    let progress = by_id
        .get(&item.id)
        .and_then(|n| n.progress)
        .map(|p| format!(" ({}%)", p))
        .unwrap_or_default();

    println!(
        "{}{} [{}] {}{}",
        "  ".repeat(depth),
        item.code,
        item.kind,
        item.name,
        progress
    );

    for child in &item.children {
        print_item(child, by_id, depth + 1);
    }
}

fn item_json(item: &TreeItem) -> serde_json::Value {
    serde_json::json!({
        "id": item.id.to_string(),
        "name": item.name,
        "hierarchyCode": item.code,
        "kind": item.kind.as_str(),
        "children": item.children.iter().map(item_json).collect::<Vec<_>>(),
    })
}

/// Report cycles, multi-parent nodes, and uncoded nodes
pub fn check(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let (nodes, edges) = project.load_snapshot()?;

    let graph = DiagramGraph::from_snapshot(&nodes, &edges);
    let coded = assign_codes(&nodes, &edges);

    let cycles: Vec<String> = graph.cycle_members().iter().map(|id| id.to_string()).collect();
    let multi_parent: Vec<String> = graph
        .multi_parent_nodes()
        .iter()
        .map(|id| id.to_string())
        .collect();
    let uncoded: Vec<String> = coded
        .iter()
        .filter(|n| n.hierarchy_code.is_empty())
        .map(|n| n.id.to_string())
        .collect();

    if output.is_json() {
        output.data(&serde_json::json!({
            "cycles": cycles,
            "multiParent": multi_parent,
            "uncoded": uncoded,
        }));
        return Ok(());
    }

    if cycles.is_empty() && multi_parent.is_empty() && uncoded.is_empty() {
        println!("No structural issues found.");
        return Ok(());
    }

    let by_id: HashMap<String, &Node> = nodes.iter().map(|n| (n.id.to_string(), n)).collect();
    let describe = |ids: &[String]| -> Vec<String> {
        ids.iter()
            .map(|id| match by_id.get(id) {
                Some(n) => format!("{} ({})", id, n.label),
                None => id.clone(),
            })
            .collect()
    };

    if !cycles.is_empty() {
        println!("Nodes inside a cycle:");
        for line in describe(&cycles) {
            println!("  {}", line);
        }
    }
    if !multi_parent.is_empty() {
        println!("Nodes with more than one parent (first descent owns them):");
        for line in describe(&multi_parent) {
            println!("  {}", line);
        }
    }
    if !uncoded.is_empty() {
        println!("Nodes without a hierarchy code:");
        for line in describe(&uncoded) {
            println!("  {}", line);
        }
    }

    Ok(())
}

/// Summarize the diagram
pub fn status(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let (nodes, edges) = project.load_snapshot()?;

    let coded = assign_codes(&nodes, &edges);
    let graph = DiagramGraph::from_snapshot(&nodes, &edges);

    let count_kind = |kind: NodeKind| coded.iter().filter(|n| n.kind == kind).count();
    let roots = coded
        .iter()
        .filter(|n| graph.in_degree(&n.id) == 0)
        .count();
    let uncoded = coded
        .iter()
        .filter(|n| n.hierarchy_code.is_empty())
        .count();

    if output.is_json() {
        output.data(&serde_json::json!({
            "nodes": coded.len(),
            "edges": edges.len(),
            "roots": roots,
            "uncoded": uncoded,
            "kinds": {
                "project": count_kind(NodeKind::Project),
                "phase": count_kind(NodeKind::Phase),
                "task": count_kind(NodeKind::Task),
                "milestone": count_kind(NodeKind::Milestone),
            },
        }));
        return Ok(());
    }

    println!("Diagram status");
    println!("  nodes:      {}", coded.len());
    println!("  edges:      {}", edges.len());
    println!("  roots:      {}", roots);
    println!(
        "  kinds:      {} project, {} phase, {} task, {} milestone",
        count_kind(NodeKind::Project),
        count_kind(NodeKind::Phase),
        count_kind(NodeKind::Task),
        count_kind(NodeKind::Milestone)
    );
    if uncoded > 0 {
        println!("  uncoded:    {} (run 'wbs check')", uncoded);
    }

    let mut sorted = coded.clone();
    sorted.sort_by(|a, b| display_order(a, b));
    if let Some(top) = sorted.first() {
        if !top.hierarchy_code.is_empty() {
            println!("  first root: {} {}", top.hierarchy_code, top.label);
        }
    }

    Ok(())
}
