//! Structural diagnostics for the diagram graph
//!
//! Wraps the node/edge snapshot in a petgraph `DiGraph` to answer the
//! questions the code assigner deliberately does not: is there a cycle,
//! which nodes sit inside one, and which nodes have more than one parent.
//! The assigner degrades on bad topology; this view names the degraded
//! nodes so `wbs check` can report them.

use std::collections::{HashMap, HashSet};

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use super::edge::Edge;
use super::id::NodeId;
use super::node::Node;

/// A read-only structural view over one snapshot
#[derive(Debug, Default)]
pub struct DiagramGraph {
    graph: DiGraph<NodeId, ()>,
    node_map: HashMap<NodeId, NodeIndex>,
}

impl DiagramGraph {
    /// Builds the view from a snapshot
    ///
    /// Edges with an endpoint outside the node set are skipped, matching the
    /// code assigner. Never fails: malformed topology is what this type is
    /// for.
    pub fn from_snapshot(nodes: &[Node], edges: &[Edge]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();

        for node in nodes {
            if !node_map.contains_key(&node.id) {
                let idx = graph.add_node(node.id.clone());
                node_map.insert(node.id.clone(), idx);
            }
        }

        for edge in edges {
            if let (Some(&source), Some(&target)) =
                (node_map.get(&edge.source_id), node_map.get(&edge.target_id))
            {
                graph.add_edge(source, target, ());
            }
        }

        Self { graph, node_map }
    }

    /// Returns the number of nodes in the view
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the view is empty
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Returns true if the graph contains the node
    pub fn contains(&self, id: &NodeId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Number of incoming edges (0 means the node is a root)
    pub fn in_degree(&self, id: &NodeId) -> usize {
        match self.node_map.get(id) {
            Some(&idx) => self
                .graph
                .edges_directed(idx, Direction::Incoming)
                .count(),
            None => 0,
        }
    }

    /// Distinct parents of a node
    pub fn parents(&self, id: &NodeId) -> Vec<NodeId> {
        let idx = match self.node_map.get(id) {
            Some(&idx) => idx,
            None => return vec![],
        };

        let mut seen = HashSet::new();
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .filter_map(|p| self.graph.node_weight(p).cloned())
            .filter(|p| seen.insert(p.clone()))
            .collect()
    }

    /// Returns true if any directed cycle exists
    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Nodes that sit inside a directed cycle
    ///
    /// A strongly connected component of more than one node is a cycle;
    /// a single node counts only if it carries a self-loop.
    pub fn cycle_members(&self) -> Vec<NodeId> {
        let mut members = Vec::new();

        for component in tarjan_scc(&self.graph) {
            let cyclic = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&idx| self.graph.find_edge(idx, idx).is_some());

            if cyclic {
                members.extend(
                    component
                        .iter()
                        .filter_map(|&idx| self.graph.node_weight(idx).cloned()),
                );
            }
        }

        members
    }

    /// Nodes with more than one distinct parent
    pub fn multi_parent_nodes(&self) -> Vec<NodeId> {
        let mut result: Vec<NodeId> = self
            .node_map
            .keys()
            .filter(|id| self.parents(id).len() > 1)
            .cloned()
            .collect();
        result.sort();
        result
    }
}
