//! Edge domain model
//!
//! A directed edge means "source is parent of target". Edges have no
//! identity beyond the ordered pair, and the edge list's order is
//! meaningful: it breaks ties when siblings share an x position.

use serde::{Deserialize, Serialize};

use super::id::NodeId;

/// A directed parent -> child edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Parent node
    pub source_id: NodeId,

    /// Child node
    pub target_id: NodeId,
}

impl Edge {
    /// Creates an edge from parent to child
    pub fn new(source_id: NodeId, target_id: NodeId) -> Self {
        Self {
            source_id,
            target_id,
        }
    }

    /// Returns true if the edge touches the given node on either end
    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source_id == id || &self.target_id == id
    }
}
