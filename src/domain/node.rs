//! Node domain model
//!
//! Nodes are the boxes of the diagram: a kind, a label, an optional
//! description and progress, and a canvas position. The horizontal position
//! is a first-class ordering signal: it decides sibling numbering during
//! code assignment. The `hierarchy_code` field is derived state, owned by
//! [`crate::domain::assign_codes`].
//!
//! Nodes serialize with camelCase field names because the node array is
//! embedded verbatim in the structured export format.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::id::NodeId;

/// Kind of a WBS node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Project,
    Phase,
    Task,
    Milestone,
}

impl NodeKind {
    /// Interchange spelling, as used in export payloads and markup attributes
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Project => "PROJECT",
            NodeKind::Phase => "PHASE",
            NodeKind::Task => "TASK",
            NodeKind::Milestone => "MILESTONE",
        }
    }

    /// Returns a display label for tables and tree output
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Project => "project",
            NodeKind::Phase => "phase",
            NodeKind::Task => "task",
            NodeKind::Milestone => "milestone",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canvas position of a node
///
/// `x` orders siblings left-to-right during code assignment; `y` is carried
/// for the canvas collaborator and round-trips through exports untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected 'x,y', got '{}'", s))?;

        let x: f64 = x
            .trim()
            .parse()
            .map_err(|_| format!("invalid x coordinate: '{}'", x.trim()))?;
        let y: f64 = y
            .trim()
            .parse()
            .map_err(|_| format!("invalid y coordinate: '{}'", y.trim()))?;

        Ok(Self { x, y })
    }
}

/// A node of the WBS diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier, stable for the node's lifetime
    pub id: NodeId,

    /// Canvas position
    pub position: Position,

    /// Node kind
    pub kind: NodeKind,

    /// Human-readable label
    pub label: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional completion percentage (0..=100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,

    /// Derived dotted position code, empty before the first computation
    #[serde(default)]
    pub hierarchy_code: String,
}

impl Node {
    /// Creates a new node with a freshly generated ID and an empty code
    pub fn new(label: impl Into<String>, kind: NodeKind, position: Position) -> Self {
        let label = label.into();
        Self {
            id: NodeId::new(&label, Utc::now()),
            position,
            kind,
            label,
            description: None,
            progress: None,
            hierarchy_code: String::new(),
        }
    }

    /// Sets the label (the ID does not change)
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Sets the description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Sets the completion percentage
    pub fn set_progress(&mut self, progress: u8) {
        self.progress = Some(progress);
    }

    /// Moves the node to a new position
    pub fn move_to(&mut self, position: Position) {
        self.position = position;
    }
}
