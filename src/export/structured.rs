//! Structured (lossless) export
//!
//! Mirrors the live snapshot verbatim: every field needed to reconstruct the
//! exact graph (positions, kinds, descriptions, progress, edges) is
//! preserved, making this the canonical save/restore representation. Codes
//! are refreshed before embedding so the payload is self-sufficient.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{assign_codes, Edge, Node};

use super::DEFAULT_GENERATOR;

/// Version stamp of the structured format
pub const FORMAT_VERSION: &str = "1.0";

/// Export metadata header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeta {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub generator: String,
}

/// The lossless interchange payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredPayload {
    pub meta: ExportMeta,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl StructuredPayload {
    /// Renders the payload as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a payload back from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Builds the structured payload for a snapshot, stamped with the current time
pub fn to_structured_payload(nodes: &[Node], edges: &[Edge]) -> StructuredPayload {
    to_structured_payload_with(nodes, edges, DEFAULT_GENERATOR, Utc::now())
}

/// Builds the structured payload with an explicit generator name and instant
pub fn to_structured_payload_with(
    nodes: &[Node],
    edges: &[Edge],
    generator: &str,
    at: DateTime<Utc>,
) -> StructuredPayload {
    StructuredPayload {
        meta: ExportMeta {
            version: FORMAT_VERSION.to_string(),
            exported_at: at,
            generator: generator.to_string(),
        },
        nodes: assign_codes(nodes, edges),
        edges: edges.to_vec(),
    }
}
