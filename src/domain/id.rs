//! Node identifiers
//!
//! ID Format: `n-{7-char-hash}` (e.g., `n-7f2b4c1`).
//!
//! The hash is derived from the node label + creation timestamp, so the same
//! label created at different times produces different IDs. IDs are stable
//! for the lifetime of a node and survive label edits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid node ID format: expected 'n-{{7-char-hash}}', got '{0}'")]
    InvalidNodeId(String),
}

/// Generates a 7-character hash from label and timestamp
fn generate_hash(label: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!("{}{}", label, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

/// Node ID in the format `n-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId {
    hash: String,
}

impl NodeId {
    /// Creates a new node ID from label and timestamp
    pub fn new(label: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            hash: generate_hash(label, timestamp),
        }
    }

    /// Returns the hash portion of the ID
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n-{}", self.hash)
    }
}

impl FromStr for NodeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("n-")
            .ok_or_else(|| IdError::InvalidNodeId(s.to_string()))?;

        if hash.len() != 7 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(IdError::InvalidNodeId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_string(),
        })
    }
}

impl TryFrom<String> for NodeId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_generation_is_unique_for_different_timestamps() {
        let label = "Same Label";
        let ts1 = Utc::now();
        let ts2 = ts1 + chrono::Duration::nanoseconds(1);

        let id1 = NodeId::new(label, ts1);
        let id2 = NodeId::new(label, ts2);

        assert_ne!(id1, id2);
    }

    #[test]
    fn id_format_is_correct() {
        let id = NodeId::new("Design phase", Utc::now());
        let s = id.to_string();

        assert!(s.starts_with("n-"));
        assert_eq!(s.len(), 9); // "n-" + 7 chars
    }

    #[test]
    fn id_parses_correctly() {
        let original = NodeId::new("Design phase", Utc::now());
        let s = original.to_string();
        let parsed: NodeId = s.parse().unwrap();

        assert_eq!(original, parsed);
    }

    #[test]
    fn id_rejects_invalid_format() {
        assert!("invalid".parse::<NodeId>().is_err());
        assert!("n-short".parse::<NodeId>().is_err());
        assert!("n-toolonggg".parse::<NodeId>().is_err());
        assert!("n-gggggg1".parse::<NodeId>().is_err()); // 'g' is not hex
        assert!("a-1234567".parse::<NodeId>().is_err()); // wrong prefix
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = NodeId::new("Kickoff", Utc::now());
        let json = serde_json::to_string(&id).unwrap();
        let parsed: NodeId = serde_json::from_str(&json).unwrap();

        assert_eq!(id, parsed);
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let id: NodeId = "n-0123abc".parse().unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""n-0123abc""#);
    }
}
