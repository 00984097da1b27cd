//! WBS CLI - Work-breakdown-structure diagrams from the command line
//!
//! A WBS diagram is a set of positioned nodes (project, phases, tasks,
//! milestones) connected by directed parent->child edges. The engine derives
//! a dotted hierarchy code (e.g. `1.2.1`) for every node from the graph shape
//! and the nodes' horizontal positions, and exports the resulting tree as a
//! lossless JSON payload or a PLMXML document.

pub mod domain;
pub mod export;
pub mod storage;
pub mod cli;

pub use domain::{assign_codes, Edge, Node, NodeId, NodeKind, Position};
pub use export::{to_plmxml, to_structured_payload, StructuredPayload};
