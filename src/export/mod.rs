//! Tree exporters
//!
//! Two renderings of the same snapshot:
//!
//! | Format | Shape | Purpose |
//! |--------|-------|---------|
//! | Structured | JSON, verbatim nodes + edges | Lossless save/restore |
//! | PLMXML | Nested XML forest | Structural interchange |
//!
//! Both exporters re-run the code assigner internally, so their output is
//! never stale relative to the snapshot they were handed, regardless of
//! caller discipline.

mod structured;
mod plmxml;

pub use structured::{
    to_structured_payload, to_structured_payload_with, ExportMeta, StructuredPayload,
    FORMAT_VERSION,
};
pub use plmxml::{to_plmxml, to_plmxml_with, PLMXML_NAMESPACE};

pub(crate) use plmxml::{build_tree, TreeItem};

/// Generator name stamped into both export formats
pub const DEFAULT_GENERATOR: &str = "WBS Architect";
