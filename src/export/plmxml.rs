//! PLMXML export
//!
//! Reduces the snapshot to a forest and renders it as a PLMXML-shaped
//! document. Codes are recomputed first, and the forest reuses the
//! traversal's parent ownership, so a node with several parents appears
//! exactly once, under the parent that named it. Nodes the traversal never
//! reaches (cycle-trapped, empty code) are omitted.
//!
//! XML is assembled by hand with `fmt::Write`; indentation grows by a fixed
//! four-space step per element depth and carries no meaning.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::{compare_codes, traverse, Edge, Node, NodeId, NodeKind};

use super::DEFAULT_GENERATOR;

/// Namespace identifier of the document root
pub const PLMXML_NAMESPACE: &str = "http://www.plmxml.org/Schemas/PLMXMLSchema";

/// One element of the export forest
#[derive(Debug, Clone)]
pub(crate) struct TreeItem {
    pub id: NodeId,
    pub name: String,
    pub code: String,
    pub kind: NodeKind,
    pub children: Vec<TreeItem>,
}

/// Renders the snapshot as a PLMXML document stamped with the current time
pub fn to_plmxml(nodes: &[Node], edges: &[Edge]) -> String {
    to_plmxml_with(nodes, edges, DEFAULT_GENERATOR, Utc::now())
}

/// Renders the snapshot with an explicit generator name and instant
pub fn to_plmxml_with(
    nodes: &[Node],
    edges: &[Edge],
    generator: &str,
    at: DateTime<Utc>,
) -> String {
    let forest = build_tree(nodes, edges);
    let date = at.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut xml = String::new();
    let _ = writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        xml,
        r#"<PLMXML xmlns="{}" date="{}">"#,
        PLMXML_NAMESPACE, date
    );
    let _ = writeln!(xml, "  <Header>");
    let _ = writeln!(xml, "    <Generator>{}</Generator>", xml_escape(generator));
    let _ = writeln!(xml, "  </Header>");
    let _ = writeln!(xml, "  <Structure>");
    for item in &forest {
        render_item(&mut xml, item, 4);
    }
    let _ = writeln!(xml, "  </Structure>");
    let _ = writeln!(xml, "</PLMXML>");
    xml
}

/// Reduces the snapshot to the export forest
///
/// Sibling lists and the root list are sorted by numeric-aware code
/// comparison, so `1.9` stays left of `1.10`.
pub(crate) fn build_tree(nodes: &[Node], edges: &[Edge]) -> Vec<TreeItem> {
    let traversal = traverse(nodes, edges);

    let mut children_of: HashMap<&NodeId, Vec<&Node>> = HashMap::new();
    let mut roots: Vec<&Node> = Vec::new();
    for node in nodes {
        if !traversal.codes.contains_key(&node.id) {
            continue;
        }
        match traversal.owner.get(&node.id) {
            Some(parent) => children_of.entry(parent).or_default().push(node),
            None => roots.push(node),
        }
    }

    fn build(
        node: &Node,
        codes: &HashMap<NodeId, String>,
        children_of: &HashMap<&NodeId, Vec<&Node>>,
    ) -> TreeItem {
        let mut children: Vec<TreeItem> = children_of
            .get(&node.id)
            .into_iter()
            .flatten()
            .map(|child| build(child, codes, children_of))
            .collect();
        children.sort_by(|a, b| compare_codes(&a.code, &b.code));

        TreeItem {
            id: node.id.clone(),
            name: node.label.clone(),
            code: codes.get(&node.id).cloned().unwrap_or_default(),
            kind: node.kind,
            children,
        }
    }

    let mut forest: Vec<TreeItem> = roots
        .iter()
        .map(|root| build(root, &traversal.codes, &children_of))
        .collect();
    forest.sort_by(|a, b| compare_codes(&a.code, &b.code));
    forest
}

fn render_item(xml: &mut String, item: &TreeItem, indent: usize) {
    let pad = " ".repeat(indent);
    let _ = writeln!(
        xml,
        r#"{}<WBSElement id="{}" type="{}" wbsCode="{}">"#,
        pad,
        xml_escape(&item.id.to_string()),
        item.kind.as_str(),
        xml_escape(&item.code)
    );
    let _ = writeln!(xml, "{}  <Name>{}</Name>", pad, xml_escape(&item.name));
    let _ = writeln!(xml, "{}  <UserData>", pad);
    let _ = writeln!(
        xml,
        r#"{}    <UserValue title="wbs_code" value="{}"/>"#,
        pad,
        xml_escape(&item.code)
    );
    let _ = writeln!(xml, "{}  </UserData>", pad);
    if !item.children.is_empty() {
        let _ = writeln!(xml, "{}  <Children>", pad);
        for child in &item.children {
            render_item(xml, child, indent + 4);
        }
        let _ = writeln!(xml, "{}  </Children>", pad);
    }
    let _ = writeln!(xml, "{}</WBSElement>", pad);
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
