//! Hierarchy code assignment
//!
//! Derives the dotted position code (`1`, `1.2`, `1.2.1`, ...) for every
//! node from the edge set and the nodes' horizontal positions. Roots (nodes
//! with no incoming edge) are numbered left to right; each descent numbers
//! its children left to right. The computation is pure: callers get a new
//! node vector and decide when to persist it.
//!
//! Malformed topology degrades instead of failing. A node trapped in a cycle
//! with no external entry keeps an empty code, and a node with several
//! parents is claimed by whichever parent's descent reaches it first. The
//! claimed parent is recorded so the exporters place the node under the same
//! parent that named it.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::edge::Edge;
use super::id::NodeId;
use super::node::Node;

/// Result of one depth-first pass over the snapshot
pub(crate) struct Traversal {
    /// Code per visited node; unvisited nodes are absent
    pub codes: HashMap<NodeId, String>,

    /// For each visited non-root node, the parent whose descent claimed it
    pub owner: HashMap<NodeId, NodeId>,
}

/// Returns a copy of `nodes` with every `hierarchy_code` overwritten
///
/// Identity, count, and order are preserved. Nodes the traversal never
/// reaches get an empty code.
pub fn assign_codes(nodes: &[Node], edges: &[Edge]) -> Vec<Node> {
    let traversal = traverse(nodes, edges);

    nodes
        .iter()
        .map(|node| {
            let mut node = node.clone();
            node.hierarchy_code = traversal.codes.get(&node.id).cloned().unwrap_or_default();
            node
        })
        .collect()
}

/// Runs the depth-first code assignment over a snapshot
pub(crate) fn traverse(nodes: &[Node], edges: &[Edge]) -> Traversal {
    let index: HashMap<&NodeId, &Node> = nodes.iter().map(|n| (&n.id, n)).collect();

    // Forward adjacency in edge-list order plus in-degree per node, derived
    // strictly from edges. An edge with an endpoint outside the node set
    // contributes nothing.
    let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
    let mut in_degree: HashMap<&NodeId, usize> = HashMap::new();
    for node in nodes {
        adjacency.insert(&node.id, Vec::new());
        in_degree.insert(&node.id, 0);
    }
    for edge in edges {
        if !in_degree.contains_key(&edge.target_id) {
            continue;
        }
        if let Some(children) = adjacency.get_mut(&edge.source_id) {
            children.push(&edge.target_id);
            if let Some(degree) = in_degree.get_mut(&edge.target_id) {
                *degree += 1;
            }
        }
    }

    // Roots in ascending x order; ties keep snapshot order (stable sort)
    let mut roots: Vec<&Node> = nodes
        .iter()
        .filter(|n| in_degree.get(&n.id).copied().unwrap_or(0) == 0)
        .collect();
    roots.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));

    let mut traversal = Traversal {
        codes: HashMap::new(),
        owner: HashMap::new(),
    };

    for (i, root) in roots.iter().enumerate() {
        descend(&root.id, (i + 1).to_string(), &adjacency, &index, &mut traversal);
    }

    traversal
}

fn descend(
    node_id: &NodeId,
    code: String,
    adjacency: &HashMap<&NodeId, Vec<&NodeId>>,
    index: &HashMap<&NodeId, &Node>,
    traversal: &mut Traversal,
) {
    traversal.codes.insert(node_id.clone(), code.clone());

    // Children in ascending x order; ties keep edge-list order (stable sort)
    let mut children: Vec<&Node> = adjacency
        .get(node_id)
        .into_iter()
        .flatten()
        .filter_map(|id| index.get(*id).copied())
        .collect();
    children.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));

    // Suffixes count claimed children only, so numbering stays dense even
    // when an earlier sibling's subtree has already claimed a later sibling.
    let mut seq = 0;
    for child in children {
        if traversal.codes.contains_key(&child.id) {
            continue;
        }
        seq += 1;
        traversal.owner.insert(child.id.clone(), node_id.clone());
        descend(
            &child.id,
            format!("{}.{}", code, seq),
            adjacency,
            index,
            traversal,
        );
    }
}

/// Numeric-aware comparison of two dotted codes
///
/// Segments compare as numbers, so `1.9` sorts before `1.10`. A code that is
/// a prefix of another sorts first (`1` before `1.1`).
pub fn compare_codes(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(xn), Ok(yn)) => xn.cmp(&yn),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NodeKind, Position};
    use proptest::prelude::*;
    use std::collections::{HashMap, HashSet};

    fn make_node(i: usize, x: f64) -> Node {
        Node {
            id: format!("n-{:07x}", i).parse().unwrap(),
            position: Position::new(x, 0.0),
            kind: NodeKind::Task,
            label: format!("Node {}", i),
            description: None,
            progress: None,
            hierarchy_code: String::new(),
        }
    }

    fn edge(from: &Node, to: &Node) -> Edge {
        Edge::new(from.id.clone(), to.id.clone())
    }

    fn code_map(nodes: &[Node]) -> HashMap<String, String> {
        nodes
            .iter()
            .map(|n| (n.label.clone(), n.hierarchy_code.clone()))
            .collect()
    }

    #[test]
    fn empty_graph_yields_empty_result() {
        assert!(assign_codes(&[], &[]).is_empty());
    }

    #[test]
    fn flat_roots_number_left_to_right() {
        let nodes = vec![make_node(0, 30.0), make_node(1, 10.0), make_node(2, 20.0)];

        let coded = assign_codes(&nodes, &[]);
        let codes = code_map(&coded);

        assert_eq!(codes["Node 1"], "1");
        assert_eq!(codes["Node 2"], "2");
        assert_eq!(codes["Node 0"], "3");
    }

    #[test]
    fn children_numbered_by_position_not_insertion_order() {
        let root = make_node(0, 100.0);
        let c1 = make_node(1, 50.0);
        let c2 = make_node(2, 10.0);
        let edges = vec![edge(&root, &c1), edge(&root, &c2)];
        let nodes = vec![root, c1, c2];

        let codes = code_map(&assign_codes(&nodes, &edges));

        assert_eq!(codes["Node 0"], "1");
        assert_eq!(codes["Node 2"], "1.1");
        assert_eq!(codes["Node 1"], "1.2");
    }

    #[test]
    fn end_to_end_scenario() {
        let p = make_node(0, 250.0);
        let a = make_node(1, 100.0);
        let b = make_node(2, 300.0);
        let edges = vec![edge(&p, &a), edge(&p, &b)];
        let nodes = vec![p, a, b];

        let codes = code_map(&assign_codes(&nodes, &edges));

        assert_eq!(codes["Node 0"], "1");
        assert_eq!(codes["Node 1"], "1.1");
        assert_eq!(codes["Node 2"], "1.2");
    }

    #[test]
    fn reassignment_is_idempotent() {
        let root = make_node(0, 0.0);
        let a = make_node(1, -5.0);
        let b = make_node(2, 5.0);
        let edges = vec![edge(&root, &a), edge(&root, &b), edge(&a, &b)];
        let nodes = vec![root, a, b];

        let once = assign_codes(&nodes, &edges);
        let twice = assign_codes(&once, &edges);

        assert_eq!(once, twice);
    }

    #[test]
    fn moving_a_node_renumbers_siblings() {
        let root = make_node(0, 0.0);
        let a = make_node(1, 10.0);
        let b = make_node(2, 20.0);
        let edges = vec![edge(&root, &a), edge(&root, &b)];
        let mut nodes = vec![root, a, b];

        let before = code_map(&assign_codes(&nodes, &edges));
        assert_eq!(before["Node 1"], "1.1");
        assert_eq!(before["Node 2"], "1.2");

        nodes[1].move_to(Position::new(30.0, 0.0));

        let after = code_map(&assign_codes(&nodes, &edges));
        assert_eq!(after["Node 2"], "1.1");
        assert_eq!(after["Node 1"], "1.2");
    }

    #[test]
    fn position_ties_keep_snapshot_order() {
        let nodes = vec![make_node(0, 10.0), make_node(1, 10.0)];

        let codes = code_map(&assign_codes(&nodes, &[]));

        assert_eq!(codes["Node 0"], "1");
        assert_eq!(codes["Node 1"], "2");
    }

    #[test]
    fn isolated_node_is_a_root() {
        let root = make_node(0, 0.0);
        let child = make_node(1, 0.0);
        let isolated = make_node(2, -100.0);
        let edges = vec![edge(&root, &child)];
        let nodes = vec![root, child, isolated];

        let codes = code_map(&assign_codes(&nodes, &edges));

        assert_eq!(codes["Node 2"], "1");
        assert_eq!(codes["Node 0"], "2");
        assert_eq!(codes["Node 1"], "2.1");
    }

    #[test]
    fn detached_two_node_cycle_gets_empty_codes() {
        let a = make_node(0, 0.0);
        let b = make_node(1, 10.0);
        let lone = make_node(2, 20.0);
        let edges = vec![edge(&a, &b), edge(&b, &a)];
        let nodes = vec![a, b, lone];

        let codes = code_map(&assign_codes(&nodes, &edges));

        assert_eq!(codes["Node 0"], "");
        assert_eq!(codes["Node 1"], "");
        assert_eq!(codes["Node 2"], "1");
    }

    #[test]
    fn root_pointing_into_cycle_codes_along_the_descent() {
        let root = make_node(0, 0.0);
        let a = make_node(1, 10.0);
        let b = make_node(2, 20.0);
        let edges = vec![edge(&root, &a), edge(&a, &b), edge(&b, &a)];
        let nodes = vec![root, a, b];

        let codes = code_map(&assign_codes(&nodes, &edges));

        // The descent enters at A, continues to B, and stops when B's child
        // A turns out to be already claimed.
        assert_eq!(codes["Node 0"], "1");
        assert_eq!(codes["Node 1"], "1.1");
        assert_eq!(codes["Node 2"], "1.1.1");
    }

    #[test]
    fn self_loop_node_gets_empty_code() {
        let a = make_node(0, 0.0);
        let edges = vec![edge(&a, &a)];
        let nodes = vec![a];

        let codes = code_map(&assign_codes(&nodes, &edges));

        assert_eq!(codes["Node 0"], "");
    }

    #[test]
    fn multi_parent_node_claimed_by_first_descent() {
        let p1 = make_node(0, 10.0);
        let p2 = make_node(1, 20.0);
        let shared = make_node(2, 0.0);
        let edges = vec![edge(&p2, &shared), edge(&p1, &shared)];
        let nodes = vec![p1, p2, shared];

        let traversal = traverse(&nodes, &edges);

        // P1 is the leftmost root, so its descent claims the shared child
        // even though P2's edge appears first in the edge list.
        assert_eq!(traversal.codes[&nodes[2].id], "1.1");
        assert_eq!(traversal.owner[&nodes[2].id], nodes[0].id);

        let codes = code_map(&assign_codes(&nodes, &edges));
        assert_eq!(codes["Node 0"], "1");
        assert_eq!(codes["Node 1"], "2");
    }

    #[test]
    fn claimed_sibling_leaves_no_gap_in_numbering() {
        let p = make_node(0, 0.0);
        let a = make_node(1, 10.0);
        let b = make_node(2, 20.0);
        let c = make_node(3, 30.0);
        // B is both a child of P and a child of A; A's descent claims it.
        let edges = vec![edge(&p, &a), edge(&p, &b), edge(&p, &c), edge(&a, &b)];
        let nodes = vec![p, a, b, c];

        let codes = code_map(&assign_codes(&nodes, &edges));

        assert_eq!(codes["Node 1"], "1.1");
        assert_eq!(codes["Node 2"], "1.1.1");
        assert_eq!(codes["Node 3"], "1.2");
    }

    #[test]
    fn duplicate_edges_do_not_double_number() {
        let p = make_node(0, 0.0);
        let a = make_node(1, 10.0);
        let b = make_node(2, 20.0);
        let edges = vec![edge(&p, &a), edge(&p, &a), edge(&p, &b)];
        let nodes = vec![p, a, b];

        let codes = code_map(&assign_codes(&nodes, &edges));

        assert_eq!(codes["Node 1"], "1.1");
        assert_eq!(codes["Node 2"], "1.2");
    }

    #[test]
    fn edges_with_unknown_endpoints_are_ignored() {
        let a = make_node(0, 0.0);
        let ghost: NodeId = "n-fffffff".parse().unwrap();
        let edges = vec![
            Edge::new(ghost.clone(), a.id.clone()),
            Edge::new(a.id.clone(), ghost),
        ];
        let nodes = vec![a];

        let codes = code_map(&assign_codes(&nodes, &edges));

        // The ghost edge must not rob the node of its root status.
        assert_eq!(codes["Node 0"], "1");
    }

    #[test]
    fn output_preserves_input_order_and_content() {
        let mut a = make_node(0, 10.0);
        a.set_description("first");
        a.set_progress(25);
        let b = make_node(1, 0.0);
        let nodes = vec![a.clone(), b.clone()];

        let coded = assign_codes(&nodes, &[]);

        assert_eq!(coded.len(), 2);
        assert_eq!(coded[0].id, a.id);
        assert_eq!(coded[0].description.as_deref(), Some("first"));
        assert_eq!(coded[0].progress, Some(25));
        assert_eq!(coded[1].id, b.id);
    }

    #[test]
    fn compare_codes_is_numeric_aware() {
        assert_eq!(compare_codes("1.2", "1.9"), std::cmp::Ordering::Less);
        assert_eq!(compare_codes("1.9", "1.10"), std::cmp::Ordering::Less);
        assert_eq!(compare_codes("1.10", "1.2"), std::cmp::Ordering::Greater);
        assert_eq!(compare_codes("2", "10"), std::cmp::Ordering::Less);
        assert_eq!(compare_codes("1", "1.1"), std::cmp::Ordering::Less);
        assert_eq!(compare_codes("1.2.1", "1.2.1"), std::cmp::Ordering::Equal);

        let mut codes = vec!["1.10", "1.2", "1.9"];
        codes.sort_by(|a, b| compare_codes(a, b));
        assert_eq!(codes, vec!["1.2", "1.9", "1.10"]);
    }

    fn graph_strategy() -> impl Strategy<Value = (Vec<Node>, Vec<Edge>)> {
        (1usize..10).prop_flat_map(|n| {
            let xs = prop::collection::vec(-500i32..500, n);
            let pairs = prop::collection::vec((0..n, 0..n), 0..2 * n);
            (xs, pairs).prop_map(|(xs, pairs)| {
                let nodes: Vec<Node> = xs
                    .iter()
                    .enumerate()
                    .map(|(i, x)| make_node(i, *x as f64))
                    .collect();
                let edges: Vec<Edge> = pairs
                    .into_iter()
                    .map(|(s, t)| Edge::new(nodes[s].id.clone(), nodes[t].id.clone()))
                    .collect();
                (nodes, edges)
            })
        })
    }

    proptest! {
        #[test]
        fn assignment_is_idempotent((nodes, edges) in graph_strategy()) {
            let once = assign_codes(&nodes, &edges);
            let twice = assign_codes(&once, &edges);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn sibling_numbering_is_dense((nodes, edges) in graph_strategy()) {
            let coded = assign_codes(&nodes, &edges);
            let codes: HashSet<&str> = coded
                .iter()
                .map(|n| n.hierarchy_code.as_str())
                .filter(|c| !c.is_empty())
                .collect();

            for code in &codes {
                let (prefix, last) = match code.rsplit_once('.') {
                    Some((prefix, last)) => (Some(prefix), last),
                    None => (None, *code),
                };
                let seq: u64 = last.parse().unwrap();
                if seq > 1 {
                    let predecessor = match prefix {
                        Some(p) => format!("{}.{}", p, seq - 1),
                        None => (seq - 1).to_string(),
                    };
                    prop_assert!(
                        codes.contains(predecessor.as_str()),
                        "code {} present but {} missing", code, predecessor
                    );
                }
            }
        }
    }
}
