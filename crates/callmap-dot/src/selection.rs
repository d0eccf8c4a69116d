//! The selection engine: decides which nodes and subgraphs survive into
//! the rendered output for a given focus pattern.
//!
//! Selection is a pure function of the graph, the focus pattern and the
//! children-only flag. It runs in two phases:
//!
//! 1. An edge scan that picks endpoint identities of edges touching the
//!    focus (both endpoints in full mode, targets only in children-only
//!    mode).
//! 2. An orphan rescue pass over the subgraph tree that keeps
//!    focus-matched nodes visible even when no edge rule selected them,
//!    along with their own outgoing edges.

use std::collections::BTreeSet;

use regex::Regex;

use callmap_core::{CallGraph, Subgraph, owner_id};
use callmap_error::{Error, Result};

/// Compiled focus pattern.
///
/// An identity matches when the focus text occurs in it with at least one
/// character before the occurrence, so a bare whole-identity equality is
/// never a match. The focus is escaped before compilation and therefore
/// always matched literally, never as regex syntax.
#[derive(Debug)]
pub struct FocusMatcher {
    pattern: Regex,
}

impl FocusMatcher {
    pub fn new(focus: &str) -> Result<Self> {
        if focus.is_empty() {
            return Err(Error::config_invalid("focus pattern must not be empty")
                .with_operation("selection::focus_matcher"));
        }
        let pattern = Regex::new(&format!(".+{}", regex::escape(focus))).map_err(|e| {
            Error::focus_invalid(focus)
                .with_operation("selection::focus_matcher")
                .set_source(e)
        })?;
        Ok(Self { pattern })
    }

    pub fn is_match(&self, identity: &str) -> bool {
        self.pattern.is_match(identity)
    }
}

/// The two inclusion sets computed once per run.
///
/// `BTreeSet` keeps membership order-independent while giving a stable
/// iteration order for anything that does walk the sets.
#[derive(Debug, Clone, Default)]
pub struct InclusionSets {
    /// Node identities eligible for emission (edge endpoints plus rescued
    /// orphan sources).
    pub nodes: BTreeSet<String>,
    /// Subgraph identities eligible for emission.
    pub groups: BTreeSet<String>,
}

impl InclusionSets {
    pub fn includes_node(&self, identity: &str) -> bool {
        self.nodes.contains(identity)
    }

    /// The root subgraph is always eligible, whatever the sets say.
    pub fn includes_group(&self, identity: &str) -> bool {
        identity == callmap_core::ROOT_ID || self.groups.contains(identity)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.groups.is_empty()
    }
}

/// Compute the inclusion sets for one rendering run.
///
/// In children-only mode an edge whose *source* matches contributes only
/// its target; edges whose only matching endpoint is the target are
/// ignored entirely. In full mode a match on either endpoint contributes
/// both.
pub fn compute_inclusion(
    graph: &CallGraph,
    matcher: &FocusMatcher,
    children_only: bool,
) -> InclusionSets {
    let mut nodes = BTreeSet::new();
    for edge in graph.edges() {
        let source = edge.source.id.as_str();
        let target = edge.target.id.as_str();
        if children_only {
            if matcher.is_match(source) {
                nodes.insert(target.to_string());
            }
        } else if matcher.is_match(source) || matcher.is_match(target) {
            nodes.insert(source.to_string());
            nodes.insert(target.to_string());
        }
    }

    // Each selected endpoint pulls in its owning subgraph.
    let mut groups: BTreeSet<String> = nodes
        .iter()
        .filter_map(|id| owner_id(id).map(str::to_string))
        .collect();

    // Orphan rescue: focus-matched nodes stay visible even when no edge
    // rule selected them. Their containing subgraph becomes eligible, and
    // their own outgoing edges are recovered by re-adding the source side.
    // Note the asymmetry with children-only mode: the rescue re-admits the
    // matched source itself, where the primary rule would not.
    let mut orphans = BTreeSet::new();
    scan_orphans(graph.root(), matcher, &mut orphans, &mut groups);
    for edge in graph.edges() {
        if orphans.contains(edge.source.id.as_str()) {
            nodes.insert(edge.source.id.clone());
        }
    }

    InclusionSets { nodes, groups }
}

fn scan_orphans(
    subgraph: &Subgraph,
    matcher: &FocusMatcher,
    orphans: &mut BTreeSet<String>,
    groups: &mut BTreeSet<String>,
) {
    for node in &subgraph.nodes {
        if matcher.is_match(&node.id) {
            orphans.insert(node.id.clone());
            groups.insert(subgraph.id.clone());
        }
    }
    for child in &subgraph.subgraphs {
        scan_orphans(child, matcher, orphans, groups);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callmap_core::{Edge, EdgeFlavor, Node, Subgraph};
    use callmap_error::ErrorKind;

    fn matcher(focus: &str) -> FocusMatcher {
        FocusMatcher::new(focus).unwrap()
    }

    #[test]
    fn test_matcher_requires_leading_text() {
        let m = matcher("x");
        // Suffix occurrence with a preceding character matches.
        assert!(m.is_match("A__x"));
        // Infix occurrence matches.
        assert!(m.is_match("A__x__y"));
        // Whole-identity equality is not a match.
        assert!(!m.is_match("x"));
        // An occurrence anchored at position zero is not a match.
        assert!(!m.is_match("xy"));
        assert!(!m.is_match("A__y"));
    }

    #[test]
    fn test_matcher_treats_focus_literally() {
        let m = matcher("f(.*)");
        assert!(m.is_match("mod__f(.*)"));
        assert!(!m.is_match("mod__fxx"));

        let m = matcher("a+b");
        assert!(m.is_match("ns__a+b"));
        assert!(!m.is_match("ns__aab"));
    }

    #[test]
    fn test_matcher_rejects_empty_focus() {
        let err = FocusMatcher::new("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    fn two_node_graph() -> CallGraph {
        let mut graph = CallGraph::new();
        let mut sub = Subgraph::new("A", "A");
        sub.add_node(Node::new("A__x", "x"));
        sub.add_node(Node::new("A__y", "y"));
        graph.root_mut().add_subgraph(sub);
        graph.add_edge(Edge::new(
            Node::new("A__x", "x"),
            Node::new("A__y", "y"),
            EdgeFlavor::Uses,
        ));
        graph
    }

    #[test]
    fn test_full_mode_includes_both_endpoints() {
        let graph = two_node_graph();
        let include = compute_inclusion(&graph, &matcher("x"), false);

        assert!(include.includes_node("A__x"));
        assert!(include.includes_node("A__y"));
        assert_eq!(include.nodes.len(), 2);
        assert!(include.includes_group("A"));
        assert_eq!(include.groups.len(), 1);
    }

    #[test]
    fn test_children_only_adds_target_then_rescues_source() {
        let graph = two_node_graph();
        let include = compute_inclusion(&graph, &matcher("x"), true);

        // The primary rule only adds the target; the source comes back via
        // the orphan rescue because it matches the focus itself.
        assert!(include.includes_node("A__y"));
        assert!(include.includes_node("A__x"));
        assert!(include.includes_group("A"));
    }

    #[test]
    fn test_children_only_ignores_target_only_matches() {
        let mut graph = CallGraph::new();
        let mut sub = Subgraph::new("A", "A");
        sub.add_node(Node::new("A__p", "p"));
        sub.add_node(Node::new("A__x", "x"));
        graph.root_mut().add_subgraph(sub);
        // Only the target matches the focus; children-only drops the edge.
        graph.add_edge(Edge::new(
            Node::new("A__p", "p"),
            Node::new("A__x", "x"),
            EdgeFlavor::Uses,
        ));

        let include = compute_inclusion(&graph, &matcher("x"), true);
        // The target-only edge contributed nothing, but A__x itself is a
        // focus match, so the orphan pass still admits its subgraph. It has
        // no outgoing edges, so the node set stays empty.
        assert!(!include.includes_node("A__p"));
        assert!(!include.includes_node("A__x"));
        assert!(include.includes_group("A"));
    }

    #[test]
    fn test_no_match_yields_empty_sets() {
        let graph = two_node_graph();
        let include = compute_inclusion(&graph, &matcher("zzz"), false);
        assert!(include.is_empty());
        // Root stays eligible regardless.
        assert!(include.includes_group("G"));
        assert!(!include.includes_group("A"));
    }

    #[test]
    fn test_untouched_edges_never_selected() {
        let mut graph = two_node_graph();
        let mut sub = Subgraph::new("B", "B");
        sub.add_node(Node::new("B__p", "p"));
        sub.add_node(Node::new("B__q", "q"));
        graph.root_mut().add_subgraph(sub);
        graph.add_edge(Edge::new(
            Node::new("B__p", "p"),
            Node::new("B__q", "q"),
            EdgeFlavor::Defines,
        ));

        let include = compute_inclusion(&graph, &matcher("x"), false);
        assert!(!include.includes_node("B__p"));
        assert!(!include.includes_node("B__q"));
        assert!(!include.includes_group("B"));
    }

    #[test]
    fn test_orphan_rescue_without_edges() {
        let mut graph = CallGraph::new();
        let mut sub = Subgraph::new("A", "A");
        sub.add_node(Node::new("A__x", "x"));
        graph.root_mut().add_subgraph(sub);

        let include = compute_inclusion(&graph, &matcher("x"), false);
        // No edges at all: the subgraph is rescued, the node set stays
        // empty because the rescue only re-admits edge sources.
        assert!(include.nodes.is_empty());
        assert!(include.includes_group("A"));
    }

    #[test]
    fn test_orphan_rescue_recovers_outgoing_edges() {
        let mut graph = CallGraph::new();
        let mut sub = Subgraph::new("A", "A");
        sub.add_node(Node::new("A__x", "x"));
        sub.add_node(Node::new("A__y", "y"));
        graph.root_mut().add_subgraph(sub);
        graph.add_edge(Edge::new(
            Node::new("A__x", "x"),
            Node::new("A__y", "y"),
            EdgeFlavor::Uses,
        ));

        // Focus matches the source under children-only; rescue puts the
        // source back alongside the primary rule's target.
        let include = compute_inclusion(&graph, &matcher("x"), true);
        assert!(include.includes_node("A__x"));
        assert!(include.includes_node("A__y"));
    }

    #[test]
    fn test_orphan_scan_reaches_nested_subgraphs() {
        let mut graph = CallGraph::new();
        let mut outer = Subgraph::new("M", "M");
        let mut inner = Subgraph::new("M__f", "f");
        inner.add_node(Node::new("M__f__x", "x"));
        outer.add_subgraph(inner);
        graph.root_mut().add_subgraph(outer);

        let include = compute_inclusion(&graph, &matcher("x"), false);
        assert!(include.includes_group("M__f"));
        assert!(!include.includes_group("M"));
    }

    #[test]
    fn test_inclusion_is_idempotent() {
        let graph = two_node_graph();
        let m = matcher("x");
        let a = compute_inclusion(&graph, &m, false);
        let b = compute_inclusion(&graph, &m, false);
        assert_eq!(a.nodes, b.nodes);
        assert_eq!(a.groups, b.groups);
    }
}
