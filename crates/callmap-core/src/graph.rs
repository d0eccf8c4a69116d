//! The call/definition graph model.
//!
//! A [`CallGraph`] is built once by an upstream analyzer and consumed
//! read-only by the renderer. Nodes carry hierarchical identities whose
//! segments are joined by [`OWNER_SEP`]; the final segment is the node's
//! own short name, everything before it names the owning subgraph.

use strum_macros::{Display, IntoStaticStr};

/// Two-character separator between identity segments.
pub const OWNER_SEP: &str = "__";

/// Identity of the root subgraph. The root is always rendered.
pub const ROOT_ID: &str = "G";

/// Derive the owning-group identity from a hierarchical identity by
/// stripping the final segment. Returns `None` for single-segment
/// identities, which have no owner.
///
/// ```
/// use callmap_core::owner_id;
///
/// assert_eq!(owner_id("Module__func__local"), Some("Module__func"));
/// assert_eq!(owner_id("Module"), None);
/// ```
pub fn owner_id(identity: &str) -> Option<&str> {
    identity.rsplit_once(OWNER_SEP).map(|(owner, _)| owner)
}

/// Semantic kind of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum EdgeFlavor {
    /// Structural membership: the source defines the target.
    Defines,
    /// Reference or call: the source uses the target.
    Uses,
}

/// A single graph node with its display styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Unique hierarchical identity, e.g. `Module__function__name`.
    pub id: String,
    /// Display label.
    pub label: String,
    pub fill_color: String,
    pub text_color: String,
    /// Layout group tag, passed through verbatim.
    pub group: String,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            fill_color: String::from("#ffffff"),
            text_color: String::from("#000000"),
            group: String::new(),
        }
    }

    pub fn with_fill_color(mut self, fill_color: impl Into<String>) -> Self {
        self.fill_color = fill_color.into();
        self
    }

    pub fn with_text_color(mut self, text_color: impl Into<String>) -> Self {
        self.text_color = text_color.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }
}

/// A directed edge between two nodes.
///
/// Edges carry owned copies of their endpoints; the renderer only ever
/// reads endpoint identities from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: Node,
    pub target: Node,
    pub color: String,
    pub flavor: EdgeFlavor,
}

impl Edge {
    pub fn new(source: Node, target: Node, flavor: EdgeFlavor) -> Self {
        Self {
            source,
            target,
            color: String::from("#000000"),
            flavor,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// A recursive grouping of nodes, rendered as a DOT cluster.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Subgraph {
    pub id: String,
    pub label: String,
    /// Direct member nodes, in insertion order.
    pub nodes: Vec<Node>,
    /// Child subgraphs, in insertion order.
    pub subgraphs: Vec<Subgraph>,
}

impl Subgraph {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            nodes: Vec::new(),
            subgraphs: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn add_subgraph(&mut self, subgraph: Subgraph) -> &mut Self {
        self.subgraphs.push(subgraph);
        self
    }
}

/// The complete graph: a subgraph tree rooted at [`ROOT_ID`], a flat edge
/// list, and the grouped-rendering flag.
#[derive(Debug, Clone)]
pub struct CallGraph {
    root: Subgraph,
    edges: Vec<Edge>,
    grouped: bool,
}

impl Default for CallGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl CallGraph {
    pub fn new() -> Self {
        Self {
            root: Subgraph::new(ROOT_ID, ROOT_ID),
            edges: Vec::new(),
            grouped: false,
        }
    }

    pub fn with_grouped(mut self, grouped: bool) -> Self {
        self.grouped = grouped;
        self
    }

    pub fn root(&self) -> &Subgraph {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Subgraph {
        &mut self.root
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn grouped(&self) -> bool {
        self.grouped
    }

    pub fn add_edge(&mut self, edge: Edge) -> &mut Self {
        self.edges.push(edge);
        self
    }
}
