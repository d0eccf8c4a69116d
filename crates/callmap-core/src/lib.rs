//! # callmap-core
//!
//! The graph model consumed by the callmap renderers: nodes, edges and
//! recursive subgraphs with identity, label and grouping metadata. The
//! model is constructed by an upstream analyzer and treated as immutable
//! during rendering.

pub mod graph;

pub use graph::{CallGraph, Edge, EdgeFlavor, Node, OWNER_SEP, ROOT_ID, Subgraph, owner_id};
