//! Focused DOT rendering for call/definition graphs.
//!
//! This crate turns a [`CallGraph`] into Graphviz DOT markup, filtered by
//! an operator-supplied focus pattern.
//!
//! # Module Structure
//!
//! - [`dot`]: DOT format utilities and helpers
//! - [`selection`]: the inclusion-set engine (focus matching, orphan rescue)
//! - [`writer`]: the streaming writer walking the subgraph tree

pub mod dot;
pub mod selection;
pub mod writer;

use callmap_core::CallGraph;
use callmap_error::{Error, Result};

pub use dot::{escape_label, stroke_for_flavor};
pub use selection::{FocusMatcher, InclusionSets, compute_inclusion};
pub use writer::{DotWriter, NullLog, OutputTarget, RenderLog, TraceLog, WriterOptions};

/// Render a graph to a DOT document in memory.
///
/// Equivalent to [`DotWriter::run`] with an in-memory sink; useful for
/// embedders that post-process the markup before writing it out.
pub fn render_to_string(graph: &CallGraph, options: WriterOptions) -> Result<String> {
    let mut buf = Vec::new();
    DotWriter::new(graph, options).render(&mut buf)?;
    String::from_utf8(buf).map_err(|e| {
        Error::unexpected("rendered document is not valid UTF-8")
            .with_operation("dot::render_to_string")
            .set_source(e)
    })
}
