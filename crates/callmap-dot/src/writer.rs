//! The streaming DOT writer.
//!
//! [`DotWriter::run`] acquires the output sink, emits the graph prologue,
//! computes the inclusion sets once, serializes the subgraph tree
//! depth-first, serializes all edges in one flat pass, and closes the
//! graph. Indentation depth is threaded explicitly through the recursion;
//! skipped subgraphs never change it.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use callmap_core::{CallGraph, Node, Subgraph};
use callmap_error::{Error, Result};

use crate::dot::{escape_label, stroke_for_flavor};
use crate::selection::{FocusMatcher, InclusionSets, compute_inclusion};

/// Logging capability handed to the writer.
///
/// The default forwards to `tracing`; tests use [`NullLog`].
pub trait RenderLog {
    fn info(&self, message: &str);
}

/// Forwards informational messages to `tracing::info!`.
pub struct TraceLog;

impl RenderLog for TraceLog {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }
}

/// Discards all messages.
pub struct NullLog;

impl RenderLog for NullLog {
    fn info(&self, _message: &str) {}
}

/// Where the rendered document goes. Resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to the named file, created or truncated at run start.
    NamedFile(PathBuf),
    /// Write to standard output.
    StandardStream,
}

impl OutputTarget {
    /// Build a target from an optional path; absence means stdout.
    pub fn from_path(path: Option<impl Into<PathBuf>>) -> Self {
        match path {
            Some(p) => Self::NamedFile(p.into()),
            None => Self::StandardStream,
        }
    }

    fn open(&self) -> Result<Box<dyn Write>> {
        match self {
            Self::NamedFile(path) => {
                let file = File::create(path).map_err(|e| {
                    Error::from(e)
                        .with_operation("writer::open")
                        .with_context("path", path.display().to_string())
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
            Self::StandardStream => Ok(Box::new(io::stdout())),
        }
    }
}

/// Configuration surface of the writer.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    pub output: OutputTarget,
    /// Focus pattern selecting the region of interest. Required.
    pub focus: String,
    /// Keep only the downstream side of focus-matched edges.
    pub children_only: bool,
    /// Spaces per indentation level.
    pub tabstop: usize,
    /// Extra graph-level attributes, passed through verbatim.
    pub graph_attrs: Vec<String>,
}

impl WriterOptions {
    pub fn new(focus: impl Into<String>) -> Self {
        Self {
            output: OutputTarget::StandardStream,
            focus: focus.into(),
            children_only: false,
            tabstop: 4,
            graph_attrs: Vec::new(),
        }
    }

    pub fn with_output(mut self, output: OutputTarget) -> Self {
        self.output = output;
        self
    }

    pub fn with_children_only(mut self, children_only: bool) -> Self {
        self.children_only = children_only;
        self
    }

    pub fn with_tabstop(mut self, tabstop: usize) -> Self {
        self.tabstop = tabstop;
        self
    }

    pub fn with_graph_attr(mut self, attr: impl Into<String>) -> Self {
        self.graph_attrs.push(attr.into());
        self
    }
}

/// Renders one graph to DOT markup, filtered by the focus pattern.
pub struct DotWriter<'g> {
    graph: &'g CallGraph,
    options: WriterOptions,
    tab: String,
    log: Box<dyn RenderLog>,
}

impl<'g> DotWriter<'g> {
    pub fn new(graph: &'g CallGraph, options: WriterOptions) -> Self {
        let tab = " ".repeat(options.tabstop);
        Self {
            graph,
            options,
            tab,
            log: Box::new(TraceLog),
        }
    }

    pub fn with_log(mut self, log: Box<dyn RenderLog>) -> Self {
        self.log = log;
        self
    }

    /// Render to the configured output target.
    ///
    /// The focus pattern is validated before the sink is acquired, so an
    /// invalid focus never creates or truncates a named file. The sink is
    /// released on every exit path.
    pub fn run(&self) -> Result<()> {
        let matcher = FocusMatcher::new(&self.options.focus)?;
        let mut out = self.options.output.open()?;
        self.render_with(&mut *out, &matcher)?;
        out.flush()
            .map_err(|e| Error::from(e).with_operation("writer::run"))?;
        Ok(())
    }

    /// Render the full document to an arbitrary sink.
    pub fn render(&self, out: &mut dyn Write) -> Result<()> {
        let matcher = FocusMatcher::new(&self.options.focus)?;
        self.render_with(out, &matcher)
    }

    fn render_with(&self, out: &mut dyn Write, matcher: &FocusMatcher) -> Result<()> {
        self.log.info("dot writer running");
        let include = compute_inclusion(self.graph, matcher, self.options.children_only);

        self.start_graph(out)?;
        self.write_subgraph(out, self.graph.root(), &include, 1)?;
        self.write_edges(out, &include, 1)?;
        self.finish_graph(out)
    }

    fn write_line(&self, out: &mut dyn Write, depth: usize, line: &str) -> Result<()> {
        writeln!(out, "{}{}", self.tab.repeat(depth), line)
            .map_err(|e| Error::from(e).with_operation("writer::write_line"))
    }

    fn start_graph(&self, out: &mut dyn Write) -> Result<()> {
        self.write_line(out, 0, "digraph G {")?;
        let mut attrs = self.options.graph_attrs.clone();
        if self.graph.grouped() {
            attrs.push(String::from("clusterrank=\"local\""));
        }
        if !attrs.is_empty() {
            self.write_line(out, 1, &format!("graph [{}];", attrs.join(", ")))?;
        }
        Ok(())
    }

    /// Serialize one subgraph and, when eligible, everything under it.
    ///
    /// Ineligible subgraphs are skipped whole: no recursion into their
    /// children, no indentation change.
    fn write_subgraph(
        &self,
        out: &mut dyn Write,
        subgraph: &Subgraph,
        include: &InclusionSets,
        depth: usize,
    ) -> Result<()> {
        if !include.includes_group(&subgraph.id) {
            return Ok(());
        }
        self.log.info(&format!("start subgraph {}", subgraph.label));
        // Name must begin with "cluster" for GraphViz to draw a grouping.
        self.write_line(out, depth, &format!("subgraph cluster_{} {{", subgraph.id))?;
        // Translucent gray, no hue, so clusters never collide with any
        // group of colored nodes.
        self.write_line(
            out,
            depth + 1,
            &format!(
                "graph [style=\"filled,rounded\", fillcolor=\"#80808018\", label=\"{}\"];",
                escape_label(&subgraph.label)
            ),
        )?;
        for node in &subgraph.nodes {
            self.write_node(out, node, include, depth + 1)?;
        }
        for child in &subgraph.subgraphs {
            self.write_subgraph(out, child, include, depth + 1)?;
        }
        self.write_line(out, depth, "}")
    }

    fn write_node(
        &self,
        out: &mut dyn Write,
        node: &Node,
        include: &InclusionSets,
        depth: usize,
    ) -> Result<()> {
        if !include.includes_node(&node.id) {
            return Ok(());
        }
        self.log.info(&format!("write node {}", node.label));
        self.write_line(
            out,
            depth,
            &format!(
                "{} [label=\"{}\", style=\"filled\", fillcolor=\"{}\", fontcolor=\"{}\", group=\"{}\"];",
                node.id,
                escape_label(&node.label),
                node.fill_color,
                node.text_color,
                node.group
            ),
        )
    }

    /// One flat pass over the full edge list, strictly after the tree.
    fn write_edges(&self, out: &mut dyn Write, include: &InclusionSets, depth: usize) -> Result<()> {
        for edge in self.graph.edges() {
            if include.includes_node(&edge.source.id) && include.includes_node(&edge.target.id) {
                self.write_line(
                    out,
                    depth,
                    &format!(
                        "{} -> {} [style=\"{}\", color=\"{}\"];",
                        edge.source.id,
                        edge.target.id,
                        stroke_for_flavor(edge.flavor),
                        edge.color
                    ),
                )?;
            }
        }
        Ok(())
    }

    fn finish_graph(&self, out: &mut dyn Write) -> Result<()> {
        self.write_line(out, 0, "}")
    }
}
