//! Graphviz DOT rendering

use super::model::{Graph, GroupId, Node, NodeKind};
use super::GraphRenderer;
use crate::error::Result;
use std::fmt::{self, Write};

/// Writes a [`Graph`] as a DOT `digraph`.
///
/// Node ids are sequential (`n1`, `n2`, ...) in creation order and groups
/// become `subgraph cluster_<n>` blocks, so keys shared by several groups
/// never collide in the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotRenderer;

impl GraphRenderer for DotRenderer {
    fn render(&self, graph: &Graph) -> Result<String> {
        let mut out = String::new();
        write_graph(&mut out, graph).map_err(anyhow::Error::from)?;
        Ok(out)
    }
}

fn write_graph(out: &mut String, graph: &Graph) -> fmt::Result {
    writeln!(out, "digraph {{")?;
    for (name, value) in graph.attributes() {
        writeln!(out, "\t{}=\"{}\";", name, escape(value))?;
    }
    write_group_body(out, graph, graph.root(), 1)?;
    writeln!(out, "}}")
}

fn write_group_body(out: &mut String, graph: &Graph, group: GroupId, depth: usize) -> fmt::Result {
    let indent = "\t".repeat(depth);

    for child in &graph.group(group).children {
        let child = graph.group(*child);
        writeln!(out, "{}subgraph cluster_{} {{", indent, child.id.index())?;
        writeln!(out, "{}\tlabel=\"{}\";", indent, escape(&child.name))?;
        if let Some(style) = &child.style {
            writeln!(out, "{}\tstyle=\"{}\";", indent, escape(style))?;
        }
        write_group_body(out, graph, child.id, depth + 1)?;
        writeln!(out, "{}}}", indent)?;
    }

    for node in graph.nodes_in(group) {
        writeln!(out, "{}{} [{}];", indent, node_id(node), node_attributes(node))?;
    }

    for edge in graph.edges_in(group) {
        let from = node_id(graph.node_by_id(edge.from));
        let to = node_id(graph.node_by_id(edge.to));
        match &edge.label {
            Some(label) => {
                writeln!(out, "{}{} -> {} [label=\"{}\"];", indent, from, to, escape(label))?
            }
            None => writeln!(out, "{}{} -> {};", indent, from, to)?,
        }
    }

    Ok(())
}

fn node_id(node: &Node) -> String {
    format!("n{}", node.id.index() + 1)
}

fn node_attributes(node: &Node) -> String {
    let label = match node.kind {
        NodeKind::Rules => escape_rules(&node.label),
        _ => escape(&node.label),
    };
    let mut attributes = vec![
        format!("label=\"{}\"", label),
        format!("shape=\"{}\"", node.kind.shape()),
    ];
    if let Some(fill) = node.kind.fill_color() {
        attributes.push("style=\"filled\"".to_string());
        attributes.push(format!("fillcolor=\"{}\"", fill));
    }
    if let Some(font) = node.kind.font_color() {
        attributes.push(format!("fontcolor=\"{}\"", font));
    }
    attributes.join(", ")
}

/// Quoted-string escaping for ordinary labels.
fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Rule text is left-justified: every line break becomes `\l`.
fn escape_rules(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\l")
}
