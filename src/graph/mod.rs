//! Access graph: model, construction and rendering

pub mod builder;
pub mod dot;
pub mod json;
pub mod legend;
pub mod model;

pub use builder::GraphBuilder;
pub use dot::DotRenderer;
pub use json::JsonRenderer;
pub use model::{node_key, rules_key, Edge, Graph, Group, GroupId, Node, NodeId, NodeKind};

use crate::config::OutputFormat;
use crate::error::Result;

/// Writes a finished graph in some textual format.
pub trait GraphRenderer {
    fn render(&self, graph: &Graph) -> Result<String>;
}

/// Renderer for the selected output format.
pub fn renderer_for(format: OutputFormat) -> Box<dyn GraphRenderer> {
    match format {
        OutputFormat::Dot => Box::new(DotRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}
