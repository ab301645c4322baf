//! JSON rendering of the graph model

use super::model::Graph;
use super::GraphRenderer;
use crate::error::Result;

/// Serializes the [`Graph`] model (groups, nodes, edges) as pretty JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl GraphRenderer for JsonRenderer {
    fn render(&self, graph: &Graph) -> Result<String> {
        let mut out = serde_json::to_string_pretty(graph).map_err(anyhow::Error::from)?;
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::NodeKind;
    use serde_json::{json, Value};

    #[test]
    fn test_render_json() {
        let mut graph = Graph::new();
        let root = graph.root();
        let ns = graph.add_group(root, "ns1", Some("dashed"));
        let sa = graph.node(ns, NodeKind::ServiceAccount, "sa-sa1", "sa1");
        let role = graph.node(root, NodeKind::ClusterRole, "cr-/view", "view");
        graph.add_edge(root, sa, role, Some("viewers"));

        let out = JsonRenderer.render(&graph).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["groups"][1]["name"], "ns1");
        assert_eq!(value["groups"][1]["parent"], 0);
        assert_eq!(value["groups"][0]["children"], json!([1]));
        assert_eq!(value["nodes"][0]["key"], "sa-sa1");
        assert_eq!(value["nodes"][0]["kind"], "service_account");
        assert_eq!(value["nodes"][1]["kind"], "cluster_role");
        assert_eq!(
            value["edges"][0],
            json!({"from": 0, "to": 1, "label": "viewers", "group": 0})
        );
    }
}
