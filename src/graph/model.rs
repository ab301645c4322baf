//! Abstract graph model
//!
//! Nodes, edges and nested groups (namespace clusters, the legend). Nodes
//! are created through [`Graph::node`], which looks the key up in the target
//! group first: a key names exactly one node per group, so repeated
//! references to the same role or binding reuse the node while each call to
//! [`Graph::add_edge`] with a new endpoint pair adds an edge.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupId(usize);

impl GroupId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// What a node stands for; decides its key prefix and look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    ServiceAccount,
    RoleBinding,
    ClusterRoleBinding,
    Role,
    ClusterRole,
    Rules,
}

impl NodeKind {
    pub fn shape(&self) -> &'static str {
        match self {
            NodeKind::ServiceAccount => "box",
            NodeKind::RoleBinding | NodeKind::Role => "octagon",
            NodeKind::ClusterRoleBinding | NodeKind::ClusterRole => "doubleoctagon",
            NodeKind::Rules => "note",
        }
    }

    pub fn fill_color(&self) -> Option<&'static str> {
        match self {
            NodeKind::ServiceAccount => Some("#2f6de1"),
            NodeKind::RoleBinding | NodeKind::ClusterRoleBinding => Some("#ffcc00"),
            NodeKind::Role | NodeKind::ClusterRole => Some("#ff9900"),
            NodeKind::Rules => None,
        }
    }

    pub fn font_color(&self) -> Option<&'static str> {
        match self {
            NodeKind::ServiceAccount => Some("#f0f0f0"),
            NodeKind::Rules => None,
            _ => Some("#030303"),
        }
    }
}

/// Stable node key for an entity.
///
/// ServiceAccounts and bindings are keyed by name alone (they are unique
/// within the namespace group that holds them); roles and rule bundles also
/// carry the binding namespace so a ClusterRole bound locally in two
/// namespaces, or bound cluster-wide, yields distinct nodes.
pub fn node_key(kind: NodeKind, namespace: &str, name: &str) -> String {
    match kind {
        NodeKind::ServiceAccount => format!("sa-{}", name),
        NodeKind::RoleBinding => format!("rb-{}", name),
        NodeKind::ClusterRoleBinding => format!("crb-{}", name),
        NodeKind::Role => format!("r-{}/{}", namespace, name),
        NodeKind::ClusterRole => format!("cr-{}/{}", namespace, name),
        NodeKind::Rules => format!("rules-{}/{}", namespace, name),
    }
}

/// Key of the rules bundle attached to a role node of `role_kind`.
///
/// A Role and a ClusterRole of the same name bound in one namespace resolve
/// different rules, so ClusterRole bundles carry a `cr-` marker.
pub fn rules_key(role_kind: NodeKind, namespace: &str, name: &str) -> String {
    match role_kind {
        NodeKind::ClusterRole => format!("rules-cr-{}/{}", namespace, name),
        _ => node_key(NodeKind::Rules, namespace, name),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub key: String,
    pub kind: NodeKind,
    pub label: String,
    pub group: GroupId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub group: GroupId,
}

/// A (possibly nested) cluster of nodes. Group 0 is the graph itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<GroupId>,
    pub children: Vec<GroupId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Graph {
    attributes: Vec<(String, String)>,
    groups: Vec<Group>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    node_index: HashMap<(GroupId, String), NodeId>,
    #[serde(skip)]
    edge_index: HashSet<Edge>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            attributes: vec![],
            groups: vec![Group {
                id: GroupId(0),
                name: String::new(),
                style: None,
                parent: None,
                children: vec![],
            }],
            nodes: vec![],
            edges: vec![],
            node_index: HashMap::new(),
            edge_index: HashSet::new(),
        }
    }

    pub fn root(&self) -> GroupId {
        GroupId(0)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Adds a child group under `parent`.
    pub fn add_group(&mut self, parent: GroupId, name: &str, style: Option<&str>) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(Group {
            id,
            name: name.to_string(),
            style: style.map(str::to_string),
            parent: Some(parent),
            children: vec![],
        });
        self.groups[parent.0].children.push(id);
        id
    }

    /// Returns the node with `key` in `group`, creating it when absent.
    ///
    /// An existing node keeps the kind and label it was created with.
    pub fn node(&mut self, group: GroupId, kind: NodeKind, key: &str, label: &str) -> NodeId {
        if let Some(id) = self.node_index.get(&(group, key.to_string())) {
            return *id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            key: key.to_string(),
            kind,
            label: label.to_string(),
            group,
        });
        self.node_index.insert((group, key.to_string()), id);
        id
    }

    /// Adds a directed edge drawn in `group`. An identical edge (same group,
    /// endpoints and label) is only recorded once.
    pub fn add_edge(&mut self, group: GroupId, from: NodeId, to: NodeId, label: Option<&str>) {
        let edge = Edge {
            from,
            to,
            label: label.map(str::to_string),
            group,
        };
        if self.edge_index.insert(edge.clone()) {
            self.edges.push(edge);
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_by_id(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// First group with this name, searched in creation order.
    pub fn find_group(&self, name: &str) -> Option<GroupId> {
        self.groups.iter().find(|g| g.name == name).map(|g| g.id)
    }

    /// First node with this key in any group.
    pub fn find_node(&self, key: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.key == key)
    }

    pub fn find_node_in(&self, group: GroupId, key: &str) -> Option<&Node> {
        self.node_index
            .get(&(group, key.to_string()))
            .map(|id| self.node_by_id(*id))
    }

    pub fn nodes_in(&self, group: GroupId) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.group == group)
    }

    pub fn edges_in(&self, group: GroupId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.group == group)
    }

    /// Node key prefixed with the path of the group holding it
    /// (`ns1:sa-default`), unique across the whole graph.
    pub fn qualified_key(&self, id: NodeId) -> String {
        let node = self.node_by_id(id);
        let mut path = vec![];
        let mut current = Some(node.group);
        while let Some(group) = current {
            let group = &self.groups[group.0];
            if !group.name.is_empty() {
                path.push(group.name.as_str());
            }
            current = group.parent;
        }
        path.reverse();
        path.push(node.key.as_str());
        path.join(":")
    }

    /// Plain keys of every node.
    pub fn node_keys(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(|n| n.key.as_str()).collect()
    }

    /// Every edge as `(from, to, label)` using qualified keys.
    pub fn edge_set(&self) -> BTreeSet<(String, String, Option<String>)> {
        self.edges
            .iter()
            .map(|e| {
                (
                    self.qualified_key(e.from),
                    self.qualified_key(e.to),
                    e.label.clone(),
                )
            })
            .collect()
    }

    /// Whether an edge runs between nodes with these plain keys.
    pub fn has_edge(&self, from_key: &str, to_key: &str) -> bool {
        self.edges.iter().any(|e| {
            self.node_by_id(e.from).key == from_key && self.node_by_id(e.to).key == to_key
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_node_keys() {
        assert_eq!(node_key(NodeKind::ServiceAccount, "ns1", "sa1"), "sa-sa1");
        assert_eq!(node_key(NodeKind::RoleBinding, "ns1", "rb1"), "rb-rb1");
        assert_eq!(node_key(NodeKind::ClusterRoleBinding, "", "crb1"), "crb-crb1");
        assert_eq!(node_key(NodeKind::Role, "ns1", "role1"), "r-ns1/role1");
        assert_eq!(node_key(NodeKind::ClusterRole, "", "view"), "cr-/view");
        assert_eq!(node_key(NodeKind::ClusterRole, "ns1", "view"), "cr-ns1/view");
        assert_eq!(node_key(NodeKind::Rules, "ns1", "role1"), "rules-ns1/role1");
        assert_eq!(rules_key(NodeKind::Role, "ns1", "viewer"), "rules-ns1/viewer");
        assert_eq!(rules_key(NodeKind::ClusterRole, "ns1", "viewer"), "rules-cr-ns1/viewer");
        assert_eq!(rules_key(NodeKind::ClusterRole, "", "view"), "rules-cr-/view");
    }

    #[test]
    fn test_node_is_get_or_create_per_group() {
        let mut graph = Graph::new();
        let root = graph.root();
        let ns1 = graph.add_group(root, "ns1", Some("dashed"));
        let ns2 = graph.add_group(root, "ns2", Some("dashed"));

        let a = graph.node(ns1, NodeKind::ServiceAccount, "sa-default", "default");
        let again = graph.node(ns1, NodeKind::ServiceAccount, "sa-default", "other");
        let b = graph.node(ns2, NodeKind::ServiceAccount, "sa-default", "default");

        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.node_by_id(a).label, "default");
        assert_eq!(graph.qualified_key(a), "ns1:sa-default");
        assert_eq!(graph.qualified_key(b), "ns2:sa-default");
    }

    #[test]
    fn test_identical_edges_recorded_once() {
        let mut graph = Graph::new();
        let root = graph.root();
        let a = graph.node(root, NodeKind::Role, "r-ns/a", "a");
        let b = graph.node(root, NodeKind::Rules, "rules-ns/a", "get pods\n");

        graph.add_edge(root, a, b, None);
        graph.add_edge(root, a, b, None);
        graph.add_edge(root, a, b, Some("labeled"));

        assert_eq!(graph.edges().len(), 2);
        assert!(graph.has_edge("r-ns/a", "rules-ns/a"));
        assert!(!graph.has_edge("rules-ns/a", "r-ns/a"));
    }

    #[test]
    fn test_groups_nest() {
        let mut graph = Graph::new();
        let root = graph.root();
        let legend = graph.add_group(root, "LEGEND", None);
        let inner = graph.add_group(legend, "Namespace", Some("dashed"));

        assert_eq!(graph.group(root).children, vec![legend]);
        assert_eq!(graph.group(inner).parent, Some(legend));
        assert_eq!(graph.find_group("Namespace"), Some(inner));
    }

    #[test]
    fn test_set_attribute_overwrites() {
        let mut graph = Graph::new();
        graph.set_attribute("newrank", "false");
        graph.set_attribute("newrank", "true");
        assert_eq!(
            graph.attributes(),
            &[("newrank".to_string(), "true".to_string())]
        );
    }

    #[test]
    fn test_kind_styles() {
        assert_eq!(NodeKind::ServiceAccount.shape(), "box");
        assert_eq!(NodeKind::ClusterRoleBinding.shape(), "doubleoctagon");
        assert_eq!(NodeKind::Role.fill_color(), Some("#ff9900"));
        assert_eq!(NodeKind::Rules.fill_color(), None);
        assert_eq!(NodeKind::ServiceAccount.font_color(), Some("#f0f0f0"));
    }
}
