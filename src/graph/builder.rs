//! Access graph construction

use super::legend::render_legend;
use super::model::{node_key, rules_key, Graph, GroupId, NodeId, NodeKind};
use crate::config::RenderOptions;
use crate::domain::{BindingAndRole, PermissionSnapshot};
use crate::error::Result;
use crate::service::{resolve_bindings, resolve_role_rules, resolve_rules_for};
use tracing::debug;

/// Turns a [`PermissionSnapshot`] into a [`Graph`].
pub struct GraphBuilder<'a> {
    snapshot: &'a PermissionSnapshot,
    options: &'a RenderOptions,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(snapshot: &'a PermissionSnapshot, options: &'a RenderOptions) -> Self {
        Self { snapshot, options }
    }

    /// Legend followed by the access graph.
    pub fn build(&self) -> Result<Graph> {
        let mut graph = Self::new_graph();
        render_legend(&mut graph, self.options);
        self.render_access(&mut graph)?;
        Ok(graph)
    }

    /// The access graph alone, without the legend.
    pub fn access_graph(&self) -> Result<Graph> {
        let mut graph = Self::new_graph();
        self.render_access(&mut graph)?;
        Ok(graph)
    }

    fn new_graph() -> Graph {
        let mut graph = Graph::new();
        graph.set_attribute("newrank", "true");
        graph
    }

    /// One dashed group per namespace holding ServiceAccounts. Grants from
    /// ClusterRoleBindings are drawn at the top level, grants from the
    /// namespace's RoleBindings inside its group.
    fn render_access(&self, graph: &mut Graph) -> Result<()> {
        let root = graph.root();

        for (namespace, service_accounts) in &self.snapshot.service_accounts {
            debug!(namespace = %namespace, service_accounts = service_accounts.len(), "Rendering namespace");
            let group = graph.add_group(root, namespace, Some("dashed"));

            for name in service_accounts {
                let sa_node = graph.node(
                    group,
                    NodeKind::ServiceAccount,
                    &node_key(NodeKind::ServiceAccount, namespace, name),
                    name,
                );

                let cluster_grants =
                    resolve_bindings(&self.snapshot.cluster_role_bindings, name, namespace)?;
                for grant in &cluster_grants {
                    self.render_grant(graph, root, sa_node, grant)?;
                }

                let namespace_grants =
                    resolve_bindings(self.snapshot.role_bindings_in(namespace), name, namespace)?;
                for grant in &namespace_grants {
                    self.render_grant(graph, group, sa_node, grant)?;
                }
            }
        }

        Ok(())
    }

    /// Draws role (and binding and rules) nodes for one grant inside `group`.
    fn render_grant(
        &self,
        graph: &mut Graph,
        group: GroupId,
        sa_node: NodeId,
        grant: &BindingAndRole,
    ) -> Result<()> {
        let binding = &grant.binding;
        let role = &grant.role;

        // The role itself was filtered out of the snapshot.
        if self.options.should_ignore(&role.name) {
            debug!(binding = %binding, role = %role, "Skipping grant of ignored role");
            return Ok(());
        }

        let role_kind = if grant.is_cluster_role() {
            NodeKind::ClusterRole
        } else {
            NodeKind::Role
        };
        let role_node = graph.node(
            group,
            role_kind,
            &node_key(role_kind, &binding.namespace, &role.name),
            &role.name,
        );

        if self.options.render_bindings {
            let binding_kind = if grant.is_cluster_role_binding() {
                NodeKind::ClusterRoleBinding
            } else {
                NodeKind::RoleBinding
            };
            let binding_node = graph.node(
                group,
                binding_kind,
                &node_key(binding_kind, &binding.namespace, &binding.name),
                &binding.name,
            );
            graph.add_edge(group, sa_node, binding_node, None);
            graph.add_edge(group, binding_node, role_node, None);
        } else {
            graph.add_edge(group, sa_node, role_node, Some(&binding.name));
        }

        if self.options.render_rules {
            let rules = if self.options.union_role_rules {
                resolve_role_rules(&binding.namespace, &role.name, self.snapshot)?
            } else {
                resolve_rules_for(&binding.namespace, &role.name, grant.role_kind, self.snapshot)?
            };
            if !rules.is_empty() {
                let rules_node = graph.node(
                    group,
                    NodeKind::Rules,
                    &rules_key(role_kind, &binding.namespace, &role.name),
                    &rules,
                );
                graph.add_edge(group, role_node, rules_node, None);
            }
        }

        debug!(binding = %binding, role = %role, "Rendered grant");
        Ok(())
    }
}
