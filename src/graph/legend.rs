//! Static legend explaining node shapes and edge meanings

use super::model::{Graph, GroupId, NodeKind};
use crate::config::RenderOptions;

/// Which of the two legend groups an entry lives in.
#[derive(Debug, Clone, Copy)]
enum Place {
    Legend,
    Namespace,
}

/// When an entry is shown.
#[derive(Debug, Clone, Copy)]
enum Shown {
    Always,
    WithBindings,
    WithoutBindings,
    WithRules,
}

impl Shown {
    fn applies(&self, options: &RenderOptions) -> bool {
        match self {
            Shown::Always => true,
            Shown::WithBindings => options.render_bindings,
            Shown::WithoutBindings => !options.render_bindings,
            Shown::WithRules => options.render_rules,
        }
    }
}

struct LegendNode {
    place: Place,
    kind: NodeKind,
    key: &'static str,
    label: &'static str,
    shown: Shown,
}

struct LegendEdge {
    place: Place,
    from: &'static str,
    to: &'static str,
    label: Option<&'static str>,
    shown: Shown,
}

const fn node(
    place: Place,
    kind: NodeKind,
    key: &'static str,
    label: &'static str,
    shown: Shown,
) -> LegendNode {
    LegendNode {
        place,
        kind,
        key,
        label,
        shown,
    }
}

const fn edge(
    place: Place,
    from: &'static str,
    to: &'static str,
    label: Option<&'static str>,
    shown: Shown,
) -> LegendEdge {
    LegendEdge {
        place,
        from,
        to,
        label,
        shown,
    }
}

const SA: &str = "sa-ServiceAccount";
const ROLE: &str = "r-ns/Role";
const LOCAL_CLUSTER_ROLE: &str = "cr-ns/ClusterRole";
const CLUSTER_ROLE: &str = "cr-/ClusterRole";
const RB: &str = "rb-RoleBinding";
const RB_TO_CLUSTER_ROLE: &str = "rb-RoleBinding-to-ClusterRole";
const CRB: &str = "crb-ClusterRoleBinding";

const NODES: &[LegendNode] = &[
    node(Place::Namespace, NodeKind::ServiceAccount, SA, "ServiceAccount", Shown::Always),
    node(Place::Namespace, NodeKind::Role, ROLE, "Role", Shown::Always),
    node(Place::Namespace, NodeKind::ClusterRole, LOCAL_CLUSTER_ROLE, "ClusterRole", Shown::Always),
    node(Place::Legend, NodeKind::ClusterRole, CLUSTER_ROLE, "ClusterRole", Shown::Always),
    node(Place::Namespace, NodeKind::RoleBinding, RB, "RoleBinding", Shown::WithBindings),
    node(
        Place::Namespace,
        NodeKind::RoleBinding,
        RB_TO_CLUSTER_ROLE,
        "RoleBinding",
        Shown::WithBindings,
    ),
    node(
        Place::Legend,
        NodeKind::ClusterRoleBinding,
        CRB,
        "ClusterRoleBinding",
        Shown::WithBindings,
    ),
    node(
        Place::Namespace,
        NodeKind::Rules,
        "rules-ns/Role",
        "Namespace-scoped\naccess rules",
        Shown::WithRules,
    ),
    node(
        Place::Namespace,
        NodeKind::Rules,
        "rules-cr-ns/ClusterRole",
        "Namespace-scoped\naccess rules",
        Shown::WithRules,
    ),
    node(
        Place::Legend,
        NodeKind::Rules,
        "rules-cr-/ClusterRole",
        "Cluster-scoped\naccess rules",
        Shown::WithRules,
    ),
];

const EDGES: &[LegendEdge] = &[
    edge(Place::Namespace, SA, RB, None, Shown::WithBindings),
    edge(Place::Namespace, RB, ROLE, None, Shown::WithBindings),
    edge(Place::Namespace, SA, RB_TO_CLUSTER_ROLE, None, Shown::WithBindings),
    edge(Place::Namespace, RB_TO_CLUSTER_ROLE, LOCAL_CLUSTER_ROLE, None, Shown::WithBindings),
    edge(Place::Legend, SA, CRB, None, Shown::WithBindings),
    edge(Place::Legend, CRB, CLUSTER_ROLE, None, Shown::WithBindings),
    edge(Place::Legend, SA, ROLE, Some("RoleBinding"), Shown::WithoutBindings),
    edge(Place::Legend, SA, CLUSTER_ROLE, Some("ClusterRoleBinding"), Shown::WithoutBindings),
    edge(Place::Legend, SA, LOCAL_CLUSTER_ROLE, Some("RoleBinding"), Shown::WithoutBindings),
    edge(Place::Legend, ROLE, "rules-ns/Role", None, Shown::WithRules),
    edge(Place::Legend, LOCAL_CLUSTER_ROLE, "rules-cr-ns/ClusterRole", None, Shown::WithRules),
    edge(Place::Legend, CLUSTER_ROLE, "rules-cr-/ClusterRole", None, Shown::WithRules),
];

/// Adds the "LEGEND" group, with its nested dashed "Namespace" group, to
/// `graph`. Binding and rules entries follow the render options.
pub fn render_legend(graph: &mut Graph, options: &RenderOptions) {
    let legend = graph.add_group(graph.root(), "LEGEND", None);
    let namespace = graph.add_group(legend, "Namespace", Some("dashed"));
    let group_of = |place: Place| -> GroupId {
        match place {
            Place::Legend => legend,
            Place::Namespace => namespace,
        }
    };

    let mut ids = Vec::with_capacity(NODES.len());
    for entry in NODES.iter().filter(|n| n.shown.applies(options)) {
        let id = graph.node(group_of(entry.place), entry.kind, entry.key, entry.label);
        ids.push((entry.key, id));
    }

    for entry in EDGES.iter().filter(|e| e.shown.applies(options)) {
        let lookup = |key: &str| ids.iter().find(|(k, _)| *k == key).map(|(_, id)| *id);
        if let (Some(from), Some(to)) = (lookup(entry.from), lookup(entry.to)) {
            graph.add_edge(group_of(entry.place), from, to, entry.label);
        }
    }
}
