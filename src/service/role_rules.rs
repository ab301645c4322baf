//! Role rule resolution

use super::rules::format_rules;
use crate::domain::{PermissionSnapshot, Record, RoleKind, RoleRecord};
use crate::error::Result;

/// Rules of every role named `role_name` that a binding in
/// `binding_namespace` could be referring to.
///
/// A reference does not say whether it points at a Role or a ClusterRole, so
/// both are searched: Roles in exactly `binding_namespace` (skipped when it is
/// empty) and all ClusterRoles. ClusterRole rules come first.
pub fn resolve_role_rules(
    binding_namespace: &str,
    role_name: &str,
    snapshot: &PermissionSnapshot,
) -> Result<String> {
    let namespaced = if binding_namespace.is_empty() {
        String::new()
    } else {
        find_access_rules(snapshot.roles_in(binding_namespace), role_name)?
    };
    let cluster = find_access_rules(&snapshot.cluster_roles, role_name)?;
    Ok(cluster + &namespaced)
}

/// Like [`resolve_role_rules`], but searches only the side named by
/// `kind`. Falls back to the union when the kind is unknown.
pub fn resolve_rules_for(
    binding_namespace: &str,
    role_name: &str,
    kind: Option<RoleKind>,
    snapshot: &PermissionSnapshot,
) -> Result<String> {
    match kind {
        Some(RoleKind::Role) if !binding_namespace.is_empty() => {
            find_access_rules(snapshot.roles_in(binding_namespace), role_name)
        }
        Some(RoleKind::Role) => Ok(String::new()),
        Some(RoleKind::ClusterRole) => find_access_rules(&snapshot.cluster_roles, role_name),
        None => resolve_role_rules(binding_namespace, role_name, snapshot),
    }
}

fn find_access_rules(roles: &[RoleRecord], role_name: &str) -> Result<String> {
    let mut rules = String::new();
    for role in roles {
        if role.name()? == role_name {
            rules.push_str(&format_rules(role.rules()));
        }
    }
    Ok(rules)
}
