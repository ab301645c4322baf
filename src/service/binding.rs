//! Binding resolution: which bindings grant which roles to an identity

use crate::domain::{BindingAndRole, BindingRecord, NamespacedName, Record, RoleKind};
use crate::error::{AppError, Result};
use tracing::trace;

/// Lists every `(binding, role)` pair whose subjects include the target.
///
/// A subject matches when its `name` and `namespace` equal the target's
/// exactly; an absent subject namespace compares as the empty string. Results
/// follow binding order, one per matching subject.
pub fn resolve_bindings(
    bindings: &[BindingRecord],
    target_name: &str,
    target_namespace: &str,
) -> Result<Vec<BindingAndRole>> {
    let mut results = Vec::new();

    for binding in bindings {
        let binding_id = binding.identity()?;
        let (role, role_kind) = role_identity(binding, &binding_id)?;

        for subject in binding.subjects() {
            let name = subject.name.as_deref().unwrap_or("");
            let namespace = subject.namespace.as_deref().unwrap_or("");
            if name == target_name && namespace == target_namespace {
                trace!(binding = %binding_id, role = %role, "Subject matched");
                results.push(BindingAndRole {
                    binding: binding_id.clone(),
                    role: role.clone(),
                    role_kind,
                });
            }
        }
    }

    Ok(results)
}

/// Identity of the role a binding references.
///
/// The namespace comes from `roleRef.namespace` when present. Otherwise a
/// `Role` reference lives in the binding's own namespace and anything else
/// is treated as cluster-scoped.
fn role_identity(
    binding: &BindingRecord,
    binding_id: &NamespacedName,
) -> Result<(NamespacedName, Option<RoleKind>)> {
    let role_ref = binding.role_ref()?;
    let name = role_ref.name.as_deref().ok_or_else(|| {
        AppError::MalformedRecord(format!("binding {} without roleRef.name", binding_id))
    })?;
    let kind = role_ref.kind.as_deref().and_then(RoleKind::from_ref_kind);

    let namespace = match (role_ref.namespace.as_deref(), kind) {
        (Some(namespace), _) => namespace,
        (None, Some(RoleKind::Role)) => binding_id.namespace.as_str(),
        (None, _) => "",
    };

    Ok((NamespacedName::new(namespace, name), kind))
}
