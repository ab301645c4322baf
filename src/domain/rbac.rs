//! RBAC (Role-Based Access Control) domain models

use super::record::{BindingRecord, Record, RoleRecord};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of a namespaced or cluster-scoped object.
///
/// An empty namespace means cluster-scoped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespacedName {
    pub namespace: String,
    pub name: String,
}

impl NamespacedName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn cluster(name: impl Into<String>) -> Self {
        Self::new("", name)
    }

    pub fn is_cluster_scoped(&self) -> bool {
        self.namespace.is_empty()
    }
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

/// Declared kind of a binding's role reference (`roleRef.kind`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleKind {
    Role,
    ClusterRole,
}

impl RoleKind {
    pub fn from_ref_kind(kind: &str) -> Option<Self> {
        match kind {
            "Role" => Some(RoleKind::Role),
            "ClusterRole" => Some(RoleKind::ClusterRole),
            _ => None,
        }
    }
}

/// One subject match of a binding: which binding grants which role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingAndRole {
    pub binding: NamespacedName,
    pub role: NamespacedName,
    /// `None` when the role reference did not declare a recognised kind.
    pub role_kind: Option<RoleKind>,
}

impl BindingAndRole {
    pub fn is_cluster_role_binding(&self) -> bool {
        self.binding.is_cluster_scoped()
    }

    pub fn is_cluster_role(&self) -> bool {
        self.role.is_cluster_scoped()
    }
}

/// The filtered RBAC dataset for one resolution pass.
///
/// Namespace-keyed collections iterate in ascending namespace order; records
/// inside each collection keep the order in which they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSnapshot {
    pub service_accounts: BTreeMap<String, Vec<String>>,
    pub roles: BTreeMap<String, Vec<RoleRecord>>,
    pub cluster_roles: Vec<RoleRecord>,
    pub role_bindings: BTreeMap<String, Vec<BindingRecord>>,
    pub cluster_role_bindings: Vec<BindingRecord>,
}

impl PermissionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_service_account(&mut self, namespace: impl Into<String>, name: impl Into<String>) {
        self.service_accounts
            .entry(namespace.into())
            .or_default()
            .push(name.into());
    }

    /// Files a Role under its own `metadata.namespace`.
    pub fn add_role(&mut self, role: RoleRecord) -> Result<()> {
        let namespace = require_namespace(&role)?;
        self.roles.entry(namespace).or_default().push(role);
        Ok(())
    }

    pub fn add_cluster_role(&mut self, role: RoleRecord) {
        self.cluster_roles.push(role);
    }

    /// Files a RoleBinding under its own `metadata.namespace`.
    pub fn add_role_binding(&mut self, binding: BindingRecord) -> Result<()> {
        let namespace = require_namespace(&binding)?;
        self.role_bindings.entry(namespace).or_default().push(binding);
        Ok(())
    }

    pub fn add_cluster_role_binding(&mut self, binding: BindingRecord) {
        self.cluster_role_bindings.push(binding);
    }

    pub fn roles_in(&self, namespace: &str) -> &[RoleRecord] {
        self.roles.get(namespace).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn role_bindings_in(&self, namespace: &str) -> &[BindingRecord] {
        self.role_bindings
            .get(namespace)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn service_account_count(&self) -> usize {
        self.service_accounts.values().map(Vec::len).sum()
    }
}

fn require_namespace<R: Record>(record: &R) -> Result<String> {
    let name = record.name()?;
    match record.namespace() {
        "" => Err(AppError::MalformedRecord(format!(
            "namespaced record {} without metadata.namespace",
            name
        ))),
        ns => Ok(ns.to_string()),
    }
}
