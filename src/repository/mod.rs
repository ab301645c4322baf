//! Record source layer (Repository pattern)
//!
//! A [`RecordSource`] answers one [`RecordQuery`] per resource kind with the
//! raw JSON text of either a single object or a list wrapper. Decoding into
//! typed records happens once, in [`decode_records`].

pub mod file;
pub mod kubectl;

pub use file::FileSource;
pub use kubectl::KubectlSource;

use crate::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// RBAC resource kinds rback reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    ServiceAccount,
    Role,
    ClusterRole,
    RoleBinding,
    ClusterRoleBinding,
}

impl ResourceKind {
    /// Name passed to `kubectl get`
    pub fn kubectl_name(&self) -> &'static str {
        match self {
            ResourceKind::ServiceAccount => "sa",
            ResourceKind::Role => "roles",
            ResourceKind::ClusterRole => "clusterroles",
            ResourceKind::RoleBinding => "rolebindings",
            ResourceKind::ClusterRoleBinding => "clusterrolebindings",
        }
    }

    /// Value of the object's `kind` field
    pub fn kind_name(&self) -> &'static str {
        match self {
            ResourceKind::ServiceAccount => "ServiceAccount",
            ResourceKind::Role => "Role",
            ResourceKind::ClusterRole => "ClusterRole",
            ResourceKind::RoleBinding => "RoleBinding",
            ResourceKind::ClusterRoleBinding => "ClusterRoleBinding",
        }
    }

    pub fn is_namespaced(&self) -> bool {
        matches!(
            self,
            ResourceKind::ServiceAccount | ResourceKind::Role | ResourceKind::RoleBinding
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// Which namespaces a query covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryScope {
    AllNamespaces,
    Namespace(String),
    Cluster,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub kind: ResourceKind,
    pub scope: QueryScope,
    /// Restrict to these object names (only meaningful with a namespace)
    pub names: Vec<String>,
}

impl RecordQuery {
    /// Every object of `kind`, across all namespaces for namespaced kinds.
    pub fn all(kind: ResourceKind) -> Self {
        let scope = if kind.is_namespaced() {
            QueryScope::AllNamespaces
        } else {
            QueryScope::Cluster
        };
        Self {
            kind,
            scope,
            names: vec![],
        }
    }

    /// ServiceAccounts in `namespace` (empty = all namespaces), optionally by name.
    pub fn service_accounts(namespace: &str, names: &[String]) -> Self {
        if namespace.is_empty() {
            return Self::all(ResourceKind::ServiceAccount);
        }
        Self {
            kind: ResourceKind::ServiceAccount,
            scope: QueryScope::Namespace(namespace.to_string()),
            names: names.to_vec(),
        }
    }
}

/// Source of raw RBAC records
#[cfg_attr(test, mockall::automock)]
pub trait RecordSource {
    /// Returns the JSON text for one query, or `Retrieval` on failure.
    fn fetch(&self, query: &RecordQuery) -> Result<String>;
}

impl<T: RecordSource + ?Sized> RecordSource for Box<T> {
    fn fetch(&self, query: &RecordQuery) -> Result<String> {
        (**self).fetch(query)
    }
}

/// Decodes a single-object or list (`items`) response into typed records.
pub fn decode_records<T: DeserializeOwned>(kind: ResourceKind, raw: &str) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        AppError::MalformedRecord(format!("{} response is not valid JSON: {}", kind, e))
    })?;

    let items = match value {
        Value::Object(mut object) => match object.remove("items") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) => vec![],
            Some(_) => {
                return Err(AppError::MalformedRecord(format!(
                    "{} list has a non-list items field",
                    kind
                )))
            }
            None => vec![Value::Object(object)],
        },
        _ => {
            return Err(AppError::MalformedRecord(format!(
                "{} response is not a JSON object",
                kind
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| {
                AppError::MalformedRecord(format!("{} item {}: {}", kind, index, e))
            })
        })
        .collect()
}
