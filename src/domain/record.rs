//! Kubernetes RBAC record schemas
//!
//! These mirror the subset of the `rbac.authorization.k8s.io/v1` and `v1`
//! object shapes that rback reads. Every field is optional so that a record
//! which is structurally valid JSON but semantically incomplete can still be
//! decoded and then reported precisely as a [`AppError::MalformedRecord`].
//! A field with the wrong JSON type (e.g. `subjects: "x"`) fails decoding.

use crate::domain::NamespacedName;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Object metadata (`metadata`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: Option<String>,
    pub namespace: Option<String>,
}

/// ServiceAccount (`v1/ServiceAccount`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountRecord {
    pub metadata: Option<ObjectMeta>,
}

/// Role or ClusterRole; both kinds share the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    pub metadata: Option<ObjectMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<PolicyRule>>,
}

/// RoleBinding or ClusterRoleBinding; both kinds share the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingRecord {
    pub metadata: Option<ObjectMeta>,
    pub role_ref: Option<RoleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<Subject>>,
}

/// Reference from a binding to the role it grants (`roleRef`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub name: Option<String>,
    /// Not part of the upstream schema; honored when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Grant recipient listed in a binding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// One access rule of a role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_names: Option<Vec<String>>,
    #[serde(rename = "nonResourceURLs", skip_serializing_if = "Option::is_none")]
    pub non_resource_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_groups: Option<Vec<String>>,
}

/// Common accessors for records that carry `metadata`.
pub trait Record {
    /// Kubernetes kind name, used in error messages.
    const KIND: &'static str;

    fn metadata(&self) -> Option<&ObjectMeta>;

    /// `metadata.name`, or `MalformedRecord` when missing.
    fn name(&self) -> Result<&str> {
        self.metadata()
            .ok_or_else(|| AppError::MalformedRecord(format!("{} without metadata", Self::KIND)))?
            .name
            .as_deref()
            .ok_or_else(|| {
                AppError::MalformedRecord(format!("{} without metadata.name", Self::KIND))
            })
    }

    /// `metadata.namespace`, empty for cluster-scoped records.
    fn namespace(&self) -> &str {
        self.metadata()
            .and_then(|m| m.namespace.as_deref())
            .unwrap_or("")
    }

    fn identity(&self) -> Result<NamespacedName> {
        let name = self.name()?;
        Ok(NamespacedName::new(self.namespace(), name))
    }
}

impl Record for ServiceAccountRecord {
    const KIND: &'static str = "ServiceAccount";

    fn metadata(&self) -> Option<&ObjectMeta> {
        self.metadata.as_ref()
    }
}

impl Record for RoleRecord {
    const KIND: &'static str = "Role";

    fn metadata(&self) -> Option<&ObjectMeta> {
        self.metadata.as_ref()
    }
}

impl Record for BindingRecord {
    const KIND: &'static str = "RoleBinding";

    fn metadata(&self) -> Option<&ObjectMeta> {
        self.metadata.as_ref()
    }
}

impl RoleRecord {
    pub fn rules(&self) -> &[PolicyRule] {
        self.rules.as_deref().unwrap_or_default()
    }
}

impl BindingRecord {
    pub fn subjects(&self) -> &[Subject] {
        self.subjects.as_deref().unwrap_or_default()
    }

    /// `roleRef`, or `MalformedRecord` naming the binding when missing.
    pub fn role_ref(&self) -> Result<&RoleRef> {
        self.role_ref.as_ref().ok_or_else(|| {
            AppError::MalformedRecord(format!(
                "binding {} without roleRef",
                self.metadata
                    .as_ref()
                    .and_then(|m| m.name.as_deref())
                    .unwrap_or("<unnamed>")
            ))
        })
    }
}
