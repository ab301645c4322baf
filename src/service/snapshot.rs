//! Snapshot loading: one retrieval pass over every RBAC kind

use crate::config::RenderOptions;
use crate::domain::{BindingRecord, PermissionSnapshot, Record, RoleRecord, ServiceAccountRecord};
use crate::error::{AppError, Result};
use crate::repository::{decode_records, RecordQuery, RecordSource, ResourceKind};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Builds a [`PermissionSnapshot`] from a record source.
pub struct SnapshotLoader<S: RecordSource> {
    source: S,
}

impl<S: RecordSource> SnapshotLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetches ServiceAccounts (scoped by `options.namespace` and
    /// `service_account_names`), then Roles, RoleBindings, ClusterRoles and
    /// ClusterRoleBindings. Roles and bindings matching an ignored prefix are
    /// dropped here and never reach resolution.
    pub fn load(
        &self,
        options: &RenderOptions,
        service_account_names: &[String],
    ) -> Result<PermissionSnapshot> {
        let mut snapshot = PermissionSnapshot::new();

        if options.namespace.is_empty() && !service_account_names.is_empty() {
            warn!(
                names = ?service_account_names,
                "ServiceAccount names need a namespace (-n); rendering all namespaces"
            );
        }
        let query = RecordQuery::service_accounts(&options.namespace, service_account_names);
        for sa in self.fetch::<ServiceAccountRecord>(&query)? {
            let id = sa.identity()?;
            if id.is_cluster_scoped() {
                return Err(AppError::MalformedRecord(format!(
                    "ServiceAccount {} without metadata.namespace",
                    id.name
                )));
            }
            snapshot.add_service_account(id.namespace, id.name);
        }

        for role in self.fetch_kept::<RoleRecord>(ResourceKind::Role, options)? {
            snapshot.add_role(role)?;
        }
        for binding in self.fetch_kept::<BindingRecord>(ResourceKind::RoleBinding, options)? {
            snapshot.add_role_binding(binding)?;
        }
        for role in self.fetch_kept::<RoleRecord>(ResourceKind::ClusterRole, options)? {
            snapshot.add_cluster_role(role);
        }
        for binding in
            self.fetch_kept::<BindingRecord>(ResourceKind::ClusterRoleBinding, options)?
        {
            snapshot.add_cluster_role_binding(binding);
        }

        info!(
            service_accounts = snapshot.service_account_count(),
            cluster_roles = snapshot.cluster_roles.len(),
            cluster_role_bindings = snapshot.cluster_role_bindings.len(),
            "Loaded permission snapshot"
        );
        Ok(snapshot)
    }

    fn fetch<T: DeserializeOwned>(&self, query: &RecordQuery) -> Result<Vec<T>> {
        let raw = self.source.fetch(query)?;
        decode_records(query.kind, &raw)
    }

    /// All records of `kind` whose name does not start with an ignored prefix.
    fn fetch_kept<T: DeserializeOwned + Record>(
        &self,
        kind: ResourceKind,
        options: &RenderOptions,
    ) -> Result<Vec<T>> {
        let records = self.fetch::<T>(&RecordQuery::all(kind))?;
        let total = records.len();

        let mut kept = Vec::with_capacity(total);
        for record in records {
            if !options.should_ignore(record.name()?) {
                kept.push(record);
            }
        }
        debug!(kind = %kind, total, ignored = total - kept.len(), "Filtered records");
        Ok(kept)
    }
}
