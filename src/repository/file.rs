//! File-backed record source
//!
//! Reads one JSON document holding objects of any RBAC kind, such as the
//! output of `kubectl get sa,roles,rolebindings,clusterroles,clusterrolebindings
//! --all-namespaces -o json`, and answers queries by filtering it.

use super::{QueryScope, RecordQuery, RecordSource};
use crate::error::{AppError, Result};
use serde_json::{json, Value};
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct FileSource {
    items: Vec<Value>,
}

impl FileSource {
    /// Loads the document at `path`; `-` reads stdin.
    pub fn open(path: &Path) -> Result<Self> {
        let raw = if path == Path::new("-") {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(path).map_err(|e| {
                AppError::Retrieval(format!("cannot read {}: {}", path.display(), e))
            })?
        };
        let source = Self::from_json(&raw)?;
        debug!(path = %path.display(), items = source.items.len(), "Loaded record file");
        Ok(source)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| AppError::MalformedRecord(format!("record file is not valid JSON: {}", e)))?;

        let items = match value {
            Value::Object(mut object) => match object.remove("items") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) => vec![],
                Some(_) => {
                    return Err(AppError::MalformedRecord(
                        "record file has a non-list items field".to_string(),
                    ))
                }
                None => vec![Value::Object(object)],
            },
            Value::Array(items) => items,
            _ => {
                return Err(AppError::MalformedRecord(
                    "record file must hold an object or a list".to_string(),
                ))
            }
        };

        for (index, item) in items.iter().enumerate() {
            if item.get("kind").and_then(Value::as_str).is_none() {
                return Err(AppError::MalformedRecord(format!(
                    "record file item {} has no kind",
                    index
                )));
            }
        }

        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn matches(item: &Value, query: &RecordQuery) -> bool {
        if item.get("kind").and_then(Value::as_str) != Some(query.kind.kind_name()) {
            return false;
        }
        let metadata = item.get("metadata");
        let field = |key: &str| metadata.and_then(|m| m.get(key)).and_then(Value::as_str);

        if let QueryScope::Namespace(namespace) = &query.scope {
            if field("namespace") != Some(namespace.as_str()) {
                return false;
            }
            if !query.names.is_empty() {
                return field("name").is_some_and(|name| query.names.iter().any(|n| n == name));
            }
        }
        true
    }
}

impl RecordSource for FileSource {
    fn fetch(&self, query: &RecordQuery) -> Result<String> {
        let items: Vec<&Value> = self
            .items
            .iter()
            .filter(|item| Self::matches(item, query))
            .collect();
        debug!(kind = %query.kind, count = items.len(), "Filtered record file");
        serde_json::to_string(&json!({"kind": "List", "items": items}))
            .map_err(|e| AppError::Internal(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, RoleRecord, ServiceAccountRecord};
    use crate::repository::{decode_records, ResourceKind};
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = r#"{
        "kind": "List",
        "items": [
            {"kind": "ServiceAccount", "metadata": {"name": "default", "namespace": "ns1"}},
            {"kind": "ServiceAccount", "metadata": {"name": "builder", "namespace": "ns1"}},
            {"kind": "ServiceAccount", "metadata": {"name": "default", "namespace": "ns2"}},
            {"kind": "Role", "metadata": {"name": "viewer", "namespace": "ns1"}, "rules": []},
            {"kind": "ClusterRole", "metadata": {"name": "viewer"}, "rules": []}
        ]
    }"#;

    fn names<T: Record>(records: &[T]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.identity().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_filters_by_kind() {
        let source = FileSource::from_json(DOCUMENT).unwrap();
        assert_eq!(source.len(), 5);

        let raw = source.fetch(&RecordQuery::all(ResourceKind::Role)).unwrap();
        let roles: Vec<RoleRecord> = decode_records(ResourceKind::Role, &raw).unwrap();
        assert_eq!(names(&roles), vec!["ns1/viewer"]);

        let raw = source
            .fetch(&RecordQuery::all(ResourceKind::ClusterRole))
            .unwrap();
        let roles: Vec<RoleRecord> = decode_records(ResourceKind::ClusterRole, &raw).unwrap();
        assert_eq!(names(&roles), vec!["viewer"]);
    }

    #[test]
    fn test_filters_by_namespace_and_name() {
        let source = FileSource::from_json(DOCUMENT).unwrap();

        let raw = source
            .fetch(&RecordQuery::service_accounts("ns1", &[]))
            .unwrap();
        let sas: Vec<ServiceAccountRecord> =
            decode_records(ResourceKind::ServiceAccount, &raw).unwrap();
        assert_eq!(names(&sas), vec!["ns1/default", "ns1/builder"]);

        let raw = source
            .fetch(&RecordQuery::service_accounts("ns1", &["builder".to_string()]))
            .unwrap();
        let sas: Vec<ServiceAccountRecord> =
            decode_records(ResourceKind::ServiceAccount, &raw).unwrap();
        assert_eq!(names(&sas), vec!["ns1/builder"]);
    }

    #[test]
    fn test_empty_result_is_empty_list() {
        let source = FileSource::from_json(DOCUMENT).unwrap();
        let raw = source
            .fetch(&RecordQuery::all(ResourceKind::ClusterRoleBinding))
            .unwrap();
        assert_eq!(raw, r#"{"items":[],"kind":"List"}"#);
    }

    #[test]
    fn test_accepts_bare_array_and_single_object() {
        let source = FileSource::from_json(r#"[{"kind": "Role", "metadata": {}}]"#).unwrap();
        assert_eq!(source.len(), 1);

        let source = FileSource::from_json(r#"{"kind": "ClusterRole", "metadata": {}}"#).unwrap();
        assert_eq!(source.len(), 1);
    }

    #[test]
    fn test_rejects_items_without_kind() {
        let err = FileSource::from_json(r#"{"items": [{"metadata": {}}]}"#).unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord(_)));
        assert!(err.to_string().contains("item 0 has no kind"));
    }

    #[test]
    fn test_missing_file_is_retrieval_error() {
        let err = FileSource::open(Path::new("/nonexistent/rback/dump.json")).unwrap_err();
        assert!(err.is_retrieval());
    }
}
