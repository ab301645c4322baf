//! kubectl-backed record source

use super::{QueryScope, RecordQuery, RecordSource};
use crate::config::SourceConfig;
use crate::error::{AppError, Result};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Reads records by shelling out to `kubectl get ... --output json`.
#[derive(Debug, Clone)]
pub struct KubectlSource {
    binary: String,
    context: Option<String>,
    kubeconfig: Option<PathBuf>,
}

impl KubectlSource {
    pub fn from_config(config: &SourceConfig) -> Self {
        Self {
            binary: config.kubectl.clone(),
            context: config.context.clone(),
            kubeconfig: config.kubeconfig.clone(),
        }
    }

    /// Full argument list for a query, global flags first.
    pub fn args(&self, query: &RecordQuery) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(context) = &self.context {
            args.push("--context".to_string());
            args.push(context.clone());
        }
        if let Some(kubeconfig) = &self.kubeconfig {
            args.push("--kubeconfig".to_string());
            args.push(kubeconfig.display().to_string());
        }

        args.push("get".to_string());
        args.push(query.kind.kubectl_name().to_string());
        match &query.scope {
            QueryScope::AllNamespaces => args.push("--all-namespaces".to_string()),
            QueryScope::Namespace(namespace) => {
                args.push("-n".to_string());
                args.push(namespace.clone());
            }
            QueryScope::Cluster => {}
        }
        args.push("--output".to_string());
        args.push("json".to_string());
        if matches!(query.scope, QueryScope::Namespace(_)) {
            args.extend(query.names.iter().cloned());
        }
        args
    }
}

impl RecordSource for KubectlSource {
    fn fetch(&self, query: &RecordQuery) -> Result<String> {
        let args = self.args(query);
        debug!(binary = %self.binary, args = ?args, "Running kubectl");

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|e| AppError::Retrieval(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Retrieval(format!(
                "{} {} failed ({}): {}",
                self.binary,
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout).map_err(|e| {
            AppError::Retrieval(format!("{} output is not UTF-8: {}", query.kind, e))
        })
    }
}
