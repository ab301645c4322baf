//! Configuration management for rback

use crate::error::{AppError, Result};
use std::env;
use std::path::PathBuf;

/// Default value of `--ignore-prefixes`
pub const DEFAULT_IGNORED_PREFIXES: &str = "system:";

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Graph construction options
    pub render: RenderOptions,
    /// Where RBAC records come from
    pub source: SourceConfig,
    /// Logging configuration
    pub telemetry: TelemetryConfig,
    /// Rendering of the finished graph
    pub output: OutputFormat,
}

/// How the graph is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Graphviz DOT
    #[default]
    Dot,
    /// The graph model as JSON
    Json,
}

/// Options that shape the snapshot and the graph built from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Draw bindings as nodes between ServiceAccount and role. When off,
    /// the ServiceAccount -> role edge is labeled with the binding name.
    pub render_bindings: bool,
    /// Attach a node listing the access rules under each role.
    pub render_rules: bool,
    /// Restrict ServiceAccount discovery to this namespace (empty = all).
    pub namespace: String,
    /// Roles, ClusterRoles and bindings whose name starts with one of these
    /// are dropped from the snapshot.
    pub ignored_prefixes: Vec<String>,
    /// Always union Role and ClusterRole rules for a reference, ignoring
    /// `roleRef.kind`.
    pub union_role_rules: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            render_bindings: true,
            render_rules: true,
            namespace: String::new(),
            ignored_prefixes: parse_ignored_prefixes(DEFAULT_IGNORED_PREFIXES),
            union_role_rules: false,
        }
    }
}

impl RenderOptions {
    pub fn should_ignore(&self, name: &str) -> bool {
        self.ignored_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }
}

/// Record source configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// kubectl binary to invoke
    pub kubectl: String,
    /// kubeconfig context forwarded as `--context`
    pub context: Option<String>,
    /// kubeconfig path forwarded as `--kubeconfig`
    pub kubeconfig: Option<PathBuf>,
    /// Read records from a JSON List document instead of the cluster
    /// (`-` for stdin)
    pub file: Option<PathBuf>,
    /// Normalized positional resource kind, if any
    pub resource_kind: Option<String>,
    /// Positional resource names following the kind
    pub resource_names: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kubectl: "kubectl".to_string(),
            context: None,
            kubeconfig: None,
            file: None,
            resource_kind: None,
            resource_names: vec![],
        }
    }
}

impl SourceConfig {
    /// ServiceAccount names selected on the command line.
    ///
    /// Only the `serviceaccount` kind can scope discovery today.
    pub fn service_account_names(&self) -> Result<Vec<String>> {
        match self.resource_kind.as_deref() {
            None => Ok(vec![]),
            Some("serviceaccount") => Ok(self.resource_names.clone()),
            Some(other) => Err(AppError::InvalidArgument(format!(
                "unsupported resource kind '{}', expected serviceaccount",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// "text" or "json"
    pub log_format: String,
    /// Filter directive used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            default_filter: "rback=warn".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Load logging configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_format: env::var("RBACK_LOG_FORMAT")
                .map(|v| v.to_lowercase())
                .unwrap_or(defaults.log_format),
            default_filter: env::var("RBACK_LOG_LEVEL")
                .map(|level| format!("rback={}", level))
                .unwrap_or(defaults.default_filter),
        }
    }

    pub fn is_json(&self) -> bool {
        self.log_format == "json"
    }
}

/// Parses the comma-delimited `--ignore-prefixes` value; `none` disables
/// filtering.
pub fn parse_ignored_prefixes(value: &str) -> Vec<String> {
    if value == "none" {
        return vec![];
    }
    value.split(',').map(str::to_string).collect()
}

/// Maps the short and plural spellings of a resource kind to its singular
/// lowercase name.
pub fn normalize_kind(kind: &str) -> String {
    let kind = kind.to_lowercase();
    match kind.as_str() {
        "sa" | "serviceaccounts" => "serviceaccount".to_string(),
        _ => kind,
    }
}
