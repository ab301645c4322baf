//! Command-line surface

use crate::config::{
    normalize_kind, parse_ignored_prefixes, Config, OutputFormat, RenderOptions, SourceConfig,
    TelemetryConfig, DEFAULT_IGNORED_PREFIXES,
};
use crate::error::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "rback")]
#[command(about = "Render Kubernetes RBAC (who can do what) as a graph")]
#[command(version)]
pub struct Cli {
    /// Draw bindings as nodes (false: label the edge with the binding name)
    #[arg(long, env = "RBACK_RENDER_BINDINGS", action = ArgAction::Set, default_value_t = true)]
    pub render_bindings: bool,

    /// Attach the access rules of each role
    #[arg(long, env = "RBACK_RENDER_RULES", action = ArgAction::Set, default_value_t = true)]
    pub render_rules: bool,

    /// Only ServiceAccounts in this namespace (default: all namespaces)
    #[arg(short, long, env = "RBACK_NAMESPACE", default_value = "")]
    pub namespace: String,

    /// Comma-delimited name prefixes of roles and bindings to skip, or `none`
    #[arg(long, env = "RBACK_IGNORE_PREFIXES", default_value = DEFAULT_IGNORED_PREFIXES)]
    pub ignore_prefixes: String,

    /// Union Role and ClusterRole rules of the same name regardless of roleRef.kind
    #[arg(long, env = "RBACK_UNION_ROLE_RULES")]
    pub union_role_rules: bool,

    /// Read records from a JSON List document (`-` for stdin) instead of kubectl
    #[arg(short, long, env = "RBACK_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// kubectl binary
    #[arg(long, env = "RBACK_KUBECTL", default_value = "kubectl")]
    pub kubectl: String,

    /// kubeconfig context
    #[arg(long, env = "RBACK_CONTEXT")]
    pub context: Option<String>,

    /// kubeconfig file
    #[arg(long, env = "RBACK_KUBECONFIG", value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Output format
    #[arg(short, long, env = "RBACK_OUTPUT", value_enum, default_value_t = OutputFormat::Dot)]
    pub output: OutputFormat,

    /// Resource kind to scope by (sa, serviceaccount, serviceaccounts)
    #[arg(value_name = "KIND")]
    pub kind: Option<String>,

    /// Names of the selected kind; needs --namespace
    #[arg(value_name = "NAMES")]
    pub names: Vec<String>,
}

impl Cli {
    /// Validated configuration. Logging settings come from the environment.
    pub fn into_config(self) -> Result<Config> {
        let source = SourceConfig {
            kubectl: self.kubectl,
            context: self.context,
            kubeconfig: self.kubeconfig,
            file: self.file,
            resource_kind: self.kind.as_deref().map(normalize_kind),
            resource_names: self.names,
        };
        source.service_account_names()?;

        Ok(Config {
            render: RenderOptions {
                render_bindings: self.render_bindings,
                render_rules: self.render_rules,
                namespace: self.namespace,
                ignored_prefixes: parse_ignored_prefixes(&self.ignore_prefixes),
                union_role_rules: self.union_role_rules,
            },
            source,
            telemetry: TelemetryConfig::from_env(),
            output: self.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rback").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(config.render, RenderOptions::default());
        assert_eq!(config.source, SourceConfig::default());
        assert_eq!(config.output, OutputFormat::Dot);
    }

    #[test]
    fn test_render_flags_take_values() {
        let config = parse(&["--render-bindings", "false", "--render-rules=false"])
            .into_config()
            .unwrap();
        assert!(!config.render.render_bindings);
        assert!(!config.render.render_rules);
    }

    #[rstest]
    #[case("none", vec![])]
    #[case("system:,kube-", vec!["system:", "kube-"])]
    fn test_ignore_prefixes(#[case] value: &str, #[case] expected: Vec<&str>) {
        let config = parse(&["--ignore-prefixes", value]).into_config().unwrap();
        assert_eq!(config.render.ignored_prefixes, expected);
    }

    #[test]
    fn test_service_account_selection() {
        let config = parse(&["-n", "ci", "sa", "build-bot", "deploy-bot"])
            .into_config()
            .unwrap();
        assert_eq!(config.render.namespace, "ci");
        assert_eq!(config.source.resource_kind.as_deref(), Some("serviceaccount"));
        assert_eq!(
            config.source.service_account_names().unwrap(),
            vec!["build-bot", "deploy-bot"]
        );
    }

    #[test]
    fn test_unsupported_kind_is_rejected() {
        let err = parse(&["pods", "web"]).into_config().unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_source_and_output_options() {
        let config = parse(&[
            "--file",
            "dump.json",
            "--kubectl",
            "/usr/local/bin/kubectl",
            "--context",
            "staging",
            "--kubeconfig",
            "/tmp/kubeconfig",
            "--union-role-rules",
            "--output",
            "json",
        ])
        .into_config()
        .unwrap();
        assert_eq!(config.source.file, Some(PathBuf::from("dump.json")));
        assert_eq!(config.source.kubectl, "/usr/local/bin/kubectl");
        assert_eq!(config.source.context.as_deref(), Some("staging"));
        assert_eq!(config.source.kubeconfig, Some(PathBuf::from("/tmp/kubeconfig")));
        assert!(config.render.union_role_rules);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_bad_output_format_fails_to_parse() {
        assert!(Cli::try_parse_from(["rback", "--output", "svg"]).is_err());
    }
}
