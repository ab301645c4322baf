//! One resolution pass: load, build, render

use crate::config::Config;
use crate::error::Result;
use crate::graph::{renderer_for, GraphBuilder};
use crate::repository::{FileSource, KubectlSource, RecordSource};
use crate::service::SnapshotLoader;
use tracing::info;

/// Record source selected by the configuration: the file when one is given,
/// kubectl otherwise.
pub fn record_source(config: &Config) -> Result<Box<dyn RecordSource>> {
    match &config.source.file {
        Some(path) => {
            let source = FileSource::open(path)?;
            info!(path = %path.display(), records = source.len(), "Reading records from file");
            Ok(Box::new(source))
        }
        None => Ok(Box::new(KubectlSource::from_config(&config.source))),
    }
}

/// Loads a snapshot from `source`, builds the graph and renders it in the
/// configured format.
pub fn render_with<S: RecordSource>(source: S, config: &Config) -> Result<String> {
    let names = config.source.service_account_names()?;
    let snapshot = SnapshotLoader::new(source).load(&config.render, &names)?;

    let graph = GraphBuilder::new(&snapshot, &config.render).build()?;
    info!(
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        "Built access graph"
    );

    renderer_for(config.output).render(&graph)
}

pub fn run(config: &Config) -> Result<String> {
    render_with(record_source(config)?, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::repository::MockRecordSource;
    use serde_json::json;

    fn empty_source() -> MockRecordSource {
        let mut mock = MockRecordSource::new();
        mock.expect_fetch()
            .returning(|_| Ok(json!({"kind": "List", "items": []}).to_string()));
        mock
    }

    #[test]
    fn test_empty_cluster_renders_legend_only() {
        let dot = render_with(empty_source(), &Config::default()).unwrap();
        assert!(dot.starts_with("digraph {\n"));
        assert!(dot.contains("label=\"LEGEND\""));
        assert!(dot.contains("label=\"ServiceAccount\""));
    }

    #[test]
    fn test_json_output() {
        let config = Config {
            output: OutputFormat::Json,
            ..Default::default()
        };
        let out = render_with(empty_source(), &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["groups"][1]["name"], "LEGEND");
    }

    #[test]
    fn test_missing_file_is_retrieval_error() {
        let mut config = Config::default();
        config.source.file = Some("/nonexistent/rback/dump.json".into());
        let err = run(&config).unwrap_err();
        assert!(err.is_retrieval());
    }
}
