//! Common test utilities

use rback::config::RenderOptions;
use rback::domain::PermissionSnapshot;
use rback::graph::{Graph, GraphBuilder};
use rback::repository::FileSource;
use rback::service::SnapshotLoader;
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Record source over `tests/fixtures/cluster.json`.
pub fn cluster_source() -> FileSource {
    FileSource::open(&fixture_path("cluster.json")).unwrap()
}

pub fn load_snapshot(options: &RenderOptions, names: &[String]) -> PermissionSnapshot {
    SnapshotLoader::new(cluster_source())
        .load(options, names)
        .unwrap()
}

/// Access graph (no legend) for the fixture cluster.
pub fn access_graph(options: &RenderOptions) -> Graph {
    let snapshot = load_snapshot(options, &[]);
    GraphBuilder::new(&snapshot, options).access_graph().unwrap()
}
