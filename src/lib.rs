//! rback - Kubernetes RBAC visualizer
//!
//! Reads ServiceAccounts, Roles, ClusterRoles and their bindings (through
//! kubectl or from a JSON dump), resolves which identity is granted which
//! role and rules, and renders the result as a Graphviz DOT graph.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod repository;
pub mod service;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
