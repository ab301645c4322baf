//! RBAC resolution logic

pub mod binding;
pub mod role_rules;
pub mod rules;
pub mod snapshot;

pub use binding::resolve_bindings;
pub use role_rules::{resolve_role_rules, resolve_rules_for};
pub use rules::{format_rule, format_rules};
pub use snapshot::SnapshotLoader;
