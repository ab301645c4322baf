//! Domain models for rback

pub mod rbac;
pub mod record;

pub use rbac::*;
pub use record::*;
