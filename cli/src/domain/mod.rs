//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod invocation;
pub mod repository;

pub use config::{BackendSettings, EnvironmentSettings, TerraformSettings, TfctlConfig};
pub use error::{ConfigError, DispatchError, UsageError};
pub use invocation::{ActionOptions, Invocation, Outcome};
pub use repository::Repository;
