//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod app_config;
pub mod config;
pub mod error;
pub mod protocol;
pub mod unit_file;

pub use app_config::{ApplicationConfig, validate_unit_name};
pub use config::{InstallerSpec, Settings, Timeouts};
pub use error::{ApplyError, ConfigError, SessionError, Step};
pub use unit_file::ServiceAccount;
