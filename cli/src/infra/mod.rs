//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the installer process,
//! filesystem access, config loading, and settings.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod config;
pub mod config_dir;
pub mod fs;
pub mod session;
pub mod session_factory;
pub mod transport;
