//! Command implementations

pub mod apply;
pub mod check;
pub mod version;
